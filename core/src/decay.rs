//! Decay-weight bookkeeping shared by every alternating statistic
//! (alternating k-stars/-triangles/-two-paths/-cycles). Per the numeric
//! policy in §4.3, λ and `1 - 1/λ` are precomputed once, and a bounded
//! lookup table caches `(1 - 1/λ)^n` for the small `n` that dominate real
//! graphs; larger `n` fall back to `powi`.

#[derive(Debug, Clone)]
pub struct DecayTable {
    lambda: f64,
    one_minus_inv_lambda: f64,
    table: Vec<f64>,
}

impl DecayTable {
    /// `bound` is the largest `n` the lookup table pre-fills; `(1-1/λ)^n`
    /// for `n` beyond it is computed directly, still in closed form.
    pub fn new(lambda: f64, bound: usize) -> Self {
        debug_assert!(lambda > 1.0, "decay parameter must exceed 1, got {lambda}");
        let one_minus_inv_lambda = 1.0 - 1.0 / lambda;
        let mut table = Vec::with_capacity(bound + 1);
        let mut value = 1.0;
        table.push(value);
        for _ in 0..bound {
            value *= one_minus_inv_lambda;
            table.push(value);
        }
        Self {
            lambda,
            one_minus_inv_lambda,
            table,
        }
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// `(1 - 1/λ)^n`.
    pub fn power(&self, n: u64) -> f64 {
        match self.table.get(n as usize) {
            Some(&v) => v,
            None => self.one_minus_inv_lambda.powi(n as i32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lookup_matches_direct_power() {
        let table = DecayTable::new(2.0, 4);
        for n in 0..20u64 {
            let direct = (1.0 - 1.0 / 2.0f64).powi(n as i32);
            assert_relative_eq!(table.power(n), direct, epsilon = 1e-12);
        }
    }
}
