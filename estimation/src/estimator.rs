//! Algorithm S (burn-in step-size scaling) and Algorithm EE (the main θ
//! update loop, §4.5), with both update rules named in the spec:
//! stochastic approximation and the Borisenko et al. sign-based update.

use std::collections::VecDeque;

use eenet_graph::{Chain, EeError, Result};

use crate::rng::ChainRng;
use crate::sampler::Sampler;

/// One outer-step trace record (§3, §6): `t`, the current θ, the averaged
/// `Σ Δz` observed over that outer step's inner sweep, and the acceptance
/// rate. Written one per outer step by whatever `TraceCallback` the caller
/// supplies, matching §5's "trace lines at the end of every outer step".
#[derive(Debug, Clone)]
pub struct TraceRecord {
    pub t: u64,
    pub theta: Vec<f64>,
    pub mean_delta_z: Vec<f64>,
    pub acceptance_rate: f64,
}

pub type TraceCallback<'a> = dyn FnMut(&TraceRecord) -> Result<()> + 'a;

/// The two θ-update rules named in §4.5, selected by the `useBorisenkoUpdate`
/// config flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThetaUpdateRule {
    StochasticApproximation,
    Borisenko,
}

#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    pub aca_s: f64,
    pub aca_ee: f64,
    pub comp_c: f64,
    pub s_steps: u64,
    pub ee_steps: u64,
    pub ee_inner_steps: u64,
    /// Inner sweep length used by Algorithm S's own burn-in loop; §6 calls
    /// this `samplerSteps`, distinct from `EEinnerSteps`.
    pub sampler_steps: u64,
    pub update_rule: ThetaUpdateRule,
    /// Sliding window (in outer steps) used both for the adaptive step-size
    /// scaling and for the final t-ratio convergence check. 20 is a
    /// conservative default large enough to estimate a standard deviation.
    pub convergence_window: usize,
    pub t_ratio_threshold: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            aca_s: 0.1,
            aca_ee: 0.1,
            comp_c: 0.3,
            s_steps: 100,
            ee_steps: 500,
            ee_inner_steps: 1000,
            sampler_steps: 1000,
            update_rule: ThetaUpdateRule::StochasticApproximation,
            convergence_window: 20,
            t_ratio_threshold: 0.3,
        }
    }
}

/// The outcome of a full Algorithm S + Algorithm EE run on one chain:
/// the final θ, whether the t-ratio convergence criterion passed for every
/// effect, and which effects (if any) had a near-zero `Σ Δz` variance over
/// the convergence window — a cheap proxy for the "degenerate model /
/// singular covariance" failure mode named in §7, short of the full
/// post-hoc covariance estimation that is explicitly out of scope.
#[derive(Debug, Clone)]
pub struct EstimationOutcome {
    pub theta: Vec<f64>,
    pub converged: bool,
    pub t_ratios: Vec<f64>,
    pub degenerate: Vec<bool>,
}

/// A fixed-capacity window of per-effect vectors (θ history or ΔZ history),
/// used to compute the mean/sd that both the adaptive step size and the
/// final convergence check need.
struct Window {
    capacity: usize,
    rows: VecDeque<Vec<f64>>,
}

impl Window {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            rows: VecDeque::with_capacity(capacity),
        }
    }

    fn push(&mut self, row: Vec<f64>) {
        if self.rows.len() == self.capacity {
            self.rows.pop_front();
        }
        self.rows.push_back(row);
    }

    fn mean_sd(&self, k: usize) -> (f64, f64) {
        let n = self.rows.len() as f64;
        if n == 0.0 {
            return (0.0, 0.0);
        }
        let mean = self.rows.iter().map(|r| r[k]).sum::<f64>() / n;
        let variance = self.rows.iter().map(|r| (r[k] - mean).powi(2)).sum::<f64>() / n;
        (mean, variance.sqrt())
    }
}

fn check_finite(theta: &[f64]) -> Result<()> {
    if theta.iter().any(|v| !v.is_finite()) {
        return Err(EeError::Numeric(format!("non-finite theta encountered: {theta:?}")));
    }
    Ok(())
}

/// Algorithm S (§4.5): runs `s_steps` outer iterations of a fixed-size inner
/// sweep, nudging θ by the fixed multiplier `aca_s` toward zeroing the
/// observed `Σ Δz`. Returns the θ vector Algorithm EE should start from.
pub fn run_algorithm_s(
    chain: &mut Chain,
    sampler: &mut dyn Sampler,
    rng: &mut ChainRng,
    mut theta: Vec<f64>,
    config: &EstimatorConfig,
    mut on_outer_step: Option<&mut TraceCallback>,
) -> Result<Vec<f64>> {
    for t in 0..config.s_steps {
        let outcome = sampler.sweep(chain, &theta, config.sampler_steps, rng)?;
        let steps = config.sampler_steps.max(1) as f64;
        for (theta_k, sum_k) in theta.iter_mut().zip(&outcome.sum_delta_z) {
            *theta_k -= config.aca_s * (sum_k / steps);
        }
        check_finite(&theta)?;

        if let Some(cb) = on_outer_step.as_deref_mut() {
            let mean_delta_z = outcome.sum_delta_z.iter().map(|s| s / steps).collect();
            cb(&TraceRecord {
                t,
                theta: theta.clone(),
                mean_delta_z,
                acceptance_rate: outcome.acceptance_rate(),
            })?;
        }
    }
    Ok(theta)
}

/// Algorithm EE (§4.5): the main estimation loop. Runs `ee_steps` outer
/// iterations, each driving `ee_inner_steps` sweeps, updating θ by either
/// the stochastic-approximation or the Borisenko rule, and finally checks
/// the t-ratio convergence criterion over the trailing window.
pub fn run_algorithm_ee(
    chain: &mut Chain,
    sampler: &mut dyn Sampler,
    rng: &mut ChainRng,
    mut theta: Vec<f64>,
    config: &EstimatorConfig,
    mut on_outer_step: Option<&mut TraceCallback>,
) -> Result<EstimationOutcome> {
    let k = theta.len();
    let mut theta_window = Window::new(config.convergence_window);
    let mut delta_z_window = Window::new(config.convergence_window);
    theta_window.push(theta.clone());

    for t in 0..config.ee_steps {
        let outcome = sampler.sweep(chain, &theta, config.ee_inner_steps, rng)?;
        let steps = config.ee_inner_steps.max(1) as f64;
        let mean_delta_z: Vec<f64> = outcome.sum_delta_z.iter().map(|s| s / steps).collect();

        match config.update_rule {
            ThetaUpdateRule::StochasticApproximation => {
                for i in 0..k {
                    let (mean, sd) = theta_window.mean_sd(i);
                    let cv = if mean.abs() > 1e-12 { sd / mean.abs() } else { 0.0 };
                    let base_eta = config.aca_ee / (t as f64 + 1.0);
                    let scale = if cv > config.comp_c && cv > 0.0 {
                        config.comp_c / cv
                    } else {
                        1.0
                    };
                    theta[i] -= base_eta * scale * mean_delta_z[i];
                }
            }
            ThetaUpdateRule::Borisenko => {
                for i in 0..k {
                    let (_, sd) = theta_window.mean_sd(i);
                    let magnitude = if sd > 1e-12 { config.aca_ee * sd } else { config.aca_ee };
                    theta[i] -= magnitude * mean_delta_z[i].signum();
                }
            }
        }
        check_finite(&theta)?;

        theta_window.push(theta.clone());
        delta_z_window.push(mean_delta_z.clone());

        if let Some(cb) = on_outer_step.as_deref_mut() {
            cb(&TraceRecord {
                t,
                theta: theta.clone(),
                mean_delta_z,
                acceptance_rate: outcome.acceptance_rate(),
            })?;
        }
    }

    let mut t_ratios = Vec::with_capacity(k);
    let mut degenerate = Vec::with_capacity(k);
    for i in 0..k {
        let (mean, sd) = delta_z_window.mean_sd(i);
        t_ratios.push(if sd > 1e-12 { (mean / sd).abs() } else { 0.0 });
        degenerate.push(sd <= 1e-12);
    }
    let converged = t_ratios.iter().all(|&r| r <= config.t_ratio_threshold);

    Ok(EstimationOutcome {
        theta,
        converged,
        t_ratios,
        degenerate,
    })
}
