//! Trace output writers (§6): one file per chain, a header row
//! `t param1 param2 ... AcceptanceRate`, one line per outer step.
//! `thetaFilePrefix`/`dzAFilePrefix` each get their own `TraceWriter`
//! instance sharing the same line format, one writing θ(t) and the other
//! Σ Δz(t); `observedStatsFilePrefix` reuses the same writer without an
//! acceptance-rate column for the simulator's per-sample statistic rows.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use eenet_graph::{EeError, Result};

pub struct TraceWriter {
    writer: BufWriter<File>,
    with_acceptance_rate: bool,
}

impl TraceWriter {
    /// Opens `path` for writing and emits the header row immediately, so a
    /// truncated trace (chain terminated by a `NumericFailure`, §7) still
    /// carries a valid header for any partial rows already flushed.
    pub fn create(path: impl AsRef<Path>, param_names: &[&str], with_acceptance_rate: bool) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| EeError::Io(std::io::Error::new(e.kind(), format!("{}: {e}", path.display()))))?;
        let mut writer = BufWriter::new(file);

        write!(writer, "t")?;
        for name in param_names {
            write!(writer, " {name}")?;
        }
        if with_acceptance_rate {
            write!(writer, " AcceptanceRate")?;
        }
        writeln!(writer)?;

        Ok(Self {
            writer,
            with_acceptance_rate,
        })
    }

    /// Writes one trace row. `values.len()` must equal the `param_names`
    /// length the writer was created with; `acceptance_rate` is required
    /// iff the writer was created `with_acceptance_rate`.
    pub fn write_row(&mut self, t: u64, values: &[f64], acceptance_rate: Option<f64>) -> Result<()> {
        if acceptance_rate.is_some() != self.with_acceptance_rate {
            return Err(EeError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "acceptance rate presence does not match how this TraceWriter was created",
            )));
        }
        write!(self.writer, "{t}")?;
        for value in values {
            write!(self.writer, " {value}")?;
        }
        if let Some(rate) = acceptance_rate {
            write!(self.writer, " {rate}")?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Reads back the last data row of a theta trace previously written by
/// `TraceWriter` and returns its `number_of_params` parameter columns (the
/// `t` column and any trailing `AcceptanceRate` column are dropped). Used by
/// the simulator entry point to start from an estimated θ rather than
/// requiring a separate config key for it.
pub fn read_last_theta(path: impl AsRef<Path>, number_of_params: usize) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| EeError::Config(format!("could not read theta file '{}': {e}", path.display())))?;
    let last = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .last()
        .ok_or_else(|| EeError::Config(format!("{}: no data rows", path.display())))?;

    let header_has_acceptance = text
        .lines()
        .next()
        .map(|h| h.trim_end().ends_with("AcceptanceRate"))
        .unwrap_or(false);

    let fields: Vec<&str> = last.split_whitespace().collect();
    if fields.is_empty() {
        return Err(EeError::Config(format!("{}: empty data row", path.display())));
    }
    let value_fields = &fields[1..]; // drop the leading `t` column
    let value_fields = if header_has_acceptance && value_fields.len() > number_of_params {
        &value_fields[..number_of_params]
    } else {
        value_fields
    };

    if value_fields.len() != number_of_params {
        return Err(EeError::Config(format!(
            "{}: expected {number_of_params} theta values, found {}",
            path.display(),
            value_fields.len()
        )));
    }

    value_fields
        .iter()
        .map(|f| {
            f.parse::<f64>()
                .map_err(|e| EeError::Config(format!("{}: bad theta value '{f}': {e}", path.display())))
        })
        .collect()
}

/// Builds `<prefix><t>.net` for a simulator graph snapshot taken at sample
/// index `t`, per §6: "named `<prefix>_<i>.net`".
pub fn snapshot_path(prefix: &str, index: u64) -> std::path::PathBuf {
    std::path::PathBuf::from(format!("{prefix}_{index}.net"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let path = std::env::temp_dir().join(format!("eenet-trace-test-{}", std::process::id()));
        {
            let mut writer = TraceWriter::create(&path, &["Arc", "Reciprocity"], true).unwrap();
            writer.write_row(0, &[1.0, 2.0], Some(0.5)).unwrap();
            writer.write_row(1, &[1.5, 2.5], Some(0.4)).unwrap();
            writer.flush().unwrap();
        }
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "t Arc Reciprocity AcceptanceRate");
        assert_eq!(lines.next().unwrap(), "0 1 2 0.5");
        assert_eq!(lines.next().unwrap(), "1 1.5 2.5 0.4");
    }

    #[test]
    fn rejects_acceptance_rate_mismatch() {
        let path = std::env::temp_dir().join(format!("eenet-trace-test2-{}", std::process::id()));
        let mut writer = TraceWriter::create(&path, &["Arc"], false).unwrap();
        let result = writer.write_row(0, &[1.0], Some(0.5));
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn snapshot_path_matches_prefix_convention() {
        assert_eq!(snapshot_path("out/sim", 3).to_str().unwrap(), "out/sim_3.net");
    }

    #[test]
    fn reads_last_theta_row_dropping_t_and_acceptance_rate() {
        let path = std::env::temp_dir().join(format!("eenet-trace-test3-{}", std::process::id()));
        {
            let mut writer = TraceWriter::create(&path, &["Arc", "Reciprocity"], true).unwrap();
            writer.write_row(0, &[1.0, 2.0], Some(0.5)).unwrap();
            writer.write_row(1, &[1.5, 2.5], Some(0.4)).unwrap();
            writer.flush().unwrap();
        }
        let theta = read_last_theta(&path, 2).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(theta, vec![1.5, 2.5]);
    }
}
