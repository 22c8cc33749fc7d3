// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Why log metrics to CSV?
//   - Easy to open in a spreadsheet or plot with one pandas call
//   - Learning curves diagnose training issues at a glance
//   - Provides a permanent record of each training run
//
// Metrics recorded per epoch:
//   - epoch:      the epoch number (1, 2, 3, ...)
//   - train_loss: average CE + KL loss on the training set
//   - val_loss:   average CE + KL loss on the validation set
//   - lr:         learning rate the epoch was trained with
//
// Output file: <checkpoint_dir>/metrics.csv
//
// How to read the metrics:
//   - Loss should decrease each epoch (model is learning)
//   - If val_loss rises while train_loss falls → overfitting
//   - A dropping lr column means the plateau policy kicked in

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average loss over all training batches
    pub train_loss: f64,

    /// Average loss on the validation set
    /// Should track train_loss — divergence indicates overfitting
    pub val_loss: f64,

    /// Learning rate in effect during this epoch
    pub lr: f64,
}

impl EpochMetrics {
    /// Create a new EpochMetrics record
    pub fn new(epoch: usize, train_loss: f64, val_loss: f64, lr: f64) -> Self {
        Self { epoch, train_loss, val_loss, lr }
    }

    /// Returns true iff this epoch improved on the previous best —
    /// the strict comparison that decides the is_best flag
    pub fn is_improvement(&self, best_val_loss: f64) -> bool {
        self.val_loss < best_val_loss
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    /// Full path to the CSV file
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");

        // Write CSV header only if file is new
        // This allows appending to an existing log across runs
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,train_loss,val_loss,lr")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:e}",
            m.epoch, m.train_loss, m.val_loss, m.lr,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_loss={:.4}",
            m.epoch,
            m.train_loss,
            m.val_loss,
        );

        Ok(())
    }

    /// Return the path to the metrics CSV file
    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_improvement_is_strict() {
        let m = EpochMetrics::new(2, 2.5, 2.3, 1e-3);
        assert!(m.is_improvement(3.0));
        assert!(!m.is_improvement(2.0));
        // Equal is NOT an improvement
        assert!(!m.is_improvement(2.3));
    }

    #[test]
    fn test_sentinel_always_loses_to_a_finite_loss() {
        let m = EpochMetrics::new(1, 5.0, 4.2, 1e-3);
        assert!(m.is_improvement(1e6));
    }

    #[test]
    fn test_nan_loss_is_never_an_improvement() {
        let m = EpochMetrics::new(1, 5.0, f64::NAN, 1e-3);
        assert!(!m.is_improvement(1e6));
    }

    #[test]
    fn test_one_row_per_logged_epoch() {
        let dir = std::env::temp_dir().join(format!("smiles-metrics-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let logger = MetricsLogger::new(dir.display().to_string()).unwrap();
        logger.log(&EpochMetrics::new(1, 3.0, 2.9, 1e-3)).unwrap();
        logger.log(&EpochMetrics::new(2, 2.8, 2.7, 1e-3)).unwrap();

        let csv = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "epoch,train_loss,val_loss,lr");
        assert!(lines[1].starts_with("1,"));
        assert!(lines[2].starts_with("2,"));

        fs::remove_dir_all(dir).ok();
    }
}
