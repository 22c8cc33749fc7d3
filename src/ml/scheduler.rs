// ============================================================
// Layer 5 — Plateau Learning-Rate Policy
// ============================================================
// Lowers the learning rate when the validation loss stops
// improving. Burn's optimizers take the learning rate as an
// argument on every step, so the policy only has to track the
// metric history and hand back the rate to use.
//
// Behaviour (mode "min"):
//   - an epoch improves when its loss beats the best seen so far
//     by a relative threshold
//   - after `patience` consecutive non-improving epochs the rate
//     is multiplied by `factor`, floored at `min_lr`
//   - non-finite losses are ignored (warned, state unchanged)
//
// The policy is rebuilt at the start of every run, resumed or
// not — only model and optimizer state survive a restart.

/// Plateau-triggered learning-rate reduction, mode "min".
pub struct ReduceLrOnPlateau {
    factor: f64,
    patience: usize,
    min_lr: f64,
    threshold: f64,
    lr: f64,
    best: f64,
    bad_epochs: usize,
}

impl ReduceLrOnPlateau {
    /// Policy with the standard factor (0.1), patience (10 epochs)
    /// and relative improvement threshold (1e-4).
    pub fn new(initial_lr: f64, min_lr: f64) -> Self {
        Self {
            factor: 0.1,
            patience: 10,
            min_lr,
            threshold: 1e-4,
            lr: initial_lr,
            best: f64::INFINITY,
            bad_epochs: 0,
        }
    }

    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    pub fn with_patience(mut self, patience: usize) -> Self {
        self.patience = patience;
        self
    }

    /// The learning rate currently in effect
    pub fn lr(&self) -> f64 {
        self.lr
    }

    /// Observe one epoch's validation loss and return the learning
    /// rate to use from here on.
    pub fn step(&mut self, metric: f64) -> f64 {
        if !metric.is_finite() {
            tracing::warn!("validation loss is not finite; skipping plateau update");
            return self.lr;
        }

        if metric < self.best * (1.0 - self.threshold) {
            self.best = metric;
            self.bad_epochs = 0;
        } else {
            self.bad_epochs += 1;
            if self.bad_epochs > self.patience {
                let reduced = (self.lr * self.factor).max(self.min_lr);
                if reduced < self.lr {
                    tracing::info!(
                        "plateau: lr {:.2e} → {:.2e} (best={:.6}, current={:.6})",
                        self.lr,
                        reduced,
                        self.best,
                        metric,
                    );
                }
                self.lr = reduced;
                self.bad_epochs = 0;
            }
        }

        self.lr
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_improving_metric_keeps_lr() {
        let mut s = ReduceLrOnPlateau::new(1e-3, 1e-5).with_patience(2);
        assert_eq!(s.step(5.0), 1e-3);
        assert_eq!(s.step(4.0), 1e-3);
        assert_eq!(s.step(3.0), 1e-3);
    }

    #[test]
    fn test_reduces_after_patience_exceeded() {
        let mut s = ReduceLrOnPlateau::new(1e-3, 1e-6).with_patience(2);
        s.step(1.0);
        // Three consecutive epochs with no improvement → reduction
        s.step(1.0);
        s.step(1.0);
        let lr = s.step(1.0);
        assert!((lr - 1e-4).abs() < 1e-12);
    }

    #[test]
    fn test_improvement_resets_patience() {
        let mut s = ReduceLrOnPlateau::new(1e-3, 1e-6).with_patience(2);
        s.step(1.0);
        s.step(1.0);
        s.step(1.0);
        // A real improvement arrives just in time
        s.step(0.5);
        s.step(0.5);
        let lr = s.step(0.5);
        assert_eq!(lr, 1e-3);
    }

    #[test]
    fn test_lr_never_drops_below_min() {
        let mut s = ReduceLrOnPlateau::new(1e-4, 1e-5).with_patience(0);
        s.step(1.0);
        for _ in 0..10 {
            s.step(1.0);
        }
        assert_eq!(s.lr(), 1e-5);
    }

    #[test]
    fn test_non_finite_metric_is_ignored() {
        let mut s = ReduceLrOnPlateau::new(1e-3, 1e-5).with_patience(0);
        s.step(1.0);
        let lr = s.step(f64::NAN);
        assert_eq!(lr, 1e-3);
        // The NaN did not count as a bad epoch either
        let lr = s.step(1.0);
        assert!((lr - 1e-4).abs() < 1e-12);
    }

    #[test]
    fn test_tiny_wobble_is_not_an_improvement() {
        let mut s = ReduceLrOnPlateau::new(1e-3, 1e-6).with_patience(1);
        s.step(1.0);
        // Within the relative threshold of best — still a bad epoch
        s.step(0.99999);
        let lr = s.step(0.99999);
        assert!((lr - 1e-4).abs() < 1e-12);
    }
}
