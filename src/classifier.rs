//! The trainable-classifier capability the experiment harness drives.
//!
//! The harness only ever talks to a classifier through this trait, so any
//! model (the bundled [`Network`](crate::Network) or an external one) can be
//! plugged in.

use crate::observer::TrainingObserver;
use crate::{Matrix, Result, Rng};

/// Summary of a `fit` call.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitReport {
    /// Mean batch loss of each epoch, in order.
    pub epoch_losses: Vec<f64>,
}

impl FitReport {
    pub fn final_loss(&self) -> Option<f64> {
        self.epoch_losses.last().copied()
    }
}

/// A classifier that can be (re)initialized, trained and queried.
///
/// Shape conventions follow [`Matrix`]: one sample per column.
pub trait Classifier {
    /// Allocate (or reset) parameters.
    fn init(&mut self, rng: &mut Rng) -> Result<()>;

    /// Train on `features` (`(input_dim, n)`) against `labels` (`(output_dim, n)`).
    ///
    /// Blocking. Calls `observer` around every batch and epoch.
    fn fit(
        &mut self,
        features: &Matrix,
        labels: &Matrix,
        batch_size: usize,
        epochs: usize,
        observer: &mut dyn TrainingObserver,
    ) -> Result<FitReport>;

    /// Predict an `(output_dim, n)` matrix for `features`.
    fn predict(&self, features: &Matrix) -> Result<Matrix>;
}
