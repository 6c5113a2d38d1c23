//! Event sinks: training-progress observers and per-case diagnostic sinks.
//!
//! Both kinds of sink can be wrapped in a
//! [`ProbabilisticSampler`](crate::ProbabilisticSampler) to rate-limit what
//! reaches them.

use std::fmt;

use crate::Matrix;

/// Where training currently is. Passed by value to every hook.
///
/// `batch_id` and `epoch_id` are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progress {
    pub batch_id: usize,
    pub batch_count: usize,
    pub epoch_id: usize,
    pub epoch_count: usize,
}

/// Hooks a classifier calls while fitting. All hooks default to no-ops.
///
/// `x` and `y` are the current mini-batch (features and labels).
pub trait TrainingObserver {
    fn pre_training_batch(&mut self, _progress: Progress, _x: &Matrix, _y: &Matrix) {}

    fn post_training_batch(&mut self, _progress: Progress, _x: &Matrix, _y: &Matrix, _loss: f64) {}

    fn pre_epoch(&mut self, _progress: Progress) {}

    fn post_epoch(&mut self, _progress: Progress, _mean_loss: f64) {}
}

/// Observes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TrainingObserver for NoopObserver {}

/// Logs the loss of every batch it sees.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerboseObserver;

impl TrainingObserver for VerboseObserver {
    fn post_training_batch(&mut self, progress: Progress, _x: &Matrix, _y: &Matrix, loss: f64) {
        tracing::info!(
            "[Epoch {}/{}, batch {}/{}] loss = {loss:.6}",
            progress.epoch_id + 1,
            progress.epoch_count,
            progress.batch_id + 1,
            progress.batch_count,
        );
    }

    fn post_epoch(&mut self, progress: Progress, mean_loss: f64) {
        tracing::info!(
            "[Epoch {}/{}] mean loss = {mean_loss:.6}",
            progress.epoch_id + 1,
            progress.epoch_count,
        );
    }
}

/// One scored test case.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaseDiagnostic {
    pub index: usize,
    pub features: Vec<f64>,
    pub expected: usize,
    pub predicted: usize,
    pub prediction: Vec<f64>,
}

impl fmt::Display for CaseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "( ")?;
        for x in &self.features {
            write!(f, "{x} ")?;
        }
        write!(
            f,
            ") -> {} (Predicted {}: [ ",
            self.expected, self.predicted
        )?;
        for p in &self.prediction {
            write!(f, "{p} ")?;
        }
        write!(f, "])")
    }
}

/// Receives per-case diagnostics from the evaluation harness.
pub trait CaseSink {
    fn record(&mut self, case: &CaseDiagnostic);
}

impl CaseSink for Vec<CaseDiagnostic> {
    fn record(&mut self, case: &CaseDiagnostic) {
        self.push(case.clone());
    }
}

impl<S: CaseSink + ?Sized> CaseSink for &mut S {
    fn record(&mut self, case: &CaseDiagnostic) {
        (**self).record(case);
    }
}

impl<O: TrainingObserver + ?Sized> TrainingObserver for &mut O {
    fn pre_training_batch(&mut self, progress: Progress, x: &Matrix, y: &Matrix) {
        (**self).pre_training_batch(progress, x, y);
    }

    fn post_training_batch(&mut self, progress: Progress, x: &Matrix, y: &Matrix, loss: f64) {
        (**self).post_training_batch(progress, x, y, loss);
    }

    fn pre_epoch(&mut self, progress: Progress) {
        (**self).pre_epoch(progress);
    }

    fn post_epoch(&mut self, progress: Progress, mean_loss: f64) {
        (**self).post_epoch(progress, mean_loss);
    }
}

/// Logs each case through `tracing` and keeps a copy.
#[derive(Debug, Clone, Default)]
pub struct TracingCaseSink {
    cases: Vec<CaseDiagnostic>,
}

impl TracingCaseSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_cases(self) -> Vec<CaseDiagnostic> {
        self.cases
    }
}

impl CaseSink for TracingCaseSink {
    fn record(&mut self, case: &CaseDiagnostic) {
        tracing::info!("{case}");
        self.cases.push(case.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_line_lists_features_classes_and_raw_prediction() {
        let case = CaseDiagnostic {
            index: 3,
            features: vec![0.25, 0.75],
            expected: 1,
            predicted: 0,
            prediction: vec![0.5, 0.25],
        };
        assert_eq!(
            case.to_string(),
            "( 0.25 0.75 ) -> 1 (Predicted 0: [ 0.5 0.25 ])"
        );
    }

    fn record_into(mut sink: impl CaseSink, case: &CaseDiagnostic) {
        sink.record(case);
    }

    #[test]
    fn sinks_collect_through_mut_refs() {
        let mut cases: Vec<CaseDiagnostic> = Vec::new();
        let case = CaseDiagnostic {
            index: 0,
            features: vec![1.0],
            expected: 2,
            predicted: 2,
            prediction: vec![0.0, 0.1, 0.9],
        };
        record_into(&mut cases, &case);

        let mut tracing_sink = TracingCaseSink::new();
        tracing_sink.record(&case);

        assert_eq!(cases, vec![case.clone()]);
        assert_eq!(tracing_sink.into_cases(), vec![case]);
    }
}
