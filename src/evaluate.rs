//! Scoring predictions against ground truth.
//!
//! Two modes:
//!
//! - [`EvaluationMode::Threshold`]: single-row outputs, predicted class is
//!   `round(prediction)`, compared with the stored scalar label.
//! - [`EvaluationMode::Argmax`]: multi-row outputs, predicted class is the row of
//!   the column maximum (lowest index on ties), compared with the argmax of the
//!   one-hot label column.
//!
//! Every case is offered to a [`CaseSink`]; wrap the sink in a
//! [`ProbabilisticSampler`] to rate-limit diagnostics. The sink never sees the
//! running score and cannot influence it.

use crate::observer::{CaseDiagnostic, CaseSink, TracingCaseSink};
use crate::{Classifier, Error, Matrix, ProbabilisticSampler, Result, Rng, SampleSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EvaluationMode {
    Threshold,
    Argmax,
}

impl EvaluationMode {
    /// `Threshold` for single-row outputs, `Argmax` otherwise.
    pub fn for_rows(rows: usize) -> Self {
        if rows == 1 {
            EvaluationMode::Threshold
        } else {
            EvaluationMode::Argmax
        }
    }

    /// Class index encoded by one output (or label) column.
    #[inline]
    pub fn class_of(self, column: &[f64]) -> usize {
        match self {
            EvaluationMode::Threshold => threshold_class(column[0]),
            EvaluationMode::Argmax => argmax(column),
        }
    }
}

/// Index of the maximum value; the first index wins on exact ties.
///
/// Panics if `values` is empty.
#[inline]
pub fn argmax(values: &[f64]) -> usize {
    let mut max_index = 0;
    let mut max = values[0];
    for (i, &v) in values.iter().enumerate().skip(1) {
        if max < v {
            max = v;
            max_index = i;
        }
    }
    max_index
}

#[inline]
fn threshold_class(value: f64) -> usize {
    // Negative outputs round to class 0 rather than wrapping.
    value.round().max(0.0) as usize
}

/// Outcome of scoring one prediction matrix.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    pub accuracy: f64,
    pub correct: usize,
    pub total: usize,
}

/// Score `predictions` against `labels`, offering every case to `sink`.
///
/// Shapes: `features` is `(input_dim, n)`; `predictions` and `labels` are
/// `(rows, n)` with equal `rows`. `mode` must be `Threshold` only for one row.
pub fn score(
    features: &Matrix,
    predictions: &Matrix,
    labels: &Matrix,
    mode: EvaluationMode,
    sink: &mut impl CaseSink,
) -> Result<Evaluation> {
    let total = labels.cols();
    if total == 0 {
        return Err(Error::EmptyEvaluationSet);
    }
    if predictions.cols() != total || features.cols() != total {
        return Err(Error::InvalidShape(format!(
            "sample counts differ: features {}, predictions {}, labels {total}",
            features.cols(),
            predictions.cols()
        )));
    }
    if predictions.rows() != labels.rows() || labels.rows() == 0 {
        return Err(Error::InvalidShape(format!(
            "prediction rows {} do not match label rows {}",
            predictions.rows(),
            labels.rows()
        )));
    }
    if mode == EvaluationMode::Threshold && labels.rows() != 1 {
        return Err(Error::InvalidShape(format!(
            "threshold evaluation needs a single output row, got {}",
            labels.rows()
        )));
    }

    let mut correct = 0;
    for i in 0..total {
        let prediction = predictions.column(i);
        let predicted = mode.class_of(prediction);
        let expected = mode.class_of(labels.column(i));
        if predicted == expected {
            correct += 1;
        }

        sink.record(&CaseDiagnostic {
            index: i,
            features: features.column(i).to_vec(),
            expected,
            predicted,
            prediction: prediction.to_vec(),
        });
    }

    Ok(Evaluation {
        accuracy: correct as f64 / total as f64,
        correct,
        total,
    })
}

/// An [`Evaluation`] plus the diagnostics that made it through the sampler.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TestOutcome {
    pub evaluation: Evaluation,
    pub sampled: Vec<CaseDiagnostic>,
}

/// Predict `test` with `classifier` and score it.
///
/// Each case line is logged with probability `log_probability`, using draws from
/// `log_rng` only.
pub fn test_classifier<C: Classifier + ?Sized>(
    classifier: &C,
    test: &SampleSet,
    log_probability: f64,
    log_rng: Rng,
) -> Result<TestOutcome> {
    if test.is_empty() {
        return Err(Error::EmptyEvaluationSet);
    }

    tracing::info!("Testing...");
    tracing::info!("Outputting {}% of test cases.", 100.0 * log_probability);

    let predictions = classifier.predict(test.features())?;
    let mode = EvaluationMode::for_rows(test.label_rows());
    let mut sampler = ProbabilisticSampler::new(TracingCaseSink::new(), log_probability, log_rng)?;

    let evaluation = score(
        test.features(),
        &predictions,
        test.labels(),
        mode,
        &mut sampler,
    )?;
    tracing::info!("Accuracy: {}", evaluation.accuracy);

    Ok(TestOutcome {
        evaluation,
        sampled: sampler.into_inner().into_cases(),
    })
}
