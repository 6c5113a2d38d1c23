//! Synthetic-dataset classification experiments.
//!
//! `neural-run` generates labelled datasets from simple geometric and numeric
//! rules, trains a classifier on them and reports test accuracy, logging a
//! random fraction of the training batches and test cases along the way.
//!
//! # Pieces
//!
//! - [`Rng`]: a seedable uniform source shared by every random decision.
//! - [`DatasetGenerator`]: draws features and labels from a [`LabelRule`]
//!   ([`QuadrantRule`], [`QuadraticRule`], [`RangeRule`]).
//! - [`ProbabilisticSampler`]: forwards observer / sink events with a fixed
//!   probability.
//! - [`Classifier`]: the capability the harness drives; [`Network`] is the
//!   bundled implementation.
//! - [`score`] / [`test_classifier`]: threshold or argmax accuracy.
//! - [`Scenario`]: the `small`, `quad` and `ranges` experiments with their
//!   defaults and positional overrides.
//!
//! # Data layout and shapes
//!
//! - Scalars are `f64`.
//! - [`Matrix`] is column-major: one sample per column, one feature (or
//!   output) per row.
//! - Layer weights are row-major with shape `(out_dim, in_dim)`.
//!
//! # Randomness
//!
//! A run seeds one master [`Rng`] and forks an independent stream for each
//! consumer (training data, test data, weight init, training log sampling,
//! test log sampling). Changing the log probability therefore never changes
//! the data, the weights or the accuracy.
//!
//! # Quick start
//!
//! ```rust
//! use neural_run::{Scenario, run};
//!
//! # fn main() -> neural_run::Result<()> {
//! let mut config = Scenario::Small.config("256 64 2")?;
//! config.seed = Some(7);
//! config.log_probability = 0.0;
//!
//! let report = run(Scenario::Small, config)?;
//! assert_eq!(report.test.evaluation.total, 64);
//! assert!((0.0..=1.0).contains(&report.accuracy()));
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluate;
pub mod matrix;
pub mod network;
pub mod observer;
pub mod rng;
pub mod sampler;
pub mod scenario;

pub use classifier::{Classifier, FitReport};
pub use config::ScenarioConfig;
pub use dataset::{
    DatasetGenerator, Interval, LabelEncoding, LabelRule, QuadrantRule, QuadraticRule, RangeRule,
    Rule, SampleSet,
};
pub use error::{Error, Result};
pub use evaluate::{Evaluation, EvaluationMode, TestOutcome, argmax, score, test_classifier};
pub use matrix::Matrix;
pub use network::{Network, NetworkConfig, OutputLoss};
pub use observer::{
    CaseDiagnostic, CaseSink, NoopObserver, Progress, TracingCaseSink, TrainingObserver,
    VerboseObserver,
};
pub use rng::Rng;
pub use sampler::ProbabilisticSampler;
pub use scenario::{RunReport, Scenario, run};
