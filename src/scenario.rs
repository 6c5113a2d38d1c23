//! Named experiment scenarios and the run pipeline.
//!
//! | name     | rule          | labels  | hidden layers |
//! |----------|---------------|---------|---------------|
//! | `small`  | quadrant      | binary  | 1             |
//! | `quad`   | quadratic     | one-hot | 1             |
//! | `ranges` | numeric range | one-hot | 2             |
//!
//! A run generates train and test sets, builds a [`Network`], trains it with a
//! sampled [`VerboseObserver`] and evaluates it with sampled case logging.

use std::fmt;
use std::str::FromStr;

use crate::classifier::FitReport;
use crate::dataset::{LabelEncoding, LabelRule, QuadrantRule, QuadraticRule, RangeRule, Rule};
use crate::evaluate::{TestOutcome, test_classifier};
use crate::network::{Network, NetworkConfig, OutputLoss};
use crate::observer::VerboseObserver;
use crate::{
    Classifier, DatasetGenerator, Error, ProbabilisticSampler, Result, Rng, ScenarioConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scenario {
    Small,
    Quad,
    Ranges,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Small, Scenario::Quad, Scenario::Ranges];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::Small => "small",
            Scenario::Quad => "quad",
            Scenario::Ranges => "ranges",
        }
    }

    pub fn rule(self) -> Rule {
        match self {
            Scenario::Small => Rule::Quadrant(QuadrantRule),
            Scenario::Quad => Rule::Quadratic(QuadraticRule::default()),
            Scenario::Ranges => Rule::Range(RangeRule::default()),
        }
    }

    pub fn encoding(self) -> LabelEncoding {
        match self {
            Scenario::Small => LabelEncoding::Binary,
            Scenario::Quad | Scenario::Ranges => LabelEncoding::OneHot,
        }
    }

    pub fn default_config(self) -> ScenarioConfig {
        match self {
            Scenario::Small => ScenarioConfig {
                train_size: 10_000,
                test_size: 2_000,
                epochs: 10,
                learning_rate: 0.001,
                batch_size: 32,
                hidden: vec![3],
                log_probability: 0.01,
                seed: None,
            },
            Scenario::Quad => ScenarioConfig {
                train_size: 10_000,
                test_size: 2_000,
                epochs: 10,
                learning_rate: 0.002,
                batch_size: 32,
                hidden: vec![1],
                log_probability: 0.01,
                seed: None,
            },
            Scenario::Ranges => ScenarioConfig {
                train_size: 1024,
                test_size: 1024,
                epochs: 100,
                learning_rate: 0.001,
                batch_size: 32,
                hidden: vec![2, 2],
                log_probability: 0.01,
                seed: None,
            },
        }
    }

    /// Defaults with `overrides` (space-separated, positional) applied.
    pub fn config(self, overrides: &str) -> Result<ScenarioConfig> {
        let mut config = self.default_config();
        config.apply_override_string(overrides)?;
        Ok(config)
    }

    pub fn max_overrides(self) -> usize {
        self.default_config().max_overrides()
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name() == s)
            .ok_or_else(|| Error::UnknownScenario(s.to_owned()))
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunReport {
    pub scenario: Scenario,
    pub config: ScenarioConfig,
    pub fit: FitReport,
    pub test: TestOutcome,
}

impl RunReport {
    #[inline]
    pub fn accuracy(&self) -> f64 {
        self.test.evaluation.accuracy
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::InvalidData(format!("failed to serialize report: {e}")))
    }
}

fn log_config(scenario: Scenario, config: &ScenarioConfig, input_size: usize, output_size: usize) {
    tracing::info!("Scenario: [{scenario}]");
    tracing::info!(" Training set size: [{}]", config.train_size);
    tracing::info!(" Test set size: [{}]", config.test_size);
    tracing::info!(" Training epochs: [{}]", config.epochs);
    tracing::info!(" Learning rate: [{}]", config.learning_rate);
    tracing::info!(" Mini-batch size: [{}]", config.batch_size);
    tracing::info!(" Input size: [{input_size}]");
    for (i, width) in config.hidden.iter().enumerate() {
        tracing::info!(" Hidden layer {i} size: [{width}]");
    }
    tracing::info!(" Output size: [{output_size}]");
    tracing::info!(" Log probability: [{}]", config.log_probability);
    if let Some(seed) = config.seed {
        tracing::info!(" Seed: [{seed}]");
    }
}

/// Run `scenario` end to end with the bundled [`Network`].
pub fn run(scenario: Scenario, config: ScenarioConfig) -> Result<RunReport> {
    config.validate()?;
    if config.test_size == 0 {
        return Err(Error::EmptyEvaluationSet);
    }

    let generator = DatasetGenerator::new(scenario.rule(), scenario.encoding())?;
    let input_size = generator.rule().feature_count();
    let output_size = generator.label_rows();
    log_config(scenario, &config, input_size, output_size);

    let mut master = Rng::new(config.seed);

    tracing::info!("Generating data...");
    let train = generator.generate(config.train_size, &mut master.fork())?;
    let test = generator.generate(config.test_size, &mut master.fork())?;

    tracing::info!("Constructing architecture...");
    let mut network = Network::new(NetworkConfig {
        input_dim: input_size,
        hidden: config.hidden.clone(),
        output_dim: output_size,
        loss: OutputLoss::for_classes(generator.rule().class_count()),
        learning_rate: config.learning_rate,
    })?;
    network.init(&mut master.fork())?;

    tracing::info!("Training...");
    tracing::info!(
        "Outputting {}% of training statistics.",
        100.0 * config.log_probability
    );
    let mut observer =
        ProbabilisticSampler::new(VerboseObserver, config.log_probability, master.fork())?;
    let fit = network.fit(
        train.features(),
        train.labels(),
        config.batch_size,
        config.epochs,
        &mut observer,
    )?;
    tracing::debug!(
        probability = observer.probability(),
        forwarded = observer.forwarded(),
        dropped = observer.dropped(),
        "training observer sampling"
    );

    let test = test_classifier(&network, &test, config.log_probability, master.fork())?;

    Ok(RunReport {
        scenario,
        config,
        fit,
        test,
    })
}
