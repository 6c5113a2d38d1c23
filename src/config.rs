//! Run parameters and positional overrides.
//!
//! Overrides are applied left to right in this order:
//!
//! `train_size test_size epochs learning_rate batch_size hidden_size... log_probability`
//!
//! with one `hidden_size` slot per hidden layer of the scenario.

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioConfig {
    pub train_size: usize,
    pub test_size: usize,
    pub epochs: usize,
    pub learning_rate: f64,
    pub batch_size: usize,
    /// One width per hidden layer.
    pub hidden: Vec<usize>,
    /// Probability of logging a training batch or a test case.
    pub log_probability: f64,
    /// Master seed; `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl ScenarioConfig {
    /// Number of positional overrides this config accepts.
    pub fn max_overrides(&self) -> usize {
        6 + self.hidden.len()
    }

    /// Apply positional overrides, left to right.
    pub fn apply_overrides<S: AsRef<str>>(&mut self, args: &[S]) -> Result<()> {
        let expected_max = self.max_overrides();
        if args.len() > expected_max {
            return Err(Error::InvalidArgumentCount {
                expected_max,
                received: args.len(),
            });
        }

        let hidden_count = self.hidden.len();
        for (slot, arg) in args.iter().enumerate() {
            let arg = arg.as_ref();
            match slot {
                0 => self.train_size = parse(arg, "train_size")?,
                1 => self.test_size = parse(arg, "test_size")?,
                2 => self.epochs = parse(arg, "epochs")?,
                3 => self.learning_rate = parse(arg, "learning_rate")?,
                4 => self.batch_size = parse(arg, "batch_size")?,
                s if s < 5 + hidden_count => self.hidden[s - 5] = parse(arg, "hidden_size")?,
                _ => self.log_probability = parse(arg, "log_probability")?,
            }
        }
        Ok(())
    }

    /// Split a single space-separated override string and apply it.
    pub fn apply_override_string(&mut self, overrides: &str) -> Result<()> {
        let args: Vec<&str> = overrides.split_whitespace().collect();
        self.apply_overrides(&args)
    }

    pub fn validate(&self) -> Result<()> {
        if self.train_size == 0 {
            return Err(Error::InvalidConfig("train_size must be > 0".to_owned()));
        }
        if self.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be > 0".to_owned()));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be > 0".to_owned()));
        }
        if self.hidden.contains(&0) {
            return Err(Error::InvalidConfig(
                "hidden layer sizes must be > 0".to_owned(),
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be finite and > 0, got {}",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.log_probability) {
            return Err(Error::InvalidConfig(format!(
                "log_probability must be in [0, 1], got {}",
                self.log_probability
            )));
        }
        Ok(())
    }
}

fn parse<T: std::str::FromStr>(value: &str, field: &'static str) -> Result<T> {
    value.parse().map_err(|_| Error::InvalidArgumentValue {
        field,
        value: value.to_owned(),
    })
}
