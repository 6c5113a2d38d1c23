use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// An RNG bound pair with `min > max`.
    InvalidRange { min: f64, max: f64 },
    /// More positional overrides than the scenario accepts.
    InvalidArgumentCount {
        expected_max: usize,
        received: usize,
    },
    /// A positional override that does not parse as its field's type.
    InvalidArgumentValue { field: &'static str, value: String },
    UnknownScenario(String),
    EmptyEvaluationSet,
    InvalidData(String),
    InvalidConfig(String),
    InvalidShape(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidRange { min, max } => write!(
                f,
                "invalid range: min ({min}) can't be greater than max ({max})"
            ),
            Error::InvalidArgumentCount {
                expected_max,
                received,
            } => write!(
                f,
                "invalid number of run arguments: expected at most [{}], received [{}]",
                expected_max, received
            ),
            Error::InvalidArgumentValue { field, value } => {
                write!(f, "invalid value for {field}: {value:?}")
            }
            Error::UnknownScenario(name) => write!(f, "unknown scenario: {name:?}"),
            Error::EmptyEvaluationSet => write!(f, "evaluation set must not be empty"),
            Error::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            Error::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Error::InvalidShape(msg) => write!(f, "invalid shape: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
