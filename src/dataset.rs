//! Synthetic labeled datasets.
//!
//! A dataset is produced by one [`DatasetGenerator`] parameterized by a
//! [`LabelRule`]. The rule owns everything scenario-specific:
//!
//! - `draw` pulls the rule's latent values from the RNG (coordinates, curve
//!   coefficients, a scalar),
//! - `features` turns those values into one feature column,
//! - `classify` maps the same values to a class index.
//!
//! The generator then writes the label column with the configured
//! [`LabelEncoding`], so one-hot handling lives in exactly one place.
//!
//! Layout: `features` is `(feature_count, len)` and `labels` is
//! `(label_rows, len)`, one column per sample (see [`Matrix`]).

use crate::{Error, Matrix, Result, Rng};

/// A labeling rule: a pure mapping from drawn values to features and a class.
pub trait LabelRule {
    /// Rows of the feature matrix.
    fn feature_count(&self) -> usize;

    /// Number of distinct classes `classify` can return.
    fn class_count(&self) -> usize;

    /// Draw the latent values for one sample.
    fn draw(&self, rng: &mut Rng) -> Result<Vec<f64>>;

    /// Write the feature column for `drawn` into `out` (`out.len() == feature_count()`).
    fn features(&self, drawn: &[f64], out: &mut [f64]);

    /// Class index in `0..class_count()` for `drawn`.
    fn classify(&self, drawn: &[f64]) -> usize;
}

/// Two features drawn from `[0, 1]`; positive iff both exceed one half.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadrantRule;

impl QuadrantRule {
    pub const THRESHOLD: f64 = 0.5;
}

impl LabelRule for QuadrantRule {
    fn feature_count(&self) -> usize {
        2
    }

    fn class_count(&self) -> usize {
        2
    }

    fn draw(&self, rng: &mut Rng) -> Result<Vec<f64>> {
        Ok(vec![rng.get_double(0.0, 1.0)?, rng.get_double(0.0, 1.0)?])
    }

    fn features(&self, drawn: &[f64], out: &mut [f64]) {
        out.copy_from_slice(&drawn[..2]);
    }

    fn classify(&self, drawn: &[f64]) -> usize {
        usize::from(drawn[0] > Self::THRESHOLD && drawn[1] > Self::THRESHOLD)
    }
}

/// Samples of `a x^2 + b x + c` at integer offsets around zero; positive iff convex.
///
/// Feature `j` is the curve evaluated at `x = j - feature_count / 2` (integer division).
/// Setting `b_limit` and `c_limit` to zero pins the shape to `a x^2`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadraticRule {
    pub feature_count: usize,
    pub a_limit: f64,
    pub b_limit: f64,
    pub c_limit: f64,
}

impl Default for QuadraticRule {
    fn default() -> Self {
        Self {
            feature_count: 11,
            a_limit: 1.0,
            b_limit: 2.0,
            c_limit: 5.0,
        }
    }
}

impl QuadraticRule {
    pub fn new(feature_count: usize, a_limit: f64, b_limit: f64, c_limit: f64) -> Result<Self> {
        if feature_count == 0 {
            return Err(Error::InvalidConfig(
                "quadratic feature_count must be > 0".to_owned(),
            ));
        }
        for (name, limit) in [("a", a_limit), ("b", b_limit), ("c", c_limit)] {
            if !(limit.is_finite() && limit >= 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "quadratic {name}_limit must be finite and >= 0, got {limit}"
                )));
            }
        }
        // Largest |a x^2 + b x + c| over the sampled offsets.
        let reach = (feature_count / 2) as f64;
        let bound = a_limit * reach * reach + b_limit * reach + c_limit;
        if !bound.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "quadratic limits overflow over {feature_count} samples, bound {bound}"
            )));
        }
        Ok(Self {
            feature_count,
            a_limit,
            b_limit,
            c_limit,
        })
    }

    /// The sampling offset `x` of feature `j`.
    #[inline]
    pub fn offset(&self, j: usize) -> f64 {
        (j as i64 - (self.feature_count / 2) as i64) as f64
    }
}

impl LabelRule for QuadraticRule {
    fn feature_count(&self) -> usize {
        self.feature_count
    }

    fn class_count(&self) -> usize {
        2
    }

    fn draw(&self, rng: &mut Rng) -> Result<Vec<f64>> {
        let a = rng.get_double(-self.a_limit, self.a_limit)?;
        let b = rng.get_double(-self.b_limit, self.b_limit)?;
        let c = rng.get_double(-self.c_limit, self.c_limit)?;
        Ok(vec![a, b, c])
    }

    fn features(&self, drawn: &[f64], out: &mut [f64]) {
        let (a, b, c) = (drawn[0], drawn[1], drawn[2]);
        for (j, v) in out.iter_mut().enumerate() {
            let x = self.offset(j);
            *v = a * x * x + b * x + c;
        }
    }

    fn classify(&self, drawn: &[f64]) -> usize {
        usize::from(drawn[0] > 0.0)
    }
}

/// An open interval `(min, max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub const fn symmetric(half_width: f64) -> Self {
        Self {
            min: -half_width,
            max: half_width,
        }
    }

    /// Strict membership: `min < v < max`.
    #[inline]
    pub fn contains(&self, v: f64) -> bool {
        self.min < v && v < self.max
    }

    fn encloses(&self, other: &Interval) -> bool {
        self.min <= other.min && other.max <= self.max
    }
}

/// One scalar feature; the class is the depth of the innermost interval containing it.
///
/// Values are drawn from the closed `outer` interval. Class 2 if strictly inside
/// `inner`, else class 1 if strictly inside `middle`, else class 0.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeRule {
    outer: Interval,
    middle: Interval,
    inner: Interval,
}

impl Default for RangeRule {
    fn default() -> Self {
        Self {
            outer: Interval::symmetric(6.0),
            middle: Interval::symmetric(5.0),
            inner: Interval::symmetric(3.0),
        }
    }
}

impl RangeRule {
    /// Build from nested intervals, `outer ⊇ middle ⊇ inner`.
    pub fn new(outer: Interval, middle: Interval, inner: Interval) -> Result<Self> {
        for (name, iv) in [("outer", outer), ("middle", middle), ("inner", inner)] {
            if !(iv.min.is_finite() && iv.max.is_finite() && iv.min <= iv.max) {
                return Err(Error::InvalidConfig(format!(
                    "{name} interval must be finite with min <= max, got ({}, {})",
                    iv.min, iv.max
                )));
            }
        }
        if !outer.encloses(&middle) || !middle.encloses(&inner) {
            return Err(Error::InvalidConfig(
                "range intervals must be nested: outer ⊇ middle ⊇ inner".to_owned(),
            ));
        }
        Ok(Self {
            outer,
            middle,
            inner,
        })
    }

    pub fn symmetric(outer: f64, middle: f64, inner: f64) -> Result<Self> {
        Self::new(
            Interval::symmetric(outer),
            Interval::symmetric(middle),
            Interval::symmetric(inner),
        )
    }
}

impl LabelRule for RangeRule {
    fn feature_count(&self) -> usize {
        1
    }

    fn class_count(&self) -> usize {
        3
    }

    fn draw(&self, rng: &mut Rng) -> Result<Vec<f64>> {
        Ok(vec![rng.get_double(self.outer.min, self.outer.max)?])
    }

    fn features(&self, drawn: &[f64], out: &mut [f64]) {
        out[0] = drawn[0];
    }

    fn classify(&self, drawn: &[f64]) -> usize {
        let v = drawn[0];
        if self.inner.contains(v) {
            2
        } else if self.middle.contains(v) {
            1
        } else {
            0
        }
    }
}

/// Any of the built-in rules.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rule {
    Quadrant(QuadrantRule),
    Quadratic(QuadraticRule),
    Range(RangeRule),
}

impl LabelRule for Rule {
    fn feature_count(&self) -> usize {
        match self {
            Rule::Quadrant(r) => r.feature_count(),
            Rule::Quadratic(r) => r.feature_count(),
            Rule::Range(r) => r.feature_count(),
        }
    }

    fn class_count(&self) -> usize {
        match self {
            Rule::Quadrant(r) => r.class_count(),
            Rule::Quadratic(r) => r.class_count(),
            Rule::Range(r) => r.class_count(),
        }
    }

    fn draw(&self, rng: &mut Rng) -> Result<Vec<f64>> {
        match self {
            Rule::Quadrant(r) => r.draw(rng),
            Rule::Quadratic(r) => r.draw(rng),
            Rule::Range(r) => r.draw(rng),
        }
    }

    fn features(&self, drawn: &[f64], out: &mut [f64]) {
        match self {
            Rule::Quadrant(r) => r.features(drawn, out),
            Rule::Quadratic(r) => r.features(drawn, out),
            Rule::Range(r) => r.features(drawn, out),
        }
    }

    fn classify(&self, drawn: &[f64]) -> usize {
        match self {
            Rule::Quadrant(r) => r.classify(drawn),
            Rule::Quadratic(r) => r.classify(drawn),
            Rule::Range(r) => r.classify(drawn),
        }
    }
}

/// How class indices are written into the label matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LabelEncoding {
    /// `class_count` rows, exactly one `1.0` per column.
    #[default]
    OneHot,
    /// A single row holding `0.0` or `1.0`. Only valid for two classes.
    Binary,
}

impl LabelEncoding {
    pub fn rows(self, class_count: usize) -> usize {
        match self {
            LabelEncoding::OneHot => class_count,
            LabelEncoding::Binary => 1,
        }
    }

    /// Overwrite `out` with the encoding of `class`.
    #[inline]
    pub fn encode(self, class: usize, out: &mut [f64]) {
        match self {
            LabelEncoding::OneHot => {
                out.fill(0.0);
                out[class] = 1.0;
            }
            LabelEncoding::Binary => out[0] = class as f64,
        }
    }
}

/// A labeled sample set: `(features, labels)` with matching column counts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleSet {
    features: Matrix,
    labels: Matrix,
}

impl SampleSet {
    pub fn new(features: Matrix, labels: Matrix) -> Result<Self> {
        if features.cols() != labels.cols() {
            return Err(Error::InvalidShape(format!(
                "features have {} samples but labels have {}",
                features.cols(),
                labels.cols()
            )));
        }
        Ok(Self { features, labels })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.cols()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn features(&self) -> &Matrix {
        &self.features
    }

    #[inline]
    pub fn labels(&self) -> &Matrix {
        &self.labels
    }

    #[inline]
    pub fn feature_count(&self) -> usize {
        self.features.rows()
    }

    #[inline]
    pub fn label_rows(&self) -> usize {
        self.labels.rows()
    }
}

/// Fills sample sets column by column from a [`LabelRule`].
#[derive(Debug, Clone)]
pub struct DatasetGenerator<R> {
    rule: R,
    encoding: LabelEncoding,
}

impl<R: LabelRule> DatasetGenerator<R> {
    pub fn new(rule: R, encoding: LabelEncoding) -> Result<Self> {
        if rule.feature_count() == 0 {
            return Err(Error::InvalidConfig(
                "rule must produce features".to_owned(),
            ));
        }
        if encoding == LabelEncoding::Binary && rule.class_count() != 2 {
            return Err(Error::InvalidConfig(format!(
                "binary label encoding requires 2 classes, rule has {}",
                rule.class_count()
            )));
        }
        Ok(Self { rule, encoding })
    }

    #[inline]
    pub fn rule(&self) -> &R {
        &self.rule
    }

    #[inline]
    pub fn label_rows(&self) -> usize {
        self.encoding.rows(self.rule.class_count())
    }

    /// Generate `len` independent samples.
    pub fn generate(&self, len: usize, rng: &mut Rng) -> Result<SampleSet> {
        let mut features = Matrix::zeros(self.rule.feature_count(), len);
        let mut labels = Matrix::zeros(self.label_rows(), len);

        for col in 0..len {
            let drawn = self.rule.draw(rng)?;
            self.rule.features(&drawn, features.column_mut(col));
            let class = self.rule.classify(&drawn);
            self.encoding.encode(class, labels.column_mut(col));
        }

        tracing::debug!(
            samples = len,
            features = features.rows(),
            label_rows = labels.rows(),
            "generated sample set"
        );

        SampleSet::new(features, labels)
    }
}
