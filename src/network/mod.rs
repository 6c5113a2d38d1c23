//! A small dense classifier implementing [`Classifier`].
//!
//! Architecture: `Dense + ReLU` hidden layers followed by a `Dense + Identity`
//! output layer whose logits go through an [`OutputLoss`] head. Training is
//! mini-batch Adam with gradients averaged over each batch; sample order is
//! reshuffled every epoch from a stream forked off the `init` RNG.
//!
//! ```rust
//! use neural_run::{Classifier, Network, NetworkConfig, NoopObserver, OutputLoss, Rng};
//! use neural_run::{DatasetGenerator, LabelEncoding, QuadrantRule};
//!
//! # fn main() -> neural_run::Result<()> {
//! let mut rng = Rng::with_seed(0);
//! let train = DatasetGenerator::new(QuadrantRule, LabelEncoding::OneHot)?
//!     .generate(64, &mut rng)?;
//!
//! let mut net = Network::new(NetworkConfig {
//!     input_dim: 2,
//!     hidden: vec![4],
//!     output_dim: 2,
//!     loss: OutputLoss::BinaryCrossEntropy,
//!     learning_rate: 0.01,
//! })?;
//! net.init(&mut rng)?;
//! net.fit(train.features(), train.labels(), 16, 2, &mut NoopObserver)?;
//! let predictions = net.predict(train.features())?;
//! assert_eq!(predictions.rows(), 2);
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod layer;
pub mod loss;
pub mod optim;

pub use activation::Activation;
pub use layer::{Dense, Init};
pub use loss::OutputLoss;
pub use optim::Adam;

use crate::classifier::FitReport;
use crate::observer::{Progress, TrainingObserver};
use crate::{Classifier, Error, Matrix, Result, Rng};

/// Shape and hyperparameters of a [`Network`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkConfig {
    pub input_dim: usize,
    /// Widths of the ReLU hidden layers, input side first.
    pub hidden: Vec<usize>,
    pub output_dim: usize,
    pub loss: OutputLoss,
    pub learning_rate: f64,
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.input_dim == 0 || self.output_dim == 0 {
            return Err(Error::InvalidConfig(
                "input_dim and output_dim must be > 0".to_owned(),
            ));
        }
        if self.hidden.contains(&0) {
            return Err(Error::InvalidConfig(
                "hidden layer sizes must be > 0".to_owned(),
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learning rate must be finite and > 0, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Network {
    config: NetworkConfig,
    layers: Vec<Dense>,
    adam: Adam,
    shuffle: Rng,
}

/// Per-layer outputs of the most recent forward pass.
#[derive(Debug, Clone)]
struct Scratch {
    layer_outputs: Vec<Vec<f64>>,
}

impl Scratch {
    fn new(layers: &[Dense]) -> Self {
        Self {
            layer_outputs: layers.iter().map(|l| vec![0.0; l.out_dim()]).collect(),
        }
    }

    fn output(&self) -> &[f64] {
        self.layer_outputs.last().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Parameter gradients, accumulated across a batch.
#[derive(Debug, Clone)]
pub struct Gradients {
    d_weights: Vec<Vec<f64>>,
    d_biases: Vec<Vec<f64>>,
    // dL/d(output) of each layer; the last entry is filled by the loss head.
    d_layer_outputs: Vec<Vec<f64>>,
    d_input: Vec<f64>,
}

impl Gradients {
    fn new(layers: &[Dense], input_dim: usize) -> Self {
        Self {
            d_weights: layers
                .iter()
                .map(|l| vec![0.0; l.in_dim() * l.out_dim()])
                .collect(),
            d_biases: layers.iter().map(|l| vec![0.0; l.out_dim()]).collect(),
            d_layer_outputs: layers.iter().map(|l| vec![0.0; l.out_dim()]).collect(),
            d_input: vec![0.0; input_dim],
        }
    }

    fn zero(&mut self) {
        self.d_weights.iter_mut().for_each(|g| g.fill(0.0));
        self.d_biases.iter_mut().for_each(|g| g.fill(0.0));
    }

    pub(crate) fn layer_mut(&mut self, idx: usize) -> (&mut [f64], &mut [f64]) {
        (&mut self.d_weights[idx], &mut self.d_biases[idx])
    }

    #[inline]
    pub fn d_weights(&self, layer_idx: usize) -> &[f64] {
        &self.d_weights[layer_idx]
    }

    #[inline]
    pub fn d_biases(&self, layer_idx: usize) -> &[f64] {
        &self.d_biases[layer_idx]
    }
}

impl Network {
    /// Validate `config`. Parameters are allocated by [`Classifier::init`].
    pub fn new(config: NetworkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            layers: Vec::new(),
            adam: Adam::new(&[]),
            shuffle: Rng::with_seed(0),
        })
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        !self.layers.is_empty()
    }

    #[inline]
    pub fn layers(&self) -> &[Dense] {
        &self.layers
    }

    fn check_features(&self, features: &Matrix) -> Result<()> {
        if !self.is_initialized() {
            return Err(Error::InvalidConfig(
                "network must be initialized before use".to_owned(),
            ));
        }
        if features.rows() != self.config.input_dim {
            return Err(Error::InvalidData(format!(
                "feature rows {} do not match network input_dim {}",
                features.rows(),
                self.config.input_dim
            )));
        }
        Ok(())
    }

    fn forward(&self, input: &[f64], scratch: &mut Scratch) {
        for (idx, layer) in self.layers.iter().enumerate() {
            let (prev, rest) = scratch.layer_outputs.split_at_mut(idx);
            let layer_input: &[f64] = if idx == 0 { input } else { &prev[idx - 1] };
            layer.forward(layer_input, &mut rest[0]);
        }
    }

    /// Backprop one sample whose forward pass is in `scratch`, accumulating `scale * grad`.
    fn backward(&self, input: &[f64], scratch: &Scratch, grads: &mut Gradients, scale: f64) {
        for idx in (0..self.layers.len()).rev() {
            let layer = &self.layers[idx];
            let layer_input: &[f64] = if idx == 0 {
                input
            } else {
                &scratch.layer_outputs[idx - 1]
            };
            let layer_output = &scratch.layer_outputs[idx];

            if idx == 0 {
                layer.backward(
                    layer_input,
                    layer_output,
                    &grads.d_layer_outputs[0],
                    &mut grads.d_input,
                    &mut grads.d_weights[0],
                    &mut grads.d_biases[0],
                    scale,
                );
            } else {
                // This layer's d_inputs is the previous layer's d_outputs.
                let (left, right) = grads.d_layer_outputs.split_at_mut(idx);
                layer.backward(
                    layer_input,
                    layer_output,
                    &right[0],
                    &mut left[idx - 1],
                    &mut grads.d_weights[idx],
                    &mut grads.d_biases[idx],
                    scale,
                );
            }
        }
    }

    /// Forward + loss + backward for one sample. Returns the sample loss.
    fn accumulate(
        &self,
        input: &[f64],
        target: &[f64],
        scratch: &mut Scratch,
        grads: &mut Gradients,
        scale: f64,
    ) -> f64 {
        self.forward(input, scratch);
        let last = self.layers.len() - 1;
        let d_output = &mut grads.d_layer_outputs[last];
        let loss = self.config.loss.backward(scratch.output(), target, d_output);
        self.backward(input, scratch, grads, scale);
        loss
    }

    fn shuffled_order(&mut self, len: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        self.shuffle.shuffle(&mut order);
        order
    }
}

impl Classifier for Network {
    fn init(&mut self, rng: &mut Rng) -> Result<()> {
        let mut layers = Vec::with_capacity(self.config.hidden.len() + 1);
        let mut in_dim = self.config.input_dim;
        for &width in &self.config.hidden {
            layers.push(Dense::new_with_rng(in_dim, width, Activation::ReLU, rng)?);
            in_dim = width;
        }
        layers.push(Dense::new_with_rng(
            in_dim,
            self.config.output_dim,
            Activation::Identity,
            rng,
        )?);

        self.adam = Adam::new(&layers);
        self.layers = layers;
        self.shuffle = rng.fork();
        Ok(())
    }

    fn fit(
        &mut self,
        features: &Matrix,
        labels: &Matrix,
        batch_size: usize,
        epochs: usize,
        observer: &mut dyn TrainingObserver,
    ) -> Result<FitReport> {
        self.check_features(features)?;
        if features.is_empty() {
            return Err(Error::InvalidData(
                "training set must not be empty".to_owned(),
            ));
        }
        if labels.cols() != features.cols() || labels.rows() != self.config.output_dim {
            return Err(Error::InvalidData(format!(
                "labels are ({}, {}), expected ({}, {})",
                labels.rows(),
                labels.cols(),
                self.config.output_dim,
                features.cols()
            )));
        }
        if batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be > 0".to_owned()));
        }
        if epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be > 0".to_owned()));
        }

        let len = features.cols();
        let batch_count = len.div_ceil(batch_size);
        let lr = self.config.learning_rate;
        let mut scratch = Scratch::new(&self.layers);
        let mut grads = Gradients::new(&self.layers, self.config.input_dim);
        let mut epoch_losses = Vec::with_capacity(epochs);

        for epoch_id in 0..epochs {
            let order = self.shuffled_order(len);
            let mut progress = Progress {
                batch_id: 0,
                batch_count,
                epoch_id,
                epoch_count: epochs,
            };
            observer.pre_epoch(progress);

            let mut epoch_loss = 0.0;
            for (batch_id, indices) in order.chunks(batch_size).enumerate() {
                progress.batch_id = batch_id;
                let x = features.select_columns(indices);
                let y = labels.select_columns(indices);
                observer.pre_training_batch(progress, &x, &y);

                grads.zero();
                let scale = 1.0 / indices.len() as f64;
                let mut batch_loss = 0.0;
                for col in 0..x.cols() {
                    batch_loss += self.accumulate(
                        x.column(col),
                        y.column(col),
                        &mut scratch,
                        &mut grads,
                        scale,
                    );
                }
                batch_loss *= scale;
                self.adam.step(&mut self.layers, &mut grads, lr);

                epoch_loss += batch_loss;
                observer.post_training_batch(progress, &x, &y, batch_loss);
            }

            let mean_loss = epoch_loss / batch_count as f64;
            observer.post_epoch(progress, mean_loss);
            epoch_losses.push(mean_loss);
        }

        Ok(FitReport { epoch_losses })
    }

    fn predict(&self, features: &Matrix) -> Result<Matrix> {
        self.check_features(features)?;

        let mut scratch = Scratch::new(&self.layers);
        let mut out = Matrix::zeros(self.config.output_dim, features.cols());
        for col in 0..features.cols() {
            self.forward(features.column(col), &mut scratch);
            self.config.loss.activate(scratch.output(), out.column_mut(col));
        }
        Ok(out)
    }
}
