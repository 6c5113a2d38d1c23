use crate::network::Activation;
use crate::{Result, Rng};

/// Weight initialization scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Init {
    /// Uniform in `±sqrt(6 / (in + out))`.
    Xavier,
    /// Uniform in `±sqrt(6 / in)`.
    He,
}

impl Init {
    pub(crate) fn for_activation(activation: Activation) -> Self {
        match activation {
            Activation::ReLU => Init::He,
            Activation::Identity => Init::Xavier,
        }
    }

    fn limit(self, in_dim: usize, out_dim: usize) -> f64 {
        match self {
            Init::Xavier => (6.0 / (in_dim + out_dim) as f64).sqrt(),
            Init::He => (6.0 / in_dim as f64).sqrt(),
        }
    }
}

/// A fully-connected layer.
#[derive(Debug, Clone)]
pub struct Dense {
    in_dim: usize,
    out_dim: usize,
    /// Row-major matrix with shape (out_dim, in_dim).
    weights: Vec<f64>,
    biases: Vec<f64>,
    activation: Activation,
}

impl Dense {
    pub fn new_with_rng(
        in_dim: usize,
        out_dim: usize,
        activation: Activation,
        rng: &mut Rng,
    ) -> Result<Self> {
        let limit = Init::for_activation(activation).limit(in_dim, out_dim);
        let mut weights = Vec::with_capacity(in_dim * out_dim);
        for _ in 0..in_dim * out_dim {
            weights.push(rng.get_double(-limit, limit)?);
        }
        Ok(Self {
            in_dim,
            out_dim,
            weights,
            biases: vec![0.0; out_dim],
            activation,
        })
    }

    #[inline]
    pub fn in_dim(&self) -> usize {
        self.in_dim
    }

    #[inline]
    pub fn out_dim(&self) -> usize {
        self.out_dim
    }

    #[inline]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    #[cfg(test)]
    pub(crate) fn weights_mut(&mut self) -> &mut [f64] {
        &mut self.weights
    }

    #[cfg(test)]
    pub(crate) fn biases_mut(&mut self) -> &mut [f64] {
        &mut self.biases
    }

    /// Forward pass for a single sample.
    ///
    /// Shape contract:
    /// - `inputs.len() == self.in_dim`
    /// - `outputs.len() == self.out_dim`
    #[inline]
    pub fn forward(&self, inputs: &[f64], outputs: &mut [f64]) {
        debug_assert_eq!(inputs.len(), self.in_dim);
        debug_assert_eq!(outputs.len(), self.out_dim);

        for o in 0..self.out_dim {
            let row = &self.weights[o * self.in_dim..(o + 1) * self.in_dim];
            let mut sum = self.biases[o];
            for (w, x) in row.iter().zip(inputs) {
                sum = w.mul_add(*x, sum);
            }
            outputs[o] = self.activation.forward(sum);
        }
    }

    /// Backward pass for a single sample.
    ///
    /// Accumulates `scale * dL/dW` and `scale * dL/db` into `d_weights` /
    /// `d_biases`, and overwrites `d_inputs` with `dL/d(inputs)`.
    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub fn backward(
        &self,
        inputs: &[f64],
        outputs: &[f64],
        d_outputs: &[f64],
        d_inputs: &mut [f64],
        d_weights: &mut [f64],
        d_biases: &mut [f64],
        scale: f64,
    ) {
        debug_assert_eq!(inputs.len(), self.in_dim);
        debug_assert_eq!(outputs.len(), self.out_dim);
        debug_assert_eq!(d_outputs.len(), self.out_dim);
        debug_assert_eq!(d_inputs.len(), self.in_dim);
        debug_assert_eq!(d_weights.len(), self.weights.len());
        debug_assert_eq!(d_biases.len(), self.out_dim);

        d_inputs.fill(0.0);

        for o in 0..self.out_dim {
            let d_z = d_outputs[o] * self.activation.grad_from_output(outputs[o]);
            d_biases[o] += scale * d_z;

            let row = o * self.in_dim;
            for i in 0..self.in_dim {
                d_weights[row + i] = (scale * d_z).mul_add(inputs[i], d_weights[row + i]);
                d_inputs[i] = self.weights[row + i].mul_add(d_z, d_inputs[i]);
            }
        }
    }

    /// `param -= lr * step` for every weight and bias.
    #[inline]
    pub(crate) fn apply(&mut self, step_weights: &[f64], step_biases: &[f64], lr: f64) {
        for (w, s) in self.weights.iter_mut().zip(step_weights) {
            *w -= lr * s;
        }
        for (b, s) in self.biases.iter_mut().zip(step_biases) {
            *b -= lr * s;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_respects_limits() {
        let mut rng = Rng::with_seed(0);
        let layer = Dense::new_with_rng(6, 4, Activation::ReLU, &mut rng).unwrap();
        let limit = 1.0;
        assert!(layer.weights.iter().all(|w| w.abs() <= limit));
        assert!(layer.biases.iter().all(|&b| b == 0.0));
    }

    #[test]
    fn forward_applies_weights_bias_and_activation() {
        let mut layer = Dense {
            in_dim: 2,
            out_dim: 2,
            weights: vec![1.0, 2.0, -1.0, -1.0],
            biases: vec![0.5, 0.0],
            activation: Activation::ReLU,
        };
        let mut out = [0.0; 2];
        layer.forward(&[1.0, 1.0], &mut out);
        assert_eq!(out, [3.5, 0.0]);

        layer.apply(&[1.0, 0.0, 0.0, 0.0], &[0.0, 0.0], 0.5);
        layer.forward(&[1.0, 1.0], &mut out);
        assert_eq!(out, [3.0, 0.0]);
    }
}
