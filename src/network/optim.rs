//! Adam optimizer state.
//!
//! State lives next to the model and is reset whenever the model is
//! re-initialized.

use crate::network::{Dense, Gradients};

#[derive(Debug, Clone)]
pub struct Adam {
    beta1: f64,
    beta2: f64,
    eps: f64,
    t: u64,
    beta1_pow: f64,
    beta2_pow: f64,
    m_weights: Vec<Vec<f64>>,
    m_biases: Vec<Vec<f64>>,
    v_weights: Vec<Vec<f64>>,
    v_biases: Vec<Vec<f64>>,
}

impl Adam {
    pub const BETA1: f64 = 0.9;
    pub const BETA2: f64 = 0.999;
    pub const EPS: f64 = 1e-8;

    /// Zeroed moments shaped like `layers`.
    pub fn new(layers: &[Dense]) -> Self {
        let zeros_w = || -> Vec<Vec<f64>> {
            layers
                .iter()
                .map(|l| vec![0.0; l.in_dim() * l.out_dim()])
                .collect()
        };
        let zeros_b = || -> Vec<Vec<f64>> {
            layers.iter().map(|l| vec![0.0; l.out_dim()]).collect()
        };

        Self {
            beta1: Self::BETA1,
            beta2: Self::BETA2,
            eps: Self::EPS,
            t: 0,
            beta1_pow: 1.0,
            beta2_pow: 1.0,
            m_weights: zeros_w(),
            m_biases: zeros_b(),
            v_weights: zeros_w(),
            v_biases: zeros_b(),
        }
    }

    /// Number of steps taken so far.
    #[inline]
    pub fn steps(&self) -> u64 {
        self.t
    }

    /// Apply one bias-corrected update. Overwrites `grads` with the update direction.
    pub fn step(&mut self, layers: &mut [Dense], grads: &mut Gradients, lr: f64) {
        debug_assert_eq!(layers.len(), self.m_weights.len());

        self.t += 1;
        self.beta1_pow *= self.beta1;
        self.beta2_pow *= self.beta2;

        let corr1 = 1.0 - self.beta1_pow;
        let corr2 = 1.0 - self.beta2_pow;

        for (idx, layer) in layers.iter_mut().enumerate() {
            let (dw, db) = grads.layer_mut(idx);
            moment_update(
                dw,
                &mut self.m_weights[idx],
                &mut self.v_weights[idx],
                (self.beta1, self.beta2, self.eps),
                (corr1, corr2),
            );
            moment_update(
                db,
                &mut self.m_biases[idx],
                &mut self.v_biases[idx],
                (self.beta1, self.beta2, self.eps),
                (corr1, corr2),
            );
            layer.apply(dw, db, lr);
        }
    }
}

#[inline]
fn moment_update(
    g: &mut [f64],
    m: &mut [f64],
    v: &mut [f64],
    (beta1, beta2, eps): (f64, f64, f64),
    (corr1, corr2): (f64, f64),
) {
    for i in 0..g.len() {
        m[i] = beta1 * m[i] + (1.0 - beta1) * g[i];
        v[i] = beta2 * v[i] + (1.0 - beta2) * g[i] * g[i];
        g[i] = (m[i] / corr1) / ((v[i] / corr2).sqrt() + eps);
    }
}
