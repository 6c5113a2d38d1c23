//! Output heads: how logits become probabilities and how they are scored.
//!
//! Both heads take raw logits (the output layer uses `Identity`) and a target
//! column, write `dL/d(logits)` and return the loss. Losses are averaged over the
//! output dimension.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputLoss {
    /// Independent sigmoid per output, targets in `[0, 1]`.
    BinaryCrossEntropy,
    /// Softmax over outputs, one-hot target.
    SoftmaxCrossEntropy,
}

impl OutputLoss {
    /// Binary cross-entropy for two or fewer classes, softmax otherwise.
    pub fn for_classes(class_count: usize) -> Self {
        if class_count <= 2 {
            OutputLoss::BinaryCrossEntropy
        } else {
            OutputLoss::SoftmaxCrossEntropy
        }
    }

    /// Compute loss + gradient w.r.t. `logits`.
    ///
    /// Shape contract: `logits.len() == target.len() == d_logits.len()`.
    #[inline]
    pub fn backward(self, logits: &[f64], target: &[f64], d_logits: &mut [f64]) -> f64 {
        match self {
            OutputLoss::BinaryCrossEntropy => bce_with_logits_backward(logits, target, d_logits),
            OutputLoss::SoftmaxCrossEntropy => {
                softmax_cross_entropy_backward(logits, target, d_logits)
            }
        }
    }

    /// Turn logits into probabilities.
    #[inline]
    pub fn activate(self, logits: &[f64], out: &mut [f64]) {
        match self {
            OutputLoss::BinaryCrossEntropy => {
                for (o, &x) in out.iter_mut().zip(logits) {
                    *o = sigmoid(x);
                }
            }
            OutputLoss::SoftmaxCrossEntropy => softmax(logits, out),
        }
    }
}

/// Per element: `max(x, 0) - x t + ln(1 + exp(-|x|))`, gradient `(sigmoid(x) - t) / N`.
fn bce_with_logits_backward(logits: &[f64], target: &[f64], d_logits: &mut [f64]) -> f64 {
    debug_assert_eq!(logits.len(), target.len());
    debug_assert_eq!(logits.len(), d_logits.len());

    let inv_n = 1.0 / logits.len() as f64;
    let mut sum = 0.0;
    for i in 0..logits.len() {
        let x = logits[i];
        let t = target[i];
        sum += x.max(0.0) - x * t + (-x.abs()).exp().ln_1p();
        d_logits[i] = (sigmoid(x) - t) * inv_n;
    }
    sum * inv_n
}

/// `-sum t_i log softmax_i / K`, gradient `(softmax - t) / K`.
fn softmax_cross_entropy_backward(logits: &[f64], target: &[f64], d_logits: &mut [f64]) -> f64 {
    debug_assert_eq!(logits.len(), target.len());
    debug_assert_eq!(logits.len(), d_logits.len());

    let inv_k = 1.0 / logits.len() as f64;
    let log_sum_exp = log_sum_exp(logits);

    let mut loss = 0.0;
    for i in 0..logits.len() {
        if target[i] != 0.0 {
            loss -= target[i] * (logits[i] - log_sum_exp);
        }
        d_logits[i] = ((logits[i] - log_sum_exp).exp() - target[i]) * inv_k;
    }
    loss * inv_k
}

#[inline]
fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

fn softmax(logits: &[f64], out: &mut [f64]) {
    let lse = log_sum_exp(logits);
    for (o, &x) in out.iter_mut().zip(logits) {
        *o = (x - lse).exp();
    }
}

fn log_sum_exp(xs: &[f64]) -> f64 {
    let max_x = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let sum: f64 = xs.iter().map(|&x| (x - max_x).exp()).sum();
    max_x + sum.ln()
}
