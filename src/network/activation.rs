//! Activation functions.
//!
//! A dense layer computes `z = W x + b` and then `y = activation(z)`. Layers cache
//! the *post-activation* output `y`, so derivatives are expressed in terms of `y`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Activation {
    ReLU,
    Identity,
}

impl Activation {
    #[inline]
    pub(crate) fn forward(self, x: f64) -> f64 {
        match self {
            Activation::ReLU => x.max(0.0),
            Activation::Identity => x,
        }
    }

    /// Derivative w.r.t. the pre-activation, from the cached output `y`.
    #[inline]
    pub(crate) fn grad_from_output(self, y: f64) -> f64 {
        match self {
            Activation::ReLU => {
                if y > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::Identity => 1.0,
        }
    }
}
