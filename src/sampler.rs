//! Probability-gated event forwarding.
//!
//! [`ProbabilisticSampler`] wraps one sink and forwards each event to it
//! independently with probability `p`. Every event costs exactly one draw from
//! the sampler's private [`Rng`], whether it is forwarded or not, so the
//! forwarding pattern depends only on the seed and the number of events.
//!
//! Dropped events are not errors; dropping is the rate limit.

use crate::observer::{CaseDiagnostic, CaseSink, Progress, TrainingObserver};
use crate::{Error, Matrix, Result, Rng};

#[derive(Debug, Clone)]
pub struct ProbabilisticSampler<S> {
    inner: S,
    probability: f64,
    rng: Rng,
    forwarded: u64,
    dropped: u64,
}

impl<S> ProbabilisticSampler<S> {
    /// Wrap `inner`, forwarding with `probability` in `[0, 1]`.
    pub fn new(inner: S, probability: f64, rng: Rng) -> Result<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(Error::InvalidConfig(format!(
                "sample probability must be in [0, 1], got {probability}"
            )));
        }
        Ok(Self {
            inner,
            probability,
            rng,
            forwarded: 0,
            dropped: 0,
        })
    }

    /// Draw once and decide whether the current event goes through.
    pub fn should_forward(&mut self) -> bool {
        let admit = self.rng.chance(self.probability);
        if admit {
            self.forwarded += 1;
        } else {
            self.dropped += 1;
        }
        admit
    }

    #[inline]
    pub fn probability(&self) -> f64 {
        self.probability
    }

    #[inline]
    pub fn forwarded(&self) -> u64 {
        self.forwarded
    }

    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    #[inline]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<O: TrainingObserver> TrainingObserver for ProbabilisticSampler<O> {
    fn pre_training_batch(&mut self, progress: Progress, x: &Matrix, y: &Matrix) {
        if self.should_forward() {
            self.inner.pre_training_batch(progress, x, y);
        }
    }

    fn post_training_batch(&mut self, progress: Progress, x: &Matrix, y: &Matrix, loss: f64) {
        if self.should_forward() {
            self.inner.post_training_batch(progress, x, y, loss);
        }
    }

    fn pre_epoch(&mut self, progress: Progress) {
        if self.should_forward() {
            self.inner.pre_epoch(progress);
        }
    }

    fn post_epoch(&mut self, progress: Progress, mean_loss: f64) {
        if self.should_forward() {
            self.inner.post_epoch(progress, mean_loss);
        }
    }
}

impl<S: CaseSink> CaseSink for ProbabilisticSampler<S> {
    fn record(&mut self, case: &CaseDiagnostic) {
        if self.should_forward() {
            self.inner.record(case);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        pre: Vec<Progress>,
        post: Vec<(Progress, f64)>,
        epochs: usize,
    }

    impl TrainingObserver for Recorder {
        fn pre_training_batch(&mut self, progress: Progress, _x: &Matrix, _y: &Matrix) {
            self.pre.push(progress);
        }

        fn post_training_batch(&mut self, progress: Progress, _x: &Matrix, _y: &Matrix, loss: f64) {
            self.post.push((progress, loss));
        }

        fn post_epoch(&mut self, _progress: Progress, _mean_loss: f64) {
            self.epochs += 1;
        }
    }

    fn count_forwarded(probability: f64, n: u64, seed: u64) -> u64 {
        let mut sampler = ProbabilisticSampler::new((), probability, Rng::with_seed(seed)).unwrap();
        (0..n).filter(|_| sampler.should_forward()).count() as u64
    }

    #[test]
    fn forwarding_rate_matches_probability() {
        let n = 100_000_u64;
        let p = 0.01;
        let hits = count_forwarded(p, n, 2024) as f64;

        let mean = n as f64 * p;
        let sd = (n as f64 * p * (1.0 - p)).sqrt();
        // Two-sided 99% normal approximation of the binomial.
        let z = 2.576;
        assert!(
            (hits - mean).abs() <= z * sd,
            "forwarded {hits}, expected {mean} ± {}",
            z * sd
        );
    }

    #[test]
    fn zero_and_one_are_exact() {
        assert_eq!(count_forwarded(0.0, 10_000, 1), 0);
        assert_eq!(count_forwarded(1.0, 10_000, 1), 10_000);
    }

    #[test]
    fn probability_outside_unit_interval_is_rejected() {
        for p in [-0.1, 1.5, f64::NAN] {
            let result = ProbabilisticSampler::new((), p, Rng::with_seed(0));
            assert!(result.is_err(), "probability {p} accepted");
        }
    }

    #[test]
    fn forwarded_events_carry_caller_progress() {
        let mut sampler =
            ProbabilisticSampler::new(Recorder::default(), 1.0, Rng::with_seed(0)).unwrap();
        let x = Matrix::zeros(2, 4);
        let y = Matrix::zeros(1, 4);

        for batch_id in 0..3 {
            let progress = Progress {
                batch_id,
                batch_count: 3,
                epoch_id: 1,
                epoch_count: 5,
            };
            sampler.pre_training_batch(progress, &x, &y);
            sampler.post_training_batch(progress, &x, &y, batch_id as f64);
        }
        sampler.post_epoch(Progress::default(), 0.0);

        let recorder = sampler.into_inner();
        assert_eq!(recorder.pre.len(), 3);
        assert_eq!(recorder.pre[2].batch_id, 2);
        assert_eq!(recorder.pre[2].epoch_count, 5);
        assert_eq!(recorder.post[1], (recorder.pre[1], 1.0));
        assert_eq!(recorder.epochs, 1);
    }

    #[test]
    fn every_hook_costs_one_draw_and_drops_silently() {
        let mut sampler =
            ProbabilisticSampler::new(Recorder::default(), 0.0, Rng::with_seed(0)).unwrap();
        let m = Matrix::zeros(1, 1);
        sampler.pre_epoch(Progress::default());
        sampler.pre_training_batch(Progress::default(), &m, &m);
        sampler.post_training_batch(Progress::default(), &m, &m, 0.5);
        sampler.post_epoch(Progress::default(), 0.5);

        assert_eq!(sampler.dropped(), 4);
        assert_eq!(sampler.forwarded(), 0);
        assert!(sampler.inner().pre.is_empty());
        assert!(sampler.inner().post.is_empty());
    }

    #[test]
    fn same_seed_same_forwarding_pattern() {
        let pattern = |seed| {
            let mut s = ProbabilisticSampler::new((), 0.3, Rng::with_seed(seed)).unwrap();
            (0..256).map(|_| s.should_forward()).collect::<Vec<_>>()
        };
        assert_eq!(pattern(17), pattern(17));
    }

    #[test]
    fn case_sink_is_gated() {
        let cases: Vec<CaseDiagnostic> = Vec::new();
        let mut sampler = ProbabilisticSampler::new(cases, 0.5, Rng::with_seed(4)).unwrap();
        let case = CaseDiagnostic {
            index: 0,
            features: vec![0.0],
            expected: 0,
            predicted: 0,
            prediction: vec![1.0],
        };
        for _ in 0..1_000 {
            sampler.record(&case);
        }
        let kept = sampler.forwarded();
        assert_eq!(sampler.inner().len() as u64, kept);
        assert_eq!(kept + sampler.dropped(), 1_000);
        assert!(kept > 0 && kept < 1_000);
    }
}
