use neural_run::{
    CaseDiagnostic, Classifier, DatasetGenerator, Error, EvaluationMode, FitReport, LabelEncoding,
    LabelRule, Matrix, QuadrantRule, RangeRule, Rng, TrainingObserver, score, test_classifier,
};

/// Predicts with the labeling rule itself, optionally forcing one class.
struct RuleClassifier<R> {
    rule: R,
    encoding: LabelEncoding,
    constant: Option<usize>,
}

impl<R: LabelRule> Classifier for RuleClassifier<R> {
    fn init(&mut self, _rng: &mut Rng) -> neural_run::Result<()> {
        Ok(())
    }

    fn fit(
        &mut self,
        _features: &Matrix,
        _labels: &Matrix,
        _batch_size: usize,
        _epochs: usize,
        _observer: &mut dyn TrainingObserver,
    ) -> neural_run::Result<FitReport> {
        Ok(FitReport {
            epoch_losses: Vec::new(),
        })
    }

    fn predict(&self, features: &Matrix) -> neural_run::Result<Matrix> {
        let rows = self.encoding.rows(self.rule.class_count());
        let mut out = Matrix::zeros(rows, features.cols());
        for c in 0..features.cols() {
            let class = self
                .constant
                .unwrap_or_else(|| self.rule.classify(features.column(c)));
            self.encoding.encode(class, out.column_mut(c));
        }
        Ok(out)
    }
}

#[test]
fn perfect_classifier_scores_one() {
    let rule = RangeRule::default();
    let test = DatasetGenerator::new(rule, LabelEncoding::OneHot)
        .unwrap()
        .generate(500, &mut Rng::with_seed(1))
        .unwrap();
    let oracle = RuleClassifier {
        rule,
        encoding: LabelEncoding::OneHot,
        constant: None,
    };

    let outcome = test_classifier(&oracle, &test, 0.0, Rng::with_seed(2)).unwrap();
    assert_eq!(outcome.evaluation.correct, 500);
    assert_eq!(outcome.evaluation.accuracy, 1.0);
    assert!(outcome.sampled.is_empty());
}

#[test]
fn constant_classifier_scores_class_frequency() {
    let test = DatasetGenerator::new(QuadrantRule, LabelEncoding::Binary)
        .unwrap()
        .generate(1000, &mut Rng::with_seed(5))
        .unwrap();
    let negatives = test.labels().row(0).iter().filter(|&&y| y == 0.0).count();

    let always_zero = RuleClassifier {
        rule: QuadrantRule,
        encoding: LabelEncoding::Binary,
        constant: Some(0),
    };
    let outcome = test_classifier(&always_zero, &test, 0.0, Rng::with_seed(6)).unwrap();
    assert_eq!(outcome.evaluation.correct, negatives);
    // Roughly three quarters of uniform points fall outside the top-right quadrant.
    assert!((0.70..0.80).contains(&outcome.evaluation.accuracy));
}

#[test]
fn sampled_cases_depend_only_on_the_log_stream() {
    let rule = RangeRule::default();
    let test = DatasetGenerator::new(rule, LabelEncoding::OneHot)
        .unwrap()
        .generate(400, &mut Rng::with_seed(3))
        .unwrap();
    let oracle = RuleClassifier {
        rule,
        encoding: LabelEncoding::OneHot,
        constant: Some(1),
    };

    let a = test_classifier(&oracle, &test, 0.25, Rng::with_seed(11)).unwrap();
    let b = test_classifier(&oracle, &test, 0.25, Rng::with_seed(11)).unwrap();
    let all = test_classifier(&oracle, &test, 1.0, Rng::with_seed(12)).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.evaluation, all.evaluation);
    assert_eq!(all.sampled.len(), 400);
    assert!(!a.sampled.is_empty() && a.sampled.len() < 400);
    assert!(a.sampled.windows(2).all(|w| w[0].index < w[1].index));
}

#[test]
fn empty_test_set_is_rejected() {
    let test = DatasetGenerator::new(QuadrantRule, LabelEncoding::OneHot)
        .unwrap()
        .generate(0, &mut Rng::with_seed(0))
        .unwrap();
    let oracle = RuleClassifier {
        rule: QuadrantRule,
        encoding: LabelEncoding::OneHot,
        constant: None,
    };
    assert_eq!(
        test_classifier(&oracle, &test, 0.5, Rng::with_seed(0)),
        Err(Error::EmptyEvaluationSet)
    );
}

#[test]
fn case_lines_show_inputs_and_predictions() {
    let features = Matrix::from_flat(vec![0.6, 0.7], 2, 1).unwrap();
    let labels = Matrix::from_flat(vec![0.0, 1.0], 2, 1).unwrap();
    let predictions = Matrix::from_flat(vec![0.8, 0.2], 2, 1).unwrap();

    let mut cases: Vec<CaseDiagnostic> = Vec::new();
    let eval = score(
        &features,
        &predictions,
        &labels,
        EvaluationMode::Argmax,
        &mut cases,
    )
    .unwrap();
    assert_eq!(eval.correct, 0);

    let line = cases[0].to_string();
    assert!(line.contains("0.6"), "{line}");
    assert!(line.contains("-> 1"), "{line}");
    assert!(line.contains("Predicted 0"), "{line}");
}
