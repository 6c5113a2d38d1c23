use neural_run::{
    Classifier, DatasetGenerator, LabelEncoding, Network, NetworkConfig, NoopObserver, OutputLoss,
    QuadrantRule, Rng, test_classifier,
};

fn main() -> neural_run::Result<()> {
    // Single-row 0/1 labels, scored by rounding the sigmoid output.
    let generator = DatasetGenerator::new(QuadrantRule, LabelEncoding::Binary)?;
    let mut rng = Rng::with_seed(0);
    let train = generator.generate(2000, &mut rng)?;
    let test = generator.generate(500, &mut rng)?;

    let mut net = Network::new(NetworkConfig {
        input_dim: 2,
        hidden: vec![16],
        output_dim: 1,
        loss: OutputLoss::BinaryCrossEntropy,
        learning_rate: 0.01,
    })?;
    net.init(&mut rng)?;

    let report = net.fit(train.features(), train.labels(), 32, 30, &mut NoopObserver)?;
    println!("final loss={:?}", report.final_loss());

    let outcome = test_classifier(&net, &test, 0.01, rng.fork())?;
    println!(
        "accuracy={} ({}/{}), {} cases sampled",
        outcome.evaluation.accuracy,
        outcome.evaluation.correct,
        outcome.evaluation.total,
        outcome.sampled.len()
    );
    for case in &outcome.sampled {
        println!("{case}");
    }

    Ok(())
}
