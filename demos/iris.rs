//! Train on the shipped iris table and classify a held-out split.
//!
//! Run with `cargo run --release --example iris`.

use iris_mlp::{accuracy, iris, unclassified_rate, Dataset, FitConfig, Mlp, Normalizer};

fn main() -> iris_mlp::Result<()> {
    let raw = iris::load_csv(concat!(env!("CARGO_MANIFEST_DIR"), "/data/iris.csv"))?;
    println!(
        "loaded {} rows, {} features, {} classes",
        raw.len(),
        raw.feature_dim(),
        raw.class_count()
    );

    // Divisors from the combined 150 rows, reused for both partitions.
    let normalizer = Normalizer::fit(raw.features())?;
    let (train_raw, test_raw) = raw.split_with_seed(0.8, 3)?;
    let train = Dataset::from_matrices(
        normalizer.apply(train_raw.features())?,
        train_raw.targets().clone(),
    )?;
    let test_features = normalizer.apply(test_raw.features())?;

    let mut mlp = Mlp::new_with_seed(4, 3, 3, 1)?;
    let report = mlp.fit_with_progress(
        &train,
        FitConfig {
            iterations: 100_000,
            lr: 0.01,
            log_every: 10_000,
        },
        |iter, cost| println!("iteration {iter:>6}: cost = {cost:.6}"),
    )?;
    println!("final training cost: {:.6}", report.final_loss());

    let outputs = mlp.predict(&test_features)?;
    let predictions = mlp.classify(&test_features)?;
    let species = iris::species_of(&predictions);

    println!("\n{:<12} {:<12} outputs", "actual", "predicted");
    for (row, predicted) in species.iter().enumerate() {
        let actual = iris::Species::from_class(test_raw.label_of(row))
            .expect("labels come from a 3-class table");
        let predicted = predicted
            .map(|s| s.to_string())
            .unwrap_or_else(|| "(unclassified)".to_owned());
        let rounded: Vec<String> = outputs.row(row).iter().map(|v| format!("{v:.3}")).collect();
        println!("{actual:<12} {predicted:<12} [{}]", rounded.join(", "));
    }

    println!(
        "\nheld-out accuracy: {:.1}% ({} rows, {:.1}% unclassified)",
        100.0 * accuracy(&predictions, &test_raw.labels()),
        test_raw.len(),
        100.0 * unclassified_rate(&predictions)
    );
    Ok(())
}
