use std::path::Path;

use restock_core::{ProductId, TrainingBatch};

use crate::commands::{load_engine, read_json, CommandResult, EXIT_INPUT};

pub fn run(catalog: &Path, product_id: u64, train_file: Option<&Path>) -> CommandResult {
    let engine = match load_engine("predict", catalog) {
        Ok(engine) => engine,
        Err(result) => return result,
    };

    if let Some(path) = train_file {
        let batches: Vec<TrainingBatch> = match read_json(path) {
            Ok(batches) => batches,
            Err(error) => {
                return CommandResult::failure("predict", "input", format!("{error:#}"), EXIT_INPUT)
            }
        };
        for batch in &batches {
            engine.train(batch);
        }
    }

    let prediction = match engine.predict(ProductId(product_id)) {
        Ok(prediction) => prediction,
        Err(error) => return CommandResult::from_domain_error("predict", error),
    };

    let message = match prediction.substitutes.first() {
        Some(best) => format!(
            "{} substitutes for product {product_id}; best match {best} at {:.1}%",
            prediction.substitutes.len(),
            prediction.probabilities.get(best).copied().unwrap_or_default()
        ),
        None => format!("no substitutes found for product {product_id}"),
    };

    match serde_json::to_value(&prediction) {
        Ok(data) => CommandResult::success_with_data("predict", message, Some(data)),
        Err(error) => CommandResult::failure("predict", "serialization", error.to_string(), 1),
    }
}
