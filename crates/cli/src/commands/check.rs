use std::path::Path;

use serde_json::json;

use crate::commands::{load_engine, CommandResult};

pub fn run(catalog: &Path) -> CommandResult {
    let engine = match load_engine("check", catalog) {
        Ok(engine) => engine,
        Err(result) => return result,
    };

    let status = engine.status();
    let markets = engine.market_count();
    CommandResult::success_with_data(
        "check",
        format!("catalog valid: {} products across {markets} markets", status.product_count),
        Some(json!({ "product_count": status.product_count, "market_count": markets })),
    )
}
