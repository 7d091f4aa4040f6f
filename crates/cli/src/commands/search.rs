use std::path::Path;

use serde_json::json;

use crate::commands::{load_engine, CommandResult};

pub fn run(catalog: &Path, query: &str) -> CommandResult {
    let engine = match load_engine("search", catalog) {
        Ok(engine) => engine,
        Err(result) => return result,
    };

    match engine.search(query) {
        Ok(results) => CommandResult::success_with_data(
            "search",
            format!("{} products match `{query}`", results.len()),
            Some(json!({ "results": results })),
        ),
        Err(error) => CommandResult::from_domain_error("search", error),
    }
}
