//! Normalize a JSON file of recipes and print the result
//! Usage: cargo run --bin normalize_file -- <recipes.json>
//!
//! The file is either `{recipe: {ingredient: measure}}` or a catalog
//! search payload `{"drinks": [...]}`.

use std::collections::BTreeMap;

use bartindr::config::EngineConfig;
use bartindr::models::{parse_catalog_response, records_from_map, RecipeRecord};

fn load_records(text: &str) -> Result<Vec<RecipeRecord>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if value.get("drinks").is_some() {
        return parse_catalog_response(text);
    }
    let map: BTreeMap<String, BTreeMap<String, String>> = serde_json::from_value(value)?;
    Ok(records_from_map(map))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("bartindr=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(path) = args.get(1) else {
        eprintln!("Usage: normalize_file <recipes.json>");
        std::process::exit(2);
    };

    let engine = EngineConfig::from_env()?.build_engine()?;

    let text = std::fs::read_to_string(path)?;
    let records = load_records(&text)?;
    eprintln!("Loaded {} recipes from {}", records.len(), path);

    let batch = engine.normalize_batch(&records);
    for phrase in &batch.unresolved_units {
        eprintln!("  unresolved unit: {}", phrase);
    }

    println!("{}", serde_json::to_string_pretty(&batch)?);
    Ok(())
}
