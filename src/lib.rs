pub mod enrich;
pub mod error;
pub mod logical;
pub mod naming;
pub mod relations;
pub mod schema;
pub mod types;

use wasm_bindgen::prelude::*;

pub use enrich::{EnrichOptions, EnrichReport, Enriched, SchemaEnricher};
pub use error::{EnrichError, RelationError};
pub use logical::LogicalSchema;
pub use schema::PhysicalSchema;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Enrich a JSON physical schema and return the enriched model as JSON.
///
/// `options` is a JSON [`EnrichOptions`] object; missing fields take defaults.
pub fn enrich_json(schema: &str, options: Option<&str>) -> Result<String, EnrichError> {
    let physical: PhysicalSchema = serde_json::from_str(schema)?;
    let options = match options {
        Some(json) => serde_json::from_str(json)?,
        None => EnrichOptions::default(),
    };

    let enriched = SchemaEnricher::new(options).enrich(&physical)?;
    Ok(serde_json::to_string(&enriched)?)
}

#[wasm_bindgen(js_name = "enrichSchema")]
pub fn enrich_schema(schema: &str, options: Option<String>) -> Result<String, String> {
    enrich_json(schema, options.as_deref()).map_err(|e| e.to_string())
}
