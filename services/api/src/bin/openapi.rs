//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI document for the flashcards REST API.
//!
//! Usage: `openapi [OUTPUT]` (defaults to `openapi.json`).

use api_lib::web::rest::ApiDoc;
use std::path::PathBuf;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("openapi.json"));

    let spec_json = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write(&output, spec_json)?;
    println!("OpenAPI specification written to {}", output.display());
    Ok(())
}
