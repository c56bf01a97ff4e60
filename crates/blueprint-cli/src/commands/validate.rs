use std::path::Path;

use anyhow::{bail, Result};

use blueprint_core::Engine;

use super::read_data;
use crate::output;

/// Validate a data file and print every violation.
pub async fn run(engine: &Engine, template_type: &str, data_path: &Path) -> Result<()> {
    let data = read_data(data_path)?;
    let result = engine.validate(template_type, &data).await;

    if result.valid {
        output::print_success(&format!("{} is valid for '{template_type}'", data_path.display()));
        return Ok(());
    }

    for error in &result.errors {
        output::print_error(error);
    }
    bail!("validation failed with {} error(s)", result.errors.len());
}
