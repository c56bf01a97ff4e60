use std::path::Path;

use anyhow::{bail, Result};

use blueprint_core::{Engine, RenderOutcome};

use super::read_data;
use crate::output;

/// Render a blueprint and print the document or write it to `output_path`.
pub async fn run(
    engine: &Engine,
    template_type: &str,
    data_path: &Path,
    output_path: Option<&Path>,
) -> Result<()> {
    // Partials live with the catalog, so load it before rendering.
    engine.load_all().await?;
    let data = read_data(data_path)?;

    match engine.render_template(template_type, &data).await? {
        RenderOutcome::Rendered { content } => match output_path {
            Some(path) => {
                std::fs::write(path, &content)?;
                output::print_success(&format!("wrote {}", path.display()));
            }
            None => print!("{content}"),
        },
        RenderOutcome::Invalid(result) => {
            for error in &result.errors {
                output::print_error(error);
            }
            bail!("cannot render '{template_type}': data is invalid");
        }
    }
    Ok(())
}
