use anyhow::{bail, Result};

use blueprint_core::Engine;

use crate::output;

/// Print the metadata and variable schema of one blueprint.
pub async fn run(engine: &Engine, template_type: &str) -> Result<()> {
    let Some(template) = engine.get_metadata(template_type).await else {
        bail!("unknown blueprint type: {template_type}");
    };
    let meta = &template.metadata;

    output::print_header(&format!("blueprint: {}", meta.template_type));
    output::print_key_value("name", &meta.name);
    output::print_key_value("description", &meta.description);
    output::print_key_value("version", &meta.version);
    output::print_key_value("author", &meta.author);
    if !meta.sections.is_empty() {
        output::print_key_value("sections", &meta.sections.join(", "));
    }

    println!();
    for var in &meta.variables {
        let requirement = if var.required { "required" } else { "optional" };
        let mut line = format!("  {} ({}, {requirement})", var.name, var.var_type);
        if !var.description.is_empty() {
            line.push_str(&format!(": {}", var.description));
        }
        if let Some(default) = &var.default {
            line.push_str(&format!(" [default: {default}]"));
        }
        println!("{line}");
    }
    Ok(())
}
