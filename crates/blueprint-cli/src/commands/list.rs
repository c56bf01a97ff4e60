use anyhow::Result;

use blueprint_core::Engine;

use crate::output;

/// Print every blueprint in the catalog as `type  name  version`.
pub async fn run(engine: &Engine) -> Result<()> {
    let loaded = engine.load_all().await?;
    output::print_header(&format!(
        "blueprints in {}",
        engine.config().content_root.display()
    ));

    if loaded == 0 {
        output::print_warning("no blueprints found");
        return Ok(());
    }

    for template_type in engine.template_types() {
        if let Some(template) = engine.get_metadata(&template_type).await {
            let meta = &template.metadata;
            println!("{:<24} {:<32} {}", meta.template_type, meta.name, meta.version);
        }
    }
    output::print_success(&format!("{loaded} blueprint(s)"));
    Ok(())
}
