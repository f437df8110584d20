use crate::models::args::GenerateKind;
use anyhow::{Context, Result};
use modkit::domain::config::AppConfig;
use modkit_scaffold::Generator;

/// Writes a new source file (and, for facades, its service and manifest entry).
///
/// # Errors
/// Returns an error if the target already exists, a name is not an identifier,
/// or a file cannot be written.
pub fn generate(
    config: &AppConfig,
    kind: GenerateKind,
    name: &str,
    module: Option<&str>,
    service: Option<&str>,
) -> Result<()> {
    let generator = Generator::from_config(&config.modules);

    if kind != GenerateKind::Facade {
        let generated = generator
            .generate(kind.into(), name, module)
            .with_context(|| format!("Cannot generate {kind:?} '{name}'"))?;
        println!("✅ Created {} at {}", generated.identifier, generated.path.display());
        return Ok(());
    }

    let facade = generator.facade(name, service, module).with_context(|| format!("Cannot generate facade '{name}'"))?;
    println!("✅ Created {} at {}", facade.facade.identifier, facade.facade.path.display());
    if let Some(service) = &facade.service {
        println!("✅ Created {} at {}", service.identifier, service.path.display());
    }
    if facade.manifest_updated {
        println!("✅ Bound '{}' to '{}' in {}", facade.entry.name, facade.entry.service, facade.manifest.display());
    } else {
        println!("ℹ️ '{}' already bound in {}", facade.entry.name, facade.manifest.display());
    }

    Ok(())
}
