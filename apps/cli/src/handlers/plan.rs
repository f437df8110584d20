use crate::services::source_index::SourceIndex;
use anyhow::{Result, bail};
use modkit::domain::artifact::{FacadeSource, Target};
use modkit::loader::ModuleLoader;

/// Prints what a load pass would register, step by step, without touching a registry.
///
/// # Errors
/// Returns an error if `only` names a module that is not declared.
pub fn print_plan(config: &modkit::domain::config::AppConfig, only: Option<&str>) -> Result<()> {
    let loader = ModuleLoader::from_config(&config.modules);
    if let Some(module) = only
        && !loader.modules().iter().any(|declared| declared == module)
    {
        bail!("Module '{module}' is not declared in 'modules.modules'");
    }

    let index = SourceIndex::new(loader.paths().clone(), config.modules.source_extension.as_str());

    for plan in loader.plan(&index) {
        if only.is_some_and(|module| module != plan.module) {
            continue;
        }

        println!("\n{}", plan.module);
        if let Some(err) = &plan.error {
            println!("  ❌ {err}");
            continue;
        }

        for step in &plan.steps {
            match &step.discovery {
                Err(err) => println!("  {:<16} ❌ {err}", step.kind.to_string()),
                Ok(discovery) if discovery.is_empty() => {},
                Ok(discovery) => {
                    for artifact in &discovery.artifacts {
                        println!("  {:<16} {}{}", step.kind.to_string(), artifact.identifier, describe(&artifact.target));
                    }
                    for rejected in &discovery.rejected {
                        println!("  {:<16} ⚠️ {}: {}", step.kind.to_string(), rejected.path.display(), rejected.error);
                    }
                },
            }
        }
    }
    println!();

    Ok(())
}

fn describe(target: &Target) -> String {
    match target {
        Target::Load(category) => format!(" -> {category}"),
        Target::MergeConfig { namespace } => format!(" -> config '{namespace}'"),
        Target::Facade { name, source: FacadeSource::Service(service) } => format!(" as '{name}' -> {service}"),
        Target::Facade { name, source: FacadeSource::SelfType } => format!(" as '{name}' (self)"),
        Target::Construct | Target::Provider | Target::Command => String::new(),
    }
}
