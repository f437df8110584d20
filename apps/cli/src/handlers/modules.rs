use crate::services::source_index::SourceIndex;
use modkit::domain::config::AppConfig;
use modkit::domain::kinds::KindSet;
use modkit::loader::ModuleLoader;

/// Lists declared modules with the artifact kinds found on disk.
pub fn list_modules(config: &AppConfig) {
    let loader = ModuleLoader::from_config(&config.modules);

    if loader.modules().is_empty() {
        println!("ℹ️ No modules declared in 'modules.modules'.");
        return;
    }

    let index = SourceIndex::new(loader.paths().clone(), config.modules.source_extension.as_str());

    println!("\nModules ({}):\n", loader.paths().base_path().display());
    println!("{:<20} {:<10} {:<50}", "Module", "Status", "Present");
    println!("{:-<80}", "");

    for plan in loader.plan(&index) {
        let present: KindSet = plan
            .steps
            .iter()
            .filter(|step| step.discovery.as_ref().is_ok_and(|discovery| !discovery.artifacts.is_empty()))
            .map(|step| step.kind)
            .collect();

        let status = if plan.error.is_some() {
            "invalid"
        } else if !loader.paths().module_root(&plan.module).is_dir() {
            "missing"
        } else {
            "ok"
        };

        let kinds: Vec<String> = present.kinds().map(|kind| kind.to_string()).collect();
        let present = if kinds.is_empty() { "-".to_owned() } else { kinds.join(", ") };
        println!("{:<20} {:<10} {:<50}", plan.module, status, present);
    }
    println!();
}
