//! Facade crate for hosts.
//! Re-exports the domain, kernel and loader crates and wires them together in [`boot`].
//! Keep this crate thin: it composes the other crates and holds no loading logic.
//!
//! ## Usage
//! - Declare every constructible type in a [`TypeCatalog`].
//! - Read an [`AppConfig`](domain::config::AppConfig) (see [`kernel::config::load_config`]).
//! - Call [`boot`] and keep the returned [`Application`] for the lifetime of the host.

pub use modkit_domain as domain;
pub use modkit_kernel as kernel;
pub use modkit_loader as loader;

pub use modkit_kernel::{
    Command, Container, RegistryError, ServiceProvider, TypeCatalog, component,
};

use modkit_domain::config::AppConfig;
use modkit_domain::registry::Component;
use modkit_loader::{LoadReport, ModuleLoader};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// A booted host: the filled container and what the load pass did.
#[derive(Debug)]
pub struct Application {
    container: Container,
    report: LoadReport,
}

impl Application {
    #[must_use]
    pub const fn container(&self) -> &Container {
        &self.container
    }

    #[must_use]
    pub const fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Shortcut for [`Container::resolve`].
    ///
    /// # Errors
    /// See [`Container::resolve`].
    pub fn resolve<T: Component>(&self, name: &str) -> Result<Arc<T>, RegistryError> {
        self.container.resolve(name)
    }

    #[must_use]
    pub fn into_parts(self) -> (Container, LoadReport) {
        (self.container, self.report)
    }
}

/// Builds the container, seeds host configuration, binds app-level facades, loads every
/// declared module and boots providers.
///
/// Module failures, provider boot failures included, end up in [`Application::report`];
/// they never fail the boot.
#[instrument(skip_all, fields(modules = config.modules.modules.len()))]
pub fn boot(config: &AppConfig, catalog: TypeCatalog) -> Application {
    let container = Container::new(catalog);
    for (namespace, value) in &config.config {
        container.seed_config(namespace, value.clone());
    }

    let loader = ModuleLoader::from_config(&config.modules);
    let app = loader.bind_app_facades(&container);
    let mut report = loader.load(&container);
    report.app = app;

    for (provider, err) in container.boot() {
        report.record_boot_failure(&provider, &err);
    }

    if report.fatal_count() > 0 {
        warn!(aborted = report.fatal_count(), "Some modules were aborted");
    }
    info!(registered = report.registered_count(), "Application booted");
    Application { container, report }
}
