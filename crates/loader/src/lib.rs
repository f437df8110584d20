//! # Module loader
//!
//! Wires convention-laid-out modules into a [`modkit_kernel::Registry`].
//!
//! For every declared module `M` the loader walks a fixed sequence of artifact kinds
//! (controllers, services, repositories, migrations, seeders, factories, console commands,
//! models, transformers, configs, routes, providers, facades). Each step is two phases:
//! [`Discoverer`] maps the filesystem to [`DiscoveredArtifact`](modkit_domain::artifact::DiscoveredArtifact)
//! values, then [`ModuleLoader`] turns each one into a registry call.
//!
//! ```rust,no_run
//! use modkit_domain::config::ModulesConfig;
//! use modkit_kernel::{Container, TypeCatalog};
//! use modkit_loader::ModuleLoader;
//!
//! let config = ModulesConfig { modules: vec!["Billing".into()], ..ModulesConfig::default() };
//! let container = Container::new(TypeCatalog::default());
//! let report = ModuleLoader::from_config(&config).load(&container);
//! assert_eq!(report.fatal_count(), 0);
//! ```

mod discovery;
mod error;
mod loader;
pub mod manifest;
mod naming;
mod paths;
mod probe;
mod report;

pub use crate::discovery::{Discoverer, Discovery, Rejected};
pub use crate::error::{LoaderError, LoaderErrorExt};
pub use crate::loader::{ModuleLoader, ModuleLoaderBuilder, ModulePlan, NoPaths, PlannedStep, WithPaths};
pub use crate::manifest::{BindingManifest, FacadeEntry, ServiceScope};
pub use crate::naming::{ClassNameResolver, is_identifier_token};
pub use crate::paths::{MANIFEST_FILE, PathResolver};
pub use crate::probe::{ArtifactProbe, FsProbe};
pub use crate::report::{LoadReport, ModuleReport};
