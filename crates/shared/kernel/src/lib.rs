//! # Kernel
//!
//! The host side of module loading:
//! * [`TypeCatalog`] declares every constructible type up front.
//! * [`Registry`] is the set of primitives the loader drives; [`Container`] implements it.
//! * [`ServiceProvider`] and [`Command`] are the two lifecycle traits hosts implement.
//! * [`config::load_config`] reads layered configuration (file + `MODKIT__` environment).
//!
//! ```rust
//! use modkit_kernel::{Container, TypeCatalog};
//!
//! let container = Container::new(TypeCatalog::builder().build().unwrap());
//! assert!(container.binding_names().is_empty());
//! ```

pub mod catalog;
#[cfg(not(target_arch = "wasm32"))]
pub mod config;
pub mod container;
mod error;
pub mod provider;
pub mod registry;

pub use crate::catalog::{CatalogBuilder, TypeCatalog};
pub use crate::container::Container;
pub use crate::error::{RegistryError, RegistryErrorExt};
pub use crate::provider::{Command, ServiceProvider};
pub use crate::registry::{Binding, Factory, Registry, Resolver, TypeIndex};
pub use modkit_derive::component;
pub use modkit_domain as domain;
