//! # Modkit scaffolding
//!
//! Writes new controllers, services, entities and facades from embedded templates, at the
//! locations the loader discovers them. Facades are recorded in the `Providers/bindings.toml`
//! manifest together with their service.

mod error;
mod generator;
mod stub;

pub use crate::error::{ScaffoldError, ScaffoldErrorExt};
pub use crate::generator::{Generated, GeneratedFacade, Generator};
pub use crate::stub::StubKind;
