//! # Domain Models
//!
//! Plain data shared by the loader, the container and the scaffolding tools:
//! identifiers, module descriptors, artifact kinds, discovery results and load outcomes.
//! Keep it lean: no I/O and no registry logic, just data and small pure helpers.

pub mod artifact;
pub mod config;
pub mod kinds;
pub mod module;
pub mod outcome;
pub mod registry;
