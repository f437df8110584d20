pub mod component;
pub mod error;
