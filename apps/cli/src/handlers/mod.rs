pub mod generate;
pub mod modules;
pub mod plan;
