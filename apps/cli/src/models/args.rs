//! # CLI argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use modkit_scaffold::StubKind;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "modkit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Inspect, dry-run and scaffold convention-based modules")]
pub struct Cli {
    /// Configuration file (defaults to `modkit.*` in the working directory, if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: AppCommands,
}

#[derive(Debug, Subcommand)]
pub enum AppCommands {
    /// List declared modules and the artifact kinds present in each
    Modules {},
    /// Show what a load pass would register, without loading anything
    Plan {
        /// Only this module
        #[arg(short, long)]
        module: Option<String>,
    },
    /// Generate a source file from a template
    #[command(alias = "make")]
    Generate {
        kind: GenerateKind,
        /// Type name, e.g. `InvoiceController`
        name: String,
        /// Target module; app-level when omitted
        #[arg(short, long)]
        module: Option<String>,
        /// Service bound to a facade (defaults to `{NAME}Service`)
        #[arg(short, long)]
        service: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GenerateKind {
    Controller,
    Service,
    Entity,
    Facade,
}

impl From<GenerateKind> for StubKind {
    fn from(kind: GenerateKind) -> Self {
        match kind {
            GenerateKind::Controller => Self::Controller,
            GenerateKind::Service => Self::Service,
            GenerateKind::Entity => Self::Entity,
            GenerateKind::Facade => Self::Facade,
        }
    }
}
