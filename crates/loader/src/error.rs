use modkit_domain::outcome::ErrorClass;
use std::borrow::Cow;
use std::path::PathBuf;

/// Discovery and registration failures of the module loader.
#[modkit_derive::modkit_error]
pub enum LoaderError {
    /// The path exists but cannot be enumerated or read.
    #[error("Unreadable path {}{}: {source}", .path.display(), format_context(.context))]
    UnreadablePath { path: PathBuf, source: std::io::Error, context: Option<Cow<'static, str>> },

    /// A file name does not map to an identifier token.
    #[error("Invalid identifier '{name}'{}", format_context(.context))]
    InvalidIdentifier { name: String, context: Option<Cow<'static, str>> },

    /// A declared module name is not usable.
    #[error("Invalid module '{name}'{}: {message}", format_context(.context))]
    InvalidModule { name: String, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A manifest entry points at something that does not exist.
    #[error("Invalid binding for facade '{facade}'{}: {message}", format_context(.context))]
    InvalidBinding { facade: String, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The bindings manifest is not valid TOML or has the wrong shape.
    #[error("Malformed bindings manifest{}: {source}", format_context(.context))]
    Manifest { source: toml::de::Error, context: Option<Cow<'static, str>> },

    #[error("Cannot serialize bindings manifest{}: {source}", format_context(.context))]
    ManifestWrite { source: toml::ser::Error, context: Option<Cow<'static, str>> },

    #[error("I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal loader error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl LoaderError {
    /// Failure class recorded in load reports.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::UnreadablePath { .. } | Self::Io { .. } => ErrorClass::UnreadablePath,
            Self::InvalidIdentifier { .. } | Self::InvalidModule { .. } => ErrorClass::InvalidIdentifier,
            Self::InvalidBinding { .. } | Self::Manifest { .. } | Self::ManifestWrite { .. } => {
                ErrorClass::InvalidManifest
            },
            Self::Internal { .. } => ErrorClass::Construction,
        }
    }

    pub(crate) fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::UnreadablePath { path: path.into(), source, context: None }
    }

    pub(crate) fn invalid_identifier(name: impl Into<String>) -> Self {
        Self::InvalidIdentifier { name: name.into(), context: None }
    }
}
