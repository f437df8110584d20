use modkit_domain::outcome::ErrorClass;
use std::borrow::Cow;

/// Errors raised by the host container and its registration primitives.
#[modkit_derive::modkit_error]
pub enum RegistryError {
    /// The identifier is not declared in the type catalog.
    #[error("Unknown type{}: {identifier}", format_context(.context))]
    UnknownType { identifier: String, context: Option<Cow<'static, str>> },

    /// A name or identifier is already bound.
    #[error(
        "Registration conflict{}: '{name}' is bound by {existing}, rejected {incoming}",
        format_context(.context)
    )]
    Conflict { name: String, existing: String, incoming: String, context: Option<Cow<'static, str>> },

    /// A constructor failed or the identifier does not name a component.
    #[error("Failed to construct {identifier}{}: {message}", format_context(.context))]
    Construction {
        identifier: String,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    /// A lazy binding could not be resolved at first use.
    #[error("Cannot resolve '{name}'{}: {message}", format_context(.context))]
    Unresolvable { name: String, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// `name` was requested again while it was still being constructed.
    #[error("Circular dependency{} while resolving '{name}'", format_context(.context))]
    CircularDependency { name: String, context: Option<Cow<'static, str>> },

    /// A configuration file could not be parsed.
    #[error("Configuration error{}: {source}", format_context(.context))]
    Config { source: ::config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal registry error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl RegistryError {
    /// Errors that leave a module unable to continue loading.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Construction { .. } | Self::UnknownType { .. } | Self::CircularDependency { .. }
        )
    }

    /// Failure class recorded in load reports.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Conflict { .. } => ErrorClass::RegistrationConflict,
            Self::Unresolvable { .. } => ErrorClass::UnresolvableReference,
            Self::Config { .. } => ErrorClass::Configuration,
            Self::Io { .. } => ErrorClass::UnreadablePath,
            Self::UnknownType { .. }
            | Self::Construction { .. }
            | Self::CircularDependency { .. }
            | Self::Internal { .. } => ErrorClass::Construction,
        }
    }

    pub(crate) fn unknown(identifier: impl Into<String>) -> Self {
        Self::UnknownType { identifier: identifier.into(), context: None }
    }

    pub(crate) fn conflict(
        name: impl Into<String>,
        existing: impl Into<String>,
        incoming: impl Into<String>,
    ) -> Self {
        Self::Conflict {
            name: name.into(),
            existing: existing.into(),
            incoming: incoming.into(),
            context: None,
        }
    }

    /// Convenience for component constructors reporting their own failure.
    pub fn construction(identifier: impl Into<String>, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Construction { identifier: identifier.into(), message: message.into(), context: None }
    }

    pub(crate) fn unresolvable(name: impl Into<String>, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Unresolvable { name: name.into(), message: message.into(), context: None }
    }
}
