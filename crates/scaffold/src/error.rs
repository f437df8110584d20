use modkit_loader::LoaderError;
use std::borrow::Cow;
use std::path::PathBuf;

#[modkit_derive::modkit_error]
pub enum ScaffoldError {
    /// The generator never overwrites.
    #[error("{} already exists{}", .path.display(), format_context(.context))]
    TargetExists { path: PathBuf, context: Option<Cow<'static, str>> },

    #[error("Invalid name '{name}'{}: expected an identifier token", format_context(.context))]
    InvalidName { name: String, context: Option<Cow<'static, str>> },

    #[error("Loader error{}: {source}", format_context(.context))]
    Loader { source: LoaderError, context: Option<Cow<'static, str>> },

    #[error("I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal scaffold error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
