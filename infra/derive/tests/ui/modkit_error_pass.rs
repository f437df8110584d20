use modkit_derive::modkit_error;
use std::borrow::Cow;

#[modkit_error]
pub enum ProbeError {
    #[error("Unreadable path{}: {source}", format_context(.context))]
    Unreadable {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Unreadable {}{}: {source}", .path.display(), format_context(.context))]
    Located { path: std::path::PathBuf, source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal probe error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn list() -> Result<(), ProbeError> {
    std::fs::read_dir("/definitely/not/here").context("Listing fixtures")?;
    Ok(())
}

fn main() {
    let _ = list();
    let _err: ProbeError = "boom".into();
    let _located = ProbeError::Located {
        path: "fixtures".into(),
        source: std::io::Error::other("denied"),
        context: None,
    };
}
