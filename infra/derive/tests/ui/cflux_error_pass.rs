use cflux_derive::cflux_error;
use std::borrow::Cow;

#[cflux_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), DemoError> {
    let io: Result<(), std::io::Error> = Err(std::io::Error::other("disk"));
    io.context("reading snapshot")?;
    Ok(())
}

fn main() {
    let err = read().unwrap_err();
    assert!(matches!(err, DemoError::Io { context: Some(_), .. }));

    let internal: DemoError = "broken".into();
    assert_eq!(internal.to_string(), "Internal error: broken");
}
