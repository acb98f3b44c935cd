use cflux_derive::cflux_error;
use std::borrow::Cow;

#[cflux_error]
#[derive(Debug)]
pub enum TransitionError {
    #[code(103)]
    #[error("Not shipper{}: {message}", format_context(.context))]
    NotShipper { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[code(104)]
    #[error("Not carrier{}: {message}", format_context(.context))]
    NotCarrier { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

const fn probe(err: &TransitionError) -> u16 {
    err.code()
}

fn main() {
    let err = TransitionError::NotCarrier { message: "x".into(), context: None };
    assert_eq!(probe(&err), 104);
    assert_eq!(TransitionError::NotShipper { message: "y".into(), context: None }.code(), 103);
}
