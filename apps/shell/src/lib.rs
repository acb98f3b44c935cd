//! # Shell
//!
//! Operator shell for the shipment registry: reads one command per line and
//! answers with one JSON document per line (`{"value": ...}` or
//! `{"error": <code>, "message": ...}`).

pub mod cli;
pub mod command;
pub mod session;

pub use crate::command::{Command, CommandError};
pub use crate::session::{Reply, Session};
