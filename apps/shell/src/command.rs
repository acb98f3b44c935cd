//! Line-oriented command syntax of the operator shell.
//!
//! ```text
//! transfer-admin <caller> <new-admin>
//! create         <caller> <recipient> <metadata-hash>
//! assign         <caller> <id> <carrier>
//! status         <caller> <id> <status-code>
//! get            <id>
//! get-status     <id>
//! roles          <principal> <id>
//! admin
//! ```
//!
//! Arguments are separated by whitespace, so principals and metadata hashes
//! entered here cannot be empty or contain spaces. The registry itself accepts
//! any string for them.
//!
//! The status code is read as a signed 64-bit integer and handed to the
//! registry unchecked, which reports unknown codes as invalid statuses.

use cflux_shipments::{Principal, ShipmentId};
use std::borrow::Cow;
use std::str::SplitWhitespace;

/// Rejections of malformed input lines. Codes do not overlap registry codes.
#[cflux_derive::cflux_error]
pub enum CommandError {
    #[code(1)]
    #[error("Unknown command{}: {message}", format_context(.context))]
    Unknown { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[code(2)]
    #[error("Missing argument{}: {message}", format_context(.context))]
    MissingArgument { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[code(3)]
    #[error("Invalid argument{}: {message}", format_context(.context))]
    InvalidArgument { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    TransferAdmin { caller: Principal, new_admin: Principal },
    Create { caller: Principal, recipient: Principal, metadata_hash: String },
    Assign { caller: Principal, id: ShipmentId, carrier: Principal },
    Status { caller: Principal, id: ShipmentId, code: i64 },
    Get { id: ShipmentId },
    GetStatus { id: ShipmentId },
    Roles { principal: Principal, id: ShipmentId },
    Admin,
}

impl Command {
    /// Whether a successful execution changes registry state.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::TransferAdmin { .. } | Self::Create { .. } | Self::Assign { .. } | Self::Status { .. }
        )
    }

    /// Parses one input line.
    ///
    /// # Errors
    /// Returns a [`CommandError`] for unknown verbs, missing or surplus arguments,
    /// and ids or status codes that are not numbers.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut args = Args { words: line.split_whitespace() };
        let verb = args.next("command")?;

        let command = match verb {
            "transfer-admin" => {
                Self::TransferAdmin { caller: args.principal("caller")?, new_admin: args.principal("new-admin")? }
            },
            "create" => Self::Create {
                caller: args.principal("caller")?,
                recipient: args.principal("recipient")?,
                metadata_hash: args.next("metadata-hash")?.to_owned(),
            },
            "assign" => Self::Assign {
                caller: args.principal("caller")?,
                id: args.id()?,
                carrier: args.principal("carrier")?,
            },
            "status" => Self::Status {
                caller: args.principal("caller")?,
                id: args.id()?,
                code: args.number("status-code")?,
            },
            "get" => Self::Get { id: args.id()? },
            "get-status" => Self::GetStatus { id: args.id()? },
            "roles" => Self::Roles { principal: args.principal("principal")?, id: args.id()? },
            "admin" => Self::Admin,
            other => {
                return Err(CommandError::Unknown { message: other.to_owned().into(), context: None });
            },
        };

        args.finish(verb)?;
        Ok(command)
    }
}

struct Args<'a> {
    words: SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn next(&mut self, name: &'static str) -> Result<&'a str, CommandError> {
        self.words
            .next()
            .ok_or(CommandError::MissingArgument { message: Cow::Borrowed(name), context: None })
    }

    fn principal(&mut self, name: &'static str) -> Result<Principal, CommandError> {
        self.next(name).map(Principal::from)
    }

    fn number<T: std::str::FromStr>(&mut self, name: &'static str) -> Result<T, CommandError> {
        let raw = self.next(name)?;
        raw.parse().map_err(|_| CommandError::InvalidArgument {
            message: format!("{name} must be a number, got '{raw}'").into(),
            context: None,
        })
    }

    fn id(&mut self) -> Result<ShipmentId, CommandError> {
        self.number::<u64>("id").map(ShipmentId::new)
    }

    fn finish(mut self, verb: &str) -> Result<(), CommandError> {
        match self.words.next() {
            None => Ok(()),
            Some(extra) => Err(CommandError::InvalidArgument {
                message: format!("unexpected argument '{extra}'").into(),
                context: Some(verb.to_owned().into()),
            }),
        }
    }
}
