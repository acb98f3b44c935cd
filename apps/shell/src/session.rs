use crate::command::Command;
use anyhow::Context;
use cflux_shipments::ShipmentRegistry;
use serde::Serialize;
use serde_json::Value;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info};

/// One output line of the shell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Value { value: Value },
    Error { error: u16, message: String },
}

impl Reply {
    fn value(value: impl Serialize) -> anyhow::Result<Self> {
        Ok(Self::Value { value: serde_json::to_value(value).context("Failed to encode reply")? })
    }

    fn error(code: u16, err: &impl std::fmt::Display) -> Self {
        Self::Error { error: code, message: err.to_string() }
    }
}

/// Executes shell commands against a registry and persists it after each change.
#[derive(Debug)]
pub struct Session {
    registry: ShipmentRegistry,
    snapshot: Option<PathBuf>,
}

impl Session {
    pub const fn new(registry: ShipmentRegistry, snapshot: Option<PathBuf>) -> Self {
        Self { registry, snapshot }
    }

    #[must_use]
    pub const fn registry(&self) -> &ShipmentRegistry {
        &self.registry
    }

    /// Runs one command. Registry rejections become [`Reply::Error`].
    ///
    /// # Errors
    /// Fails only when the snapshot cannot be written after a successful mutation.
    pub fn execute(&self, command: Command) -> anyhow::Result<Reply> {
        let mutation = command.is_mutation();
        let registry = &self.registry;

        let outcome = match command {
            Command::TransferAdmin { caller, new_admin } => {
                registry.transfer_admin(&caller, new_admin).map(Value::Bool)
            },
            Command::Create { caller, recipient, metadata_hash } => registry
                .create_shipment(&caller, recipient, metadata_hash)
                .map(|id| id.get().into()),
            Command::Assign { caller, id, carrier } => {
                registry.assign_carrier(&caller, id, carrier).map(Value::Bool)
            },
            Command::Status { caller, id, code } => {
                registry.update_status(&caller, id, code).map(Value::Bool)
            },
            Command::Get { id } => return Reply::value(registry.get_shipment(id)),
            Command::GetStatus { id } => return Reply::value(registry.get_status(id)),
            Command::Roles { principal, id } => return Reply::value(registry.roles(&principal, id)),
            Command::Admin => return Reply::value(registry.admin()),
        };

        match outcome {
            Ok(value) => {
                if mutation {
                    self.persist()?;
                }
                Ok(Reply::Value { value })
            },
            Err(err) => Ok(Reply::error(err.code(), &err)),
        }
    }

    /// Reads commands line by line until end of input, writing one JSON reply per command.
    /// Blank lines and lines starting with `#` are skipped.
    ///
    /// # Errors
    /// Fails on I/O errors and on snapshot write failures.
    pub fn run(&self, input: impl BufRead, mut output: impl Write) -> anyhow::Result<()> {
        let mut handled = 0usize;

        for line in input.lines() {
            let line = line.context("Failed to read command")?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let reply = match Command::parse(line) {
                Ok(command) => self.execute(command)?,
                Err(err) => Reply::error(err.code(), &err),
            };

            serde_json::to_writer(&mut output, &reply).context("Failed to write reply")?;
            output.write_all(b"\n").context("Failed to write reply")?;
            output.flush().context("Failed to flush output")?;
            handled += 1;
        }

        info!(commands = handled, "Input exhausted");
        Ok(())
    }

    fn persist(&self) -> anyhow::Result<()> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };

        self.registry
            .snapshot()
            .save(path)
            .with_context(|| format!("Failed to persist registry to {}", path.display()))?;
        debug!(path = %path.display(), "Registry persisted");
        Ok(())
    }
}
