use thiserror::Error;

use crate::Device;

#[derive(Debug, Error)]
pub enum EmuError {
    #[error("device {0} is not part of the network")]
    UnknownDevice(Device),

    #[error("device {0} already exists")]
    DuplicateDevice(Device),

    #[error("no link between {0} and {1}")]
    UnknownLink(Device, Device),

    #[error("network has not been started")]
    NotStarted,

    #[error("cannot connect to controller {controller}: {reason}")]
    Controller { controller: String, reason: String },

    #[error("backend command failed: {0}")]
    Command(String),
}

pub type EmuResult<T> = Result<T, EmuError>;
