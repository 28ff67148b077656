//! Crate-wide error type.

use crate::{ClientId, MonitorId};

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong talking to the X server or driving the window manager core.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Unable to open a connection to the X display.
    #[error("unable to open X display")]
    NoDisplay,

    /// `XSelectInput` for substructure-redirect on the root window failed: another window
    /// manager already owns the display.
    #[error("another window manager is already running")]
    OtherWmRunning,

    /// No usable font could be loaded for the bar.
    #[error("unable to load font: {0}")]
    NoUsableFont(String),

    /// The underlying X11 protocol connection returned an error.
    #[error("X11 protocol error: {0}")]
    X11(String),

    /// A requested property was missing or of the wrong format.
    #[error("missing or malformed property {prop} on window {win}")]
    BadProperty {
        /// Name of the property that was requested.
        prop: String,
        /// The window the request was made against.
        win: u32,
    },

    /// Referenced a [`ClientId`] that is not currently managed.
    #[error("unknown client {0:?}")]
    UnknownClient(ClientId),

    /// Referenced a [`MonitorId`] that does not exist.
    #[error("unknown monitor {0:?}")]
    UnknownMonitor(MonitorId),

    /// A [`crate::x::mock::MockXConn`] method was called without a scripted response.
    #[error("mock X connection method not implemented for this test")]
    UnimplementedMock,

    /// `fork`/`exec` for [`crate::actions::spawn`] failed.
    #[error("failed to spawn child process: {0}")]
    Spawn(#[from] nix::Error),

    /// A C string built from user/X data contained an interior NUL.
    #[error(transparent)]
    Nul(#[from] std::ffi::NulError),
}
