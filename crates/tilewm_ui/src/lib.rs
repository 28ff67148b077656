//! Minimal Xft drawing primitives for the bar, playing the role of dwm's `drw.c`: one drawable
//! pixmap, a small set of color schemes, and a fontset with fontconfig-driven glyph fallback.
//!
//! This crate only implements [`tilewm::bar::Drawer`] — it owns no event loop and no window
//! lifecycle beyond the drawable pixmap itself; the consumer binary creates/maps the actual bar
//! windows over [`tilewm::x::XConn`] and hands this crate their ids to paint into.
#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]

mod core;

pub use crate::core::Draw;

/// Errors from font loading, color parsing, and Xft/Xlib calls.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// `XOpenDisplay` returned null.
    #[error("unable to open X display")]
    NoDisplay,

    /// `XftFontOpenName` failed for every requested font in a fontset.
    #[error("unable to open font: {0}")]
    UnableToOpenFont(String),

    /// `XftNameParse` failed while loading a font by name.
    #[error("unable to parse font pattern: {0}")]
    UnableToParseFontPattern(String),

    /// `XftFontOpenPattern` failed for a fontconfig fallback match.
    #[error("unable to open font from fallback pattern")]
    UnableToOpenFontPattern,

    /// No installed font covers the requested character.
    #[error("no fallback font found for character {0:?}")]
    NoFallbackFontForChar(char),

    /// A hex color string (`#rrggbb`) failed to parse or allocate.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// An opaque scheme or cursor handle did not correspond to anything allocated by this crate.
    #[error("unknown handle {0}")]
    UnknownHandle(u32),

    /// A C string built from font/text data contained an interior NUL.
    #[error(transparent)]
    Nul(#[from] std::ffi::NulError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
