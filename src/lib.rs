//! Core of a dynamic tiling window manager for X11, modeled on dwm: event dispatcher,
//! window/monitor/client model, layout engine, and focus/stacking policy.
//!
//! The core never opens an X connection or touches a terminal itself — it is driven by a
//! consumer binary through the [`x::XConn`] trait (a live [`x::rustconn::RustConn`] or, in
//! tests, [`x::mock::MockXConn`]) and a [`bar::Drawer`] for bar rendering. See [`bootstrap`] for
//! the startup/teardown sequence a consumer binary runs.

pub mod actions;
pub mod atom;
pub mod bar;
pub mod bindings;
pub mod bootstrap;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod focus;
pub mod geometry;
pub mod layout;
pub mod monitor;
pub mod state;
pub mod x;

pub use client::ClientId;
pub use config::Config;
pub use error::{Error, Result};
pub use monitor::MonitorId;
pub use state::WmState;
