//! The X abstraction layer: everything the core needs from the display server, behind one
//! trait, so handlers and actions can be driven from scripted event streams without a real X
//! server (§8).

pub mod event;
pub mod mock;
pub mod property;
#[cfg(feature = "x11rb")]
pub mod rustconn;

pub use event::XEvent;
pub use property::{WmHints, WmNormalHints};

use crate::error::Result;
use crate::geometry::Rect;

/// A window type passed when creating the supporting-WM-check window (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WinType {
    /// The 1x1 `_NET_SUPPORTING_WM_CHECK` window: never mapped, receives no input.
    CheckWin,
}

/// A handle to a running connection to the display server.
///
/// Every request the core can make of the server lives here. A [`mock::MockXConn`]
/// implementation drives the handlers in tests without touching a real display; a
/// [`rustconn::RustConn`] drives them against a live X11 server over `x11rb`.
pub trait XConn {
    /// The window manager's root window.
    fn root(&self) -> u32;
    /// Full screen dimensions (`sw`, `sh` in §4.3's `applysizehints`).
    fn screen_size(&self) -> Result<(u32, u32)>;
    /// Enumerate the available output rectangles (the abstract Xinerama capability, §1).
    fn screen_rects(&self) -> Result<Vec<Rect>>;
    /// Current pointer position in root coordinates.
    fn cursor_position(&self) -> Result<(i32, i32)>;
    /// Find which client, if any, contains the given root-coordinate point.
    fn window_at_point(&self, x: i32, y: i32) -> Result<Option<u32>>;

    /// Block for the next X event.
    fn next_event(&mut self) -> Result<XEvent>;
    /// Drain and discard any already-queued `EnterNotify` events (used by `restack` to swallow
    /// pointer-crossing events its own stacking changes generate).
    fn drain_enter_notify(&mut self) -> Result<()>;
    /// Flush the request buffer and block until the server has processed it (`XSync`).
    fn sync(&mut self) -> Result<()>;

    /// Look up the numeric id for an atom name, interning it if necessary.
    fn intern_atom(&mut self, name: &str) -> Result<u32>;
    /// Reverse-lookup an atom's string name.
    fn atom_name(&self, atom: u32) -> Result<String>;

    /// Reposition and resize a client's frame, including border width, in one request.
    fn configure_window(&mut self, win: u32, geom: Rect, bw: u32) -> Result<()>;
    /// Send a synthetic `ConfigureNotify` (required by ICCCM whenever the WM moves/resizes a
    /// client without the client's participation).
    fn send_configure_notify(&mut self, win: u32, geom: Rect, bw: u32) -> Result<()>;
    /// Raise a window to the top of the stacking order.
    fn raise_window(&mut self, win: u32) -> Result<()>;
    /// Restack `order` (bottom to top) directly below `sibling`, if given.
    fn restack_windows(&mut self, order: &[u32], sibling: Option<u32>) -> Result<()>;

    /// Map a window.
    fn map_window(&mut self, win: u32) -> Result<()>;
    /// Unmap a window.
    fn unmap_window(&mut self, win: u32) -> Result<()>;
    /// Forcibly terminate a client's connection (`XKillClient`).
    fn kill_window(&mut self, win: u32) -> Result<()>;
    /// Create the 1x1 supporting-WM-check window and return its id.
    fn create_check_window(&mut self) -> Result<u32>;
    /// Create one monitor's bar window at `geom`: override-redirect, `ParentRelative`
    /// background, selecting `ButtonPress`/`Expose`, mapped raised (§4.8 `updatebars`).
    fn create_bar_window(&mut self, geom: Rect) -> Result<u32>;
    /// Destroy a window previously created by this connection.
    fn destroy_window(&mut self, win: u32) -> Result<()>;

    /// Set input focus to `win`, or to the root window if `None`.
    fn set_input_focus(&mut self, win: Option<u32>) -> Result<()>;
    /// Send a `WM_TAKE_FOCUS` client message, if the window declared support for it.
    fn send_take_focus(&mut self, win: u32) -> Result<()>;
    /// Send a `WM_DELETE_WINDOW` client message.
    fn send_delete(&mut self, win: u32) -> Result<()>;
    /// Send an arbitrary 32-bit `ClientMessage`.
    fn send_client_message(&mut self, win: u32, message_type: u32, data: [u32; 5]) -> Result<()>;

    /// Paint a client's border the given pixel color.
    fn set_border_color(&mut self, win: u32, pixel: u32) -> Result<()>;
    /// Select the input event mask used for newly-managed clients.
    fn select_client_input(&mut self, win: u32) -> Result<()>;
    /// Grab all mouse buttons on `win` (unfocused mapping grabs every button; focused mapping
    /// grabs only the configured modifier+button combinations).
    fn grab_buttons(&mut self, win: u32, focused: bool) -> Result<()>;
    /// Grab the configured key bindings on the root window.
    fn grab_keys(&mut self) -> Result<()>;
    /// Warp the pointer to `(x, y)` within `win`.
    fn warp_pointer(&mut self, win: u32, x: i32, y: i32) -> Result<()>;
    /// Grab the pointer for an interactive move/resize, with the given cursor shape.
    fn grab_pointer(&mut self, cursor: u32) -> Result<bool>;
    /// Release a pointer grab taken by [`XConn::grab_pointer`].
    fn ungrab_pointer(&mut self) -> Result<()>;

    /// Read a window's geometry and border width as currently known to the server.
    fn get_geometry(&self, win: u32) -> Result<(Rect, u32)>;
    /// Read WM_NAME/_NET_WM_NAME, falling back to `"broken"` if both are empty (§7).
    fn get_title(&self, win: u32) -> Result<String>;
    /// Read WM_CLASS as `(class, instance)`.
    fn get_class(&self, win: u32) -> Result<(String, String)>;
    /// Read WM_NORMAL_HINTS.
    fn get_normal_hints(&self, win: u32) -> Result<WmNormalHints>;
    /// Read WM_HINTS.
    fn get_wm_hints(&self, win: u32) -> Result<WmHints>;
    /// Read WM_TRANSIENT_FOR, if set.
    fn get_transient_for(&self, win: u32) -> Result<Option<u32>>;
    /// Read _NET_WM_WINDOW_TYPE as a list of interned atoms.
    fn get_window_type(&self, win: u32) -> Result<Vec<u32>>;
    /// Read the current `_NET_WM_STATE` property as a list of interned atoms.
    fn get_net_wm_state(&self, win: u32) -> Result<Vec<u32>>;
    /// Does `win` support the given WM_PROTOCOLS atom (e.g. `WM_DELETE_WINDOW`)?
    fn supports_protocol(&self, win: u32, atom: u32) -> Result<bool>;
    /// Is `win` marked override-redirect (never managed)?
    fn is_override_redirect(&self, win: u32) -> Result<bool>;

    /// Set WM_STATE (ICCCM `NormalState`/`IconicState`).
    fn set_wm_state_normal(&mut self, win: u32) -> Result<()>;
    /// Append `win` to `_NET_CLIENT_LIST`.
    fn append_client_list(&mut self, win: u32) -> Result<()>;
    /// Overwrite `_NET_CLIENT_LIST` with the given window list (used after `unmanage`).
    fn set_client_list(&mut self, wins: &[u32]) -> Result<()>;
    /// Set or clear `_NET_ACTIVE_WINDOW`.
    fn set_active_window(&mut self, win: Option<u32>) -> Result<()>;
    /// Set the `_NET_WM_STATE` property to exactly the given atom list (empty clears it, the
    /// `setfullscreen`-disable peculiarity, §9).
    fn set_net_wm_state(&mut self, win: u32, atoms: &[u32]) -> Result<()>;
    /// Advertise `_NET_SUPPORTED` on the root window.
    fn set_supported(&mut self, atoms: &[u32]) -> Result<()>;
    /// Set `_NET_SUPPORTING_WM_CHECK` on both root and the check window, plus its
    /// `_NET_WM_NAME`.
    fn set_supporting_wm_check(&mut self, check_win: u32, name: &str) -> Result<()>;
    /// Read the root window's `WM_NAME`, consumed as bar status text.
    fn root_name(&self) -> Result<String>;
    /// Ask the server for every currently-mapped top-level window (`scan`).
    fn query_tree(&self) -> Result<Vec<u32>>;

    /// Bracket a critical section where the server will not process other clients' requests
    /// (`XGrabServer`/`XUngrabServer`, §5).
    fn grab_server(&mut self) -> Result<()>;
    /// Release a server grab taken by [`XConn::grab_server`].
    fn ungrab_server(&mut self) -> Result<()>;

    /// Select substructure-redirect on the root window; fails if another WM already holds it
    /// (§1, §7).
    fn become_wm(&mut self) -> Result<()>;

    /// The modifier bit NumLock is currently bound to, so key/button grabs can be mirrored with
    /// and without it held (`updatenumlockmask`).
    fn numlock_mask(&self) -> u16;
}
