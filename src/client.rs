//! Per-window client state (§3).

use crate::geometry::Rect;
use crate::monitor::MonitorId;

/// Opaque handle identifying a managed client, stable for its lifetime.
///
/// Clients live in a [`crate::state::WmState`] arena rather than behind raw pointers; a monitor's
/// `clients`/`stack` lists are `Vec<ClientId>` (§9 "intrusive doubly-role lists").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(pub u32);

/// ICCCM WM_NORMAL_HINTS, cached on the client and lazily refreshed (§3, §4.3).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SizeHints {
    /// Base size subtracted before increment/aspect math.
    pub basew: i32,
    pub baseh: i32,
    /// Resize increments; 0 means "no increment constraint".
    pub incw: i32,
    pub inch: i32,
    /// Minimum size; 0 means unbounded.
    pub minw: i32,
    pub minh: i32,
    /// Maximum size; 0 means unbounded.
    pub maxw: i32,
    pub maxh: i32,
    /// Minimum/maximum aspect ratio (width/height); 0.0 means unconstrained.
    pub mina: f64,
    pub maxa: f64,
}

/// A managed top-level window.
#[derive(Debug, Clone)]
pub struct Client {
    /// This client's handle (redundant with its arena slot, kept for convenience).
    pub id: ClientId,
    /// The underlying X window id.
    pub win: u32,
    /// Last-known title. Falls back to `"broken"` if both `_NET_WM_NAME` and `WM_NAME` are empty.
    pub name: String,
    /// Current frame geometry (excludes border).
    pub geom: Rect,
    /// Saved geometry, restored by the floating/fullscreen toggles.
    pub old_geom: Rect,
    /// Current border width.
    pub bw: u32,
    /// Border width saved before entering fullscreen.
    pub old_bw: u32,
    /// Cached ICCCM size hints.
    pub hints: SizeHints,
    /// Whether `hints` reflects the window's current WM_NORMAL_HINTS property.
    pub hintsvalid: bool,
    /// Tag membership bitmask.
    pub tags: u32,
    /// `minw == maxw && minh == maxh`: the window cannot be resized.
    pub isfixed: bool,
    /// Excluded from tiling; placed and sized by the client/user, not the layout engine.
    pub isfloating: bool,
    /// WM_HINTS urgency bit, or set by an `_NET_ACTIVE_WINDOW` request from another client.
    pub isurgent: bool,
    /// WM_HINTS input hint was false: never receives input focus via `XSetInputFocus`.
    pub neverfocus: bool,
    /// `isfloating` value saved before entering fullscreen.
    pub oldstate: bool,
    /// Currently in the fullscreen state (§3 invariant 4).
    pub isfullscreen: bool,
    /// Owning monitor. A weak back-reference: the monitor's `clients` list owns the client,
    /// this is just a handle back to it (§9).
    pub mon: MonitorId,
}

impl Client {
    /// Construct a freshly-mapped client with default (non-floating, non-urgent) state.
    pub fn new(id: ClientId, win: u32, mon: MonitorId, geom: Rect, bw: u32) -> Self {
        Client {
            id,
            win,
            name: String::new(),
            geom,
            old_geom: geom,
            bw,
            old_bw: bw,
            hints: SizeHints::default(),
            hintsvalid: false,
            tags: 0,
            isfixed: false,
            isfloating: false,
            isurgent: false,
            neverfocus: false,
            oldstate: false,
            isfullscreen: false,
            mon,
        }
    }

    /// The geometry the X server actually sees: frame plus border on all sides.
    pub fn bordered_geom(&self) -> Rect {
        Rect::new(
            self.geom.x,
            self.geom.y,
            self.geom.w + 2 * self.bw,
            self.geom.h + 2 * self.bw,
        )
    }

    /// Total width including both borders, as used by `showhide`'s off-screen parking
    /// (`x = -2*WIDTH(c)`).
    pub fn width_with_border(&self) -> u32 {
        self.geom.w + 2 * self.bw
    }

    /// Apply freshly-parsed WM_NORMAL_HINTS, deriving `isfixed`.
    pub fn set_hints(&mut self, hints: SizeHints) {
        self.isfixed = hints.maxw > 0
            && hints.maxw == hints.minw
            && hints.maxh > 0
            && hints.maxh == hints.minh;
        self.hints = hints;
        self.hintsvalid = true;
    }
}
