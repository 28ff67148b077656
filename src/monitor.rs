//! Per-monitor state and client-list management (§3, §4.2).

use crate::client::{Client, ClientId};
use crate::config::Layout;

/// Opaque handle identifying a monitor, stable for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonitorId(pub u32);

/// A physical output and the tiling state addressed to it.
#[derive(Debug)]
pub struct Monitor {
    /// This monitor's handle.
    pub id: MonitorId,
    /// Stable index assigned during geometry rescan (`updategeom`), used for `tagmon`/`focusmon`
    /// ordering and `dmenumon`'s monitor-number argument.
    pub num: i32,
    /// Screen rectangle, in root coordinates.
    pub mx: i32,
    pub my: i32,
    pub mw: u32,
    pub mh: u32,
    /// Work area: screen rectangle minus the bar.
    pub wx: i32,
    pub wy: i32,
    pub ww: u32,
    pub wh: u32,
    /// Bar window's y coordinate.
    pub by: i32,
    /// Whether the bar is currently shown.
    pub showbar: bool,
    /// Whether the bar sits at the top (`true`) or bottom (`false`) of the monitor.
    pub topbar: bool,
    /// Two tag banks; `view` flips between them via `seltags`.
    pub tagset: [u32; 2],
    /// Index into `tagset` of the currently active bank.
    pub seltags: usize,
    /// Master-area width fraction.
    pub mfact: f64,
    /// Number of clients placed in the master area.
    pub nmaster: u32,
    /// Current and previous layout; `sellt` selects which is "current".
    pub lt: [Layout; 2],
    /// Index into `lt` of the active layout.
    pub sellt: usize,
    /// Displayed layout tag; normally `lt[sellt].symbol`, but a layout may override it
    /// (monocle writes `[N]`).
    pub ltsymbol: String,
    /// Arrange-order client list.
    pub clients: Vec<ClientId>,
    /// Focus-order (MRU) client list.
    pub stack: Vec<ClientId>,
    /// Currently selected client, if any.
    pub sel: Option<ClientId>,
    /// X window id of this monitor's bar.
    pub barwin: u32,
}

impl Monitor {
    /// Construct a new monitor with geometry `(mx,my,mw,mh)`, seeded from `cfg`.
    pub fn new(id: MonitorId, num: i32, mx: i32, my: i32, mw: u32, mh: u32, cfg: &crate::config::Config) -> Self {
        let lt0 = cfg.layouts.first().cloned().unwrap_or(Layout {
            symbol: "[]=",
            arrange: None,
        });
        let lt1 = cfg.layouts.get(1).cloned().unwrap_or_else(|| lt0.clone());
        Monitor {
            id,
            num,
            mx,
            my,
            mw,
            mh,
            wx: mx,
            wy: my,
            ww: mw,
            wh: mh,
            by: my,
            showbar: cfg.showbar,
            topbar: cfg.topbar,
            tagset: [1, 1],
            seltags: 0,
            mfact: cfg.mfact,
            nmaster: cfg.nmaster,
            ltsymbol: lt0.symbol.to_string(),
            lt: [lt0, lt1],
            sellt: 0,
            clients: Vec::new(),
            stack: Vec::new(),
            sel: None,
            barwin: 0,
        }
    }

    /// The currently selected tag bank.
    pub fn seltag_mask(&self) -> u32 {
        self.tagset[self.seltags]
    }

    /// Is `tags` visible under this monitor's currently selected tag bank?
    pub fn is_visible(&self, tags: u32) -> bool {
        tags & self.seltag_mask() != 0
    }

    /// Prepend `c` to the arrange-order list (§4.2 `attach`).
    pub fn attach(&mut self, c: ClientId) {
        self.clients.insert(0, c);
    }

    /// Remove `c` from the arrange-order list, preserving the relative order of the rest.
    pub fn detach(&mut self, c: ClientId) {
        self.clients.retain(|&x| x != c);
    }

    /// Prepend `c` to the focus-order list (§4.2 `attachstack`).
    pub fn attachstack(&mut self, c: ClientId) {
        self.stack.insert(0, c);
    }

    /// Remove `c` from the focus-order list. If `c` was `sel`, the new selection becomes the
    /// first remaining client in the stack that is visible under the current tagset, else
    /// `None` (§4.2).
    pub fn detachstack(&mut self, c: ClientId, clients: &[Client]) {
        self.stack.retain(|&x| x != c);
        if self.sel == Some(c) {
            self.sel = self
                .stack
                .iter()
                .copied()
                .find(|&id| clients.iter().any(|cl| cl.id == id && self.is_visible(cl.tags)));
        }
    }
}
