//! Bundled process-wide state (§9 "Global mutable state" design note).
//!
//! The reference design keeps `selmon`, `mons`, `running`, and the atom cache as file-scope
//! globals. Here they are fields of one value created in `setup` and threaded through every
//! handler and action instead of replicated as statics.

use std::collections::HashMap;

use crate::atom::Atom;
use crate::bindings::CodeMap;
use crate::client::{Client, ClientId};
use crate::config::Config;
use crate::monitor::{Monitor, MonitorId};

/// Everything the core owns between one X event and the next.
pub struct WmState {
    /// Compile-time configuration handed in at startup.
    pub config: Config,
    /// All managed clients, keyed by id. Removed clients are deleted outright; ids are never
    /// reused within a single run.
    clients: HashMap<ClientId, Client>,
    next_client_id: u32,
    /// All monitors, keyed by id, in creation order via `monitor_order`.
    monitors: HashMap<MonitorId, Monitor>,
    monitor_order: Vec<MonitorId>,
    next_monitor_id: u32,
    /// The currently active monitor. Always `Some` once `setup` has created at least one
    /// monitor (§3 invariant 5).
    pub selmon: Option<MonitorId>,
    /// Cleared by the `quit` action; observed at the top of the main loop.
    pub running: bool,
    /// Interned atom cache, built once in `setup`.
    pub atoms: HashMap<Atom, u32>,
    /// Keysym name -> keycode table, rebuilt on `MappingNotify`.
    pub codemap: CodeMap,
    /// The modifier bit corresponding to NumLock, computed once from the modifier map so key
    /// grabs can be mirrored with and without it held.
    pub numlockmask: u16,
    /// Root window id.
    pub root: u32,
    /// Supporting-WM-check window id (`_NET_SUPPORTING_WM_CHECK`).
    pub wmcheckwin: u32,
    /// Full screen dimensions, used by `applysizehints`'s `interact` branch.
    pub sw: u32,
    pub sh: u32,
    /// Bar height in pixels, the cosmetic floor enforced by `applysizehints`.
    pub bh: u32,
    /// Root window `WM_NAME`, consumed as the status line on `selmon`'s bar (§6). `None` until
    /// the first read; the bar renderer treats that as an empty string.
    pub status: Option<String>,
    /// Cursor handle shown during an interactive move grab (§4.7), an opaque id from the draw
    /// collaborator. `0` (X11 `None`) leaves the pointer's current cursor unchanged, which is
    /// what a fresh state has until the consumer installs real cursors after startup.
    pub cursor_move: u32,
    /// Cursor handle shown during an interactive resize grab (§4.7); see `cursor_move`.
    pub cursor_resize: u32,
}

impl WmState {
    /// Construct an empty state from `config`; monitors are added by `scan`/`updategeom`.
    pub fn new(config: Config, root: u32, sw: u32, sh: u32, bh: u32) -> Self {
        WmState {
            config,
            clients: HashMap::new(),
            next_client_id: 0,
            monitors: HashMap::new(),
            monitor_order: Vec::new(),
            next_monitor_id: 0,
            selmon: None,
            running: true,
            atoms: HashMap::new(),
            codemap: CodeMap::new(),
            numlockmask: 0,
            root,
            wmcheckwin: 0,
            sw,
            sh,
            bh,
            status: None,
            cursor_move: 0,
            cursor_resize: 0,
        }
    }

    /// Allocate and insert a new monitor with the given geometry, appended to the monitor list.
    pub fn create_monitor(&mut self, mx: i32, my: i32, mw: u32, mh: u32) -> MonitorId {
        let id = MonitorId(self.next_monitor_id);
        self.next_monitor_id += 1;
        let num = self.monitor_order.len() as i32;
        let mon = Monitor::new(id, num, mx, my, mw, mh, &self.config);
        self.monitors.insert(id, mon);
        self.monitor_order.push(id);
        if self.selmon.is_none() {
            self.selmon = Some(id);
        }
        id
    }

    /// Remove a monitor. Callers must have already reparented its clients (`cleanupmon`).
    pub fn remove_monitor(&mut self, id: MonitorId) {
        self.monitors.remove(&id);
        self.monitor_order.retain(|&m| m != id);
        if self.selmon == Some(id) {
            self.selmon = self.monitor_order.first().copied();
        }
    }

    pub fn monitor(&self, id: MonitorId) -> &Monitor {
        self.monitors.get(&id).expect("unknown monitor id")
    }

    pub fn monitor_mut(&mut self, id: MonitorId) -> &mut Monitor {
        self.monitors.get_mut(&id).expect("unknown monitor id")
    }

    pub fn monitors(&self) -> impl Iterator<Item = &Monitor> {
        self.monitor_order.iter().map(move |id| &self.monitors[id])
    }

    pub fn monitor_ids(&self) -> &[MonitorId] {
        &self.monitor_order
    }

    /// The monitor cyclically adjacent to `id`, in list order (`focusmon`/`tagmon` direction).
    pub fn adjacent_monitor(&self, id: MonitorId, delta: i32) -> MonitorId {
        let len = self.monitor_order.len() as i32;
        let idx = self.monitor_order.iter().position(|&m| m == id).unwrap_or(0) as i32;
        let next = ((idx + delta).rem_euclid(len.max(1))) as usize;
        self.monitor_order[next]
    }

    pub fn selected_monitor(&self) -> MonitorId {
        self.selmon.expect("no monitors created")
    }

    /// Allocate and insert a new client on `mon`. Does not attach it to any list; callers do
    /// that explicitly (`manage` attaches immediately, tests may not).
    pub fn create_client(&mut self, win: u32, mon: MonitorId, geom: crate::geometry::Rect, bw: u32) -> ClientId {
        let id = ClientId(self.next_client_id);
        self.next_client_id += 1;
        self.clients.insert(id, Client::new(id, win, mon, geom, bw));
        id
    }

    pub fn remove_client(&mut self, id: ClientId) -> Option<Client> {
        self.clients.remove(&id)
    }

    pub fn client(&self, id: ClientId) -> &Client {
        self.clients.get(&id).expect("unknown client id")
    }

    pub fn client_mut(&mut self, id: ClientId) -> &mut Client {
        self.clients.get_mut(&id).expect("unknown client id")
    }

    pub fn try_client(&self, id: ClientId) -> Option<&Client> {
        self.clients.get(&id)
    }

    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }

    pub fn client_for_window(&self, win: u32) -> Option<ClientId> {
        self.clients.values().find(|c| c.win == win).map(|c| c.id)
    }

    /// The full `_NET_CLIENT_LIST` payload: every monitor's `clients` list, in monitor order,
    /// each in arrange order (§3 invariant 6).
    pub fn client_list_order(&self) -> Vec<u32> {
        self.monitor_order
            .iter()
            .flat_map(|m| self.monitors[m].clients.iter())
            .map(|&id| self.clients[&id].win)
            .collect()
    }
}
