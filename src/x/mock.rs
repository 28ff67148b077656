//! An in-memory [`XConn`] used by handler/layout tests (§8: "testable without a real X
//! server").
//!
//! Unlike the teacher's `MockXConn`, which is a thin trait forwarded onto by per-test structs,
//! every method here already has a working default: most tests only exercise one or two requests
//! and don't want to hand-implement forty unrelated ones to get there. Tests that care about a
//! specific request's effect push expectations into the public queues/maps before calling into
//! the core.

use std::collections::HashMap;

use crate::error::Result;
use crate::geometry::Rect;
use crate::x::event::XEvent;
use crate::x::property::{WmHints, WmNormalHints};
use crate::x::XConn;

/// A scripted, in-memory stand-in for a live X11 connection.
#[derive(Default)]
pub struct MockXConn {
    /// Events returned by `next_event`, in FIFO order.
    pub events: std::collections::VecDeque<XEvent>,
    /// Per-window geometry + border width, consulted by `get_geometry`.
    pub geometry: HashMap<u32, (Rect, u32)>,
    /// Per-window titles, consulted by `get_title`.
    pub titles: HashMap<u32, String>,
    /// Per-window `(class, instance)`, consulted by `get_class`.
    pub classes: HashMap<u32, (String, String)>,
    /// Per-window normal hints, consulted by `get_normal_hints`.
    pub normal_hints: HashMap<u32, WmNormalHints>,
    /// Per-window WM_HINTS, consulted by `get_wm_hints`.
    pub wm_hints: HashMap<u32, WmHints>,
    /// Per-window transient-for target, consulted by `get_transient_for`.
    pub transient_for: HashMap<u32, u32>,
    /// Per-window `_NET_WM_WINDOW_TYPE` atom list.
    pub window_types: HashMap<u32, Vec<u32>>,
    /// Per-window `_NET_WM_STATE` atom list.
    pub wm_state: HashMap<u32, Vec<u32>>,
    /// Windows considered override-redirect.
    pub override_redirect: std::collections::HashSet<u32>,
    /// Atom name -> id table, grown by `intern_atom`.
    pub atoms: HashMap<String, u32>,
    next_atom: u32,
    next_window: u32,
    /// Root window's `WM_NAME`, consulted by `root_name`.
    pub root_name: String,
    /// Windows returned by `query_tree`.
    pub tree: Vec<u32>,
    /// Calls recorded for assertions: request name plus a short description.
    pub calls: Vec<String>,
}

impl MockXConn {
    fn record(&mut self, call: impl Into<String>) {
        self.calls.push(call.into());
    }
}

impl XConn for MockXConn {
    fn root(&self) -> u32 {
        1
    }

    fn screen_size(&self) -> Result<(u32, u32)> {
        Ok((1920, 1080))
    }

    fn screen_rects(&self) -> Result<Vec<Rect>> {
        Ok(vec![Rect::new(0, 0, 1920, 1080)])
    }

    fn cursor_position(&self) -> Result<(i32, i32)> {
        Ok((0, 0))
    }

    fn window_at_point(&self, _x: i32, _y: i32) -> Result<Option<u32>> {
        Ok(None)
    }

    fn next_event(&mut self) -> Result<XEvent> {
        Ok(self.events.pop_front().unwrap_or(XEvent::Ignored))
    }

    fn drain_enter_notify(&mut self) -> Result<()> {
        self.events.retain(|e| !matches!(e, XEvent::EnterNotify { .. }));
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        Ok(())
    }

    fn intern_atom(&mut self, name: &str) -> Result<u32> {
        if let Some(&id) = self.atoms.get(name) {
            return Ok(id);
        }
        self.next_atom += 1;
        let id = self.next_atom;
        self.atoms.insert(name.to_string(), id);
        Ok(id)
    }

    fn atom_name(&self, atom: u32) -> Result<String> {
        Ok(self
            .atoms
            .iter()
            .find(|&(_, &id)| id == atom)
            .map(|(name, _)| name.clone())
            .unwrap_or_default())
    }

    fn configure_window(&mut self, win: u32, geom: Rect, bw: u32) -> Result<()> {
        self.geometry.insert(win, (geom, bw));
        self.record(format!("configure_window({win})"));
        Ok(())
    }

    fn send_configure_notify(&mut self, win: u32, _geom: Rect, _bw: u32) -> Result<()> {
        self.record(format!("send_configure_notify({win})"));
        Ok(())
    }

    fn raise_window(&mut self, win: u32) -> Result<()> {
        self.record(format!("raise_window({win})"));
        Ok(())
    }

    fn restack_windows(&mut self, order: &[u32], _sibling: Option<u32>) -> Result<()> {
        self.record(format!("restack_windows({order:?})"));
        Ok(())
    }

    fn map_window(&mut self, win: u32) -> Result<()> {
        self.record(format!("map_window({win})"));
        Ok(())
    }

    fn unmap_window(&mut self, win: u32) -> Result<()> {
        self.record(format!("unmap_window({win})"));
        Ok(())
    }

    fn kill_window(&mut self, win: u32) -> Result<()> {
        self.record(format!("kill_window({win})"));
        Ok(())
    }

    fn create_check_window(&mut self) -> Result<u32> {
        self.next_window += 1;
        Ok(100_000 + self.next_window)
    }

    fn create_bar_window(&mut self, geom: crate::geometry::Rect) -> Result<u32> {
        self.record(format!("create_bar_window({geom:?})"));
        self.next_window += 1;
        Ok(200_000 + self.next_window)
    }

    fn destroy_window(&mut self, win: u32) -> Result<()> {
        self.record(format!("destroy_window({win})"));
        Ok(())
    }

    fn set_input_focus(&mut self, win: Option<u32>) -> Result<()> {
        self.record(format!("set_input_focus({win:?})"));
        Ok(())
    }

    fn send_take_focus(&mut self, win: u32) -> Result<()> {
        self.record(format!("send_take_focus({win})"));
        Ok(())
    }

    fn send_delete(&mut self, win: u32) -> Result<()> {
        self.record(format!("send_delete({win})"));
        Ok(())
    }

    fn send_client_message(&mut self, win: u32, message_type: u32, _data: [u32; 5]) -> Result<()> {
        self.record(format!("send_client_message({win}, {message_type})"));
        Ok(())
    }

    fn set_border_color(&mut self, win: u32, pixel: u32) -> Result<()> {
        self.record(format!("set_border_color({win}, {pixel:#x})"));
        Ok(())
    }

    fn select_client_input(&mut self, _win: u32) -> Result<()> {
        Ok(())
    }

    fn grab_buttons(&mut self, _win: u32, _focused: bool) -> Result<()> {
        Ok(())
    }

    fn grab_keys(&mut self) -> Result<()> {
        Ok(())
    }

    fn warp_pointer(&mut self, _win: u32, _x: i32, _y: i32) -> Result<()> {
        Ok(())
    }

    fn grab_pointer(&mut self, _cursor: u32) -> Result<bool> {
        Ok(true)
    }

    fn ungrab_pointer(&mut self) -> Result<()> {
        Ok(())
    }

    fn get_geometry(&self, win: u32) -> Result<(Rect, u32)> {
        Ok(self.geometry.get(&win).copied().unwrap_or((Rect::new(0, 0, 1, 1), 0)))
    }

    fn get_title(&self, win: u32) -> Result<String> {
        Ok(self.titles.get(&win).cloned().unwrap_or_else(|| "broken".to_string()))
    }

    fn get_class(&self, win: u32) -> Result<(String, String)> {
        Ok(self.classes.get(&win).cloned().unwrap_or_default())
    }

    fn get_normal_hints(&self, win: u32) -> Result<WmNormalHints> {
        Ok(self.normal_hints.get(&win).cloned().unwrap_or_default())
    }

    fn get_wm_hints(&self, win: u32) -> Result<WmHints> {
        Ok(self.wm_hints.get(&win).cloned().unwrap_or_default())
    }

    fn get_transient_for(&self, win: u32) -> Result<Option<u32>> {
        Ok(self.transient_for.get(&win).copied())
    }

    fn get_window_type(&self, win: u32) -> Result<Vec<u32>> {
        Ok(self.window_types.get(&win).cloned().unwrap_or_default())
    }

    fn get_net_wm_state(&self, win: u32) -> Result<Vec<u32>> {
        Ok(self.wm_state.get(&win).cloned().unwrap_or_default())
    }

    fn supports_protocol(&self, _win: u32, _atom: u32) -> Result<bool> {
        Ok(false)
    }

    fn is_override_redirect(&self, win: u32) -> Result<bool> {
        Ok(self.override_redirect.contains(&win))
    }

    fn set_wm_state_normal(&mut self, _win: u32) -> Result<()> {
        Ok(())
    }

    fn append_client_list(&mut self, win: u32) -> Result<()> {
        self.tree.push(win);
        Ok(())
    }

    fn set_client_list(&mut self, wins: &[u32]) -> Result<()> {
        self.tree = wins.to_vec();
        Ok(())
    }

    fn set_active_window(&mut self, _win: Option<u32>) -> Result<()> {
        Ok(())
    }

    fn set_net_wm_state(&mut self, win: u32, atoms: &[u32]) -> Result<()> {
        self.wm_state.insert(win, atoms.to_vec());
        Ok(())
    }

    fn set_supported(&mut self, _atoms: &[u32]) -> Result<()> {
        Ok(())
    }

    fn set_supporting_wm_check(&mut self, _check_win: u32, _name: &str) -> Result<()> {
        Ok(())
    }

    fn root_name(&self) -> Result<String> {
        Ok(self.root_name.clone())
    }

    fn query_tree(&self) -> Result<Vec<u32>> {
        Ok(self.tree.clone())
    }

    fn grab_server(&mut self) -> Result<()> {
        Ok(())
    }

    fn ungrab_server(&mut self) -> Result<()> {
        Ok(())
    }

    fn become_wm(&mut self) -> Result<()> {
        Ok(())
    }

    fn numlock_mask(&self) -> u16 {
        0
    }
}
