//! User actions reached from key/button bindings (§4.5).

use crate::client::ClientId;
use crate::monitor::MonitorId;
use crate::state::WmState;
use crate::x::XConn;

/// `view(tagmask)`: no-op if already selected; else flip the tag bank, assign a nonzero mask,
/// refocus, rearrange.
pub fn view(state: &mut WmState, conn: &mut dyn XConn, tagmask: u32) {
    let selmon = state.selected_monitor();
    let mask = tagmask & state.config.tagmask();
    if mask == state.monitor(selmon).seltag_mask() {
        return;
    }
    let m = state.monitor_mut(selmon);
    m.seltags ^= 1;
    if mask != 0 {
        m.tagset[m.seltags] = mask;
    }
    crate::focus::focus(state, conn, None);
    crate::focus::arrange(state, conn, selmon);
}

/// `toggleview(mask)`: XOR into the current tag bank; reject if it would empty.
pub fn toggleview(state: &mut WmState, conn: &mut dyn XConn, mask: u32) {
    let selmon = state.selected_monitor();
    let mask = mask & state.config.tagmask();
    let newtagset = state.monitor(selmon).seltag_mask() ^ mask;
    if newtagset == 0 {
        return;
    }
    let seltags = state.monitor(selmon).seltags;
    state.monitor_mut(selmon).tagset[seltags] = newtagset;
    crate::focus::focus(state, conn, None);
    crate::focus::arrange(state, conn, selmon);
}

/// `tag(mask)`: assign `sel.tags`; refocus; rearrange.
pub fn tag(state: &mut WmState, conn: &mut dyn XConn, mask: u32) {
    let selmon = state.selected_monitor();
    let mask = mask & state.config.tagmask();
    let Some(sel) = state.monitor(selmon).sel else {
        return;
    };
    if mask == 0 {
        return;
    }
    state.client_mut(sel).tags = mask;
    crate::focus::focus(state, conn, None);
    crate::focus::arrange(state, conn, selmon);
}

/// `toggletag(mask)`: XOR `sel`'s tags; reject empty.
pub fn toggletag(state: &mut WmState, conn: &mut dyn XConn, mask: u32) {
    let selmon = state.selected_monitor();
    let mask = mask & state.config.tagmask();
    let Some(sel) = state.monitor(selmon).sel else {
        return;
    };
    let newtags = state.client(sel).tags ^ mask;
    if newtags == 0 {
        return;
    }
    state.client_mut(sel).tags = newtags;
    crate::focus::focus(state, conn, None);
    crate::focus::arrange(state, conn, selmon);
}

/// `focusmon(delta)`: switch `selmon` to the adjacent monitor; `focus(None)`.
pub fn focusmon(state: &mut WmState, conn: &mut dyn XConn, delta: i32) {
    if state.monitor_ids().len() < 2 {
        return;
    }
    let selmon = state.selected_monitor();
    let target = state.adjacent_monitor(selmon, delta);
    if target == selmon {
        return;
    }
    if let Some(sel) = state.monitor(selmon).sel {
        crate::focus::unfocus(state, conn, sel, false);
    }
    state.selmon = Some(target);
    crate::focus::focus(state, conn, None);
}

/// `focusstack(delta)`: delegates to [`crate::focus::focusstack`].
pub fn focusstack(state: &mut WmState, conn: &mut dyn XConn, delta: i32) {
    crate::focus::focusstack(state, conn, delta);
}

/// `incnmaster(delta)`: floor at 0; rearrange.
pub fn incnmaster(state: &mut WmState, conn: &mut dyn XConn, delta: i32) {
    let selmon = state.selected_monitor();
    let m = state.monitor_mut(selmon);
    m.nmaster = (m.nmaster as i32 + delta).max(0) as u32;
    crate::focus::arrange(state, conn, selmon);
}

/// `setmfact(delta)`: relative if `< 1.0`, absolute (`delta - 1.0`) otherwise; reject outside
/// `[0.05, 0.95]`.
pub fn setmfact(state: &mut WmState, conn: &mut dyn XConn, delta: f64) {
    let selmon = state.selected_monitor();
    if state.monitor(selmon).lt[state.monitor(selmon).sellt].arrange.is_none() {
        return;
    }
    let f = if delta < 1.0 {
        delta + state.monitor(selmon).mfact
    } else {
        delta - 1.0
    };
    if !(0.05..=0.95).contains(&f) {
        return;
    }
    state.monitor_mut(selmon).mfact = f;
    crate::focus::arrange(state, conn, selmon);
}

/// `setlayout(layout)`: `None` or re-selecting the current layout swaps `sellt` (resurrecting
/// the previous layout); otherwise install `layout` as the current one. Syncs `ltsymbol`.
pub fn setlayout(state: &mut WmState, conn: &mut dyn XConn, layout: Option<crate::config::Layout>) {
    let selmon = state.selected_monitor();
    let sellt = state.monitor(selmon).sellt;
    let is_current = layout
        .as_ref()
        .map(|l| l.symbol == state.monitor(selmon).lt[sellt].symbol)
        .unwrap_or(false);

    if layout.is_none() || is_current {
        state.monitor_mut(selmon).sellt ^= 1;
    }
    if let Some(l) = layout {
        let sellt = state.monitor(selmon).sellt;
        state.monitor_mut(selmon).lt[sellt] = l;
    }
    let sellt = state.monitor(selmon).sellt;
    state.monitor_mut(selmon).ltsymbol = state.monitor(selmon).lt[sellt].symbol.to_string();

    if state.monitor(selmon).sel.is_some() {
        crate::focus::arrange(state, conn, selmon);
    }
}

/// `zoom`: promote `sel` to the head of the arrange list. No-op if the layout is floating, sel
/// is absent/floating, or sel is already head (in which case promote the next tiled client).
pub fn zoom(state: &mut WmState, conn: &mut dyn XConn) {
    let selmon = state.selected_monitor();
    if state.monitor(selmon).lt[state.monitor(selmon).sellt].arrange.is_none() {
        return;
    }
    let Some(mut c) = state.monitor(selmon).sel else {
        return;
    };
    if state.client(c).isfloating {
        return;
    }

    let head_tiled = crate::layout::tiled_clients(state, selmon).first().copied();
    if head_tiled == Some(c) {
        let tiled = crate::layout::tiled_clients(state, selmon);
        match tiled.get(1) {
            Some(&next) => c = next,
            None => return,
        }
    }

    crate::focus::pop(state, conn, c);
}

/// `togglefloating`: flips `isfloating`, forcing floating for fixed clients; ignored for
/// fullscreen clients.
pub fn togglefloating(state: &mut WmState, conn: &mut dyn XConn) {
    let selmon = state.selected_monitor();
    let Some(sel) = state.monitor(selmon).sel else {
        return;
    };
    if state.client(sel).isfullscreen {
        return;
    }
    let c = state.client_mut(sel);
    c.isfloating = !c.isfloating || c.isfixed;
    if state.client(sel).isfloating {
        let geom = state.client(sel).geom;
        crate::layout::resize(state, conn, sel, geom, false);
    }
    crate::focus::arrange(state, conn, selmon);
}

/// `togglebar`: flip visibility, recompute the work area, move the bar window, rearrange.
pub fn togglebar(state: &mut WmState, conn: &mut dyn XConn) {
    let selmon = state.selected_monitor();
    {
        let m = state.monitor_mut(selmon);
        m.showbar = !m.showbar;
    }
    crate::bootstrap::update_bar_position(state, selmon);
    let (win, x, y, w) = {
        let m = state.monitor(selmon);
        (m.barwin, m.wx, m.by, m.ww)
    };
    let bh = state.bh;
    let _ = conn.configure_window(win, crate::geometry::Rect::new(x, y, w, bh), 0);
    crate::focus::arrange(state, conn, selmon);
}

/// `killclient`: try `WM_DELETE_WINDOW` first, then `XKillClient` under a server grab.
pub fn killclient(state: &mut WmState, conn: &mut dyn XConn) {
    let selmon = state.selected_monitor();
    let Some(sel) = state.monitor(selmon).sel else {
        return;
    };
    let win = state.client(sel).win;
    let delete_atom = state.atoms.get(&crate::atom::Atom::WmDeleteWindow).copied();
    let supports_delete = delete_atom
        .map(|atom| conn.supports_protocol(win, atom).unwrap_or(false))
        .unwrap_or(false);

    if supports_delete {
        let _ = conn.send_delete(win);
    } else {
        let _ = conn.grab_server();
        let _ = conn.kill_window(win);
        let _ = conn.sync();
        let _ = conn.ungrab_server();
    }
}

/// `sendmon(c, m')`: move `c` across monitors, reassigning its tags to the destination
/// monitor's current tagset.
pub fn sendmon(state: &mut WmState, conn: &mut dyn XConn, c: ClientId, m: MonitorId) {
    let old_mon = state.client(c).mon;
    if old_mon == m {
        return;
    }
    crate::focus::unfocus(state, conn, c, true);
    state.monitor_mut(old_mon).detach(c);
    let clients = state_clients(state);
    state.monitor_mut(old_mon).detachstack(c, &clients);

    state.client_mut(c).mon = m;
    state.client_mut(c).tags = state.monitor(m).seltag_mask();

    state.monitor_mut(m).attach(c);
    state.monitor_mut(m).attachstack(c);

    crate::focus::focus(state, conn, None);
    crate::focus::arrange_all(state, conn);
}

fn state_clients(state: &WmState) -> Vec<crate::client::Client> {
    state.clients().cloned().collect()
}

/// `tagmon(delta)`: move `sel` to the adjacent monitor.
pub fn tagmon(state: &mut WmState, conn: &mut dyn XConn, delta: i32) {
    let selmon = state.selected_monitor();
    if state.monitor_ids().len() < 2 {
        return;
    }
    let Some(sel) = state.monitor(selmon).sel else {
        return;
    };
    let target = state.adjacent_monitor(selmon, delta);
    sendmon(state, conn, sel, target);
}

/// `quit`: clear the running flag.
pub fn quit(state: &mut WmState) {
    state.running = false;
}

/// `setfullscreen(c, fullscreen)`: see §9 — disabling writes a zero-length `_NET_WM_STATE`
/// payload to clear the atom, which is preserved verbatim rather than "fixed".
pub fn setfullscreen(state: &mut WmState, conn: &mut dyn XConn, c: ClientId, fullscreen: bool) {
    let isfullscreen = state.client(c).isfullscreen;
    let win = state.client(c).win;

    if fullscreen && !isfullscreen {
        if let Some(&atom) = state.atoms.get(&crate::atom::Atom::NetWmFullscreen) {
            let _ = conn.set_net_wm_state(win, &[atom]);
        }
        let mon = state.client(c).mon;
        let (mx, my, mw, mh) = {
            let m = state.monitor(mon);
            (m.mx, m.my, m.mw, m.mh)
        };
        let c_ref = state.client_mut(c);
        c_ref.isfullscreen = true;
        c_ref.oldstate = c_ref.isfloating;
        c_ref.old_bw = c_ref.bw;
        c_ref.bw = 0;
        c_ref.isfloating = true;
        crate::layout::resize_client(state, conn, c, crate::geometry::Rect::new(mx, my, mw, mh));
        let win = state.client(c).win;
        let _ = conn.raise_window(win);
    } else if !fullscreen && isfullscreen {
        let _ = conn.set_net_wm_state(win, &[]);
        let c_ref = state.client_mut(c);
        c_ref.isfullscreen = false;
        c_ref.isfloating = c_ref.oldstate;
        c_ref.bw = c_ref.old_bw;
        let restored = c_ref.old_geom;
        crate::layout::resize_client(state, conn, c, restored);
        let mon = state.client(c).mon;
        crate::focus::arrange(state, conn, mon);
    }
}

/// `spawn(argv)`: fork/exec under the platform process layer (§10.2/§10.6).
///
/// `argv[0]`'s monitor-number slot is patched in by the caller before reaching here when the
/// invoked command is the configured launcher (`dmenucmd`), per §4.5.
pub fn spawn(argv: &[String]) -> crate::error::Result<()> {
    crate::bootstrap::spawn_detached(argv)
}

/// `movemouse`: interactive pointer-driven move, pumped as a nested loop inside the action
/// itself rather than the main loop (§4.7). No-op for fullscreen clients.
pub fn movemouse(state: &mut WmState, conn: &mut dyn XConn) {
    let selmon = state.selected_monitor();
    let Some(sel) = state.monitor(selmon).sel else {
        return;
    };
    if state.client(sel).isfullscreen {
        return;
    }
    crate::focus::restack(state, conn, selmon);

    let geom = state.client(sel).geom;
    let (ocx, ocy) = (geom.x, geom.y);

    if !conn.grab_pointer(state.cursor_move).unwrap_or(false) {
        return;
    }
    let Ok((x, y)) = conn.cursor_position() else {
        let _ = conn.ungrab_pointer();
        return;
    };

    let mut last_time = 0u32;
    loop {
        let Ok(ev) = conn.next_event() else { break };
        match ev {
            crate::x::XEvent::ButtonRelease => break,
            crate::x::XEvent::MotionNotify { x_root, y_root, time, .. } => {
                if time.wrapping_sub(last_time) <= 1000 / 60 {
                    continue;
                }
                last_time = time;

                let snap = state.config.snap as i32;
                let m = state.monitor(selmon);
                let (mwx, mwy, mww, mwh) = (m.wx, m.wy, m.ww as i32, m.wh as i32);

                let mut nx = ocx + (x_root - x);
                let mut ny = ocy + (y_root - y);
                if (mwx - nx).abs() < snap {
                    nx = mwx;
                } else if ((mwx + mww) - (nx + geom.w as i32)).abs() < snap {
                    nx = mwx + mww - geom.w as i32;
                }
                if (mwy - ny).abs() < snap {
                    ny = mwy;
                } else if ((mwy + mwh) - (ny + geom.h as i32)).abs() < snap {
                    ny = mwy + mwh - geom.h as i32;
                }

                let arrange_exists = state.monitor(selmon).lt[state.monitor(selmon).sellt].arrange.is_some();
                let cur = state.client(sel).geom;
                if !state.client(sel).isfloating && arrange_exists && ((nx - cur.x).abs() > snap || (ny - cur.y).abs() > snap) {
                    togglefloating(state, conn);
                }
                if !arrange_exists || state.client(sel).isfloating {
                    let (w, h) = (cur.w, cur.h);
                    crate::layout::resize(state, conn, sel, crate::geometry::Rect::new(nx, ny, w, h), true);
                }
            }
            other => crate::x::event::dispatch(state, conn, other),
        }
    }
    let _ = conn.ungrab_pointer();

    let target = monitor_at_rect(state, state.client(sel).geom);
    if target != selmon {
        sendmon(state, conn, sel, target);
        state.selmon = Some(target);
        crate::focus::focus(state, conn, None);
    }
}

/// `resizemouse`: interactive pointer-driven resize from the bottom-right corner (§4.7).
/// No-op for fullscreen clients.
pub fn resizemouse(state: &mut WmState, conn: &mut dyn XConn) {
    let selmon = state.selected_monitor();
    let Some(sel) = state.monitor(selmon).sel else {
        return;
    };
    if state.client(sel).isfullscreen {
        return;
    }
    crate::focus::restack(state, conn, selmon);

    let geom = state.client(sel).geom;
    let bw = state.client(sel).bw;
    let (ocx, ocy) = (geom.x, geom.y);
    let win = state.client(sel).win;

    if !conn.grab_pointer(state.cursor_resize).unwrap_or(false) {
        return;
    }
    let _ = conn.warp_pointer(win, (geom.w + bw) as i32 - 1, (geom.h + bw) as i32 - 1);

    let mut last_time = 0u32;
    loop {
        let Ok(ev) = conn.next_event() else { break };
        match ev {
            crate::x::XEvent::ButtonRelease => break,
            crate::x::XEvent::MotionNotify { x_root, y_root, time, .. } => {
                if time.wrapping_sub(last_time) <= 1000 / 60 {
                    continue;
                }
                last_time = time;

                let nw = (x_root - ocx - 2 * bw as i32 + 1).max(1) as u32;
                let nh = (y_root - ocy - 2 * bw as i32 + 1).max(1) as u32;

                let snap = state.config.snap as i32;
                let m = state.monitor(selmon);
                let (mww, mwh) = (m.ww, m.wh);

                let arrange_exists = state.monitor(selmon).lt[state.monitor(selmon).sellt].arrange.is_some();
                let cur = state.client(sel).geom;
                if nw <= mww
                    && nh <= mwh
                    && !state.client(sel).isfloating
                    && arrange_exists
                    && ((nw as i32 - cur.w as i32).abs() > snap || (nh as i32 - cur.h as i32).abs() > snap)
                {
                    togglefloating(state, conn);
                }
                if !arrange_exists || state.client(sel).isfloating {
                    let (x, y) = (cur.x, cur.y);
                    crate::layout::resize(state, conn, sel, crate::geometry::Rect::new(x, y, nw, nh), true);
                }
            }
            other => crate::x::event::dispatch(state, conn, other),
        }
    }

    let geom = state.client(sel).geom;
    let bw = state.client(sel).bw;
    let win = state.client(sel).win;
    let _ = conn.warp_pointer(win, (geom.w + bw) as i32 - 1, (geom.h + bw) as i32 - 1);
    let _ = conn.ungrab_pointer();
    let _ = conn.drain_enter_notify();

    let target = monitor_at_rect(state, geom);
    if target != selmon {
        sendmon(state, conn, sel, target);
        state.selmon = Some(target);
        crate::focus::focus(state, conn, None);
    }
}

/// `recttomon`: the monitor whose rectangle best overlaps `geom`, falling back to the currently
/// selected monitor if `geom`'s center lies over no monitor at all (off-screen).
fn monitor_at_rect(state: &WmState, geom: crate::geometry::Rect) -> MonitorId {
    let rects: Vec<(MonitorId, crate::geometry::Rect)> = state
        .monitor_ids()
        .iter()
        .map(|&id| (id, crate::geometry::Rect::new(state.monitor(id).mx, state.monitor(id).my, state.monitor(id).mw, state.monitor(id).mh)))
        .collect();
    let indexed = rects.iter().enumerate().map(|(i, (_, r))| (i, r));
    match crate::geometry::best_overlap(&geom, indexed) {
        Some(i) => rects[i].0,
        None => state.selected_monitor(),
    }
}
