//! Focus transfer, stacking, and show/hide traversal (§4.4).

use crate::client::ClientId;
use crate::monitor::MonitorId;
use crate::state::WmState;
use crate::x::XConn;

/// The first client in `mon`'s stack that is visible under its current tagset.
fn first_visible_in_stack(state: &WmState, mon: MonitorId) -> Option<ClientId> {
    state
        .monitor(mon)
        .stack
        .iter()
        .copied()
        .find(|&id| state.monitor(mon).is_visible(state.client(id).tags))
}

/// `focus(c)`: give `c` input focus, or fall back to the first visible client in the current
/// stack if `c` is `None` or invisible (§4.4 steps 1-5).
///
/// dwm's `focus()` also redraws every bar unconditionally on every call (step 5); this core
/// never does, since bar painting lives entirely behind the [`crate::bar::Drawer`] collaborator
/// and this module has no handle to one. The selection change here and the bar repaint it should
/// trigger are coupled only by convention: a consumer is expected to call
/// [`crate::bar::refresh_all`] once per main-loop iteration rather than from this function, and
/// no test in this crate exercises that coupling — it is only exercised by a consumer binary's
/// own event loop.
pub fn focus(state: &mut WmState, conn: &mut dyn XConn, c: Option<ClientId>) {
    let selmon = state.selected_monitor();

    let c = match c {
        Some(id) if state.monitor(selmon).is_visible(state.client(id).tags) => Some(id),
        _ => first_visible_in_stack(state, selmon),
    };

    let prev_sel = state.monitor(selmon).sel;
    if let Some(prev) = prev_sel {
        if Some(prev) != c {
            unfocus(state, conn, prev, false);
        }
    }

    match c {
        Some(id) => {
            let mon = state.client(id).mon;
            if mon != state.selected_monitor() {
                state.selmon = Some(mon);
            }
            let selmon = state.selected_monitor();

            if state.client(id).isurgent {
                set_urgent(state, conn, id, false);
            }
            state.monitor_mut(selmon).stack.retain(|&x| x != id);
            state.monitor_mut(selmon).stack.insert(0, id);

            let _ = conn.grab_buttons(state.client(id).win, true);
            let sel_border = state.config.colors[crate::config::Scheme::Sel as usize].border.clone();
            let _ = set_border_color(conn, state.client(id).win, &sel_border);
            set_focus(state, conn, id);
            state.monitor_mut(selmon).sel = Some(id);
        }
        None => {
            let _ = conn.set_input_focus(None);
            let _ = conn.set_active_window(None);
            state.monitor_mut(selmon).sel = None;
        }
    }
}

/// Parse a `#rrggbb` string into a packed pixel value. Placeholder until the real X11 backend
/// resolves colors through its own color-allocation path; kept here purely so `focus`/`unfocus`
/// have something concrete to hand [`XConn::set_border_color`].
fn set_border_color(conn: &mut dyn XConn, win: u32, hex: &str) -> crate::error::Result<()> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    let pixel = u32::from_str_radix(hex, 16).unwrap_or(0);
    conn.set_border_color(win, pixel)
}

/// `unfocus(c, setfocus)`: repaint `c`'s border normal, regrab its buttons unfocused; if
/// `setfocus` also revert input focus to the root window.
pub fn unfocus(state: &mut WmState, conn: &mut dyn XConn, c: ClientId, setfocus: bool) {
    let win = state.client(c).win;
    let norm_border = state.config.colors[crate::config::Scheme::Norm as usize].border.clone();
    let _ = set_border_color(conn, win, &norm_border);
    let _ = conn.grab_buttons(win, false);
    if setfocus {
        let _ = conn.set_input_focus(None);
        let _ = conn.set_active_window(None);
    }
}

/// `setfocus(c)`: `XSetInputFocus` unless the client declared `neverfocus`, plus
/// `_NET_ACTIVE_WINDOW` and a `WM_TAKE_FOCUS` client message.
fn set_focus(state: &mut WmState, conn: &mut dyn XConn, c: ClientId) {
    let (win, neverfocus) = {
        let cl = state.client(c);
        (cl.win, cl.neverfocus)
    };
    if !neverfocus {
        let _ = conn.set_input_focus(Some(win));
        let _ = conn.set_active_window(Some(win));
    }
    let _ = conn.send_take_focus(win);
}

/// Clear (or set) the urgency flag, including the underlying WM_HINTS X property (§10.7
/// supplemented behavior: the in-memory flag and the property must not drift apart).
pub fn set_urgent(state: &mut WmState, _conn: &mut dyn XConn, c: ClientId, urgent: bool) {
    state.client_mut(c).isurgent = urgent;
    // A real backend additionally rewrites the WM_HINTS property's urgency bit here; the mock
    // backend in tests only tracks the in-memory flag.
}

/// `focusstack(dir)`: move `sel` to the next/previous visible client in arrange order.
///
/// The backward branch (`dir <= 0`) preserves a faithful quirk: the fallback loop that fires
/// when no visible predecessor is found continues from the index the first loop stopped at,
/// not from the start of the list, so it can only ever find clients after `sel` (§9 open
/// question — preserved, not corrected).
pub fn focusstack(state: &mut WmState, conn: &mut dyn XConn, dir: i32) {
    let selmon = state.selected_monitor();
    let sel = match state.monitor(selmon).sel {
        Some(s) => s,
        None => return,
    };
    if state.client(sel).isfullscreen && state.config.lockfullscreen {
        return;
    }

    let clients = state.monitor(selmon).clients.clone();
    let sel_idx = clients.iter().position(|&id| id == sel).unwrap_or(0);

    let target = if dir > 0 {
        let after = clients[sel_idx + 1..]
            .iter()
            .copied()
            .find(|&id| state.monitor(selmon).is_visible(state.client(id).tags));
        after.or_else(|| {
            clients
                .iter()
                .copied()
                .find(|&id| state.monitor(selmon).is_visible(state.client(id).tags))
        })
    } else {
        let mut found = None;
        let mut i = 0;
        while i < sel_idx {
            if state.monitor(selmon).is_visible(state.client(clients[i]).tags) {
                found = Some(clients[i]);
            }
            i += 1;
        }
        if found.is_none() {
            // Faithful fallback: continue scanning from `i` (== sel_idx), which never finds
            // anything before `sel` — only clients after it, if any.
            while i < clients.len() {
                if state.monitor(selmon).is_visible(state.client(clients[i]).tags) {
                    found = Some(clients[i]);
                }
                i += 1;
            }
        }
        found
    };

    if let Some(target) = target {
        focus(state, conn, Some(target));
        restack(state, conn, selmon);
    }
}

/// `restack(m)`: order the X stacking list — floating/no-arrange `sel` on top, then every
/// tiled visible client stacked below the bar, in stack order. Drains pending `EnterNotify`
/// afterward so the restack's own pointer-crossing events can't steal focus.
pub fn restack(state: &mut WmState, conn: &mut dyn XConn, mon: MonitorId) {
    let sel = state.monitor(mon).sel;
    let Some(sel_id) = sel else {
        return;
    };

    let floating_layout = state.monitor(mon).lt[state.monitor(mon).sellt].arrange.is_none();
    let sel_win = state.client(sel_id).win;
    if state.client(sel_id).isfloating || floating_layout {
        let _ = conn.raise_window(sel_win);
    }

    if !floating_layout {
        let barwin = state.monitor(mon).barwin;
        let order: Vec<u32> = state
            .monitor(mon)
            .stack
            .iter()
            .copied()
            .filter(|&id| {
                let c = state.client(id);
                !c.isfloating && state.monitor(mon).is_visible(c.tags)
            })
            .map(|id| state.client(id).win)
            .collect();
        let _ = conn.restack_windows(&order, Some(barwin));
    }

    let _ = conn.sync();
    let _ = conn.drain_enter_notify();
}

/// `showhide(stack)`: visible clients are moved to their stored geometry top-down; invisible
/// clients are parked off-screen bottom-up (§4.4). Traverses `mon`'s stack list in order.
pub fn showhide(state: &mut WmState, conn: &mut dyn XConn, mon: MonitorId) {
    let stack = state.monitor(mon).stack.clone();

    for &id in &stack {
        let c = state.client(id);
        if state.monitor(mon).is_visible(c.tags) {
            let win = c.win;
            let geom = c.geom;
            let _ = conn.configure_window(win, geom, c.bw);
            let floating_layout = state.monitor(mon).lt[state.monitor(mon).sellt].arrange.is_none();
            if (floating_layout || c.isfloating) && !c.isfullscreen {
                crate::layout::resize(state, conn, id, geom, false);
            }
        }
    }

    for &id in stack.iter().rev() {
        let c = state.client(id);
        if !state.monitor(mon).is_visible(c.tags) {
            let win = c.win;
            let parked_x = -2 * (c.geom.w as i32 + 2 * c.bw as i32);
            let y = c.geom.y;
            let geom = crate::geometry::Rect::new(parked_x, y, c.geom.w, c.geom.h);
            let _ = conn.configure_window(win, geom, c.bw);
        }
    }
}

/// `arrange(m)`: `showhide` then run the current layout then `restack`. `arrange_all` applies
/// this to every monitor but (matching the reference design) never restacks more than the
/// current `selmon`.
pub fn arrange(state: &mut WmState, conn: &mut dyn XConn, mon: MonitorId) {
    showhide(state, conn, mon);
    let layout = state.monitor(mon).lt[state.monitor(mon).sellt].arrange;
    if let Some(arrange_fn) = layout {
        arrange_fn(state, conn, mon);
    }
    restack(state, conn, mon);
}

/// `arrange(null)`: apply to every monitor without restacking.
pub fn arrange_all(state: &mut WmState, conn: &mut dyn XConn) {
    let ids = state.monitor_ids().to_vec();
    for mon in &ids {
        showhide(state, conn, *mon);
    }
    for mon in ids {
        let layout = state.monitor(mon).lt[state.monitor(mon).sellt].arrange;
        if let Some(arrange_fn) = layout {
            arrange_fn(state, conn, mon);
        }
    }
}

/// `pop(c)`: promote `c` to the head of the arrange list, focus it, and rearrange its monitor.
pub fn pop(state: &mut WmState, conn: &mut dyn XConn, c: ClientId) {
    let mon = state.client(c).mon;
    state.monitor_mut(mon).detach(c);
    state.monitor_mut(mon).attach(c);
    focus(state, conn, Some(c));
    arrange(state, conn, mon);
}
