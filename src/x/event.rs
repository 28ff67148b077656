//! The X event types the dispatcher routes (§4.1, §4.6).

/// One event pulled from the X server's event queue.
///
/// This is the full set consumed by the dispatcher; anything else reported by the connection is
/// mapped to [`XEvent::Ignored`] and dropped at the table lookup (§4.1 "unhandled codes map to
/// 'ignore'").
#[derive(Debug, Clone, PartialEq)]
pub enum XEvent {
    /// Mouse button pressed, on the bar, a client, or the root window.
    ButtonPress {
        window: u32,
        x: i32,
        y: i32,
        button: u8,
        state: u16,
    },
    /// Mouse button released, observed while pumping an interactive grab loop (§4.7).
    ButtonRelease,
    /// A `WM_PROTOCOLS`-style or EWMH client message.
    ClientMessage {
        window: u32,
        message_type: u32,
        data: [u32; 5],
    },
    /// The root window's geometry changed (a randr screen-change notification, in practice).
    ConfigureNotifyRoot { width: u32, height: u32 },
    /// A managed or unmanaged client asked to be reconfigured.
    ConfigureRequest {
        window: u32,
        x: Option<i32>,
        y: Option<i32>,
        width: Option<u32>,
        height: Option<u32>,
    },
    /// A window was destroyed.
    DestroyNotify { window: u32 },
    /// The pointer entered a window.
    EnterNotify {
        window: u32,
        x_root: i32,
        y_root: i32,
        mode_normal: bool,
        detail_inferior: bool,
    },
    /// A window's damaged region needs redrawing.
    Expose { window: u32, count: u32 },
    /// A window (possibly not ours) received input focus.
    FocusIn { window: u32 },
    /// A key was pressed.
    KeyPress { keysym: String, state: u16 },
    /// The keyboard mapping changed.
    MappingNotify,
    /// A window asked to be mapped.
    MapRequest { window: u32 },
    /// The pointer moved.
    MotionNotify {
        window: u32,
        x_root: i32,
        y_root: i32,
        time: u32,
    },
    /// A window property changed.
    PropertyNotify {
        window: u32,
        atom: u32,
        deleted: bool,
    },
    /// A window was unmapped; `synthetic` distinguishes a client-sent `SendEvent` (ignored) from
    /// a real unmap (triggers `unmanage`, §4.6).
    UnmapNotify { window: u32, synthetic: bool },
    /// Anything not in the table above.
    Ignored,
}

// ---------------------------------------------------------------------------------------------
// Handlers (§4.6). `dispatch` is the dispatcher's single table-lookup entry point; everything
// else here is the per-event-kind logic it routes to.
// ---------------------------------------------------------------------------------------------

use crate::atom::Atom;
use crate::client::ClientId;
use crate::error::Result;
use crate::geometry::Rect;
use crate::state::WmState;
use crate::x::XConn;

/// Route one event to its handler. Event kinds the table doesn't recognise are no-ops — the
/// constant-time "ignore" entry (§4.1).
pub fn dispatch(state: &mut WmState, conn: &mut dyn XConn, ev: XEvent) {
    match ev {
        XEvent::ButtonPress { window, x, y, button, state: mods } => {
            button_press(state, conn, window, x, y, button, mods)
        }
        XEvent::ClientMessage { window, message_type, data } => client_message(state, conn, window, message_type, data),
        XEvent::ConfigureNotifyRoot { width, height } => configure_notify_root(state, conn, width, height),
        XEvent::ConfigureRequest { window, x, y, width, height } => {
            configure_request(state, conn, window, x, y, width, height)
        }
        XEvent::DestroyNotify { window } => destroy_notify(state, conn, window),
        XEvent::EnterNotify { window, mode_normal, detail_inferior, .. } => {
            enter_notify(state, conn, window, mode_normal, detail_inferior)
        }
        XEvent::Expose { window, count } => expose(state, conn, window, count),
        XEvent::FocusIn { window } => focus_in(state, conn, window),
        XEvent::KeyPress { keysym, state: mods } => key_press(state, conn, &keysym, mods),
        XEvent::MappingNotify => mapping_notify(state, conn),
        XEvent::MapRequest { window } => {
            let _ = manage(state, conn, window);
        }
        XEvent::MotionNotify { window, x_root, y_root, .. } => motion_notify(state, conn, window, x_root, y_root),
        XEvent::PropertyNotify { window, atom, deleted } => property_notify(state, conn, window, atom, deleted),
        XEvent::UnmapNotify { window, synthetic } => {
            if !synthetic {
                if let Some(c) = state.client_for_window(window) {
                    unmanage(state, conn, c, false);
                }
            }
        }
        XEvent::ButtonRelease | XEvent::Ignored => {}
    }
}

/// `manage`: allocate a client, read its geometry/hints/title/type, apply the rule table, clamp
/// into its monitor's work area, grab input, attach to both lists, focus it.
pub fn manage(state: &mut WmState, conn: &mut dyn XConn, win: u32) -> Result<()> {
    if conn.is_override_redirect(win)? {
        return Ok(());
    }
    if state.client_for_window(win).is_some() {
        return Ok(());
    }

    let (geom, old_bw) = conn.get_geometry(win)?;
    let transient_for = conn.get_transient_for(win)?;
    let transient_client = transient_for.and_then(|w| state.client_for_window(w));

    let mon = match transient_client {
        Some(t) => state.client(t).mon,
        None => state.selected_monitor(),
    };

    let bw = state.config.borderpx;
    let id = state.create_client(win, mon, geom, bw);
    state.client_mut(id).old_geom = geom;
    state.client_mut(id).old_bw = old_bw;
    state.client_mut(id).name = conn.get_title(win).unwrap_or_else(|_| "broken".into());

    if let Some(t) = transient_client {
        state.client_mut(id).tags = state.client(t).tags;
    } else {
        apply_rules(state, conn, id, win)?;
    }

    clamp_into_work_area(state, id);

    let _ = conn.configure_window(win, state.client(id).geom, bw);
    let _ = conn.send_configure_notify(win, state.client(id).geom, bw);

    update_window_type(state, conn, id)?;
    if let Ok(nh) = conn.get_normal_hints(win) {
        state.client_mut(id).set_hints(nh.hints);
    }
    if let Ok(wh) = conn.get_wm_hints(win) {
        state.client_mut(id).neverfocus = !wh.accepts_input;
        state.client_mut(id).isurgent = wh.urgent;
    }

    let _ = conn.select_client_input(win);
    let _ = conn.grab_buttons(win, false);

    if !state.client(id).isfloating {
        let isfixed = state.client(id).isfixed;
        state.client_mut(id).isfloating = transient_for.is_some() || isfixed;
        state.client_mut(id).oldstate = state.client(id).isfloating;
    }
    if state.client(id).isfloating {
        let _ = conn.raise_window(win);
    }

    state.monitor_mut(mon).attach(id);
    state.monitor_mut(mon).attachstack(id);
    let _ = conn.append_client_list(win);

    // Compatibility nudge: park off-screen once before the first real placement.
    let nudge = Rect::new(-2 * (geom.w as i32 + 2 * bw as i32), geom.y, geom.w, geom.h);
    let _ = conn.configure_window(win, nudge, bw);

    let _ = conn.map_window(win);
    let _ = conn.set_wm_state_normal(win);

    crate::focus::arrange(state, conn, mon);
    let _ = conn.map_window(win);
    crate::focus::focus(state, conn, Some(id));

    Ok(())
}

fn apply_rules(state: &mut WmState, conn: &mut dyn XConn, id: ClientId, win: u32) -> Result<()> {
    let (class, instance) = conn.get_class(win).unwrap_or_default();
    let title = state.client(id).name.clone();

    state.client_mut(id).isfloating = false;
    state.client_mut(id).tags = 0;

    let mon = state.client(id).mon;
    for rule in state.config.rules.clone() {
        let title_match = rule.title.as_ref().map(|t| title.contains(t.as_str())).unwrap_or(true);
        let class_match = rule.class.as_ref().map(|c| class.contains(c.as_str())).unwrap_or(true);
        let inst_match = rule.instance.as_ref().map(|i| instance.contains(i.as_str())).unwrap_or(true);
        if title_match && class_match && inst_match {
            state.client_mut(id).isfloating = rule.isfloating;
            state.client_mut(id).tags |= rule.tags;
            if let Some(num) = rule.monitor {
                let target = state.monitors().find(|m| m.num == num).map(|m| m.id);
                if let Some(m) = target {
                    state.client_mut(id).mon = m;
                }
            }
        }
    }

    let tagmask = state.config.tagmask();
    let resolved_mon = state.client(id).mon;
    let tags = state.client(id).tags & tagmask;
    state.client_mut(id).tags = if tags != 0 { tags } else { state.monitor(resolved_mon).seltag_mask() };
    let _ = mon;
    Ok(())
}

fn clamp_into_work_area(state: &mut WmState, id: ClientId) {
    let mon = state.client(id).mon;
    let (wx, wy, ww, wh) = {
        let m = state.monitor(mon);
        (m.wx, m.wy, m.ww as i32, m.wh as i32)
    };
    let bw = state.client(id).bw as i32;
    let c = state.client_mut(id);
    let width = c.geom.w as i32 + 2 * bw;
    let height = c.geom.h as i32 + 2 * bw;
    if c.geom.x + width > wx + ww {
        c.geom.x = wx + ww - width;
    }
    if c.geom.y + height > wy + wh {
        c.geom.y = wy + wh - height;
    }
    c.geom.x = c.geom.x.max(wx);
    c.geom.y = c.geom.y.max(wy);
}

fn update_window_type(state: &mut WmState, conn: &mut dyn XConn, id: ClientId) -> Result<()> {
    let win = state.client(id).win;
    let wmstate = conn.get_net_wm_state(win)?;
    let fullscreen = state.atoms.get(&Atom::NetWmFullscreen).copied();
    if fullscreen.map(|f| wmstate.contains(&f)).unwrap_or(false) {
        crate::actions::setfullscreen(state, conn, id, true);
    }

    let types = conn.get_window_type(win)?;
    let dialog = state.atoms.get(&Atom::NetWmWindowTypeDialog).copied();
    if dialog.map(|d| types.contains(&d)).unwrap_or(false) {
        state.client_mut(id).isfloating = true;
    }
    Ok(())
}

/// `unmanage`: detach from both lists, restore the border width (unless the window was already
/// destroyed), free the client, refocus, refresh `_NET_CLIENT_LIST`, rearrange.
pub fn unmanage(state: &mut WmState, conn: &mut dyn XConn, id: ClientId, destroyed: bool) {
    let mon = state.client(id).mon;
    state.monitor_mut(mon).detach(id);
    let clients: Vec<crate::client::Client> = state.clients().cloned().collect();
    state.monitor_mut(mon).detachstack(id, &clients);

    if !destroyed {
        let win = state.client(id).win;
        let old_bw = state.client(id).old_bw;
        let _ = conn.grab_server();
        let _ = conn.configure_window(win, state.client(id).geom, old_bw);
        let _ = conn.ungrab_server();
    }

    state.remove_client(id);
    crate::focus::focus(state, conn, None);
    let list = state.client_list_order();
    let _ = conn.set_client_list(&list);
    crate::focus::arrange(state, conn, mon);
}

fn button_press(state: &mut WmState, conn: &mut dyn XConn, window: u32, _x: i32, _y: i32, _button: u8, _mods: u16) {
    if let Some(c) = state.client_for_window(window) {
        crate::focus::focus(state, conn, Some(c));
        let mon = state.client(c).mon;
        crate::focus::restack(state, conn, mon);
    }
    // Button-table dispatch (zone classification, configured action lookup) lives in the
    // consumer's key/button loop, which owns `Config::buttons` and the concrete `Arg` values.
}

fn client_message(state: &mut WmState, conn: &mut dyn XConn, window: u32, message_type: u32, data: [u32; 5]) {
    let Some(c) = state.client_for_window(window) else {
        return;
    };
    if Some(message_type) == state.atoms.get(&Atom::NetWmState).copied() {
        let fullscreen_atom = state.atoms.get(&Atom::NetWmFullscreen).copied();
        if Some(data[1]) == fullscreen_atom || Some(data[2]) == fullscreen_atom {
            let want = data[0] == 1 || (data[0] == 2 && !state.client(c).isfullscreen);
            crate::actions::setfullscreen(state, conn, c, want);
        }
    } else if Some(message_type) == state.atoms.get(&Atom::NetActiveWindow).copied() {
        let selmon = state.selected_monitor();
        if Some(c) != state.monitor(selmon).sel && !state.client(c).isurgent {
            crate::focus::set_urgent(state, conn, c, true);
        }
    }
}

fn configure_notify_root(state: &mut WmState, conn: &mut dyn XConn, width: u32, height: u32) {
    if (state.sw, state.sh) == (width, height) {
        return;
    }
    state.sw = width;
    state.sh = height;
    let _ = crate::bootstrap::update_geom(state, conn);
    let _ = crate::bootstrap::update_bars(state, conn);
    crate::focus::focus(state, conn, None);
    crate::focus::arrange_all(state, conn);
}

fn configure_request(
    state: &mut WmState,
    conn: &mut dyn XConn,
    window: u32,
    x: Option<i32>,
    y: Option<i32>,
    width: Option<u32>,
    height: Option<u32>,
) {
    let Some(c) = state.client_for_window(window) else {
        // Unmanaged: forward verbatim.
        let geom = Rect::new(x.unwrap_or(0), y.unwrap_or(0), width.unwrap_or(1), height.unwrap_or(1));
        let _ = conn.configure_window(window, geom, 0);
        return;
    };

    let mon = state.client(c).mon;
    let floating_layout = state.monitor(mon).lt[state.monitor(mon).sellt].arrange.is_none();
    if state.client(c).isfloating || floating_layout {
        let (mx, my, mw, mh) = {
            let m = state.monitor(mon);
            (m.mx, m.my, m.mw as i32, m.mh as i32)
        };
        let mut geom = state.client(c).geom;
        if let Some(x) = x {
            geom.x = mx + x;
        }
        if let Some(y) = y {
            geom.y = my + y;
        }
        if let Some(w) = width {
            geom.w = w;
        }
        if let Some(h) = height {
            geom.h = h;
        }
        let bw = state.client(c).bw as i32;
        if state.client(c).isfloating && geom.x + geom.w as i32 > mx + mw {
            geom.x = mx + (mw / 2 - (geom.w as i32 + 2 * bw) / 2);
        }
        if state.client(c).isfloating && geom.y + geom.h as i32 > my + mh {
            geom.y = my + (mh / 2 - (geom.h as i32 + 2 * bw) / 2);
        }

        state.client_mut(c).geom = geom;
        if (x.is_some() || y.is_some()) && width.is_none() && height.is_none() {
            let bw = state.client(c).bw;
            let _ = conn.send_configure_notify(window, geom, bw);
        }
        if state.monitor(mon).is_visible(state.client(c).tags) {
            let bw = state.client(c).bw;
            let _ = conn.configure_window(window, geom, bw);
        }
    } else {
        let geom = state.client(c).geom;
        let bw = state.client(c).bw;
        let _ = conn.send_configure_notify(window, geom, bw);
    }
}

fn destroy_notify(state: &mut WmState, conn: &mut dyn XConn, window: u32) {
    if let Some(c) = state.client_for_window(window) {
        unmanage(state, conn, c, true);
    }
}

fn enter_notify(state: &mut WmState, conn: &mut dyn XConn, window: u32, mode_normal: bool, detail_inferior: bool) {
    if (!mode_normal || detail_inferior) && window != state.root {
        return;
    }
    let c = state.client_for_window(window);
    let mon = c.map(|c| state.client(c).mon).unwrap_or_else(|| state.selected_monitor());

    let selmon = state.selected_monitor();
    if mon != selmon {
        if let Some(sel) = state.monitor(selmon).sel {
            crate::focus::unfocus(state, conn, sel, true);
        }
        state.selmon = Some(mon);
    } else if c.is_none() || c == state.monitor(selmon).sel {
        return;
    }
    crate::focus::focus(state, conn, c);
}

fn expose(state: &mut WmState, conn: &mut dyn XConn, window: u32, count: u32) {
    if count != 0 {
        return;
    }
    let _ = (state, conn, window);
    // Bar repaint is centralized into one `bar::refresh_all` call per main-loop
    // iteration rather than fired per expose; count==0 just means "last expose
    // in the batch", which no longer needs a handler of its own.
}

fn focus_in(state: &mut WmState, conn: &mut dyn XConn, window: u32) {
    let selmon = state.selected_monitor();
    if let Some(sel) = state.monitor(selmon).sel {
        if state.client(sel).win != window {
            crate::focus::set_urgent(state, conn, sel, state.client(sel).isurgent);
            let win = state.client(sel).win;
            let _ = conn.set_input_focus(Some(win));
        }
    }
}

fn key_press(state: &mut WmState, conn: &mut dyn XConn, keysym: &str, mods: u16) {
    let cleaned = mods & !state.numlockmask & 0x1fff;
    let bindings = state.config.keys.clone();
    for kb in &bindings {
        if kb.keysym != keysym {
            continue;
        }
        let want: u16 = kb.modifiers.iter().copied().fold(0u16, |acc, m| acc | u16::from(m));
        if want != cleaned {
            continue;
        }
        crate::dispatch::run_action(state, conn, kb.action, kb.arg);
        return;
    }
}

fn mapping_notify(state: &mut WmState, conn: &mut dyn XConn) {
    let _ = conn.grab_keys();
    let _ = state;
}

fn motion_notify(state: &mut WmState, conn: &mut dyn XConn, window: u32, x_root: i32, y_root: i32) {
    if window != state.root {
        return;
    }
    let Some(target) = state
        .monitors()
        .find(|m| Rect::new(m.mx, m.my, m.mw, m.mh).contains_point(crate::geometry::Point::new(x_root, y_root)))
        .map(|m| m.id)
    else {
        return;
    };
    let selmon = state.selected_monitor();
    if target != selmon {
        if let Some(sel) = state.monitor(selmon).sel {
            crate::focus::unfocus(state, conn, sel, true);
        }
        state.selmon = Some(target);
        crate::focus::focus(state, conn, None);
    }
}

fn property_notify(state: &mut WmState, conn: &mut dyn XConn, window: u32, atom: u32, deleted: bool) {
    if window == state.root {
        if Some(atom) == state.atoms.get(&Atom::WmName).copied() {
            state.status = conn.root_name().ok();
        }
        return;
    }
    if deleted {
        return;
    }
    let Some(c) = state.client_for_window(window) else {
        return;
    };

    if Some(atom) == state.atoms.get(&Atom::WmTransientFor).copied() {
        if !state.client(c).isfloating {
            if let Ok(Some(t)) = conn.get_transient_for(window) {
                let is_managed = state.client_for_window(t).is_some();
                state.client_mut(c).isfloating = is_managed;
                if is_managed {
                    let mon = state.client(c).mon;
                    crate::focus::arrange(state, conn, mon);
                }
            }
        }
    } else if Some(atom) == state.atoms.get(&Atom::WmNormalHints).copied() {
        state.client_mut(c).hintsvalid = false;
    } else if Some(atom) == state.atoms.get(&Atom::WmHints).copied() {
        if let Ok(wh) = conn.get_wm_hints(window) {
            crate::focus::set_urgent(state, conn, c, wh.urgent);
            state.client_mut(c).neverfocus = !wh.accepts_input;
        }
    }

    if Some(atom) == state.atoms.get(&Atom::WmName).copied() || Some(atom) == state.atoms.get(&Atom::NetWmName).copied() {
        state.client_mut(c).name = conn.get_title(window).unwrap_or_else(|_| "broken".into());
        // Repainted by the next `bar::refresh_all` pass if this is the selected client.
    }

    if Some(atom) == state.atoms.get(&Atom::NetWmWindowType).copied() {
        let _ = update_window_type(state, conn, c);
    }
}
