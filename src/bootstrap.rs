//! Startup, geometry rescan, and teardown (§4, "Bootstrap & teardown"; §10.6 process lifecycle).

use std::ffi::CString;

use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag};
use nix::unistd::Pid;
use tracing::{info, warn};

use crate::atom::Atom;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::monitor::MonitorId;
use crate::state::WmState;
use crate::x::XConn;

/// `updatebarpos(m)`: recompute the work area from the monitor's screen rectangle and bar
/// visibility/position.
pub fn update_bar_position(state: &mut WmState, mon: MonitorId) {
    let bh = state.bh;
    let m = state.monitor_mut(mon);
    m.wy = m.my;
    m.wh = m.mh;
    if m.showbar {
        m.wh -= bh;
        m.by = if m.topbar { m.wy } else { m.wy + m.wh as i32 };
        m.wy = if m.topbar { m.wy + bh as i32 } else { m.wy };
    } else {
        m.by = -(bh as i32);
    }
}

/// `updatebars`: create a bar window for every monitor that doesn't already have one.
pub fn update_bars(state: &mut WmState, conn: &mut dyn XConn) -> Result<()> {
    let bh = state.bh;
    for mon in state.monitor_ids().to_vec() {
        if state.monitor(mon).barwin != 0 {
            continue;
        }
        let (wx, by, ww) = {
            let m = state.monitor(mon);
            (m.wx, m.by, m.ww)
        };
        let win = conn.create_bar_window(crate::geometry::Rect::new(wx, by, ww, bh))?;
        state.monitor_mut(mon).barwin = win;
    }
    Ok(())
}

/// Install the no-zombies `SIGCHLD` disposition and drain anything already waiting, matching
/// `setup`'s `SA_NOCLDSTOP | SA_NOCLDWAIT | SA_RESTART` policy.
pub fn install_sigchld_policy() -> Result<()> {
    unsafe {
        let action = SigAction::new(
            SigHandler::SigIgn,
            SaFlags::SA_NOCLDSTOP | SaFlags::SA_NOCLDWAIT | SaFlags::SA_RESTART,
            signal::SigSet::empty(),
        );
        signal::sigaction(Signal::SIGCHLD, &action).map_err(Error::Spawn)?;
    }
    while let Ok(status) = waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
        if matches!(status, nix::sys::wait::WaitStatus::StillAlive) {
            break;
        }
    }
    Ok(())
}

/// `setup`: intern atoms, create the supporting-WM-check window, advertise `_NET_SUPPORTED`,
/// select substructure-redirect, grab keys, rescan geometry.
pub fn setup(config: Config, conn: &mut dyn XConn) -> Result<WmState> {
    install_sigchld_policy()?;

    let root = conn.root();
    let (sw, sh) = conn.screen_size()?;
    let bh = 14u32.max((sw.min(sh)) / 80); // cosmetic floor; real font metrics come from the draw collaborator.

    let mut state = WmState::new(config, root, sw, sh, bh);
    state.numlockmask = conn.numlock_mask();

    for atom in <Atom as strum::IntoEnumIterator>::iter() {
        let id = conn.intern_atom(atom.as_ref())?;
        state.atoms.insert(atom, id);
    }

    conn.become_wm()?;

    let check_win = conn.create_check_window()?;
    state.wmcheckwin = check_win;
    conn.set_supporting_wm_check(check_win, "dwm")?;

    let supported: Vec<u32> = crate::atom::NET_SUPPORTED
        .iter()
        .filter_map(|a| state.atoms.get(a).copied())
        .collect();
    conn.set_supported(&supported)?;
    conn.set_client_list(&[])?;

    conn.grab_keys()?;
    update_geom(&mut state, conn)?;
    update_bars(&mut state, conn)?;

    info!("window manager initialized");
    Ok(state)
}

/// `updategeom`: enumerate output rectangles and reconcile them against the current monitor
/// list — new rectangles create monitors, removed ones reparent their clients onto the first
/// surviving monitor (§3 "Monitor list").
pub fn update_geom(state: &mut WmState, conn: &mut dyn XConn) -> Result<bool> {
    let rects = conn.screen_rects()?;
    let existing: Vec<MonitorId> = state.monitor_ids().to_vec();
    let mut dirty = false;

    for (i, r) in rects.iter().enumerate() {
        match existing.get(i) {
            Some(&id) => {
                let m = state.monitor(id);
                if (m.mx, m.my, m.mw, m.mh) != (r.x, r.y, r.w, r.h) {
                    dirty = true;
                    let m = state.monitor_mut(id);
                    m.mx = r.x;
                    m.my = r.y;
                    m.mw = r.w;
                    m.mh = r.h;
                    update_bar_position(state, id);
                }
            }
            None => {
                dirty = true;
                let id = state.create_monitor(r.x, r.y, r.w, r.h);
                update_bar_position(state, id);
            }
        }
    }

    if rects.len() < existing.len() {
        dirty = true;
        let survivor = existing[0];
        for &id in &existing[rects.len()..] {
            let clients = state.monitor(id).clients.clone();
            for c in clients {
                state.monitor_mut(id).detach(c);
                state.monitor_mut(id).detachstack(c, &[]);
                state.client_mut(c).mon = survivor;
                state.monitor_mut(survivor).attach(c);
                state.monitor_mut(survivor).attachstack(c);
            }
            state.remove_monitor(id);
        }
        crate::focus::arrange_all(state, conn);
    }

    Ok(dirty)
}

/// `scan`: manage every already-mapped, non-override-redirect top-level window in two passes —
/// non-transient windows first, then transients, so a transient's `manage` can always find its
/// already-managed target.
pub fn scan(state: &mut WmState, conn: &mut dyn XConn) -> Result<()> {
    let wins = conn.query_tree()?;

    for &win in &wins {
        if conn.is_override_redirect(win).unwrap_or(true) {
            continue;
        }
        if conn.get_transient_for(win)?.is_some() {
            continue;
        }
        crate::x::event::manage(state, conn, win)?;
    }
    for &win in &wins {
        if conn.is_override_redirect(win).unwrap_or(true) {
            continue;
        }
        if conn.get_transient_for(win)?.is_some() {
            crate::x::event::manage(state, conn, win)?;
        }
    }
    Ok(())
}

/// `cleanup`: select all tags, install the floating pseudo-layout, unmanage every client,
/// destroy every monitor, release input focus to the root window.
pub fn cleanup(state: &mut WmState, conn: &mut dyn XConn) {
    let selmon = state.selected_monitor();
    crate::actions::view(state, conn, !0u32);
    state.monitor_mut(selmon).sellt = 0;
    state.monitor_mut(selmon).lt[0] = crate::config::Layout {
        symbol: "",
        arrange: None,
    };

    let monitors = state.monitor_ids().to_vec();
    for mon in monitors {
        while let Some(&c) = state.monitor(mon).stack.first() {
            crate::x::event::unmanage(state, conn, c, false);
        }
        let barwin = state.monitor(mon).barwin;
        let _ = conn.unmap_window(barwin);
        let _ = conn.destroy_window(barwin);
        state.remove_monitor(mon);
    }

    let _ = conn.destroy_window(state.wmcheckwin);
    let _ = conn.sync();
    let _ = conn.set_input_focus(None);
    let _ = conn.set_active_window(None);
    warn!("window manager shutting down");
}

/// `spawn(argv)`: fork, detach the child from the X connection and controlling terminal, reset
/// `SIGCHLD`, `execvp` (§4.5, §5 "External subprocess").
pub fn spawn_detached(argv: &[String]) -> Result<()> {
    if argv.is_empty() {
        return Ok(());
    }

    // SAFETY: `fork` in a single-threaded process is sound; the child only calls
    // async-signal-safe functions before `execvp`.
    match unsafe { nix::unistd::fork() }.map_err(Error::Spawn)? {
        nix::unistd::ForkResult::Parent { .. } => Ok(()),
        nix::unistd::ForkResult::Child => {
            let _ = nix::unistd::setsid();

            unsafe {
                let action = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), signal::SigSet::empty());
                let _ = signal::sigaction(Signal::SIGCHLD, &action);
            }

            let cargv: Vec<CString> = argv.iter().map(|s| CString::new(s.as_str()).unwrap()).collect();
            let _ = nix::unistd::execvp(&cargv[0], &cargv);
            std::process::exit(1);
        }
    }
}
