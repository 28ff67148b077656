//! The layout engine: tiled master/stack, monocle, and ICCCM size-hint enforcement (§4.3).

use crate::client::ClientId;
use crate::geometry::Rect;
use crate::monitor::MonitorId;
use crate::state::WmState;
use crate::x::XConn;

/// Visible, non-floating clients in `mon`'s arrange order, the layout engine's working set.
pub fn tiled_clients(state: &WmState, mon: MonitorId) -> Vec<ClientId> {
    let m = state.monitor(mon);
    m.clients
        .iter()
        .copied()
        .filter(|&id| {
            let c = state.client(id);
            !c.isfloating && m.is_visible(c.tags)
        })
        .collect()
}

/// Master/stack horizontal-split tiling (§4.3 "Tile").
pub fn tile(state: &mut WmState, conn: &mut dyn XConn, mon: MonitorId) {
    let clients = tiled_clients(state, mon);
    let n = clients.len() as u32;
    if n == 0 {
        return;
    }

    let (wx, wy, ww, wh, nmaster, mfact) = {
        let m = state.monitor(mon);
        (m.wx, m.wy, m.ww, m.wh, m.nmaster, m.mfact)
    };

    let mw = if n > nmaster {
        if nmaster > 0 {
            (ww as f64 * mfact) as u32
        } else {
            0
        }
    } else {
        ww
    };

    let mut my = 0u32;
    let mut ty = 0u32;
    for (i, &id) in clients.iter().enumerate() {
        let i = i as u32;
        let bw = state.client(id).bw;
        if i < nmaster {
            let remaining = nmaster.min(n) - i;
            let h = (wh - my) / remaining.max(1);
            let geom = Rect::new(wx, wy + my as i32, mw.saturating_sub(2 * bw), h.saturating_sub(2 * bw));
            resize(state, conn, id, geom, false);
            let total_h = state.client(id).geom.h + 2 * bw;
            if my + total_h < wh {
                my += total_h;
            }
        } else {
            let remaining = n - i;
            let h = (wh - ty) / remaining.max(1);
            let geom = Rect::new(
                wx + mw as i32,
                wy + ty as i32,
                ww.saturating_sub(mw).saturating_sub(2 * bw),
                h.saturating_sub(2 * bw),
            );
            resize(state, conn, id, geom, false);
            let total_h = state.client(id).geom.h + 2 * bw;
            if ty + total_h < wh {
                ty += total_h;
            }
        }
    }
}

/// Every visible client (tiled or not) occupies the full work area (§4.3 "Monocle").
///
/// The displayed symbol counts every visible client, but only non-floating ones are actually
/// resized here — a deliberate mismatch (§9).
pub fn monocle(state: &mut WmState, conn: &mut dyn XConn, mon: MonitorId) {
    let m = state.monitor(mon);
    let n = m
        .clients
        .iter()
        .filter(|&&id| m.is_visible(state.client(id).tags))
        .count();
    if n > 0 {
        state.monitor_mut(mon).ltsymbol = format!("[{n}]");
    }

    let (wx, wy, ww, wh) = {
        let m = state.monitor(mon);
        (m.wx, m.wy, m.ww, m.wh)
    };
    for id in tiled_clients(state, mon) {
        let bw = state.client(id).bw;
        let geom = Rect::new(wx, wy, ww.saturating_sub(2 * bw), wh.saturating_sub(2 * bw));
        resize(state, conn, id, geom, false);
    }
}

/// ICCCM 4.1.2.3 size-hint enforcement: clamps and quantizes a requested geometry.
///
/// Returns the adjusted geometry and whether it differs from the client's current geometry.
pub fn apply_size_hints(
    state: &mut WmState,
    conn: &dyn XConn,
    id: ClientId,
    mut geom: Rect,
    interact: bool,
) -> (Rect, bool) {
    geom.w = geom.w.max(1);
    geom.h = geom.h.max(1);

    let bw = state.client(id).bw as i32;
    if interact {
        let (sw, sh) = (state.sw as i32, state.sh as i32);
        if geom.x > sw {
            geom.x = sw - (geom.w as i32 + 2 * bw);
        }
        if geom.y > sh {
            geom.y = sh - (geom.h as i32 + 2 * bw);
        }
        if geom.x + geom.w as i32 + 2 * bw < 0 {
            geom.x = 0;
        }
        if geom.y + geom.h as i32 + 2 * bw < 0 {
            geom.y = 0;
        }
    } else {
        let mon = state.client(id).mon;
        let m = state.monitor(mon);
        let (mwx, mwy, mww, mwh) = (m.wx, m.wy, m.ww as i32, m.wh as i32);
        if geom.x >= mwx + mww {
            geom.x = mwx + mww - (geom.w as i32 + 2 * bw);
        }
        if geom.y >= mwy + mwh {
            geom.y = mwy + mwh - (geom.h as i32 + 2 * bw);
        }
        if geom.x + geom.w as i32 + 2 * bw <= mwx {
            geom.x = mwx;
        }
        if geom.y + geom.h as i32 + 2 * bw <= mwy {
            geom.y = mwy;
        }
    }

    let bh = state.bh;
    if geom.h < bh {
        geom.h = bh;
    }
    if geom.w < bh {
        geom.w = bh;
    }

    let mon = state.client(id).mon;
    let floating_layout = state.monitor(mon).lt[state.monitor(mon).sellt].arrange.is_none();
    let resizehints = state.config.resizehints;
    let isfloating = state.client(id).isfloating;

    if resizehints || isfloating || floating_layout {
        if !state.client(id).hintsvalid {
            refresh_size_hints(state, conn, id);
        }
        let h = state.client(id).hints;
        let baseismin = h.basew == h.minw && h.baseh == h.minh;

        let mut w = geom.w as i32;
        let mut hh = geom.h as i32;

        if !baseismin {
            w -= h.basew;
            hh -= h.baseh;
        }

        if h.mina > 0.0 && h.maxa > 0.0 {
            let ratio = w as f64 / hh as f64;
            if h.maxa < ratio {
                w = (hh as f64 * h.maxa + 0.5) as i32;
            } else if h.mina < 1.0 / ratio {
                hh = (w as f64 * h.mina + 0.5) as i32;
            }
        }

        if baseismin {
            w -= h.basew;
            hh -= h.baseh;
        }

        if h.incw != 0 {
            w -= w % h.incw;
        }
        if h.inch != 0 {
            hh -= hh % h.inch;
        }

        w = (w + h.basew).max(h.minw);
        hh = (hh + h.baseh).max(h.minh);
        if h.maxw != 0 {
            w = w.min(h.maxw);
        }
        if h.maxh != 0 {
            hh = hh.min(h.maxh);
        }

        geom.w = w.max(1) as u32;
        geom.h = hh.max(1) as u32;
    }

    let changed = geom != state.client(id).geom;
    (geom, changed)
}

/// Refresh a client's cached [`crate::client::SizeHints`] from the server.
fn refresh_size_hints(state: &mut WmState, conn: &dyn XConn, id: ClientId) {
    let win = state.client(id).win;
    if let Ok(nh) = conn.get_normal_hints(win) {
        state.client_mut(id).set_hints(nh.hints);
    }
}

/// `resize(c, geom, interact)`: apply size hints, and if the result differs, commit it
/// (§4.3).
pub fn resize(state: &mut WmState, conn: &mut dyn XConn, id: ClientId, geom: Rect, interact: bool) {
    let (geom, changed) = apply_size_hints(state, conn, id, geom, interact);
    if changed {
        resize_client(state, conn, id, geom);
    }
}

/// Commit a new geometry: record the old one, write the new one, issue one
/// `XConfigureWindow`, then sync (§4.3 `resizeclient`).
pub fn resize_client(state: &mut WmState, conn: &mut dyn XConn, id: ClientId, geom: Rect) {
    let (win, bw) = {
        let c = state.client_mut(id);
        c.old_geom = c.geom;
        c.geom = geom;
        (c.win, c.bw)
    };
    let _ = conn.configure_window(win, geom, bw);
    let _ = conn.send_configure_notify(win, geom, bw);
    let _ = conn.sync();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::x::mock::MockXConn;

    fn fresh_state(n: u32) -> (WmState, MonitorId, Vec<ClientId>) {
        let cfg = Config::default();
        let mut state = WmState::new(cfg, 1, 1920, 1080, 14);
        let mon = state.create_monitor(0, 0, 1920, 1080);
        {
            let m = state.monitor_mut(mon);
            m.wx = 0;
            m.wy = 14;
            m.ww = 1920;
            m.wh = 1066;
            m.nmaster = 1;
            m.mfact = 0.5;
        }
        let mut ids = vec![];
        for i in 0..n {
            let id = state.create_client(100 + i, mon, Rect::new(0, 0, 100, 100), 1);
            state.client_mut(id).tags = 1;
            ids.push(id);
        }
        // `attach` prepends, so attach in reverse creation order to make `ids[0]` the arrange
        // head (`clients[0]`) the way it would be for the first window opened on a monitor.
        for &id in ids.iter().rev() {
            state.monitor_mut(mon).attach(id);
            state.monitor_mut(mon).attachstack(id);
        }
        (state, mon, ids)
    }

    #[test]
    fn tile_single_master_uses_full_width() {
        let (mut state, mon, ids) = fresh_state(1);
        let mut conn = MockXConn::default();
        tile(&mut state, &mut conn, mon);
        let c = state.client(ids[0]);
        assert_eq!(c.geom, Rect::new(0, 14, 1918, 1064));
    }

    #[test]
    fn tile_three_clients_matches_scenario_1() {
        let (mut state, mon, ids) = fresh_state(3);
        let mut conn = MockXConn::default();
        tile(&mut state, &mut conn, mon);
        assert_eq!(state.client(ids[0]).geom, Rect::new(0, 14, 958, 1064));
        assert_eq!(state.client(ids[1]).geom, Rect::new(960, 14, 958, 531));
        assert_eq!(state.client(ids[2]).geom, Rect::new(960, 547, 958, 531));
    }

    #[test]
    fn monocle_overrides_symbol_to_bracketed_count() {
        let (mut state, mon, _ids) = fresh_state(2);
        let mut conn = MockXConn::default();
        monocle(&mut state, &mut conn, mon);
        assert_eq!(state.monitor(mon).ltsymbol, "[2]");
    }

    #[test]
    fn apply_size_hints_is_idempotent() {
        let (mut state, _mon, ids) = fresh_state(1);
        let conn = MockXConn::default();
        let geom = Rect::new(10, 10, 137, 81);
        let (once, _) = apply_size_hints(&mut state, &conn, ids[0], geom, false);
        state.client_mut(ids[0]).geom = once;
        let (twice, changed) = apply_size_hints(&mut state, &conn, ids[0], once, false);
        assert_eq!(once, twice);
        assert!(!changed);
    }
}
