//! Bar rendering (§4.8) against the external draw collaborator (§6).
//!
//! The draw collaborator owns fonts, color allocation, and pixel blitting; this module only
//! decides what to paint where. It is driven once per main-loop iteration rather than from
//! individual event handlers — dwm's own comment on `focus()` redrawing every bar
//! unconditionally ("redrawing all is cheap") is the same call made explicit here.

use crate::config::Scheme;
use crate::monitor::MonitorId;
use crate::state::WmState;

/// The drawing library, color-scheme loader, and font metrics: an external collaborator (§1,
/// §6). A color handle returned by [`Drawer::scheme_create`] is opaque to this crate.
pub trait Drawer {
    /// Allocate the bar's drawable surface.
    fn create(&mut self, w: u32, h: u32);
    /// Release the drawable surface.
    fn destroy(&mut self);
    /// Resize the drawable surface (screen geometry changed).
    fn resize(&mut self, w: u32, h: u32);

    /// Load the configured font stack.
    fn fontset_create(&mut self, fonts: &[String]);
    /// Measure `text` in pixels under the current font stack, including padding.
    fn getwidth(&self, text: &str) -> u32;
    /// The primary font's line height, used to size the bar once fonts are loaded (`bh =
    /// fonts->h + 2` in dwm's `setup`).
    fn line_height(&self) -> u32;

    /// Allocate a color scheme from `[fg, bg, border]` hex strings, returning an opaque handle.
    fn scheme_create(&mut self, colors: &[String; 3]) -> u32;
    /// Select the active scheme for subsequent `text`/`rect` calls.
    fn setscheme(&mut self, scheme: u32);

    /// Paint `text` left-padded by `pad`, inverted (reversed fg/bg) if `invert`. Returns the x
    /// coordinate immediately after the drawn text.
    fn text(&mut self, x: i32, y: i32, w: u32, h: u32, pad: u32, text: &str, invert: bool) -> i32;
    /// Paint a rectangle, filled or outlined, in the current scheme's foreground (inverted if
    /// `invert`).
    fn rect(&mut self, x: i32, y: i32, w: u32, h: u32, filled: bool, invert: bool);
    /// Blit the drawable onto `win` at `(x, y)` sized `(w, h)`.
    fn map(&mut self, win: u32, x: i32, y: i32, w: u32, h: u32);

    /// Create a cursor of the given shape, returning an opaque handle.
    fn cur_create(&mut self, shape: u32) -> u32;
    /// Free a cursor handle.
    fn cur_free(&mut self, cur: u32);
}

/// Repaint every monitor's bar (`drawbars`). Skips monitors with `showbar == false`.
pub fn refresh_all(state: &WmState, drawer: &mut dyn Drawer) {
    for mon in state.monitor_ids().to_vec() {
        draw_bar(state, drawer, mon);
    }
}

/// Repaint one monitor's bar (`drawbar`, §4.8).
pub fn draw_bar(state: &WmState, drawer: &mut dyn Drawer, mon: MonitorId) {
    let m = state.monitor(mon);
    if !m.showbar {
        return;
    }
    let selmon = state.selmon == Some(mon);
    let bh = state.bh;

    let norm = state.config.colors[Scheme::Norm as usize].clone();
    let sel = state.config.colors[Scheme::Sel as usize].clone();
    let norm_scheme = drawer.scheme_create(&[norm.fg.clone(), norm.bg.clone(), norm.border.clone()]);
    let sel_scheme = drawer.scheme_create(&[sel.fg.clone(), sel.bg.clone(), sel.border.clone()]);

    let mut status_w = 0u32;
    if selmon {
        drawer.setscheme(norm_scheme);
        let status = state.status.as_deref().unwrap_or("");
        status_w = drawer.getwidth(status) + 2;
        drawer.text(m.ww as i32 - status_w as i32, 0, status_w, bh, 0, status, false);
    }

    let mut occ = 0u32;
    let mut urg = 0u32;
    for &id in &m.clients {
        let c = state.client(id);
        occ |= c.tags;
        if c.isurgent {
            urg |= c.tags;
        }
    }

    let mut x = 0i32;
    let boxs = bh as i32 / 9;
    let boxw = (bh / 6 + 2) as u32;
    for (i, tag) in state.config.tags.iter().enumerate() {
        let bit = 1u32 << i;
        let w = drawer.getwidth(tag);
        let scheme = if m.seltag_mask() & bit != 0 { sel_scheme } else { norm_scheme };
        drawer.setscheme(scheme);
        drawer.text(x, 0, w, bh, 2, tag, urg & bit != 0);
        if occ & bit != 0 {
            let filled = selmon && m.sel.map(|s| state.client(s).tags & bit != 0).unwrap_or(false);
            drawer.rect(x + boxs, boxs, boxw, boxw, filled, urg & bit != 0);
        }
        x += w as i32;
    }

    let lw = drawer.getwidth(&m.ltsymbol);
    drawer.setscheme(norm_scheme);
    x = drawer.text(x, 0, lw, bh, 2, &m.ltsymbol, false);

    let remaining = m.ww as i32 - status_w as i32 - x;
    if remaining > bh as i32 {
        match m.sel {
            Some(sel_id) => {
                let c = state.client(sel_id);
                drawer.setscheme(if selmon { sel_scheme } else { norm_scheme });
                drawer.text(x, 0, remaining as u32, bh, 2, &c.name, false);
                if c.isfloating {
                    drawer.rect(x + boxs, boxs, boxw, boxw, c.isfixed, false);
                }
            }
            None => {
                drawer.setscheme(norm_scheme);
                drawer.rect(x, 0, remaining as u32, bh, true, true);
            }
        }
    }

    drawer.map(m.barwin, 0, 0, m.ww, bh);
}
