//! Entry point: wire a live X11 connection and the Xft draw collaborator to the window manager
//! core, compile in the default key/button tables, and drive the event loop until `quit` fires.

use std::{env, process};

use tilewm::bar::{self, Drawer};
use tilewm::bindings::{Action, Arg, ClickZone, KeyBinding, ModifierKey, MouseBinding, MouseButton};
use tilewm::bootstrap;
use tilewm::config::Config;
use tilewm::dispatch::run_action;
use tilewm::geometry::Rect;
use tilewm::state::WmState;
use tilewm::x::rustconn::RustConn;
use tilewm::x::{event, XConn, XEvent};
use tilewm_ui::Draw;

/// `XC_fleur`, the cursorfont glyph dwm shows during an interactive move.
const CUR_MOVE: u32 = 52;
/// `XC_sizing`, shown during an interactive resize.
const CUR_RESIZE: u32 = 120;

fn default_keys() -> Vec<KeyBinding> {
    use ModifierKey::*;

    let mut keys = vec![
        KeyBinding { modifiers: vec![Meta], keysym: "p".into(), action: Action::Spawn, arg: Arg::None },
        KeyBinding { modifiers: vec![Meta], keysym: "b".into(), action: Action::ToggleBar, arg: Arg::None },
        KeyBinding { modifiers: vec![Meta], keysym: "j".into(), action: Action::FocusStack, arg: Arg::Int(1) },
        KeyBinding { modifiers: vec![Meta], keysym: "k".into(), action: Action::FocusStack, arg: Arg::Int(-1) },
        KeyBinding { modifiers: vec![Meta], keysym: "i".into(), action: Action::IncNMaster, arg: Arg::Int(1) },
        KeyBinding { modifiers: vec![Meta], keysym: "d".into(), action: Action::IncNMaster, arg: Arg::Int(-1) },
        KeyBinding { modifiers: vec![Meta], keysym: "h".into(), action: Action::SetMFact, arg: Arg::Float(-0.05) },
        KeyBinding { modifiers: vec![Meta], keysym: "l".into(), action: Action::SetMFact, arg: Arg::Float(0.05) },
        KeyBinding { modifiers: vec![Meta], keysym: "Return".into(), action: Action::Zoom, arg: Arg::None },
        KeyBinding { modifiers: vec![Meta], keysym: "Tab".into(), action: Action::View, arg: Arg::Tags(0) },
        KeyBinding { modifiers: vec![Meta, Shift], keysym: "c".into(), action: Action::KillClient, arg: Arg::None },
        KeyBinding { modifiers: vec![Meta], keysym: "t".into(), action: Action::SetLayout, arg: Arg::Int(0) },
        KeyBinding { modifiers: vec![Meta], keysym: "f".into(), action: Action::SetLayout, arg: Arg::Int(1) },
        KeyBinding { modifiers: vec![Meta], keysym: "m".into(), action: Action::SetLayout, arg: Arg::Int(2) },
        KeyBinding { modifiers: vec![Meta], keysym: "space".into(), action: Action::SetLayout, arg: Arg::Int(-1) },
        KeyBinding { modifiers: vec![Meta, Shift], keysym: "space".into(), action: Action::ToggleFloating, arg: Arg::None },
        KeyBinding { modifiers: vec![Meta], keysym: "comma".into(), action: Action::FocusMon, arg: Arg::Int(-1) },
        KeyBinding { modifiers: vec![Meta], keysym: "period".into(), action: Action::FocusMon, arg: Arg::Int(1) },
        KeyBinding { modifiers: vec![Meta, Shift], keysym: "comma".into(), action: Action::TagMon, arg: Arg::Int(-1) },
        KeyBinding { modifiers: vec![Meta, Shift], keysym: "period".into(), action: Action::TagMon, arg: Arg::Int(1) },
        KeyBinding { modifiers: vec![Meta, Shift], keysym: "q".into(), action: Action::Quit, arg: Arg::None },
    ];

    for i in 0..9u32 {
        let tag = 1u32 << i;
        let sym = char::from(b'1' + i as u8).to_string();
        keys.push(KeyBinding { modifiers: vec![Meta], keysym: sym.clone(), action: Action::View, arg: Arg::Tags(tag) });
        keys.push(KeyBinding { modifiers: vec![Meta, Ctrl], keysym: sym.clone(), action: Action::ToggleView, arg: Arg::Tags(tag) });
        keys.push(KeyBinding { modifiers: vec![Meta, Shift], keysym: sym.clone(), action: Action::Tag, arg: Arg::Tags(tag) });
        keys.push(KeyBinding { modifiers: vec![Meta, Ctrl, Shift], keysym: sym, action: Action::ToggleTag, arg: Arg::Tags(tag) });
    }

    keys
}

fn default_buttons() -> Vec<MouseBinding> {
    use ModifierKey::*;

    vec![
        MouseBinding { zone: ClickZone::TagBar, modifiers: vec![], button: MouseButton::Left, action: Action::View, arg: Arg::None },
        MouseBinding { zone: ClickZone::TagBar, modifiers: vec![], button: MouseButton::Right, action: Action::ToggleView, arg: Arg::None },
        MouseBinding { zone: ClickZone::TagBar, modifiers: vec![Meta], button: MouseButton::Left, action: Action::Tag, arg: Arg::None },
        MouseBinding { zone: ClickZone::TagBar, modifiers: vec![Meta], button: MouseButton::Right, action: Action::ToggleTag, arg: Arg::None },
        MouseBinding { zone: ClickZone::LayoutSymbol, modifiers: vec![], button: MouseButton::Left, action: Action::SetLayout, arg: Arg::Int(-1) },
        MouseBinding { zone: ClickZone::Title, modifiers: vec![Meta], button: MouseButton::Middle, action: Action::ToggleFloating, arg: Arg::None },
        MouseBinding { zone: ClickZone::Title, modifiers: vec![Meta], button: MouseButton::Left, action: Action::MoveMouse, arg: Arg::None },
        MouseBinding { zone: ClickZone::ClientWindow, modifiers: vec![Meta], button: MouseButton::Left, action: Action::MoveMouse, arg: Arg::None },
        MouseBinding { zone: ClickZone::ClientWindow, modifiers: vec![Meta], button: MouseButton::Right, action: Action::ResizeMouse, arg: Arg::None },
    ]
}

/// `(mods & ~numlockmask) & 0x1fff`, the same modifier-cleaning `key_press` applies, reused here
/// since button-table dispatch lives outside the core (§4.6).
fn clean_mods(state: &WmState, mods: u16) -> u16 {
    mods & !state.numlockmask & 0x1fff
}

/// Classify a `ButtonPress`'s `(window, x)` into the zone dwm's `buttonpress` computes from
/// `TEXTW` accumulation across the tag labels, the layout symbol, and the status text.
fn classify_click(state: &WmState, drawer: &dyn Drawer, window: u32, x: i32) -> (ClickZone, Arg) {
    if state.client_for_window(window).is_some() {
        return (ClickZone::ClientWindow, Arg::None);
    }
    let Some(mon) = state.monitor_ids().iter().copied().find(|&m| state.monitor(m).barwin == window) else {
        return (ClickZone::Root, Arg::None);
    };

    let m = state.monitor(mon);
    let mut cx = 0i32;
    for (i, tag) in state.config.tags.iter().enumerate() {
        cx += drawer.getwidth(tag) as i32;
        if x < cx {
            return (ClickZone::TagBar, Arg::Tags(1 << i));
        }
    }

    let lw = drawer.getwidth(&m.ltsymbol) as i32;
    if x < cx + lw {
        return (ClickZone::LayoutSymbol, Arg::None);
    }

    let status = state.status.as_deref().unwrap_or("");
    let status_w = drawer.getwidth(status) as i32;
    if x > m.ww as i32 - status_w {
        return (ClickZone::Status, Arg::None);
    }

    (ClickZone::Title, Arg::None)
}

/// Find the first configured button binding matching `(zone, button, mods)` and run it. A
/// tag-bar binding with `Arg::None` receives the clicked tag's bit, mirroring dwm's `click ==
/// ClkTagBar && buttons[i].arg.i == 0` substitution.
fn dispatch_button(state: &mut WmState, conn: &mut dyn XConn, drawer: &dyn Drawer, window: u32, x: i32, button: u8, mods: u16) {
    let (zone, click_arg) = classify_click(state, drawer, window, x);
    let cleaned = clean_mods(state, mods);
    let bindings = state.config.buttons.clone();

    for mb in &bindings {
        if mb.zone != zone || u8::from(mb.button) != button {
            continue;
        }
        let want: u16 = mb.modifiers.iter().copied().fold(0u16, |acc, m| acc | u16::from(m));
        if want != cleaned {
            continue;
        }
        let arg = if zone == ClickZone::TagBar && mb.arg == Arg::None { click_arg } else { mb.arg };
        run_action(state, conn, mb.action, arg);
        return;
    }
}

/// Adopt the draw collaborator's real font metrics for the bar height (dwm's `bh = fonts->h +
/// 2`, computed after `drw_fontset_create` rather than the cosmetic floor `setup` seeds the
/// state with before any font exists).
fn adopt_bar_height(state: &mut WmState, conn: &mut dyn XConn, drawer: &dyn Drawer) {
    let bh = drawer.line_height() + 2;
    if bh == state.bh {
        return;
    }
    state.bh = bh;
    for mon in state.monitor_ids().to_vec() {
        bootstrap::update_bar_position(state, mon);
        let (barwin, wx, by, ww) = {
            let m = state.monitor(mon);
            (m.barwin, m.wx, m.by, m.ww)
        };
        let _ = conn.configure_window(barwin, Rect::new(wx, by, ww, bh), 0);
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() == 2 && args[1] == "-v" {
        println!("tilewm-{}", option_env!("CARGO_PKG_VERSION").unwrap_or("unknown"));
        process::exit(0);
    } else if args.len() > 1 {
        eprintln!("usage: tilewm [-v]");
        process::exit(1);
    }

    tracing_subscriber::fmt::init();

    let config = Config { keys: default_keys(), buttons: default_buttons(), ..Config::default() };

    let mut conn = match RustConn::new(config.keys.clone(), config.buttons.clone()) {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("tilewm: {e}");
            process::exit(1);
        }
    };

    let mut state = match bootstrap::setup(config, &mut conn) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("tilewm: setup failed: {e}");
            process::exit(1);
        }
    };

    let mut drawer = match Draw::new() {
        Ok(drawer) => drawer,
        Err(e) => {
            eprintln!("tilewm: {e}");
            process::exit(1);
        }
    };
    drawer.fontset_create(&state.config.fonts);
    adopt_bar_height(&mut state, &mut conn, &drawer);
    drawer.create(state.sw, state.bh);
    state.cursor_move = drawer.cur_create(CUR_MOVE);
    state.cursor_resize = drawer.cur_create(CUR_RESIZE);

    if let Err(e) = bootstrap::scan(&mut state, &mut conn) {
        tracing::warn!(error = %e, "initial scan failed");
    }
    bar::refresh_all(&state, &mut drawer);

    let mut last_sw = state.sw;
    while state.running {
        let ev = match conn.next_event() {
            Ok(ev) => ev,
            Err(e) => {
                tracing::warn!(error = %e, "dropping X event");
                continue;
            }
        };

        event::dispatch(&mut state, &mut conn, ev.clone());
        if let XEvent::ButtonPress { window, x, button, state: mods, .. } = ev {
            dispatch_button(&mut state, &mut conn, &drawer, window, x, button, mods);
        }

        if state.sw != last_sw {
            drawer.resize(state.sw, state.bh);
            last_sw = state.sw;
        }
        bar::refresh_all(&state, &mut drawer);
    }

    bootstrap::cleanup(&mut state, &mut conn);
    drawer.destroy();
}
