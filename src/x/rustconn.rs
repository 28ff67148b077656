//! A live X11 backend over `x11rb`, grounded on the same request shapes dwm issues directly
//! against Xlib — `XConfigureWindow`, `XChangeProperty`, `XGrabKey`/`XGrabButton`, and RandR's
//! monitor enumeration standing in for the abstract "enumerate rectangles" capability (§1).

use std::collections::HashMap;

use x11rb::connection::Connection;
use x11rb::protocol::randr::ConnectionExt as _;
use x11rb::protocol::xproto::{ConnectionExt as _, *};
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;
use x11rb::COPY_DEPTH_FROM_PARENT;

use tilewm_keysyms::XKeySym;

use crate::bindings::{KeyBinding, MouseBinding};
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::x::event::XEvent;
use crate::x::property::{WmHints, WmNormalHints};
use crate::x::XConn;

fn x11_err(e: impl std::fmt::Display) -> Error {
    Error::X11(e.to_string())
}

/// A live connection to an X11 display, implementing every request the core needs.
pub struct RustConn {
    conn: RustConnection,
    screen: usize,
    root: u32,
    atoms: HashMap<String, u32>,
    keys: Vec<KeyBinding>,
    buttons: Vec<MouseBinding>,
    numlock_mask: u16,
    check_windows: Vec<u32>,
    colormap: u32,
    keysym_cache: HashMap<u8, u32>,
}

impl RustConn {
    /// Open the default display and resolve the root window, preparing to grab the key/button
    /// bindings declared in `keys`/`buttons` (the trait's `grab_keys`/`grab_buttons` take no
    /// config argument, so this connection owns its own copy, mirroring how dwm's grab routines
    /// close over the file-scope `keys[]`/`buttons[]` tables).
    pub fn new(keys: Vec<KeyBinding>, buttons: Vec<MouseBinding>) -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(None).map_err(|_| Error::NoDisplay)?;
        let screen = conn.setup().roots[screen_num].clone();
        let root = screen.root;
        let colormap = screen.default_colormap;

        let mut this = RustConn {
            conn,
            screen: screen_num,
            root,
            atoms: HashMap::new(),
            keys,
            buttons,
            numlock_mask: 0,
            check_windows: Vec::new(),
            colormap,
            keysym_cache: HashMap::new(),
        };
        this.numlock_mask = this.detect_numlock_mask().unwrap_or(0);
        Ok(this)
    }

    fn detect_numlock_mask(&self) -> Result<u16> {
        const XK_NUM_LOCK: u32 = 0xff7f;
        let setup = self.conn.setup();
        let mapping = self
            .conn
            .get_keyboard_mapping(setup.min_keycode, (setup.max_keycode - setup.min_keycode) + 1)
            .map_err(x11_err)?
            .reply()
            .map_err(x11_err)?;
        let per = mapping.keysyms_per_keycode as usize;

        let mut numlock_keycode = None;
        for (offset, syms) in mapping.keysyms.chunks(per).enumerate() {
            if syms.iter().any(|&ks| ks == XK_NUM_LOCK) {
                numlock_keycode = Some(setup.min_keycode + offset as u8);
                break;
            }
        }
        let Some(target) = numlock_keycode else {
            return Ok(0);
        };

        let mm = self.conn.get_modifier_mapping().map_err(x11_err)?.reply().map_err(x11_err)?;
        let per = mm.keycodes_per_modifier() as usize;
        for mod_index in 0..8 {
            let start = mod_index * per;
            if mm.keycodes[start..start + per].contains(&target) {
                return Ok(1 << mod_index);
            }
        }
        Ok(0)
    }

    fn keycodes_for_keysym(&self, code: u32) -> Vec<u8> {
        let setup = self.conn.setup();
        let Ok(cookie) = self
            .conn
            .get_keyboard_mapping(setup.min_keycode, (setup.max_keycode - setup.min_keycode) + 1)
        else {
            return Vec::new();
        };
        let Ok(mapping) = cookie.reply() else {
            return Vec::new();
        };
        let per = mapping.keysyms_per_keycode as usize;
        mapping
            .keysyms
            .chunks(per)
            .enumerate()
            .filter(|(_, syms)| syms.first().map(|&s| s == code).unwrap_or(false))
            .map(|(i, _)| setup.min_keycode + i as u8)
            .collect()
    }

    fn atom(&mut self, name: &str) -> Result<u32> {
        self.intern_atom(name)
    }

    fn get_text_property(&self, win: u32, atom: u32) -> Result<Option<String>> {
        let reply = self
            .conn
            .get_property(false, win, atom, AtomEnum::ANY, 0, u32::MAX)
            .map_err(x11_err)?
            .reply()
            .map_err(x11_err)?;
        if reply.value.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            String::from_utf8(reply.value).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()),
        ))
    }

    fn translate_event(&mut self, ev: Event) -> XEvent {
        match ev {
            Event::ButtonPress(e) => XEvent::ButtonPress {
                window: e.event,
                x: e.event_x as i32,
                y: e.event_y as i32,
                button: e.detail,
                state: u16::from(e.state),
            },
            Event::ButtonRelease(_) => XEvent::ButtonRelease,
            Event::ClientMessage(e) => XEvent::ClientMessage {
                window: e.window,
                message_type: e.type_,
                data: {
                    let d = e.data.as_data32();
                    [d[0], d[1], d[2], d[3], d[4]]
                },
            },
            Event::ConfigureNotify(e) if e.window == self.root => {
                XEvent::ConfigureNotifyRoot { width: e.width as u32, height: e.height as u32 }
            }
            Event::RandrScreenChangeNotify(e) => XEvent::ConfigureNotifyRoot {
                width: e.width as u32,
                height: e.height as u32,
            },
            Event::ConfigureRequest(e) => XEvent::ConfigureRequest {
                window: e.window,
                x: e.value_mask.contains(ConfigWindow::X).then_some(e.x as i32),
                y: e.value_mask.contains(ConfigWindow::Y).then_some(e.y as i32),
                width: e.value_mask.contains(ConfigWindow::WIDTH).then_some(e.width as u32),
                height: e.value_mask.contains(ConfigWindow::HEIGHT).then_some(e.height as u32),
            },
            Event::DestroyNotify(e) => XEvent::DestroyNotify { window: e.window },
            Event::EnterNotify(e) => XEvent::EnterNotify {
                window: e.event,
                x_root: e.root_x as i32,
                y_root: e.root_y as i32,
                mode_normal: e.mode == NotifyMode::NORMAL,
                detail_inferior: e.detail == NotifyDetail::INFERIOR,
            },
            Event::Expose(e) => XEvent::Expose { window: e.window, count: e.count as u32 },
            Event::FocusIn(e) => XEvent::FocusIn { window: e.event },
            Event::KeyPress(e) => {
                let code = *self
                    .keysym_cache
                    .entry(e.detail)
                    .or_insert_with(|| self.conn.get_keyboard_mapping(e.detail, 1).ok().and_then(|c| c.reply().ok()).and_then(|m| m.keysyms.first().copied()).unwrap_or(0));
                let name = XKeySym::from_code(code).map(|k| k.as_ref().to_string()).unwrap_or_default();
                XEvent::KeyPress { keysym: name, state: u16::from(e.state) }
            }
            Event::MappingNotify(_) => XEvent::MappingNotify,
            Event::MapRequest(e) => XEvent::MapRequest { window: e.window },
            Event::MotionNotify(e) => XEvent::MotionNotify {
                window: e.event,
                x_root: e.root_x as i32,
                y_root: e.root_y as i32,
                time: e.time,
            },
            Event::PropertyNotify(e) => {
                XEvent::PropertyNotify { window: e.window, atom: e.atom, deleted: e.state == Property::DELETE }
            }
            Event::UnmapNotify(e) => XEvent::UnmapNotify { window: e.window, synthetic: e.response_type & 0x80 != 0 },
            _ => XEvent::Ignored,
        }
    }
}

impl XConn for RustConn {
    fn root(&self) -> u32 {
        self.root
    }

    fn screen_size(&self) -> Result<(u32, u32)> {
        let screen = &self.conn.setup().roots[self.screen];
        Ok((screen.width_in_pixels as u32, screen.height_in_pixels as u32))
    }

    fn screen_rects(&self) -> Result<Vec<Rect>> {
        if let Ok(reply) = self
            .conn
            .randr_get_monitors(self.root, true)
            .ok()
            .and_then(|c| c.reply().ok())
            .ok_or(())
        {
            let rects: Vec<Rect> = reply
                .monitors
                .iter()
                .filter(|m| m.width > 0 && m.height > 0)
                .map(|m| Rect::new(m.x as i32, m.y as i32, m.width as u32, m.height as u32))
                .collect();
            if !rects.is_empty() {
                return Ok(rects);
            }
        }
        let (w, h) = self.screen_size()?;
        Ok(vec![Rect::new(0, 0, w, h)])
    }

    fn cursor_position(&self) -> Result<(i32, i32)> {
        let p = self.conn.query_pointer(self.root).map_err(x11_err)?.reply().map_err(x11_err)?;
        Ok((p.root_x as i32, p.root_y as i32))
    }

    fn window_at_point(&self, x: i32, y: i32) -> Result<Option<u32>> {
        let p = self
            .conn
            .query_pointer(self.root)
            .map_err(x11_err)?
            .reply()
            .map_err(x11_err)?;
        let _ = (x, y);
        Ok((p.child != x11rb::NONE).then_some(p.child))
    }

    fn next_event(&mut self) -> Result<XEvent> {
        let ev = self.conn.wait_for_event().map_err(x11_err)?;
        Ok(self.translate_event(ev))
    }

    fn drain_enter_notify(&mut self) -> Result<()> {
        while let Some(ev) = self.conn.poll_for_event().map_err(x11_err)? {
            if !matches!(ev, Event::EnterNotify(_)) {
                break;
            }
        }
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        self.conn.sync().map_err(x11_err)?;
        Ok(())
    }

    fn intern_atom(&mut self, name: &str) -> Result<u32> {
        if let Some(&id) = self.atoms.get(name) {
            return Ok(id);
        }
        let id = self.conn.intern_atom(false, name.as_bytes()).map_err(x11_err)?.reply().map_err(x11_err)?.atom;
        self.atoms.insert(name.to_string(), id);
        Ok(id)
    }

    fn atom_name(&self, atom: u32) -> Result<String> {
        let reply = self.conn.get_atom_name(atom).map_err(x11_err)?.reply().map_err(x11_err)?;
        String::from_utf8(reply.name).map_err(|e| x11_err(e))
    }

    fn configure_window(&mut self, win: u32, geom: Rect, bw: u32) -> Result<()> {
        let aux = ConfigureWindowAux::new()
            .x(geom.x)
            .y(geom.y)
            .width(geom.w)
            .height(geom.h)
            .border_width(bw);
        self.conn.configure_window(win, &aux).map_err(x11_err)?;
        Ok(())
    }

    fn send_configure_notify(&mut self, win: u32, geom: Rect, bw: u32) -> Result<()> {
        let event = ConfigureNotifyEvent {
            response_type: CONFIGURE_NOTIFY_EVENT,
            sequence: 0,
            event: win,
            window: win,
            above_sibling: x11rb::NONE,
            x: geom.x as i16,
            y: geom.y as i16,
            width: geom.w as u16,
            height: geom.h as u16,
            border_width: bw as u16,
            override_redirect: false,
        };
        self.conn
            .send_event(false, win, EventMask::STRUCTURE_NOTIFY, event)
            .map_err(x11_err)?;
        Ok(())
    }

    fn raise_window(&mut self, win: u32) -> Result<()> {
        let aux = ConfigureWindowAux::new().stack_mode(StackMode::ABOVE);
        self.conn.configure_window(win, &aux).map_err(x11_err)?;
        Ok(())
    }

    fn restack_windows(&mut self, order: &[u32], sibling: Option<u32>) -> Result<()> {
        let mut above = sibling;
        for &win in order {
            let mut aux = ConfigureWindowAux::new().stack_mode(StackMode::ABOVE);
            if let Some(s) = above {
                aux = aux.sibling(s);
            }
            self.conn.configure_window(win, &aux).map_err(x11_err)?;
            above = Some(win);
        }
        Ok(())
    }

    fn map_window(&mut self, win: u32) -> Result<()> {
        self.conn.map_window(win).map_err(x11_err)?;
        Ok(())
    }

    fn unmap_window(&mut self, win: u32) -> Result<()> {
        self.conn.unmap_window(win).map_err(x11_err)?;
        Ok(())
    }

    fn kill_window(&mut self, win: u32) -> Result<()> {
        self.conn.kill_client(win).map_err(x11_err)?;
        Ok(())
    }

    fn create_check_window(&mut self) -> Result<u32> {
        let win = self.conn.generate_id().map_err(x11_err)?;
        self.conn
            .create_window(COPY_DEPTH_FROM_PARENT, win, self.root, -1, -1, 1, 1, 0, WindowClass::INPUT_ONLY, 0, &CreateWindowAux::new())
            .map_err(x11_err)?;
        self.check_windows.push(win);
        Ok(win)
    }

    fn create_bar_window(&mut self, geom: crate::geometry::Rect) -> Result<u32> {
        let win = self.conn.generate_id().map_err(x11_err)?;
        // background_pixmap(1) is X11's ParentRelative; x11rb has no named constant for it.
        let aux = CreateWindowAux::new().override_redirect(1).background_pixmap(1u32).event_mask(EventMask::BUTTON_PRESS | EventMask::EXPOSURE);
        self.conn
            .create_window(
                COPY_DEPTH_FROM_PARENT,
                win,
                self.root,
                geom.x as i16,
                geom.y as i16,
                geom.w as u16,
                geom.h as u16,
                0,
                WindowClass::INPUT_OUTPUT,
                0,
                &aux,
            )
            .map_err(x11_err)?;
        let class = [b"tilewm\0".as_slice(), b"tilewm\0".as_slice()].concat();
        self.conn.change_property8(PropMode::REPLACE, win, AtomEnum::WM_CLASS, AtomEnum::STRING, &class).map_err(x11_err)?;
        self.conn.map_window(win).map_err(x11_err)?;
        self.check_windows.push(win);
        Ok(win)
    }

    fn destroy_window(&mut self, win: u32) -> Result<()> {
        self.conn.destroy_window(win).map_err(x11_err)?;
        self.check_windows.retain(|&w| w != win);
        Ok(())
    }

    fn set_input_focus(&mut self, win: Option<u32>) -> Result<()> {
        let target = win.unwrap_or(self.root);
        self.conn
            .set_input_focus(InputFocus::POINTER_ROOT, target, x11rb::CURRENT_TIME)
            .map_err(x11_err)?;
        Ok(())
    }

    fn send_take_focus(&mut self, win: u32) -> Result<()> {
        let wm_protocols = self.atom("WM_PROTOCOLS")?;
        let wm_take_focus = self.atom("WM_TAKE_FOCUS")?;
        let data = ClientMessageData::from([wm_take_focus, x11rb::CURRENT_TIME, 0, 0, 0]);
        let event = ClientMessageEvent::new(32, win, wm_protocols, data);
        self.conn.send_event(false, win, EventMask::NO_EVENT, event).map_err(x11_err)?;
        Ok(())
    }

    fn send_delete(&mut self, win: u32) -> Result<()> {
        let wm_protocols = self.atom("WM_PROTOCOLS")?;
        let wm_delete = self.atom("WM_DELETE_WINDOW")?;
        let data = ClientMessageData::from([wm_delete, x11rb::CURRENT_TIME, 0, 0, 0]);
        let event = ClientMessageEvent::new(32, win, wm_protocols, data);
        self.conn.send_event(false, win, EventMask::NO_EVENT, event).map_err(x11_err)?;
        Ok(())
    }

    fn send_client_message(&mut self, win: u32, message_type: u32, data: [u32; 5]) -> Result<()> {
        let event = ClientMessageEvent::new(32, win, message_type, ClientMessageData::from(data));
        self.conn.send_event(false, win, EventMask::NO_EVENT, event).map_err(x11_err)?;
        Ok(())
    }

    fn set_border_color(&mut self, win: u32, pixel: u32) -> Result<()> {
        let aux = ChangeWindowAttributesAux::new().border_pixel(pixel);
        self.conn.change_window_attributes(win, &aux).map_err(x11_err)?;
        let _ = self.colormap;
        Ok(())
    }

    fn select_client_input(&mut self, win: u32) -> Result<()> {
        let aux = ChangeWindowAttributesAux::new().event_mask(
            EventMask::ENTER_WINDOW | EventMask::FOCUS_CHANGE | EventMask::PROPERTY_CHANGE | EventMask::STRUCTURE_NOTIFY,
        );
        self.conn.change_window_attributes(win, &aux).map_err(x11_err)?;
        Ok(())
    }

    fn grab_buttons(&mut self, win: u32, focused: bool) -> Result<()> {
        self.conn
            .ungrab_button(ButtonIndex::ANY, win, u16::from(ModMask::ANY).into())
            .map_err(x11_err)?;
        if !focused {
            self.conn
                .grab_button(
                    false,
                    win,
                    (u32::from(EventMask::BUTTON_PRESS) as u16).into(),
                    GrabMode::SYNC,
                    GrabMode::SYNC,
                    x11rb::NONE,
                    x11rb::NONE,
                    ButtonIndex::ANY,
                    ModMask::ANY,
                )
                .map_err(x11_err)?;
            return Ok(());
        }
        let mods = [0u16, u16::from(ModMask::LOCK), self.numlock_mask, u16::from(ModMask::LOCK) | self.numlock_mask];
        for binding in self.buttons.clone() {
            let button_mask: u16 = binding.modifiers.iter().fold(0u16, |acc, &m| acc | u16::from(m));
            for extra in mods {
                self.conn
                    .grab_button(
                        false,
                        win,
                        (u32::from(EventMask::BUTTON_PRESS) as u16).into(),
                        GrabMode::ASYNC,
                        GrabMode::ASYNC,
                        x11rb::NONE,
                        x11rb::NONE,
                        ButtonIndex::from(u8::from(binding.button)),
                        u16::from(ModMask::from(button_mask | extra)).into(),
                    )
                    .map_err(x11_err)?;
            }
        }
        Ok(())
    }

    fn grab_keys(&mut self) -> Result<()> {
        self.conn.ungrab_key(Grab::ANY, self.root, u16::from(ModMask::ANY).into()).map_err(x11_err)?;
        let extras = [0u16, u16::from(ModMask::LOCK), self.numlock_mask, u16::from(ModMask::LOCK) | self.numlock_mask];
        for binding in self.keys.clone() {
            let Ok(keysym) = binding.keysym.parse::<XKeySym>() else {
                continue;
            };
            let base_mask: u16 = binding.modifiers.iter().fold(0u16, |acc, &m| acc | u16::from(m));
            for code in self.keycodes_for_keysym(keysym.code()) {
                for extra in extras {
                    self.conn
                        .grab_key(false, self.root, ModMask::from(base_mask | extra), code, GrabMode::ASYNC, GrabMode::ASYNC)
                        .map_err(x11_err)?;
                }
            }
        }
        Ok(())
    }

    fn warp_pointer(&mut self, win: u32, x: i32, y: i32) -> Result<()> {
        self.conn
            .warp_pointer(x11rb::NONE, win, 0, 0, 0, 0, x as i16, y as i16)
            .map_err(x11_err)?;
        Ok(())
    }

    fn grab_pointer(&mut self, cursor: u32) -> Result<bool> {
        let reply = self
            .conn
            .grab_pointer(
                false,
                self.root,
                (u32::from(EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE | EventMask::POINTER_MOTION) as u16).into(),
                GrabMode::ASYNC,
                GrabMode::ASYNC,
                x11rb::NONE,
                cursor,
                x11rb::CURRENT_TIME,
            )
            .map_err(x11_err)?
            .reply()
            .map_err(x11_err)?;
        Ok(reply.status == GrabStatus::SUCCESS)
    }

    fn ungrab_pointer(&mut self) -> Result<()> {
        self.conn.ungrab_pointer(x11rb::CURRENT_TIME).map_err(x11_err)?;
        Ok(())
    }

    fn get_geometry(&self, win: u32) -> Result<(Rect, u32)> {
        let g = self.conn.get_geometry(win).map_err(x11_err)?.reply().map_err(x11_err)?;
        Ok((Rect::new(g.x as i32, g.y as i32, g.width as u32, g.height as u32), g.border_width as u32))
    }

    fn get_title(&self, win: u32) -> Result<String> {
        let net_wm_name = self.atoms.get("_NET_WM_NAME").copied();
        if let Some(atom) = net_wm_name {
            if let Ok(Some(name)) = self.get_text_property(win, atom) {
                if !name.is_empty() {
                    return Ok(name);
                }
            }
        }
        match self.get_text_property(win, AtomEnum::WM_NAME.into())? {
            Some(name) if !name.is_empty() => Ok(name),
            _ => Ok("broken".to_string()),
        }
    }

    fn get_class(&self, win: u32) -> Result<(String, String)> {
        let reply = self
            .conn
            .get_property(false, win, AtomEnum::WM_CLASS, AtomEnum::STRING, 0, u32::MAX)
            .map_err(x11_err)?
            .reply()
            .map_err(x11_err)?;
        let text = String::from_utf8_lossy(&reply.value);
        let mut parts = text.split('\0').filter(|s| !s.is_empty());
        let instance = parts.next().unwrap_or_default().to_string();
        let class = parts.next().unwrap_or_default().to_string();
        Ok((class, instance))
    }

    fn get_normal_hints(&self, win: u32) -> Result<WmNormalHints> {
        let reply = self
            .conn
            .get_property(false, win, AtomEnum::WM_NORMAL_HINTS, AtomEnum::WM_SIZE_HINTS, 0, 18)
            .map_err(x11_err)?
            .reply()
            .map_err(x11_err)?;
        let words: Vec<i32> = reply.value32().map(|v| v.map(|w| w as i32).collect()).unwrap_or_default();
        if words.len() < 18 {
            return Ok(WmNormalHints::default());
        }
        let mut raw = [0i32; 18];
        raw.copy_from_slice(&words[..18]);
        Ok(WmNormalHints::from_raw(&raw))
    }

    fn get_wm_hints(&self, win: u32) -> Result<WmHints> {
        let reply = self
            .conn
            .get_property(false, win, AtomEnum::WM_HINTS, AtomEnum::WM_HINTS, 0, 9)
            .map_err(x11_err)?
            .reply()
            .map_err(x11_err)?;
        let words: Vec<u32> = reply.value32().map(|v| v.collect()).unwrap_or_default();
        if words.is_empty() {
            return Ok(WmHints::default());
        }
        let flags = words[0];
        let input = words.get(1).copied().unwrap_or(1) != 0;
        Ok(WmHints::from_raw(flags, input))
    }

    fn get_transient_for(&self, win: u32) -> Result<Option<u32>> {
        let reply = self
            .conn
            .get_property(false, win, AtomEnum::WM_TRANSIENT_FOR, AtomEnum::WINDOW, 0, 1)
            .map_err(x11_err)?
            .reply()
            .map_err(x11_err)?;
        Ok(reply.value32().and_then(|mut v| v.next()).filter(|&w| w != 0))
    }

    fn get_window_type(&self, win: u32) -> Result<Vec<u32>> {
        let Some(&atom) = self.atoms.get("_NET_WM_WINDOW_TYPE") else {
            return Ok(Vec::new());
        };
        let reply = self.conn.get_property(false, win, atom, AtomEnum::ATOM, 0, u32::MAX).map_err(x11_err)?.reply().map_err(x11_err)?;
        Ok(reply.value32().map(|v| v.collect()).unwrap_or_default())
    }

    fn get_net_wm_state(&self, win: u32) -> Result<Vec<u32>> {
        let Some(&atom) = self.atoms.get("_NET_WM_STATE") else {
            return Ok(Vec::new());
        };
        let reply = self.conn.get_property(false, win, atom, AtomEnum::ATOM, 0, u32::MAX).map_err(x11_err)?.reply().map_err(x11_err)?;
        Ok(reply.value32().map(|v| v.collect()).unwrap_or_default())
    }

    fn supports_protocol(&self, win: u32, atom: u32) -> Result<bool> {
        let protocols_atom = self.atoms.get("WM_PROTOCOLS").copied().unwrap_or(0);
        let reply = self.conn.get_property(false, win, protocols_atom, AtomEnum::ATOM, 0, u32::MAX);
        let Ok(reply) = reply else {
            return Ok(false);
        };
        let Ok(reply) = reply.reply() else {
            return Ok(false);
        };
        Ok(reply.value32().map(|mut v| v.any(|a| a == atom)).unwrap_or(false))
    }

    fn is_override_redirect(&self, win: u32) -> Result<bool> {
        let attrs = self.conn.get_window_attributes(win).map_err(x11_err)?.reply().map_err(x11_err)?;
        Ok(attrs.override_redirect)
    }

    fn set_wm_state_normal(&mut self, win: u32) -> Result<()> {
        let atom = self.atom("WM_STATE")?;
        self.conn
            .change_property32(PropMode::REPLACE, win, atom, atom, &[1u32, 0u32])
            .map_err(x11_err)?;
        Ok(())
    }

    fn append_client_list(&mut self, win: u32) -> Result<()> {
        let atom = self.atom("_NET_CLIENT_LIST")?;
        self.conn
            .change_property32(PropMode::APPEND, self.root, atom, AtomEnum::WINDOW, &[win])
            .map_err(x11_err)?;
        Ok(())
    }

    fn set_client_list(&mut self, wins: &[u32]) -> Result<()> {
        let atom = self.atom("_NET_CLIENT_LIST")?;
        self.conn
            .change_property32(PropMode::REPLACE, self.root, atom, AtomEnum::WINDOW, wins)
            .map_err(x11_err)?;
        Ok(())
    }

    fn set_active_window(&mut self, win: Option<u32>) -> Result<()> {
        let atom = self.atom("_NET_ACTIVE_WINDOW")?;
        match win {
            Some(w) => {
                self.conn.change_property32(PropMode::REPLACE, self.root, atom, AtomEnum::WINDOW, &[w]).map_err(x11_err)?;
            }
            None => {
                self.conn.delete_property(self.root, atom).map_err(x11_err)?;
            }
        }
        Ok(())
    }

    fn set_net_wm_state(&mut self, win: u32, atoms: &[u32]) -> Result<()> {
        let atom = self.atom("_NET_WM_STATE")?;
        self.conn
            .change_property32(PropMode::REPLACE, win, atom, AtomEnum::ATOM, atoms)
            .map_err(x11_err)?;
        Ok(())
    }

    fn set_supported(&mut self, atoms: &[u32]) -> Result<()> {
        let atom = self.atom("_NET_SUPPORTED")?;
        self.conn
            .change_property32(PropMode::REPLACE, self.root, atom, AtomEnum::ATOM, atoms)
            .map_err(x11_err)?;
        Ok(())
    }

    fn set_supporting_wm_check(&mut self, check_win: u32, name: &str) -> Result<()> {
        let check_atom = self.atom("_NET_SUPPORTING_WM_CHECK")?;
        let utf8 = self.atom("UTF8_STRING")?;
        let name_atom = self.atom("_NET_WM_NAME")?;
        self.conn.change_property32(PropMode::REPLACE, self.root, check_atom, AtomEnum::WINDOW, &[check_win]).map_err(x11_err)?;
        self.conn.change_property32(PropMode::REPLACE, check_win, check_atom, AtomEnum::WINDOW, &[check_win]).map_err(x11_err)?;
        self.conn.change_property8(PropMode::REPLACE, check_win, name_atom, utf8, name.as_bytes()).map_err(x11_err)?;
        Ok(())
    }

    fn root_name(&self) -> Result<String> {
        Ok(self.get_text_property(self.root, AtomEnum::WM_NAME.into())?.unwrap_or_default())
    }

    fn query_tree(&self) -> Result<Vec<u32>> {
        let reply = self.conn.query_tree(self.root).map_err(x11_err)?.reply().map_err(x11_err)?;
        Ok(reply.children)
    }

    fn grab_server(&mut self) -> Result<()> {
        self.conn.grab_server().map_err(x11_err)?;
        Ok(())
    }

    fn ungrab_server(&mut self) -> Result<()> {
        self.conn.ungrab_server().map_err(x11_err)?;
        Ok(())
    }

    fn become_wm(&mut self) -> Result<()> {
        let aux = ChangeWindowAttributesAux::new().event_mask(
            EventMask::SUBSTRUCTURE_REDIRECT
                | EventMask::SUBSTRUCTURE_NOTIFY
                | EventMask::BUTTON_PRESS
                | EventMask::ENTER_WINDOW
                | EventMask::STRUCTURE_NOTIFY
                | EventMask::PROPERTY_CHANGE,
        );
        self.conn
            .change_window_attributes(self.root, &aux)
            .map_err(x11_err)?
            .check()
            .map_err(|_| Error::OtherWmRunning)?;
        Ok(())
    }

    fn numlock_mask(&self) -> u16 {
        self.numlock_mask
    }
}

