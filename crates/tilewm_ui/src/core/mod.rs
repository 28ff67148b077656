//! [`Draw`]: the [`tilewm::bar::Drawer`] implementation, grounded on dwm's `drw.c` — one scratch
//! pixmap sized to the bar, a small vec of allocated color schemes selected by index, and the
//! fontset in [`fontset`] for measuring and rendering text with fontconfig fallback.

use std::collections::HashMap;
use std::ffi::CString;

use tilewm::bar::Drawer;
use tracing::debug;
use x11::xft::{XftColor, XftColorAllocName, XftDraw, XftDrawCreate, XftDrawDestroy, XftDrawStringUtf8};
use x11::xlib::{
    CapButt, Colormap, Display, Drawable, False, JoinMiter, LineSolid, Visual, Window, XCopyArea, XCreateFontCursor, XCreateGC, XCreatePixmap,
    XDefaultColormap, XDefaultDepth, XDefaultScreen, XDefaultVisual, XDrawRectangle, XFillRectangle, XFreeCursor, XFreeGC, XFreePixmap, XOpenDisplay,
    XRootWindow, XSetForeground, XSetLineAttributes, XSync, GC,
};

use crate::{Error, Result};

mod fontset;
use fontset::Fontset;

pub(crate) const SCREEN: i32 = 0;

/// One allocated color scheme: `[fg, bg, border]`, matching the `Clr[3]` array dwm's `scheme[][]`
/// table stores per tag/title state.
type Scheme = [XftColor; 3];

/// The bar's drawable surface plus font/color/cursor state.
///
/// > Construct with [`Draw::new`], then drive it through [`tilewm::bar::Drawer`].
#[derive(Debug)]
pub struct Draw {
    dpy: *mut Display,
    root: Window,
    visual: *mut Visual,
    colormap: Colormap,
    depth: i32,
    gc: GC,
    drawable: Drawable,
    xft_draw: *mut XftDraw,
    w: u32,
    h: u32,
    fonts: Option<std::cell::RefCell<Fontset>>,
    lrpad: u32,
    schemes: Vec<Scheme>,
    cur_scheme: usize,
    cursors: HashMap<u32, x11::xlib::Cursor>,
    next_cursor: u32,
}

impl Draw {
    /// Open the default display and prepare an (initially zero-sized) drawable.
    pub fn new() -> Result<Self> {
        // SAFETY: passing NULL requests the default display, which is always a valid argument.
        let dpy = unsafe { XOpenDisplay(std::ptr::null()) };
        if dpy.is_null() {
            return Err(Error::NoDisplay);
        }
        // SAFETY: dpy is non-null and SCREEN is the default screen, always valid.
        let (root, visual, colormap, depth, gc) = unsafe {
            let screen = XDefaultScreen(dpy);
            let root = XRootWindow(dpy, screen);
            let visual = XDefaultVisual(dpy, screen);
            let colormap = XDefaultColormap(dpy, screen);
            let depth = XDefaultDepth(dpy, screen);
            let gc = XCreateGC(dpy, root, 0, std::ptr::null_mut());
            XSetLineAttributes(dpy, gc, 1, LineSolid, CapButt, JoinMiter);
            (root, visual, colormap, depth, gc)
        };

        Ok(Draw {
            dpy,
            root,
            visual,
            colormap,
            depth,
            gc,
            drawable: 0,
            xft_draw: std::ptr::null_mut(),
            w: 0,
            h: 0,
            fonts: None,
            lrpad: 0,
            schemes: Vec::new(),
            cur_scheme: 0,
            cursors: HashMap::new(),
            next_cursor: 0,
        })
    }

    fn free_drawable(&mut self) {
        if self.drawable != 0 {
            // SAFETY: self.drawable/xft_draw/gc were created against self.dpy and are still alive.
            unsafe {
                if !self.xft_draw.is_null() {
                    XftDrawDestroy(self.xft_draw);
                }
                XFreePixmap(self.dpy, self.drawable);
            }
            self.drawable = 0;
            self.xft_draw = std::ptr::null_mut();
        }
    }

    fn alloc_drawable(&mut self, w: u32, h: u32) {
        self.free_drawable();
        let (w, h) = (w.max(1), h.max(1));
        // SAFETY: self.dpy/root are valid for the lifetime of this Draw.
        unsafe {
            self.drawable = XCreatePixmap(self.dpy, self.root, w, h, self.depth as u32);
            self.xft_draw = XftDrawCreate(self.dpy, self.drawable, self.visual, self.colormap);
        }
        self.w = w;
        self.h = h;
    }

    fn scheme(&self, idx: usize) -> &Scheme {
        &self.schemes[idx.min(self.schemes.len().saturating_sub(1))]
    }
}

impl Drop for Draw {
    fn drop(&mut self) {
        self.free_drawable();
        // SAFETY: self.gc/dpy are non-null and owned exclusively by this Draw.
        unsafe {
            XFreeGC(self.dpy, self.gc);
        }
    }
}

impl Drawer for Draw {
    fn create(&mut self, w: u32, h: u32) {
        self.alloc_drawable(w, h);
    }

    fn destroy(&mut self) {
        self.free_drawable();
    }

    fn resize(&mut self, w: u32, h: u32) {
        self.alloc_drawable(w, h);
    }

    fn fontset_create(&mut self, fonts: &[String]) {
        for name in fonts {
            match Fontset::try_new(self.dpy, name) {
                Ok(fs) => {
                    self.lrpad = fs.primary_height();
                    self.fonts = Some(std::cell::RefCell::new(fs));
                    return;
                }
                Err(e) => debug!(font = %name, error = %e, "font failed to load, trying next"),
            }
        }
    }

    fn getwidth(&self, text: &str) -> u32 {
        let Some(fonts) = &self.fonts else {
            return self.lrpad;
        };
        fonts.borrow_mut().text_width(self.dpy, text) + self.lrpad
    }

    fn line_height(&self) -> u32 {
        self.lrpad
    }

    fn scheme_create(&mut self, colors: &[String; 3]) -> u32 {
        // SAFETY: XftColor is a plain-old-data FFI struct; a zeroed value is immediately
        // overwritten below before use.
        let mut scheme: [XftColor; 3] = unsafe { std::mem::zeroed() };
        for (i, hex) in colors.iter().enumerate() {
            // SAFETY: zeroed XftColor is a harmless stand-in (black) if allocation fails.
            scheme[i] = alloc_color(self.dpy, self.visual, self.colormap, hex).unwrap_or_else(|_| unsafe { std::mem::zeroed() });
        }
        self.schemes.push(scheme);
        (self.schemes.len() - 1) as u32
    }

    fn setscheme(&mut self, scheme: u32) {
        self.cur_scheme = scheme as usize;
    }

    fn text(&mut self, x: i32, y: i32, w: u32, h: u32, pad: u32, text: &str, invert: bool) -> i32 {
        if self.schemes.is_empty() {
            return x + w as i32;
        }
        let [fg, bg, _border] = *self.scheme(self.cur_scheme);
        let (fg, bg) = if invert { (bg, fg) } else { (fg, bg) };

        self.rect_raw(x, y, w, h, bg, true);

        if let Some(fonts) = &self.fonts {
            let fonts = fonts.borrow();
            let tx = x + pad as i32;
            let ty = y + (h as i32 + fonts.primary_ascent_minus_descent()) / 2;
            // SAFETY: self.xft_draw is non-null once `create` has been called.
            if let Ok(c_text) = CString::new(text) {
                unsafe {
                    XftDrawStringUtf8(
                        self.xft_draw,
                        &fg as *const XftColor,
                        fonts.primary_xfont(),
                        tx,
                        ty,
                        c_text.as_ptr() as *const u8,
                        c_text.as_bytes().len() as i32,
                    );
                }
            }
        }
        x + w as i32
    }

    fn rect(&mut self, x: i32, y: i32, w: u32, h: u32, filled: bool, invert: bool) {
        if self.schemes.is_empty() {
            return;
        }
        let [fg, bg, _border] = *self.scheme(self.cur_scheme);
        let color = if invert { bg } else { fg };
        self.rect_raw(x, y, w, h, color, filled);
    }

    fn map(&mut self, win: u32, x: i32, y: i32, w: u32, h: u32) {
        // SAFETY: self.drawable/gc are valid once `create` has been called; win is owned by the
        // consumer and assumed mapped.
        unsafe {
            XCopyArea(self.dpy, self.drawable, win as Window, self.gc, x, y, w, h, x, y);
            XSync(self.dpy, False);
        }
    }

    fn cur_create(&mut self, shape: u32) -> u32 {
        // SAFETY: self.dpy is non-null; `shape` is an XC_* cursor font glyph index.
        let cursor = unsafe { XCreateFontCursor(self.dpy, shape) };
        self.next_cursor += 1;
        self.cursors.insert(self.next_cursor, cursor);
        self.next_cursor
    }

    fn cur_free(&mut self, cur: u32) {
        if let Some(cursor) = self.cursors.remove(&cur) {
            // SAFETY: cursor was created by this Draw and not yet freed.
            unsafe {
                XFreeCursor(self.dpy, cursor);
            }
        }
    }
}

impl Draw {
    fn rect_raw(&self, x: i32, y: i32, w: u32, h: u32, color: XftColor, filled: bool) {
        // SAFETY: self.dpy/drawable/gc are valid once `create` has been called.
        unsafe {
            XSetForeground(self.dpy, self.gc, color.pixel);
            if filled {
                XFillRectangle(self.dpy, self.drawable, self.gc, x, y, w, h);
            } else {
                XDrawRectangle(self.dpy, self.drawable, self.gc, x, y, w.saturating_sub(1), h.saturating_sub(1));
            }
        }
    }
}

fn alloc_color(dpy: *mut Display, visual: *mut Visual, colormap: Colormap, hex: &str) -> Result<XftColor> {
    let c_hex = CString::new(hex)?;
    // SAFETY: zeroed before XftColorAllocName fills it in; checked below.
    let mut color: XftColor = unsafe { std::mem::zeroed() };
    // SAFETY: dpy/visual/colormap come from a live Draw; the result is checked for failure.
    let ok = unsafe { XftColorAllocName(dpy, visual, colormap, c_hex.as_ptr(), &mut color as *mut XftColor) };
    if ok == 0 {
        return Err(Error::InvalidColor(hex.to_string()));
    }
    Ok(color)
}
