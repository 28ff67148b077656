//! Compile-time configuration surface (§6).
//!
//! Everything here is built once by the consumer binary and handed to [`crate::state::WmState`]
//! at startup; there is no runtime reconfiguration (§1 non-goals). Color strings, fonts, and the
//! spawn command table are opaque payloads forwarded to the external draw/spawn collaborators —
//! this crate never parses a color or a font descriptor itself.

use crate::bindings::{KeyBinding, MouseBinding};

/// Index into [`Config::colors`]: the two color schemes a bar element can be painted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Unselected / inactive.
    Norm,
    /// Selected / active.
    Sel,
    /// Status text, drawn on the root monitor only.
    Status,
}

/// `{fg, bg, border}` hex color strings for one scheme, handed verbatim to the draw
/// collaborator's `scheme_create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorScheme {
    /// Foreground (text) color.
    pub fg: String,
    /// Background color.
    pub bg: String,
    /// Border color.
    pub border: String,
}

/// A tiling/floating arrangement function plus its displayed symbol.
///
/// `arrange == None` means "floating": no client geometry is touched by [`crate::layout`].
#[derive(Clone)]
pub struct Layout {
    /// Displayed in the bar's layout-symbol zone, e.g. `"[]="`, `"><>"`, `"[M]"`.
    pub symbol: &'static str,
    /// The arrangement function, or `None` for the floating pseudo-layout.
    pub arrange: Option<fn(&mut crate::state::WmState, &mut dyn crate::x::XConn, crate::monitor::MonitorId)>,
}

impl std::fmt::Debug for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layout")
            .field("symbol", &self.symbol)
            .field("arrange", &self.arrange.map(|_| "<fn>"))
            .finish()
    }
}

/// A rule matched against a newly-managed client's class/instance/title (§4.6 `manage`).
#[derive(Debug, Clone, Default)]
pub struct Rule {
    /// WM_CLASS class component, matched as a substring.
    pub class: Option<String>,
    /// WM_CLASS instance component, matched as a substring.
    pub instance: Option<String>,
    /// Window title, matched as a substring.
    pub title: Option<String>,
    /// Tags to assign if this rule matches (0 keeps the client's monitor's current tags).
    pub tags: u32,
    /// Force floating if this rule matches.
    pub isfloating: bool,
    /// Preferred monitor index, or `None` to leave on the monitor it was mapped on.
    pub monitor: Option<i32>,
}

/// Everything the consumer binary compiles in and hands to the window manager at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Tag labels, in bit order; at most 31 entries (bit 31 is reserved, §3).
    pub tags: Vec<String>,
    /// Font descriptors, consumed by the draw collaborator's `fontset_create`.
    pub fonts: Vec<String>,
    /// Color schemes, indexed by [`Scheme`].
    pub colors: [ColorScheme; 3],
    /// Border width in pixels for every managed client.
    pub borderpx: u32,
    /// Snap distance in pixels for interactive move/resize edge-snapping.
    pub snap: u32,
    /// Whether the bar starts visible.
    pub showbar: bool,
    /// Whether the bar is drawn at the top (`true`) or bottom (`false`) of the monitor.
    pub topbar: bool,
    /// Initial master-area fraction, in `[0.05, 0.95]`.
    pub mfact: f64,
    /// Initial master-area client count.
    pub nmaster: u32,
    /// Whether floating/tiled clients honor ICCCM size hints beyond the cosmetic floor.
    pub resizehints: bool,
    /// Whether `focusstack` refuses to move focus away from a fullscreen client.
    pub lockfullscreen: bool,
    /// Available layouts; `layouts[0]` is the default `lt[0]`, `layouts[1]` seeds `lt[1]`.
    pub layouts: Vec<Layout>,
    /// Rule table consulted by `manage`, in order; first match per field wins.
    pub rules: Vec<Rule>,
    /// Key bindings.
    pub keys: Vec<KeyBinding>,
    /// Mouse bindings.
    pub buttons: Vec<MouseBinding>,
    /// Argv template for the launcher (`dmenucmd[0]` is the executable); the `dmenumon` slot is
    /// overwritten with the selected monitor's number before every `spawn` (dwm's own
    /// `dmenumon[2]` buffer patched by `if (arg->v == dmenucmd) ...` in `spawn`).
    pub dmenucmd: Vec<String>,
    /// Index into `dmenucmd` of the argument that receives the current monitor number.
    pub dmenumon: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tags: (1..=9).map(|i| i.to_string()).collect(),
            fonts: vec!["monospace:size=10".to_string()],
            colors: [
                ColorScheme {
                    fg: "#bbbbbb".into(),
                    bg: "#222222".into(),
                    border: "#444444".into(),
                },
                ColorScheme {
                    fg: "#eeeeee".into(),
                    bg: "#005577".into(),
                    border: "#005577".into(),
                },
                ColorScheme {
                    fg: "#bbbbbb".into(),
                    bg: "#222222".into(),
                    border: "#444444".into(),
                },
            ],
            borderpx: 1,
            snap: 32,
            showbar: true,
            topbar: true,
            mfact: 0.55,
            nmaster: 1,
            resizehints: false,
            lockfullscreen: true,
            layouts: vec![
                Layout {
                    symbol: "[]=",
                    arrange: Some(crate::layout::tile),
                },
                Layout {
                    symbol: "><>",
                    arrange: None,
                },
                Layout {
                    symbol: "[M]",
                    arrange: Some(crate::layout::monocle),
                },
            ],
            rules: Vec::new(),
            keys: Vec::new(),
            buttons: Vec::new(),
            dmenucmd: vec!["dmenu_run".to_string(), "-m".to_string(), "0".to_string()],
            dmenumon: 2,
        }
    }
}

impl Config {
    /// The bitmask covering every defined tag (§3 `TAGMASK`).
    pub fn tagmask(&self) -> u32 {
        if self.tags.is_empty() {
            0
        } else {
            (1u32 << self.tags.len()) - 1
        }
    }
}
