//! Keyboard and mouse binding types (§6 `keys`/`buttons` configuration surface).
use std::collections::HashMap;
use strum::EnumIter;

/// Raw numeric keysym, as looked up via [`crate::bindings::CodeMap`].
pub type KeySym = u32;

/// Maps textual keysym names (as used in a user's key table) to their numeric X keycode.
///
/// Built once at startup from the keyboard mapping reported by the X server, mirroring the
/// reference design's `XKeysymToKeycode` lookups performed while grabbing keys.
pub type CodeMap = HashMap<String, u8>;

/// The modifier bits a binding must match, plus the physical keycode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCode {
    /// Raw modifier mask as reported by the X server (already cleaned of lock/numlock bits).
    pub mask: u16,
    /// Physical keycode.
    pub code: u8,
}

impl KeyCode {
    /// Strip a given modifier (typically NumLock) from this code's mask so that keys grabbed
    /// both with and without NumLock compare equal.
    pub fn ignoring_modifier(&self, modifier: u16) -> KeyCode {
        KeyCode {
            mask: self.mask & !modifier,
            code: self.code,
        }
    }
}

/// Mouse buttons recognised by the button table (§6 `buttons`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) button.
    Left,
    /// Middle / wheel-click button.
    Middle,
    /// Secondary (right) button.
    Right,
    /// Scroll wheel up.
    ScrollUp,
    /// Scroll wheel down.
    ScrollDown,
}

impl From<MouseButton> for u8 {
    fn from(b: MouseButton) -> u8 {
        match b {
            MouseButton::Left => 1,
            MouseButton::Middle => 2,
            MouseButton::Right => 3,
            MouseButton::ScrollUp => 4,
            MouseButton::ScrollDown => 5,
        }
    }
}

/// A single modifier key, named so config tables read as `"M-S-Return"` rather than raw masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum ModifierKey {
    /// Control.
    Ctrl,
    /// The configured "Mod" key (usually `Mod1`/Alt or `Mod4`/Super).
    Meta,
    /// Alt (`Mod1`), distinct from `Meta` on keyboards that bind Mod to Super.
    Alt,
    /// Shift.
    Shift,
}

impl TryFrom<&str> for ModifierKey {
    type Error = ();

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "C" => Ok(ModifierKey::Ctrl),
            "M" => Ok(ModifierKey::Meta),
            "A" => Ok(ModifierKey::Alt),
            "S" => Ok(ModifierKey::Shift),
            _ => Err(()),
        }
    }
}

impl From<ModifierKey> for u16 {
    fn from(m: ModifierKey) -> u16 {
        match m {
            ModifierKey::Shift => 1 << 0,
            ModifierKey::Ctrl => 1 << 2,
            ModifierKey::Alt => 1 << 3,
            ModifierKey::Meta => 1 << 6,
        }
    }
}

/// The click location a button binding is scoped to (§4.6 `ButtonPress` zone classification).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickZone {
    /// Clicked one of the tag label boxes; carries the tag's bit if known ahead of time.
    TagBar,
    /// Clicked the layout symbol.
    LayoutSymbol,
    /// Clicked the status text region.
    Status,
    /// Clicked the window title region.
    Title,
    /// Clicked inside a managed client window (not the bar).
    ClientWindow,
    /// Clicked the root window outside any bar or client.
    Root,
}

/// An argument passed to a bound action: either nothing, an integer delta, a float delta, or a
/// tag bitmask (the last is how the tag-bar click binds pass the clicked tag, §4.6).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg {
    /// No argument.
    None,
    /// A signed integer argument (`focusstack(±1)`, `incnmaster(±1)`, `tagmon(±1)`, …).
    Int(i32),
    /// A floating point argument (`setmfact(Δ)`).
    Float(f64),
    /// A tag bitmask argument (`view`, `tag`, `toggleview`, `toggletag`).
    Tags(u32),
}

/// A single key binding: modifiers + keysym name, resolved to a [`KeyCode`] at grab time, plus
/// the action to invoke.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    /// Modifiers that must be held.
    pub modifiers: Vec<ModifierKey>,
    /// Textual keysym name, e.g. `"Return"`, resolved via [`CodeMap`].
    pub keysym: String,
    /// The action to run when this binding fires.
    pub action: Action,
    /// Argument passed to the action.
    pub arg: Arg,
}

/// A single mouse binding, scoped to a click zone.
#[derive(Debug, Clone)]
pub struct MouseBinding {
    /// Which region of the screen this binding applies to.
    pub zone: ClickZone,
    /// Modifiers that must be held.
    pub modifiers: Vec<ModifierKey>,
    /// The button that must be pressed.
    pub button: MouseButton,
    /// The action to run when this binding fires.
    pub action: Action,
    /// Argument passed to the action; `Arg::None` for tag-bar clicks is replaced with the
    /// clicked tag's bit at dispatch time (§4.6).
    pub arg: Arg,
}

/// The set of user actions reachable from key/button tables (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// `view(tagmask)`
    View,
    /// `toggleview(mask)`
    ToggleView,
    /// `tag(mask)`
    Tag,
    /// `toggletag(mask)`
    ToggleTag,
    /// `focusmon(±1)`
    FocusMon,
    /// `tagmon(±1)`
    TagMon,
    /// `focusstack(±1)`
    FocusStack,
    /// `incnmaster(±1)`
    IncNMaster,
    /// `setmfact(Δ)`
    SetMFact,
    /// `setlayout(index into config.layouts, or none to swap)`
    SetLayout,
    /// `zoom`
    Zoom,
    /// `togglefloating`
    ToggleFloating,
    /// `togglebar`
    ToggleBar,
    /// `killclient`
    KillClient,
    /// `quit`
    Quit,
    /// `spawn(dmenucmd)` — always runs `Config::dmenucmd` in full, with the selected monitor's
    /// number patched into the `Config::dmenumon` argv slot first. `Arg` is ignored.
    Spawn,
    /// `movemouse`
    MoveMouse,
    /// `resizemouse`
    ResizeMouse,
}
