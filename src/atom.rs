//! X atom names interned at startup (§6).
use strum::*;

/// The fixed set of ICCCM/EWMH atoms this window manager knows about.
///
/// `Atom::iter()` drives a single batched `InternAtom` round-trip in
/// [`crate::x::rustconn::RustConn::new`]: all requests are sent before any reply is awaited.
#[derive(AsRefStr, EnumString, EnumIter, Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Atom {
    /// UTF8_STRING
    #[strum(serialize = "UTF8_STRING")]
    Utf8String,
    /// WM_PROTOCOLS
    #[strum(serialize = "WM_PROTOCOLS")]
    WmProtocols,
    /// WM_DELETE_WINDOW
    #[strum(serialize = "WM_DELETE_WINDOW")]
    WmDeleteWindow,
    /// WM_STATE
    #[strum(serialize = "WM_STATE")]
    WmState,
    /// WM_TAKE_FOCUS
    #[strum(serialize = "WM_TAKE_FOCUS")]
    WmTakeFocus,
    /// WM_NAME
    #[strum(serialize = "WM_NAME")]
    WmName,
    /// WM_HINTS
    #[strum(serialize = "WM_HINTS")]
    WmHints,
    /// WM_NORMAL_HINTS
    #[strum(serialize = "WM_NORMAL_HINTS")]
    WmNormalHints,
    /// WM_TRANSIENT_FOR
    #[strum(serialize = "WM_TRANSIENT_FOR")]
    WmTransientFor,
    /// _NET_ACTIVE_WINDOW
    #[strum(serialize = "_NET_ACTIVE_WINDOW")]
    NetActiveWindow,
    /// _NET_SUPPORTED
    #[strum(serialize = "_NET_SUPPORTED")]
    NetSupported,
    /// _NET_WM_NAME
    #[strum(serialize = "_NET_WM_NAME")]
    NetWmName,
    /// _NET_WM_STATE
    #[strum(serialize = "_NET_WM_STATE")]
    NetWmState,
    /// _NET_SUPPORTING_WM_CHECK
    #[strum(serialize = "_NET_SUPPORTING_WM_CHECK")]
    NetWmCheck,
    /// _NET_WM_STATE_FULLSCREEN
    #[strum(serialize = "_NET_WM_STATE_FULLSCREEN")]
    NetWmFullscreen,
    /// _NET_WM_WINDOW_TYPE
    #[strum(serialize = "_NET_WM_WINDOW_TYPE")]
    NetWmWindowType,
    /// _NET_WM_WINDOW_TYPE_DIALOG
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_DIALOG")]
    NetWmWindowTypeDialog,
    /// _NET_CLIENT_LIST
    #[strum(serialize = "_NET_CLIENT_LIST")]
    NetClientList,
}

/// The atoms written verbatim into `_NET_SUPPORTED`.
///
/// This replicates the reference design exactly: a couple of these (`NetWmCheck`,
/// `NetClientList`) are genuinely supported hints, the rest were only ever interned for internal
/// bookkeeping, but all of them are advertised (§9 design note — preserved, not "fixed").
pub const NET_SUPPORTED: &[Atom] = &[
    Atom::NetActiveWindow,
    Atom::NetSupported,
    Atom::NetWmName,
    Atom::NetWmState,
    Atom::NetWmCheck,
    Atom::NetWmFullscreen,
    Atom::NetWmWindowType,
    Atom::NetWmWindowTypeDialog,
    Atom::NetClientList,
];
