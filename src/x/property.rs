//! Parsed WM_HINTS / WM_NORMAL_HINTS property payloads.

use bitflags::bitflags;

use crate::client::SizeHints;

bitflags! {
    /// Flags set in a `WM_HINTS` property, marking which fields are actually populated.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct WmHintsFlags: u32 {
        /// The `input` field is meaningful.
        const INPUT_HINT   = 0b0000_0001;
        /// The `initial_state` field is meaningful.
        const STATE_HINT   = 0b0000_0010;
        /// Window claims urgency.
        const URGENCY_HINT = 0b0001_0000_0000;
    }
}

bitflags! {
    /// Flags set in a `WM_NORMAL_HINTS` property, marking which fields are actually populated.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct WmNormalHintsFlags: u32 {
        /// Minimum size is program-specified.
        const P_MIN_SIZE   = 0b0000_0001_0000;
        /// Maximum size is program-specified.
        const P_MAX_SIZE   = 0b0000_0010_0000;
        /// Resize increments are program-specified.
        const P_RESIZE_INC = 0b0000_0100_0000;
        /// Min/max aspect ratio is program-specified.
        const P_ASPECT     = 0b0000_1000_0000;
        /// Base size is program-specified.
        const P_BASE_SIZE  = 0b0001_0000_0000;
    }
}

/// Parsed `WM_HINTS`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WmHints {
    pub(crate) flags: WmHintsFlags,
    /// `InputHint`: whether the window manager should ever give this window input focus.
    pub accepts_input: bool,
    /// `XUrgencyHint`.
    pub urgent: bool,
}

impl WmHints {
    /// Construct from the raw 32-bit flags word plus the `input` field, matching how
    /// `XGetWMHints` reports them.
    pub fn from_raw(flags: u32, input: bool) -> Self {
        let flags = WmHintsFlags::from_bits_truncate(flags);
        let accepts_input = !flags.contains(WmHintsFlags::INPUT_HINT) || input;
        let urgent = flags.contains(WmHintsFlags::URGENCY_HINT);
        WmHints {
            flags,
            accepts_input,
            urgent,
        }
    }
}

/// Parsed `WM_NORMAL_HINTS`, converted directly into [`SizeHints`] since that is the only shape
/// the layout engine needs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WmNormalHints {
    pub(crate) flags: WmNormalHintsFlags,
    pub hints: SizeHints,
}

impl WmNormalHints {
    /// Construct from the raw 18-field `XSizeHints` payload (flags word followed by the
    /// standard field order: x, y, width, height, min_width, min_height, max_width, max_height,
    /// width_inc, height_inc, min_aspect (num, den), max_aspect (num, den), base_width,
    /// base_height, win_gravity).
    pub fn from_raw(raw: &[i32; 18]) -> Self {
        let flags = WmNormalHintsFlags::from_bits_truncate(raw[0] as u32);
        let mut hints = SizeHints::default();

        if flags.contains(WmNormalHintsFlags::P_BASE_SIZE) {
            hints.basew = raw[13];
            hints.baseh = raw[14];
        } else if flags.contains(WmNormalHintsFlags::P_MIN_SIZE) {
            hints.basew = raw[5];
            hints.baseh = raw[6];
        }

        if flags.contains(WmNormalHintsFlags::P_RESIZE_INC) {
            hints.incw = raw[9];
            hints.inch = raw[10];
        }

        if flags.contains(WmNormalHintsFlags::P_MAX_SIZE) {
            hints.maxw = raw[7];
            hints.maxh = raw[8];
        }

        if flags.contains(WmNormalHintsFlags::P_MIN_SIZE) {
            hints.minw = raw[5];
            hints.minh = raw[6];
        } else if flags.contains(WmNormalHintsFlags::P_BASE_SIZE) {
            hints.minw = raw[13];
            hints.minh = raw[14];
        }

        if flags.contains(WmNormalHintsFlags::P_ASPECT) {
            hints.mina = raw[12] as f64 / raw[11].max(1) as f64;
            hints.maxa = raw[11] as f64 / raw[12].max(1) as f64;
        }

        WmNormalHints { flags, hints }
    }
}
