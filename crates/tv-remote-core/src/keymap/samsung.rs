//! Samsung `KEY_*` payload table for the legacy port-55000 protocol.
//!
//! The television acts on opaque payload strings from the vendor's `KEY_*`
//! namespace. This table maps the short key names accepted by
//! [`super::KeyMap::samsung_default`] to those payloads. The name is the
//! payload with the `KEY_` prefix stripped, so `"VOLUP"` sends `"KEY_VOLUP"`.
//!
//! Reference: the key set accepted by 2008–2013 era televisions speaking
//! this protocol revision. Models ignore (rather than reject) payloads they
//! do not support, so the table errs on the inclusive side.

/// Key name → wire payload pairs for the built-in table.
pub(super) const DEFAULT_KEYS: &[(&str, &str)] = &[
    // Power
    ("POWERON", "KEY_POWERON"),
    ("POWEROFF", "KEY_POWEROFF"),
    // Volume
    ("VOLUP", "KEY_VOLUP"),
    ("VOLDOWN", "KEY_VOLDOWN"),
    ("MUTE", "KEY_MUTE"),
    // Channel
    ("CHUP", "KEY_CHUP"),
    ("CHDOWN", "KEY_CHDOWN"),
    ("PRECH", "KEY_PRECH"),
    ("CH_LIST", "KEY_CH_LIST"),
    // Digits
    ("0", "KEY_0"),
    ("1", "KEY_1"),
    ("2", "KEY_2"),
    ("3", "KEY_3"),
    ("4", "KEY_4"),
    ("5", "KEY_5"),
    ("6", "KEY_6"),
    ("7", "KEY_7"),
    ("8", "KEY_8"),
    ("9", "KEY_9"),
    // Navigation
    ("UP", "KEY_UP"),
    ("DOWN", "KEY_DOWN"),
    ("LEFT", "KEY_LEFT"),
    ("RIGHT", "KEY_RIGHT"),
    ("ENTER", "KEY_ENTER"),
    ("RETURN", "KEY_RETURN"),
    ("EXIT", "KEY_EXIT"),
    // Menus
    ("MENU", "KEY_MENU"),
    ("TOOLS", "KEY_TOOLS"),
    ("INFO", "KEY_INFO"),
    ("GUIDE", "KEY_GUIDE"),
    ("CONTENTS", "KEY_CONTENTS"),
    // Sources
    ("SOURCE", "KEY_SOURCE"),
    ("TV", "KEY_TV"),
    ("DTV", "KEY_DTV"),
    ("HDMI", "KEY_HDMI"),
    // Color keys (the blue button is CYAN in the vendor namespace)
    ("RED", "KEY_RED"),
    ("GREEN", "KEY_GREEN"),
    ("YELLOW", "KEY_YELLOW"),
    ("BLUE", "KEY_CYAN"),
    // Transport
    ("PLAY", "KEY_PLAY"),
    ("PAUSE", "KEY_PAUSE"),
    ("STOP", "KEY_STOP"),
    ("REWIND", "KEY_REWIND"),
    ("FF", "KEY_FF"),
    ("REC", "KEY_REC"),
    // Misc
    ("SLEEP", "KEY_SLEEP"),
    ("PMODE", "KEY_PMODE"),
    ("SMODE", "KEY_SMODE"),
];
