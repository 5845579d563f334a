//! Fixed property catalog for a shortcut record.
//!
//! Every question about a property name (does it exist, what type is it,
//! where does it go on the wire) is answered here. Names are matched
//! case-insensitively through [`canonical`].

use crate::error::SchemaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    UInt32,
    Text,
    TextArray,
}

impl PropKind {
    pub fn name(self) -> &'static str {
        match self {
            PropKind::UInt32 => "uint32",
            PropKind::Text => "string",
            PropKind::TextArray => "string array",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropDefault {
    UInt32(u32),
    Text(&'static str),
    EmptyArray,
}

#[derive(Debug, Clone, Copy)]
pub struct PropInfo {
    /// Canonical snake_case name used by the JSON bridge and editors.
    pub name: &'static str,
    /// Key written to the file. `None` for `index`, which is the record's
    /// own key on the wire.
    pub wire_name: Option<&'static str>,
    pub kind: PropKind,
    /// Write position, contiguous from 0.
    pub order: usize,
    pub default: PropDefault,
}

const fn prop(
    name: &'static str,
    wire_name: Option<&'static str>,
    kind: PropKind,
    order: usize,
    default: PropDefault,
) -> PropInfo {
    PropInfo {
        name,
        wire_name,
        kind,
        order,
        default,
    }
}

use PropDefault as D;
use PropKind as K;

/// All known properties, sorted by `order`.
pub static PROPS: [PropInfo; 18] = [
    prop("index", None, K::UInt32, 0, D::UInt32(0)),
    prop("app_id", Some("appid"), K::UInt32, 1, D::UInt32(0)),
    prop("app_name", Some("AppName"), K::Text, 2, D::Text("ERROR")),
    prop("exe", Some("Exe"), K::Text, 3, D::Text("ERROR")),
    prop("start_dir", Some("StartDir"), K::Text, 4, D::Text("")),
    prop("icon", Some("icon"), K::Text, 5, D::Text("")),
    prop("shortcut_path", Some("ShortcutPath"), K::Text, 6, D::Text("")),
    prop("launch_options", Some("LaunchOptions"), K::Text, 7, D::Text("")),
    prop("is_hidden", Some("IsHidden"), K::UInt32, 8, D::UInt32(0)),
    prop("allow_desktop_config", Some("AllowDesktopConfig"), K::UInt32, 9, D::UInt32(0)),
    prop("allow_overlay", Some("AllowOverlay"), K::UInt32, 10, D::UInt32(0)),
    prop("open_vr", Some("OpenVR"), K::UInt32, 11, D::UInt32(0)),
    prop("devkit", Some("Devkit"), K::UInt32, 12, D::UInt32(0)),
    prop("devkit_game_id", Some("DevkitGameID"), K::Text, 13, D::Text("")),
    prop("devkit_override_app_id", Some("DevkitOverrideAppID"), K::UInt32, 14, D::UInt32(0)),
    prop("last_play_time", Some("LastPlayTime"), K::UInt32, 15, D::UInt32(0)),
    prop("flatpak_app_id", Some("FlatpakAppID"), K::Text, 16, D::Text("")),
    prop("tags", Some("tags"), K::TextArray, 17, D::EmptyArray),
];

pub const INDEX: &str = "index";

/// Outcome of [`validate`]; a value rather than an error so callers can
/// branch before committing an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    Ok,
    InvalidKey,
    InvalidValue,
    InvalidArrayValue,
}

/// Case folding applied to every property name before lookup.
pub fn canonical(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

pub fn lookup(name: &str) -> Option<&'static PropInfo> {
    let name = canonical(name);
    PROPS.iter().find(|p| p.name == name)
}

/// Finds a property by its on-wire key. `key` is expected lowercased, as
/// the decoder leaves it.
pub fn lookup_wire(key: &str) -> Option<&'static PropInfo> {
    PROPS
        .iter()
        .find(|p| p.wire_name.is_some_and(|w| w.eq_ignore_ascii_case(key)))
}

pub fn require(name: &str) -> Result<&'static PropInfo, SchemaError> {
    lookup(name).ok_or_else(|| SchemaError::UnknownProperty {
        name: name.to_string(),
    })
}

pub fn is_uint32(name: &str) -> Result<bool, SchemaError> {
    Ok(require(name)?.kind == PropKind::UInt32)
}
pub fn is_text(name: &str) -> Result<bool, SchemaError> {
    Ok(require(name)?.kind == PropKind::Text)
}
pub fn is_text_array(name: &str) -> Result<bool, SchemaError> {
    Ok(require(name)?.kind == PropKind::TextArray)
}

pub fn validate(key: &str, value: &str, skip_value_check: bool) -> Validation {
    let Some(info) = lookup(key) else {
        return Validation::InvalidKey;
    };
    if skip_value_check {
        return Validation::Ok;
    }
    match info.kind {
        PropKind::UInt32 => match value.trim().parse::<u32>() {
            Ok(0) if info.name == "app_id" => Validation::InvalidValue,
            Ok(_) => Validation::Ok,
            Err(_) => Validation::InvalidValue,
        },
        PropKind::Text if info.name == "app_name" && value.is_empty() => Validation::InvalidValue,
        PropKind::Text => Validation::Ok,
        PropKind::TextArray => match parse_text_array(value) {
            Ok(_) => Validation::Ok,
            Err(_) => Validation::InvalidArrayValue,
        },
    }
}

/// Parses a JSON literal that must be an array of strings.
pub fn parse_text_array(json: &str) -> Result<Vec<String>, SchemaError> {
    let not_array = || SchemaError::NotAnArray {
        value: json.to_string(),
    };
    let serde_json::Value::Array(items) =
        serde_json::from_str::<serde_json::Value>(json).map_err(|_| not_array())?
    else {
        return Err(not_array());
    };
    items
        .into_iter()
        .map(|it| match it {
            serde_json::Value::String(s) => Ok(s),
            _ => Err(not_array()),
        })
        .collect()
}

/// Renders a string list as a compact JSON array literal.
pub fn render_text_array(items: &[String]) -> String {
    let arr = items
        .iter()
        .map(|s| serde_json::Value::String(s.clone()))
        .collect();
    serde_json::Value::Array(arr).to_string()
}

/// Re-renders a JSON string-array literal in normalized form, with embedded
/// quotes and backslashes escaped.
pub fn encode_text_array(json: &str) -> Result<String, SchemaError> {
    Ok(render_text_array(&parse_text_array(json)?))
}
