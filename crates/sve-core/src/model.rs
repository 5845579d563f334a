use std::collections::HashMap;

use chrono::{DateTime, Local, Utc};

use crate::error::{DecodeError, SchemaError};
use crate::schema::{self, INDEX, PROPS, PropDefault, PropInfo, PropKind, Validation};
use crate::vdf::{Value, VdfMap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropValue {
    UInt32(u32),
    Text(String),
    TextArray(Vec<String>),
}

impl PropValue {
    pub fn kind(&self) -> PropKind {
        match self {
            PropValue::UInt32(_) => PropKind::UInt32,
            PropValue::Text(_) => PropKind::Text,
            PropValue::TextArray(_) => PropKind::TextArray,
        }
    }
}

impl From<PropDefault> for PropValue {
    fn from(d: PropDefault) -> Self {
        match d {
            PropDefault::UInt32(x) => PropValue::UInt32(x),
            PropDefault::Text(s) => PropValue::Text(s.to_string()),
            PropDefault::EmptyArray => PropValue::TextArray(Vec::new()),
        }
    }
}

/// How [`Shortcut::format_last_played`] renders `last_play_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFormat {
    #[default]
    Raw,
    Utc,
    Local,
    Iso,
}

/// One application shortcut. `index` is the record's key in the collection
/// and is read-only through the property API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    index: u32,
    props: HashMap<&'static str, PropValue>,
}

impl Shortcut {
    /// A record with no properties at all; it cannot be stored until every
    /// schema property is set.
    pub fn empty(index: u32) -> Self {
        Self {
            index,
            props: HashMap::new(),
        }
    }

    pub fn with_defaults(index: u32) -> Self {
        let mut sc = Self::empty(index);
        for p in PROPS.iter().filter(|p| p.wire_name.is_some()) {
            sc.props.insert(p.name, p.default.into());
        }
        sc
    }

    /// Builds a record from its wire map, filling misses with defaults.
    pub fn from_tree(index: u32, map: &VdfMap) -> Result<Self, DecodeError> {
        let mut sc = Self::empty(index);
        for p in PROPS.iter() {
            let Some(wire) = p.wire_name else { continue };
            let value = match map.get(&wire.to_lowercase()) {
                Some(v) => typed_from_wire(index, p, v)?,
                None => {
                    tracing::debug!(index, property = p.name, "property missing, using default");
                    p.default.into()
                }
            };
            sc.props.insert(p.name, value);
        }
        for (key, _) in map.iter() {
            if schema::lookup_wire(key).is_none() {
                tracing::debug!(index, key, "ignoring unknown key");
            }
        }
        Ok(sc)
    }

    /// Wire map for this record, in schema order.
    pub fn to_tree(&self) -> Result<VdfMap, SchemaError> {
        let mut map = VdfMap::with_capacity(PROPS.len());
        for p in PROPS.iter() {
            let Some(wire) = p.wire_name else { continue };
            let value = self.props.get(p.name).ok_or(SchemaError::MissingProperty {
                index: self.index,
                property: p.name,
            })?;
            let node = match value {
                PropValue::UInt32(x) => Value::UInt32(*x),
                PropValue::Text(s) => Value::Text(s.clone()),
                PropValue::TextArray(items) => {
                    let mut tags = VdfMap::with_capacity(items.len());
                    for (i, s) in items.iter().enumerate() {
                        tags.insert(i.to_string(), Value::Text(s.clone()));
                    }
                    Value::Map(tags)
                }
            };
            map.insert(wire, node);
        }
        Ok(map)
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        let info = schema::lookup(name)?;
        self.props.get(info.name)
    }

    /// Property rendered as text: numbers in decimal, tags as a JSON array
    /// literal.
    pub fn prop_to_string(&self, name: &str) -> Option<String> {
        if schema::canonical(name) == INDEX {
            return Some(self.index.to_string());
        }
        Some(match self.get(name)? {
            PropValue::UInt32(x) => x.to_string(),
            PropValue::Text(s) => s.clone(),
            PropValue::TextArray(items) => schema::render_text_array(items),
        })
    }

    pub fn prop_to_u32(&self, name: &str) -> Option<u32> {
        if schema::canonical(name) == INDEX {
            return Some(self.index);
        }
        match self.get(name)? {
            PropValue::UInt32(x) => Some(*x),
            _ => None,
        }
    }

    pub fn set(&mut self, name: &str, value: PropValue) -> Result<(), SchemaError> {
        let info = schema::require(name)?;
        if info.name == INDEX {
            return Err(SchemaError::ReadOnly { property: INDEX });
        }
        if value.kind() != info.kind {
            return Err(SchemaError::TypeMismatch {
                property: info.name,
                expected: info.kind.name(),
                found: value.kind().name(),
            });
        }
        self.props.insert(info.name, value);
        Ok(())
    }

    /// Validates `text` against the schema, then stores it.
    pub fn set_from_str(&mut self, name: &str, text: &str) -> Result<(), SchemaError> {
        let info = schema::require(name)?;
        let invalid = || SchemaError::InvalidValue {
            property: info.name,
            value: text.to_string(),
        };
        match schema::validate(name, text, false) {
            Validation::Ok => {}
            Validation::InvalidKey => {
                return Err(SchemaError::UnknownProperty {
                    name: name.to_string(),
                });
            }
            Validation::InvalidValue => return Err(invalid()),
            Validation::InvalidArrayValue => {
                return Err(SchemaError::NotAnArray {
                    value: text.to_string(),
                });
            }
        }
        let value = match info.kind {
            PropKind::UInt32 => PropValue::UInt32(text.trim().parse().map_err(|_| invalid())?),
            PropKind::Text => PropValue::Text(text.to_string()),
            PropKind::TextArray => PropValue::TextArray(schema::parse_text_array(text)?),
        };
        self.set(name, value)
    }

    pub fn remove(&mut self, name: &str) -> Option<PropValue> {
        let info = schema::lookup(name)?;
        self.props.remove(info.name)
    }

    pub fn tags(&self) -> &[String] {
        match self.props.get("tags") {
            Some(PropValue::TextArray(items)) => items,
            _ => &[],
        }
    }

    pub fn last_played(&self) -> Option<DateTime<Utc>> {
        match self.prop_to_u32("last_play_time")? {
            0 => None,
            ts => DateTime::from_timestamp(i64::from(ts), 0),
        }
    }

    pub fn format_last_played(&self, fmt: TimeFormat) -> String {
        if fmt == TimeFormat::Raw {
            return self.prop_to_string("last_play_time").unwrap_or_default();
        }
        let Some(t) = self.last_played() else {
            return "never".to_string();
        };
        match fmt {
            TimeFormat::Utc => t.format("%Y/%m/%d, %H:%M:%S UTC").to_string(),
            TimeFormat::Local => t.with_timezone(&Local).format("%Y/%m/%d, %H:%M:%S").to_string(),
            TimeFormat::Iso => t.to_rfc3339(),
            TimeFormat::Raw => unreachable!(),
        }
    }
}

fn typed_from_wire(index: u32, p: &PropInfo, v: &Value) -> Result<PropValue, DecodeError> {
    let mismatch = |found: &'static str| DecodeError::TypeMismatch {
        index,
        property: p.name,
        expected: p.kind.name(),
        found,
    };
    match (p.kind, v) {
        (PropKind::UInt32, Value::UInt32(x)) => Ok(PropValue::UInt32(*x)),
        (PropKind::Text, Value::Text(s)) => Ok(PropValue::Text(s.clone())),
        (PropKind::TextArray, Value::Map(m)) => m
            .iter()
            .map(|(_, item)| match item {
                Value::Text(s) => Ok(s.clone()),
                other => Err(mismatch(other.type_name())),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(PropValue::TextArray),
        (_, other) => Err(mismatch(other.type_name())),
    }
}
