//! Binary vdf tree reader
//!
//! The format is a nested key/value tree with no length prefixes:
//!
//! ```text
//! entry   := tag key value
//! tag     := 0x00 (Map) | 0x01 (String) | 0x02 (UInt32)
//! key     := bytes 0x00
//! value   := entry* 0x08      for Map
//!          | bytes 0x00       for String
//!          | u32 (LE)         for UInt32
//! ```
//!
//! A map ends at a `0x08` tag or at the end of the input. The reader knows
//! nothing about shortcuts; see [`crate::model`] for the typed view.
use std::fmt::{self, Write as _};

use crate::cursor::Reader;
use crate::error::DecodeError;

/// Deepest map nesting the decoder accepts. A shortcuts file needs four.
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Tag {
    Map = 0x00,
    String = 0x01,
    UInt32 = 0x02,
    MapEnd = 0x08,
}

impl TryFrom<u8> for Tag {
    type Error = u8;

    fn try_from(b: u8) -> Result<Self, Self::Error> {
        match b {
            0x00 => Ok(Tag::Map),
            0x01 => Ok(Tag::String),
            0x02 => Ok(Tag::UInt32),
            0x08 => Ok(Tag::MapEnd),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    UInt32(u32),
    Text(String),
    Map(VdfMap),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::UInt32(_) => "uint32",
            Value::Text(_) => "string",
            Value::Map(_) => "map",
        }
    }
    pub fn tag(&self) -> Tag {
        match self {
            Value::UInt32(_) => Tag::UInt32,
            Value::Text(_) => Tag::String,
            Value::Map(_) => Tag::Map,
        }
    }
}

/// Insertion-ordered map with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VdfMap {
    entries: Vec<(String, Value)>,
}

impl VdfMap {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_capacity(n: usize) -> Self {
        Self {
            entries: Vec::with_capacity(n),
        }
    }

    /// Inserts `value` under `key`. An existing key keeps its position and
    /// takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let i = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(i).1)
    }
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pretty(&self) -> String {
        let mut out = String::new();
        fmt_map(self, 0, &mut out).ok();
        out
    }
}

fn fmt_map(map: &VdfMap, indent: usize, out: &mut String) -> fmt::Result {
    let pad = " ".repeat(indent);
    for (k, v) in map.iter() {
        match v {
            Value::UInt32(x) => writeln!(out, "{pad}{k}: {x}")?,
            Value::Text(s) => writeln!(out, "{pad}{k}: {s:?}")?,
            Value::Map(m) => {
                writeln!(out, "{pad}{k} {{")?;
                fmt_map(m, indent + 2, out)?;
                writeln!(out, "{pad}}}")?;
            }
        }
    }
    Ok(())
}

/// Decodes a whole buffer as one root map.
pub fn decode(data: &[u8]) -> Result<VdfMap, DecodeError> {
    let mut r = Reader::new(data);
    decode_map(&mut r, 0)
}

/// Decodes map entries until a `MapEnd` tag (consumed) or end of input.
fn decode_map(r: &mut Reader<'_>, depth: usize) -> Result<VdfMap, DecodeError> {
    let mut map = VdfMap::new();
    while let Some(b) = r.read_byte() {
        let offset = r.position() - 1;
        let tag = Tag::try_from(b).map_err(|tag| DecodeError::InvalidTag { tag, offset })?;
        if tag == Tag::MapEnd {
            return Ok(map);
        }
        let key = read_text(r, "key")?.to_lowercase();
        let value = match tag {
            Tag::Map if depth >= MAX_DEPTH => return Err(DecodeError::TooDeep { offset }),
            Tag::Map => Value::Map(decode_map(r, depth + 1)?),
            Tag::String => Value::Text(read_text(r, "string value")?),
            Tag::UInt32 => {
                let offset = r.position();
                Value::UInt32(r.read_u32_le().ok_or(DecodeError::UnexpectedEof {
                    context: "uint32 value",
                    offset,
                })?)
            }
            Tag::MapEnd => unreachable!(),
        };
        tracing::trace!(key = %key, kind = value.type_name(), "decoded entry");
        map.insert(key, value);
    }
    Ok(map)
}

fn read_text(r: &mut Reader<'_>, context: &'static str) -> Result<String, DecodeError> {
    let offset = r.position();
    let bytes = r
        .read_cstring()
        .ok_or(DecodeError::UnexpectedEof { context, offset })?;
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|_| DecodeError::InvalidUtf8 { offset })
}
