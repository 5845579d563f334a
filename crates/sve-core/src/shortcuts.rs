//! The shortcut collection: a `shortcuts.vdf` file as typed records.
//!
//! On the wire the file is a root map holding one `shortcuts` map, whose
//! keys are decimal indices and whose values are the record maps. Writing
//! always closes both maps, so the file ends with two `MapEnd` bytes.
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{DecodeError, Result, SchemaError};
use crate::model::Shortcut;
use crate::vdf::{self, Value, VdfMap};
use crate::vdf_write;

pub const ROOT_KEY: &str = "shortcuts";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shortcuts {
    shortcuts: BTreeMap<u32, Shortcut>,
}

impl Shortcuts {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn parse(path: &Path) -> Result<Self> {
        let data = fs::read(path)?;
        tracing::debug!(path = %path.display(), len = data.len(), "loaded shortcuts file");
        Ok(Self::parse_bytes(&data)?)
    }

    pub fn parse_bytes(data: &[u8]) -> std::result::Result<Self, DecodeError> {
        let mut root = vdf::decode(data)?;
        let list = match root.remove(ROOT_KEY) {
            Some(Value::Map(m)) => m,
            Some(_) => {
                return Err(DecodeError::NotAMap {
                    key: ROOT_KEY.to_string(),
                });
            }
            None => return Err(DecodeError::MissingShortcuts),
        };
        let mut shortcuts = BTreeMap::new();
        for (key, value) in list.iter() {
            let invalid = || DecodeError::InvalidIndex {
                key: key.to_string(),
            };
            let index: u32 = key.parse().map_err(|_| invalid())?;
            let Value::Map(map) = value else {
                return Err(invalid());
            };
            shortcuts.insert(index, Shortcut::from_tree(index, map)?);
        }
        tracing::debug!(count = shortcuts.len(), "parsed shortcuts");
        Ok(Self { shortcuts })
    }

    pub fn to_bytes(&self) -> std::result::Result<Vec<u8>, SchemaError> {
        let mut list = VdfMap::with_capacity(self.shortcuts.len());
        for (index, sc) in &self.shortcuts {
            list.insert(index.to_string(), Value::Map(sc.to_tree()?));
        }
        let mut root = VdfMap::with_capacity(1);
        root.insert(ROOT_KEY, Value::Map(list));
        Ok(vdf_write::encode(&root))
    }

    pub fn store_into(&self, path: &Path) -> Result<()> {
        let data = self.to_bytes()?;
        fs::write(path, &data)?;
        tracing::info!(path = %path.display(), count = self.len(), "wrote shortcuts");
        Ok(())
    }

    pub fn get(&self, index: u32) -> Option<&Shortcut> {
        self.shortcuts.get(&index)
    }

    /// Highest index in use.
    pub fn max_index(&self) -> Option<u32> {
        self.shortcuts.keys().next_back().copied()
    }

    /// Runs `mutator` on the record at `index`, or on a fresh record when
    /// there is none.
    ///
    /// A fresh record is placed after the highest existing index (at 1 on an
    /// empty collection), not at `index`, and is kept only if `mutator`
    /// succeeds. Returns whether a record was created, or
    /// [`SchemaError::CollectionFull`] when the highest index is `u32::MAX`.
    pub fn get_or_create<F, E>(&mut self, index: u32, mutator: F) -> std::result::Result<bool, E>
    where
        F: FnOnce(bool, &mut Shortcut) -> std::result::Result<(), E>,
        E: From<SchemaError>,
    {
        if let Some(sc) = self.shortcuts.get_mut(&index) {
            mutator(false, sc)?;
            return Ok(false);
        }
        let new_index = match self.max_index() {
            None => 1,
            Some(max) => max.checked_add(1).ok_or(SchemaError::CollectionFull)?,
        };
        if new_index != index {
            tracing::info!(requested = index, placed = new_index, "appending new shortcut");
        }
        let mut sc = Shortcut::with_defaults(new_index);
        mutator(true, &mut sc)?;
        self.shortcuts.insert(new_index, sc);
        Ok(true)
    }

    /// Visits records in index order until `visitor` returns `false`.
    pub fn foreach<F>(&self, mut visitor: F)
    where
        F: FnMut(&Shortcut) -> bool,
    {
        for sc in self.shortcuts.values() {
            if !visitor(sc) {
                break;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shortcut> {
        self.shortcuts.values()
    }
    pub fn len(&self) -> usize {
        self.shortcuts.len()
    }
    pub fn is_empty(&self) -> bool {
        self.shortcuts.is_empty()
    }
}
