//! JSON view of a shortcut collection, for listing and bulk edits.
//!
//! A document is an array with one object per record, keyed by canonical
//! property name. `tags` is a JSON array of strings.
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde_json::{Map, Value as J, json};

use crate::error::{JsonError, Result};
use crate::model::{PropValue, Shortcut};
use crate::schema::{INDEX, PROPS, PropKind};
use crate::shortcuts::Shortcuts;

pub fn shortcut_to_json_value(sc: &Shortcut) -> J {
    let mut obj = Map::with_capacity(PROPS.len());
    obj.insert(INDEX.to_string(), json!(sc.index()));
    for p in PROPS.iter().filter(|p| p.name != INDEX) {
        let v = match sc.get(p.name) {
            Some(PropValue::UInt32(x)) => json!(*x),
            Some(PropValue::Text(s)) => json!(s),
            Some(PropValue::TextArray(items)) => json!(items),
            None => J::Null,
        };
        obj.insert(p.name.to_string(), v);
    }
    J::Object(obj)
}

pub fn to_json_value(scs: &Shortcuts) -> J {
    J::Array(scs.iter().map(shortcut_to_json_value).collect())
}

pub fn to_json_string(scs: &Shortcuts, pretty: bool) -> String {
    let v = to_json_value(scs);
    if pretty {
        serde_json::to_string_pretty(&v).unwrap_or_default()
    } else {
        v.to_string()
    }
}

impl Shortcuts {
    /// Merges every element of a JSON array into the collection through
    /// [`Shortcuts::get_or_create`]. Returns how many elements were merged.
    ///
    /// The first bad element aborts the import; elements before it stay
    /// merged and the failing element leaves its record untouched.
    ///
    /// Elements whose index does not exist are appended after the current
    /// highest index, so a later element can land on a record an earlier one
    /// just created. That is logged as a warning.
    pub fn update_from_json(&mut self, text: &str) -> Result<usize> {
        let root: J = serde_json::from_str(text).map_err(JsonError::from)?;
        let J::Array(items) = root else {
            return Err(JsonError::NotAnArray.into());
        };
        let mut created_here = HashSet::new();
        for (position, item) in items.iter().enumerate() {
            let obj = item.as_object().ok_or(JsonError::NotAnObject { position })?;
            let index = obj
                .get(INDEX)
                .and_then(J::as_u64)
                .and_then(|i| u32::try_from(i).ok())
                .ok_or(JsonError::MissingIndex { position })?;
            if created_here.contains(&index) {
                tracing::warn!(position, index, "element overwrites a record created by this import");
            }
            let created = self.get_or_create(index, |_, sc| apply_json_object(position, obj, sc))?;
            if created {
                created_here.extend(self.max_index());
            }
            tracing::debug!(position, index, created, "merged json element");
        }
        Ok(items.len())
    }

    pub fn update_from_json_file(&mut self, path: &Path) -> Result<usize> {
        let text = fs::read_to_string(path)?;
        self.update_from_json(&text)
    }
}

fn apply_json_object(
    position: usize,
    obj: &Map<String, J>,
    sc: &mut Shortcut,
) -> std::result::Result<(), JsonError> {
    let mut staged = Vec::with_capacity(PROPS.len());
    for p in PROPS.iter().filter(|p| p.name != INDEX) {
        let field = obj.get(p.name);
        let wrong = || JsonError::WrongType {
            position,
            property: p.name,
            expected: p.kind.name(),
        };
        let value = match p.kind {
            PropKind::UInt32 => {
                let field = field.ok_or(JsonError::MissingProperty {
                    position,
                    property: p.name,
                })?;
                let x = field
                    .as_u64()
                    .and_then(|x| u32::try_from(x).ok())
                    .ok_or_else(wrong)?;
                PropValue::UInt32(x)
            }
            PropKind::Text => {
                let field = field.ok_or(JsonError::MissingProperty {
                    position,
                    property: p.name,
                })?;
                PropValue::Text(field.as_str().ok_or_else(wrong)?.to_string())
            }
            // Optional: an element without tags keeps the record's tags.
            PropKind::TextArray => match field {
                None => continue,
                Some(J::Array(items)) => PropValue::TextArray(
                    items
                        .iter()
                        .map(|it| it.as_str().map(str::to_owned))
                        .collect::<Option<Vec<_>>>()
                        .ok_or_else(wrong)?,
                ),
                Some(_) => return Err(wrong()),
            },
        };
        staged.push((p.name, value));
    }
    let mut next = sc.clone();
    for (name, value) in staged {
        next.set(name, value)?;
    }
    *sc = next;
    Ok(())
}
