use crate::cursor::Writer;
use crate::vdf::{Tag, Value, VdfMap};

/// Encodes `map` as a root map: its entries followed by one `MapEnd`.
pub fn encode(map: &VdfMap) -> Vec<u8> {
    let mut w = Writer::new();
    encode_map(&mut w, map.iter());
    w.into_inner()
}

/// Emits entries in the order given, then a `MapEnd`. Ordering is up to the
/// caller.
pub fn encode_map<'a, I>(w: &mut Writer, entries: I)
where
    I: IntoIterator<Item = (&'a str, &'a Value)>,
{
    for (key, value) in entries {
        w.write_byte(value.tag() as u8);
        w.write_cstring(key);
        match value {
            Value::UInt32(x) => w.write_u32_le(*x),
            Value::Text(s) => w.write_cstring(s),
            Value::Map(m) => encode_map(w, m.iter()),
        }
    }
    w.write_byte(Tag::MapEnd as u8);
}
