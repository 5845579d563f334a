//! Forward-only byte cursor used by the vdf codec

/// Sequential reader over an in-memory buffer.
///
/// Reads past the end never panic; they return `None` and leave the
/// position untouched.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
    pub fn position(&self) -> usize {
        self.pos
    }
    pub fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub fn peek_byte(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }
    pub fn read_byte(&mut self) -> Option<u8> {
        let b = self.peek_byte()?;
        self.pos += 1;
        Some(b)
    }
    pub fn read_u32_le(&mut self) -> Option<u32> {
        let bytes = self.data.get(self.pos..self.pos + 4)?;
        self.pos += 4;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads the bytes of a NUL-terminated string, consuming the terminator.
    ///
    /// Returns `None` only when no byte is left. A string cut off by the end
    /// of the buffer is returned as read.
    pub fn read_cstring(&mut self) -> Option<&'a [u8]> {
        if self.at_end() {
            return None;
        }
        let rest = &self.data[self.pos..];
        match rest.iter().position(|&b| b == 0) {
            Some(n) => {
                self.pos += n + 1;
                Some(&rest[..n])
            }
            None => {
                self.pos = self.data.len();
                Some(rest)
            }
        }
    }
}

/// Appending writer, the dual of [`Reader`].
#[derive(Debug, Default)]
pub struct Writer {
    out: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self {
            out: Vec::with_capacity(1024),
        }
    }
    pub fn write_byte(&mut self, b: u8) {
        self.out.push(b);
    }
    pub fn write_u32_le(&mut self, v: u32) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }
    pub fn write_cstring(&mut self, s: &str) {
        self.out.extend_from_slice(s.as_bytes());
        self.out.push(0);
    }
    pub fn into_inner(self) -> Vec<u8> {
        self.out
    }
}
