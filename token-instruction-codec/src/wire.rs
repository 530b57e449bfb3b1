//! Borsh plumbing shared by every instruction shape.
//!
//! Instruction data is read through [`InstructionReader`], which remembers
//! whether a read ran past the end of the buffer. Borsh reports both short
//! input and invalid byte patterns as `InvalidData`, so the reader is what
//! lets the codec tell truncated data apart from malformed data.

use borsh::{
    io::{self, Read},
    BorshDeserialize, BorshSerialize,
};

/// Position-tracking reader over instruction data.
pub(crate) struct InstructionReader<'a> {
    data: &'a [u8],
    position: usize,
    short_read: Option<usize>,
}

impl<'a> InstructionReader<'a> {
    /// Create a reader starting at `position` within `data`.
    pub(crate) fn new(data: &'a [u8], position: usize) -> Self {
        Self {
            data,
            position: position.min(data.len()),
            short_read: None,
        }
    }

    pub(crate) fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Total byte count the first failed read would have needed, if any read
    /// ran past the end of the data.
    pub(crate) fn short_read(&self) -> Option<usize> {
        self.short_read
    }
}

impl Read for InstructionReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.data[self.position..];
        if remaining.is_empty() && !buf.is_empty() {
            self.short_read.get_or_insert(self.position + buf.len());
            return Ok(0);
        }
        let n = buf.len().min(remaining.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.position += n;
        Ok(n)
    }
}

/// Optional-field codec: a presence flag byte followed by the value.
///
/// Serialization always writes `0` or `1`. Deserialization treats any nonzero
/// flag as present. Used through `#[borsh(deserialize_with = ...)]`.
pub mod optional {
    use super::*;

    pub fn deserialize<R: Read, T: BorshDeserialize>(reader: &mut R) -> io::Result<Option<T>> {
        let flag = u8::deserialize_reader(reader)?;
        if flag == 0 {
            Ok(None)
        } else {
            T::deserialize_reader(reader).map(Some)
        }
    }

    pub fn serialize<W: io::Write, T: BorshSerialize>(
        value: &Option<T>,
        writer: &mut W,
    ) -> io::Result<()> {
        match value {
            None => 0u8.serialize(writer),
            Some(inner) => {
                1u8.serialize(writer)?;
                inner.serialize(writer)
            }
        }
    }
}
