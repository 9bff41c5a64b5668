use std::io;

use serde::Serialize;

use crate::error::{ChronicleError, Result};

#[derive(Default)]
struct ByteCounter(usize);

impl io::Write for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0 += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Byte length of the compact JSON encoding, without buffering it.
pub fn serialized_len<T: Serialize + ?Sized>(value: &T) -> Result<usize> {
    let mut counter = ByteCounter::default();
    serde_json::to_writer(&mut counter, value)
        .map_err(|e| ChronicleError::Serialize(format!("failed to measure payload: {e}")))?;
    Ok(counter.0)
}

/// Size of a body after splicing a measured JSON array of entries into its
/// trailing `entries` array. Requires `entries` to be the last field.
pub fn len_after_extend(body_len: usize, body_has_entries: bool, array_len: usize) -> usize {
    let separator = usize::from(body_has_entries);
    body_len + separator + array_len.saturating_sub(2)
}

/// Size of a body after pushing one measured entry.
pub fn len_after_push(body_len: usize, body_has_entries: bool, item_len: usize) -> usize {
    body_len + usize::from(body_has_entries) + item_len
}
