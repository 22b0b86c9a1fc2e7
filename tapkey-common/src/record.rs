//! Layout of the persisted record, shared by the firmware and the host heatmap reader.
//!
//! Little endian `u32` words:
//!
//! ```text
//! [0]         MAGIC
//! [1]         bluetooth identity
//! [2..4]      reserved
//! [4..4+KEYS] heatmap, one press counter per position
//! ```

pub const MAGIC: u32 = 0x424B5950;
pub const HEADER_WORDS: usize = 4;
pub const DEFAULT_BLUETOOTH_ID: u8 = 1;

/// Bytes a record for `keys` positions occupies.
pub const fn byte_len(keys: usize) -> usize {
    (HEADER_WORDS + keys) * 4
}
