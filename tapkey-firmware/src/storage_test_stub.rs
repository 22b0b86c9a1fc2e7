//! RAM backed [Storage] with injectable failures.

extern crate std;

use embedded_storage::{ReadStorage, Storage};
use std::{vec, vec::Vec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RamError;

#[derive(Debug, Clone, Default)]
pub struct RamStorage {
    pub bytes: Vec<u8>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub writes: usize,
}

impl RamStorage {
    /// Erased (all 0xff) store of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0xff; size],
            ..Default::default()
        }
    }

    pub fn word(&self, i: usize) -> u32 {
        let mut w = [0; 4];
        w.copy_from_slice(&self.bytes[i * 4..i * 4 + 4]);
        u32::from_le_bytes(w)
    }

    pub fn set_word(&mut self, i: usize, value: u32) {
        self.bytes[i * 4..i * 4 + 4].copy_from_slice(&value.to_le_bytes());
    }
}

impl ReadStorage for RamStorage {
    type Error = RamError;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        if self.fail_reads {
            return Err(RamError);
        }
        let start = offset as usize;
        let src = self.bytes.get(start..start + bytes.len()).ok_or(RamError)?;
        bytes.copy_from_slice(src);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.bytes.len()
    }
}

impl Storage for RamStorage {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(RamError);
        }
        let start = offset as usize;
        let dst = self
            .bytes
            .get_mut(start..start + bytes.len())
            .ok_or(RamError)?;
        dst.copy_from_slice(bytes);
        self.writes += 1;
        Ok(())
    }
}
