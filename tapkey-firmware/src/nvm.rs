//! The persisted record: a magic word, the bluetooth identity and one press counter per position.
//! See [tapkey_common::record] for the layout.

use embedded_storage::{ReadStorage, Storage};
use tapkey_common::{action_code::BLUETOOTH_IDS, record};

pub use tapkey_common::record::{DEFAULT_BLUETOOTH_ID, HEADER_WORDS, MAGIC};

/// Words written per storage call when saving the heatmap.
const CHUNK_WORDS: usize = 16;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError<E> {
    Backend(E),
    /// The store is too small for the record.
    Capacity,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record<const KEYS: usize> {
    pub bluetooth_id: u8,
    pub heatmap: [u32; KEYS],
}

impl<const KEYS: usize> Default for Record<KEYS> {
    fn default() -> Self {
        Self {
            bluetooth_id: DEFAULT_BLUETOOTH_ID,
            heatmap: [0; KEYS],
        }
    }
}

impl<const KEYS: usize> Record<KEYS> {
    pub const BYTE_LEN: usize = record::byte_len(KEYS);

    /// Read the record, falling back to the default when the store fails or holds no record.
    pub fn load<S: ReadStorage>(storage: &mut S, offset: u32) -> Self {
        match Self::try_load(storage, offset) {
            Ok(Some(record)) => record,
            Ok(None) => {
                crate::info!("no saved record");
                Self::default()
            }
            Err(StorageError::Capacity) => {
                crate::warn!("storage too small for record");
                Self::default()
            }
            Err(StorageError::Backend(_)) => {
                crate::warn!("storage read failed");
                Self::default()
            }
        }
    }

    pub fn try_load<S: ReadStorage>(
        storage: &mut S,
        offset: u32,
    ) -> Result<Option<Self>, StorageError<S::Error>> {
        check_capacity(storage.capacity(), offset, Self::BYTE_LEN)?;

        let mut header = [0; HEADER_WORDS * 4];
        storage
            .read(offset, &mut header)
            .map_err(StorageError::Backend)?;
        if word(&header, 0) != MAGIC {
            return Ok(None);
        }

        let mut record = Self {
            bluetooth_id: clamp_bluetooth_id(word(&header, 1)),
            heatmap: [0; KEYS],
        };
        let mut buf = [0; 4];
        let mut addr = offset + header.len() as u32;
        for count in record.heatmap.iter_mut() {
            storage.read(addr, &mut buf).map_err(StorageError::Backend)?;
            *count = u32::from_le_bytes(buf);
            addr += 4;
        }
        Ok(Some(record))
    }

    pub fn save<S: Storage>(
        &self,
        storage: &mut S,
        offset: u32,
    ) -> Result<(), StorageError<S::Error>> {
        check_capacity(storage.capacity(), offset, Self::BYTE_LEN)?;
        self.save_header(storage, offset)?;

        let mut buf = [0; CHUNK_WORDS * 4];
        let mut addr = offset + (HEADER_WORDS * 4) as u32;
        for chunk in self.heatmap.chunks(CHUNK_WORDS) {
            let len = chunk.len() * 4;
            for (dst, count) in buf.chunks_exact_mut(4).zip(chunk) {
                dst.copy_from_slice(&count.to_le_bytes());
            }
            storage
                .write(addr, &buf[..len])
                .map_err(StorageError::Backend)?;
            addr += len as u32;
        }
        Ok(())
    }

    /// Rewrite only the header. A store without a valid record gets a zeroed heatmap as well.
    pub fn save_bluetooth_id<S: Storage>(
        &self,
        storage: &mut S,
        offset: u32,
    ) -> Result<(), StorageError<S::Error>> {
        check_capacity(storage.capacity(), offset, Self::BYTE_LEN)?;
        let mut magic = [0; 4];
        storage
            .read(offset, &mut magic)
            .map_err(StorageError::Backend)?;
        if u32::from_le_bytes(magic) != MAGIC {
            return self.save(storage, offset);
        }
        self.save_header(storage, offset)
    }

    fn save_header<S: Storage>(
        &self,
        storage: &mut S,
        offset: u32,
    ) -> Result<(), StorageError<S::Error>> {
        let mut header = [0; HEADER_WORDS * 4];
        header[..4].copy_from_slice(&MAGIC.to_le_bytes());
        header[4..8].copy_from_slice(&(self.bluetooth_id as u32).to_le_bytes());
        storage
            .write(offset, &header)
            .map_err(StorageError::Backend)
    }

    pub fn count_press(&mut self, position: u8) {
        if let Some(count) = self.heatmap.get_mut(position as usize) {
            *count = count.saturating_add(1);
        }
    }
}

fn check_capacity<E>(capacity: usize, offset: u32, len: usize) -> Result<(), StorageError<E>> {
    if (offset as usize).saturating_add(len) > capacity {
        Err(StorageError::Capacity)
    } else {
        Ok(())
    }
}

fn word(bytes: &[u8], i: usize) -> u32 {
    let mut w = [0; 4];
    w.copy_from_slice(&bytes[i * 4..i * 4 + 4]);
    u32::from_le_bytes(w)
}

/// Identities outside `0..=9` become 0.
pub fn clamp_bluetooth_id(id: u32) -> u8 {
    if id < BLUETOOTH_IDS as u32 {
        id as u8
    } else {
        crate::warn!("bluetooth id {} out of range", id);
        0
    }
}

#[cfg(test)]
#[path = "nvm_test.rs"]
mod test;
