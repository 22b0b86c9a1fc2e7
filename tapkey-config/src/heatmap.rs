//! Reader for a dump of the keyboard's persisted record. See [tapkey_common::record] for the
//! layout.

use std::{fmt::Write, fs, path::Path};

use tapkey_common::record::{self, HEADER_WORDS, MAGIC};

use crate::ConfigError;

const ERASED: u32 = 0xffff_ffff;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeatmapDump {
    pub bluetooth_id: u8,
    /// Press count per position.
    pub counts: Vec<u32>,
}

impl HeatmapDump {
    /// Parse a record dump. Trailing erased words (flash read past the record) are dropped.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() < record::byte_len(0) {
            return Err(format!("dump too short: {} bytes", bytes.len()).into());
        }
        if bytes.len() % 4 != 0 {
            return Err(format!("dump size {} is not a multiple of 4", bytes.len()).into());
        }

        let mut words = bytes
            .chunks_exact(4)
            .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]));
        let magic = words.next().unwrap_or_default();
        if magic != MAGIC {
            return Err(format!("bad magic 0x{magic:08x}, expected 0x{MAGIC:08x}").into());
        }
        let bluetooth_id = words.next().unwrap_or_default() as u8;

        let mut counts: Vec<u32> = words.skip(HEADER_WORDS - 2).collect();
        while counts.last() == Some(&ERASED) {
            counts.pop();
        }
        log::debug!("heatmap dump: {} positions", counts.len());
        Ok(Self {
            bluetooth_id,
            counts,
        })
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        Self::from_bytes(&fs::read(path)?)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut words = vec![MAGIC, self.bluetooth_id as u32];
        words.resize(HEADER_WORDS, 0);
        words.extend_from_slice(&self.counts);
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    fn width(&self) -> usize {
        self.counts
            .iter()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or(1)
    }

    /// Counts laid out `cols` to a row, right aligned.
    pub fn render_matrix(&self, cols: usize) -> String {
        let width = self.width();
        let mut out = String::new();
        for row in self.counts.chunks(cols.max(1)) {
            let line = row
                .iter()
                .map(|c| format!("{c:>width$}"))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = writeln!(out, "{line}");
        }
        out
    }

    /// One line per position, most pressed first: position, row/column, count and share of all
    /// presses.
    pub fn render_sorted(&self, cols: usize, limit: Option<usize>) -> String {
        let cols = cols.max(1);
        let total = self.total();
        let width = self.width();

        let mut order: Vec<usize> = (0..self.counts.len()).collect();
        order.sort_by(|&a, &b| self.counts[b].cmp(&self.counts[a]).then(a.cmp(&b)));

        let mut out = String::new();
        for pos in order.into_iter().take(limit.unwrap_or(usize::MAX)) {
            let count = self.counts[pos];
            let pct = if total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total as f64
            };
            let cell = format!("r{}c{}", pos / cols, pos % cols);
            let _ = writeln!(out, "{pos:>3}  {cell:<7} {count:>width$} {pct:5.1}%");
        }
        out
    }
}

#[cfg(test)]
#[path = "heatmap_test.rs"]
mod test;
