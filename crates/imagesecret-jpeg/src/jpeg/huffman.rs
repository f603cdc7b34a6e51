//! Canonical Huffman tables as defined by DHT segments.
//!
//! A single [`HuffmanTable`] serves both directions: the decode arrays
//! follow ITU T.81 F.2.2.3 (`MINCODE`, `MAXCODE`, `VALPTR`) and the encode
//! arrays follow C.2/C.3 (`EHUFCO`, `EHUFSI`).

use crate::error::{JpegError, Result};

/// Longest code length a JPEG Huffman table can describe.
pub const MAX_CODE_LENGTH: usize = 16;

/// Table class from the upper nibble of `Tc/Th`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableClass {
    Dc,
    Ac,
}

impl TableClass {
    pub fn from_u8(class: u8) -> Result<Self> {
        match class {
            0 => Ok(TableClass::Dc),
            1 => Ok(TableClass::Ac),
            other => Err(JpegError::invalid(format!(
                "invalid Huffman table class {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HuffmanTable {
    pub class: TableClass,
    /// Destination id (0-3).
    pub id: u8,
    /// Smallest code of each length, indexed by length 1..=16.
    min_code: [i32; MAX_CODE_LENGTH + 1],
    /// Largest code of each length, -1 where no code has that length.
    max_code: [i32; MAX_CODE_LENGTH + 1],
    /// Index into `values` of the first symbol of each length.
    val_ptr: [usize; MAX_CODE_LENGTH + 1],
    values: Vec<u8>,
    /// Code per symbol.
    codes: [u16; 256],
    /// Code length per symbol, 0 if the symbol is absent.
    sizes: [u8; 256],
}

impl HuffmanTable {
    /// Builds the decode and encode tables from the 16 `BITS` counts and the `HUFFVAL` list.
    pub fn build(class: TableClass, id: u8, counts: &[u8; 16], values: &[u8]) -> Result<Self> {
        let total: usize = counts.iter().map(|&n| n as usize).sum();
        if total > 256 {
            return Err(JpegError::invalid(format!(
                "Huffman table {id} declares {total} symbols"
            )));
        }
        if total != values.len() {
            return Err(JpegError::invalid(format!(
                "Huffman table {id} declares {total} symbols but lists {}",
                values.len()
            )));
        }

        let mut table = HuffmanTable {
            class,
            id,
            min_code: [0; MAX_CODE_LENGTH + 1],
            max_code: [-1; MAX_CODE_LENGTH + 1],
            val_ptr: [0; MAX_CODE_LENGTH + 1],
            values: values.to_vec(),
            codes: [0; 256],
            sizes: [0; 256],
        };

        let mut code: u32 = 0;
        let mut k = 0;
        for length in 1..=MAX_CODE_LENGTH {
            let count = counts[length - 1] as usize;
            if count > 0 {
                table.val_ptr[length] = k;
                table.min_code[length] = code as i32;
                for _ in 0..count {
                    if code >= (1 << length) {
                        return Err(JpegError::invalid(format!(
                            "Huffman table {id} overflows at code length {length}"
                        )));
                    }
                    let symbol = values[k] as usize;
                    table.codes[symbol] = code as u16;
                    table.sizes[symbol] = length as u8;
                    code += 1;
                    k += 1;
                }
                table.max_code[length] = code as i32 - 1;
            }
            code <<= 1;
        }

        Ok(table)
    }

    /// Resolves a code of `length` bits to its symbol, `None` if no code of that length matches.
    #[inline]
    pub fn symbol(&self, code: i32, length: usize) -> Option<u8> {
        if code > self.max_code[length] {
            return None;
        }
        let index = self.val_ptr[length] + (code - self.min_code[length]) as usize;
        self.values.get(index).copied()
    }

    /// Code and code length of `symbol`.
    #[inline]
    pub fn code(&self, symbol: u8) -> Option<(u16, u8)> {
        match self.sizes[symbol as usize] {
            0 => None,
            size => Some((self.codes[symbol as usize], size)),
        }
    }
}

/// All Huffman tables in effect for a scan, by class and destination id.
#[derive(Debug, Clone, Default)]
pub struct HuffmanTables {
    dc: [Option<HuffmanTable>; 4],
    ac: [Option<HuffmanTable>; 4],
}

impl HuffmanTables {
    /// Installs a table, replacing any earlier definition for the same slot.
    pub fn insert(&mut self, table: HuffmanTable) {
        let id = table.id as usize;
        match table.class {
            TableClass::Dc => self.dc[id] = Some(table),
            TableClass::Ac => self.ac[id] = Some(table),
        }
    }

    pub fn dc(&self, id: u8) -> Result<&HuffmanTable> {
        self.dc
            .get(id as usize)
            .and_then(Option::as_ref)
            .ok_or_else(|| JpegError::invalid(format!("missing DC Huffman table {id}")))
    }

    pub fn ac(&self, id: u8) -> Result<&HuffmanTable> {
        self.ac
            .get(id as usize)
            .and_then(Option::as_ref)
            .ok_or_else(|| JpegError::invalid(format!("missing AC Huffman table {id}")))
    }
}
