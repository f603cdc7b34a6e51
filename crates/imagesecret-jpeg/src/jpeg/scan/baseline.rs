//! Baseline sequential Huffman scans (SOF0).

use super::{Mcu, ScanLayout, BLOCK_LEN, ZIGZAG_TO_NATURAL};
use crate::error::{JpegError, Result};
use crate::jpeg::bitio::{encode_coefficient, BitReader, BitWriter};
use crate::jpeg::huffman::HuffmanTable;
use crate::jpeg::segment::SegmentGroup;

/// AC symbol terminating a block.
const EOB: u8 = 0x00;
/// AC symbol for a run of sixteen zeros.
const ZRL: u8 = 0xF0;
/// Largest DC difference category for 8-bit samples.
const MAX_DC_CATEGORY: u8 = 11;

/// DC predictors of one decode or encode pass, one per scan component.
struct DcPredictors(Vec<i16>);

impl DcPredictors {
    fn new(components: usize) -> Self {
        DcPredictors(vec![0; components])
    }

    fn reset(&mut self) {
        self.0.fill(0);
    }

    /// Applies a decoded difference and returns the DC value.
    fn predict(&mut self, component: usize, diff: i16) -> i16 {
        self.0[component] = self.0[component].wrapping_add(diff);
        self.0[component]
    }

    /// Returns the difference to encode for `value` and makes it the new prediction.
    fn difference(&mut self, component: usize, value: i16) -> i16 {
        let diff = value.wrapping_sub(self.0[component]);
        self.0[component] = value;
        diff
    }
}

/// Decodes the scan of `group` into its MCUs.
pub fn decode_scan(group: &SegmentGroup) -> Result<Vec<Mcu>> {
    let layout = ScanLayout::from_group(group)?;
    let tables = group.huffman_tables();
    let (_, body) = group.scan()?;

    log::debug!(
        "decoding {}x{} MCUs, restart interval {}",
        layout.mcus_x,
        layout.mcus_y,
        layout.restart_interval
    );

    let mut reader = BitReader::new(body);
    let mut predictors = DcPredictors::new(layout.components.len());
    let mut next_restart = 0u8;
    let mut mcus = Vec::with_capacity(layout.mcu_count());

    for index in 0..layout.mcu_count() {
        if layout.restart_interval > 0 && index > 0 && index % layout.restart_interval == 0 {
            reader.restart(next_restart)?;
            next_restart = (next_restart + 1) & 7;
            predictors.reset();
        }

        let mut mcu = layout.empty_mcu();
        for (ci, component) in layout.components.iter().enumerate() {
            let dc_table = tables.dc(component.dc_table_id)?;
            let ac_table = tables.ac(component.ac_table_id)?;
            let target = &mut mcu.components[ci];

            for by in 0..component.v_blocks {
                for bx in 0..component.h_blocks {
                    let block = decode_block(&mut reader, dc_table, ac_table, &mut predictors, ci)?;
                    target.set_block(bx, by, &block);
                }
            }
        }
        mcus.push(mcu);
    }

    log::debug!(
        "decoded {} MCUs from {} of {} scan bytes",
        mcus.len(),
        reader.position(),
        body.len()
    );
    Ok(mcus)
}

/// Huffman encodes `mcus` with the tables of `group`.
///
/// The result is a complete scan body, padded with 1-bits and carrying
/// restart markers where the group defines a restart interval.
pub fn encode_scan(group: &SegmentGroup, mcus: &[Mcu]) -> Result<Vec<u8>> {
    let layout = ScanLayout::from_group(group)?;
    let tables = group.huffman_tables();
    let (_, original) = group.scan()?;

    if mcus.len() != layout.mcu_count() {
        return Err(JpegError::invalid(format!(
            "scan needs {} MCUs, got {}",
            layout.mcu_count(),
            mcus.len()
        )));
    }

    let mut writer = BitWriter::with_capacity(original.len());
    let mut predictors = DcPredictors::new(layout.components.len());
    let mut next_restart = 0u8;

    for (index, mcu) in mcus.iter().enumerate() {
        if layout.restart_interval > 0 && index > 0 && index % layout.restart_interval == 0 {
            writer.write_restart_marker(next_restart);
            next_restart = (next_restart + 1) & 7;
            predictors.reset();
        }

        for (ci, component) in layout.components.iter().enumerate() {
            let dc_table = tables.dc(component.dc_table_id)?;
            let ac_table = tables.ac(component.ac_table_id)?;
            let source = mcu.components.get(ci).ok_or_else(|| {
                JpegError::invalid(format!("MCU {index} lacks scan component {ci}"))
            })?;
            if source.blocks() != (component.h_blocks, component.v_blocks) {
                return Err(JpegError::invalid(format!(
                    "MCU {index} component {ci} has {:?} blocks",
                    source.blocks()
                )));
            }
            let expected = BLOCK_LEN * component.h_blocks * component.v_blocks;
            if source.samples.len() != expected {
                return Err(JpegError::invalid(format!(
                    "MCU {index} component {ci} has {} samples, expected {expected}",
                    source.samples.len()
                )));
            }

            for by in 0..component.v_blocks {
                for bx in 0..component.h_blocks {
                    let block = source.block(bx, by);
                    encode_block(&mut writer, &block, dc_table, ac_table, &mut predictors, ci)?;
                }
            }
        }
    }

    let data = writer.into_bytes();
    log::debug!(
        "encoded {} MCUs into {} scan bytes (was {})",
        mcus.len(),
        data.len(),
        original.len()
    );
    Ok(data)
}

/// Decodes one block into natural order.
fn decode_block(
    reader: &mut BitReader,
    dc_table: &HuffmanTable,
    ac_table: &HuffmanTable,
    predictors: &mut DcPredictors,
    component: usize,
) -> Result<[i16; BLOCK_LEN]> {
    let mut block = [0i16; BLOCK_LEN];

    let category = reader.decode(dc_table)?;
    if category > MAX_DC_CATEGORY {
        return Err(JpegError::invalid(format!(
            "DC difference category {category} out of range"
        )));
    }
    let diff = reader.receive_extend(category)?;
    block[0] = predictors.predict(component, diff);

    let mut k = 1;
    while k < BLOCK_LEN {
        let symbol = reader.decode(ac_table)?;
        let run = (symbol >> 4) as usize;
        let size = symbol & 0x0F;

        if size == 0 {
            if symbol != ZRL {
                break;
            }
            k += 16;
            continue;
        }

        k += run;
        if k >= BLOCK_LEN {
            return Err(JpegError::invalid(format!(
                "AC run of {run} overflows the block"
            )));
        }
        block[ZIGZAG_TO_NATURAL[k]] = reader.receive_extend(size)?;
        k += 1;
    }
    if k > BLOCK_LEN {
        return Err(JpegError::invalid("zero run overflows the block"));
    }

    log::trace!("block dc={} diff={diff}", block[0]);
    Ok(block)
}

/// Encodes one natural order block.
fn encode_block(
    writer: &mut BitWriter,
    block: &[i16; BLOCK_LEN],
    dc_table: &HuffmanTable,
    ac_table: &HuffmanTable,
    predictors: &mut DcPredictors,
    component: usize,
) -> Result<()> {
    let diff = predictors.difference(component, block[0]);
    let (size, bits) = encode_coefficient(diff);
    writer.write_symbol(size, dc_table)?;
    writer.write_bits(bits, size);

    let mut run = 0u8;
    for &natural in &ZIGZAG_TO_NATURAL[1..] {
        let value = block[natural];
        if value == 0 {
            run += 1;
            continue;
        }
        while run >= 16 {
            writer.write_symbol(ZRL, ac_table)?;
            run -= 16;
        }
        let (size, bits) = encode_coefficient(value);
        writer.write_symbol((run << 4) | size, ac_table)?;
        writer.write_bits(bits, size);
        run = 0;
    }
    if run > 0 {
        writer.write_symbol(EOB, ac_table)?;
    }

    log::trace!("block dc={} diff={diff}", block[0]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jpeg::huffman::TableClass;

    /// ITU T.81 Table K.3 luminance DC table.
    fn dc_table() -> HuffmanTable {
        let counts = [0, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0];
        let values: Vec<u8> = (0..12).collect();
        HuffmanTable::build(TableClass::Dc, 0, &counts, &values).unwrap()
    }

    /// Small AC table with the symbols the tests need.
    fn ac_table() -> HuffmanTable {
        let mut counts = [0u8; 16];
        counts[1] = 2;
        counts[2] = 2;
        counts[4] = 4;
        let values = [EOB, 0x01, 0x02, 0x03, ZRL, 0x11, 0x41, 0xF1];
        HuffmanTable::build(TableClass::Ac, 0, &counts, &values).unwrap()
    }

    #[test]
    fn block_round_trip_with_runs() {
        let (dc, ac) = (dc_table(), ac_table());
        let mut first = [0i16; BLOCK_LEN];
        first[0] = 50;
        first[ZIGZAG_TO_NATURAL[1]] = -3;
        first[ZIGZAG_TO_NATURAL[3]] = 1;
        first[ZIGZAG_TO_NATURAL[40]] = -1;
        let mut second = [0i16; BLOCK_LEN];
        second[0] = 47;
        second[ZIGZAG_TO_NATURAL[48]] = 1;

        let mut writer = BitWriter::default();
        let mut predictors = DcPredictors::new(1);
        encode_block(&mut writer, &first, &dc, &ac, &mut predictors, 0).unwrap();
        encode_block(&mut writer, &second, &dc, &ac, &mut predictors, 0).unwrap();
        let data = writer.into_bytes();

        let mut reader = BitReader::new(&data);
        let mut predictors = DcPredictors::new(1);
        assert_eq!(
            decode_block(&mut reader, &dc, &ac, &mut predictors, 0).unwrap(),
            first
        );
        assert_eq!(
            decode_block(&mut reader, &dc, &ac, &mut predictors, 0).unwrap(),
            second
        );
    }

    #[test]
    fn symbol_missing_from_table_fails_encoding() {
        let mut block = [0i16; BLOCK_LEN];
        block[ZIGZAG_TO_NATURAL[1]] = 200;

        let mut writer = BitWriter::default();
        let mut predictors = DcPredictors::new(1);
        let err = encode_block(&mut writer, &block, &dc_table(), &ac_table(), &mut predictors, 0)
            .unwrap_err();
        assert!(matches!(err, JpegError::InvalidImage { .. }));
    }

    #[test]
    fn predictors_track_differences_per_component() {
        let mut predictors = DcPredictors::new(2);
        assert_eq!(predictors.difference(0, 10), 10);
        assert_eq!(predictors.difference(0, 7), -3);
        assert_eq!(predictors.difference(1, 4), 4);
        predictors.reset();
        assert_eq!(predictors.predict(0, 5), 5);
        assert_eq!(predictors.predict(0, -2), 3);
    }
}
