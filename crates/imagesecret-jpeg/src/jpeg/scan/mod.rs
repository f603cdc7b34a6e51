//! Entropy-coded scan data to and from quantized DCT coefficients.
//!
//! Coefficients are grouped per MCU and per component the way they are
//! interleaved in the stream. No dequantization or IDCT is performed, the
//! values are exactly what the Huffman layer carries.

mod baseline;

use super::segment::SegmentGroup;
use crate::error::{JpegError, Result};

pub use baseline::{decode_scan, encode_scan};

/// Side length of a block in samples.
pub const BLOCK_SIZE: usize = 8;
/// Coefficients per block.
pub const BLOCK_LEN: usize = BLOCK_SIZE * BLOCK_SIZE;

/// Zig-zag sequence index to natural (row-major) index.
pub const ZIGZAG_TO_NATURAL: [usize; BLOCK_LEN] = [
    0, 1, 8, 16, 9, 2, 3, 10, 17, 24, 32, 25, 18, 11, 4, 5, 12, 19, 26, 33, 40, 48, 41, 34, 27, 20,
    13, 6, 7, 14, 21, 28, 35, 42, 49, 56, 57, 50, 43, 36, 29, 22, 15, 23, 30, 37, 44, 51, 58, 59,
    52, 45, 38, 31, 39, 46, 53, 60, 61, 54, 47, 55, 62, 63,
];

/// Minimum coded unit: one [`McuComponent`] per scan component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mcu {
    pub components: Vec<McuComponent>,
}

/// The coefficients one component contributes to an MCU.
///
/// `samples` covers an area of `8·H × 8·V` values, row-major; each 8×8
/// block sits at its position inside that area in natural order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McuComponent {
    pub samples: Vec<i16>,
    /// Index into the scan header components (entropy table selectors).
    pub scan_component: usize,
    /// Index into the frame header components (sampling factors).
    pub frame_component: usize,
    h_blocks: usize,
    v_blocks: usize,
}

impl McuComponent {
    pub fn new(scan_component: usize, frame_component: usize, h_blocks: usize, v_blocks: usize) -> Self {
        McuComponent {
            samples: vec![0; BLOCK_LEN * h_blocks * v_blocks],
            scan_component,
            frame_component,
            h_blocks,
            v_blocks,
        }
    }

    /// Blocks across and down.
    pub fn blocks(&self) -> (usize, usize) {
        (self.h_blocks, self.v_blocks)
    }

    fn row_stride(&self) -> usize {
        BLOCK_SIZE * self.h_blocks
    }

    fn block_origin(&self, bx: usize, by: usize) -> usize {
        by * BLOCK_SIZE * self.row_stride() + bx * BLOCK_SIZE
    }

    /// Copies block `(bx, by)` out in natural order.
    pub fn block(&self, bx: usize, by: usize) -> [i16; BLOCK_LEN] {
        let origin = self.block_origin(bx, by);
        let stride = self.row_stride();
        let mut block = [0i16; BLOCK_LEN];
        for (row, chunk) in block.chunks_exact_mut(BLOCK_SIZE).enumerate() {
            let start = origin + row * stride;
            chunk.copy_from_slice(&self.samples[start..start + BLOCK_SIZE]);
        }
        block
    }

    /// Stores a natural order block at `(bx, by)`.
    pub fn set_block(&mut self, bx: usize, by: usize, block: &[i16; BLOCK_LEN]) {
        let origin = self.block_origin(bx, by);
        let stride = self.row_stride();
        for (row, chunk) in block.chunks_exact(BLOCK_SIZE).enumerate() {
            let start = origin + row * stride;
            self.samples[start..start + BLOCK_SIZE].copy_from_slice(chunk);
        }
    }
}

/// Geometry of one scan component inside an MCU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ComponentLayout {
    pub frame_index: usize,
    pub h_blocks: usize,
    pub v_blocks: usize,
    pub dc_table_id: u8,
    pub ac_table_id: u8,
}

/// MCU grid and per-component geometry of a scan.
#[derive(Debug, Clone)]
pub(crate) struct ScanLayout {
    pub mcus_x: usize,
    pub mcus_y: usize,
    pub components: Vec<ComponentLayout>,
    /// MCUs between restart markers, 0 when disabled.
    pub restart_interval: usize,
}

impl ScanLayout {
    pub fn from_group(group: &SegmentGroup) -> Result<Self> {
        let frame = group.frame()?;
        let (scan, _) = group.scan()?;
        let (h_max, v_max) = frame.max_sampling();

        // a single component scan is not interleaved: one block per MCU
        let single = scan.components.len() == 1;
        let (mcu_w, mcu_h) = if single {
            (BLOCK_SIZE, BLOCK_SIZE)
        } else {
            (BLOCK_SIZE * h_max as usize, BLOCK_SIZE * v_max as usize)
        };

        let components = scan
            .components
            .iter()
            .map(|c| {
                let fc = &frame.components[c.frame_index];
                let (h_blocks, v_blocks) = if single {
                    (1, 1)
                } else {
                    (fc.h_sampling as usize, fc.v_sampling as usize)
                };
                ComponentLayout {
                    frame_index: c.frame_index,
                    h_blocks,
                    v_blocks,
                    dc_table_id: c.dc_table_id,
                    ac_table_id: c.ac_table_id,
                }
            })
            .collect::<Vec<_>>();

        let blocks_per_mcu: usize = components.iter().map(|c| c.h_blocks * c.v_blocks).sum();
        if blocks_per_mcu > 10 {
            return Err(JpegError::invalid(format!(
                "MCU of {blocks_per_mcu} blocks exceeds the limit of 10"
            )));
        }

        Ok(ScanLayout {
            mcus_x: (frame.width as usize).div_ceil(mcu_w),
            mcus_y: (frame.height as usize).div_ceil(mcu_h),
            components,
            restart_interval: group.restart_interval()? as usize,
        })
    }

    pub fn mcu_count(&self) -> usize {
        self.mcus_x * self.mcus_y
    }

    /// A zeroed MCU with this layout.
    pub fn empty_mcu(&self) -> Mcu {
        Mcu {
            components: self
                .components
                .iter()
                .enumerate()
                .map(|(i, c)| McuComponent::new(i, c.frame_index, c.h_blocks, c.v_blocks))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zigzag_is_a_permutation() {
        let mut seen = [false; BLOCK_LEN];
        for &natural in &ZIGZAG_TO_NATURAL {
            assert!(!seen[natural]);
            seen[natural] = true;
        }
        assert_eq!(ZIGZAG_TO_NATURAL[2], 8);
        assert_eq!(ZIGZAG_TO_NATURAL[63], 63);
    }

    #[test]
    fn blocks_are_placed_row_major_inside_the_component() {
        let mut component = McuComponent::new(0, 0, 2, 2);
        let mut block = [0i16; BLOCK_LEN];
        for (i, v) in block.iter_mut().enumerate() {
            *v = i as i16;
        }
        component.set_block(1, 1, &block);

        // row stride is 16, block (1, 1) starts at row 8 column 8
        assert_eq!(component.samples[8 * 16 + 8], 0);
        assert_eq!(component.samples[8 * 16 + 15], 7);
        assert_eq!(component.samples[9 * 16 + 8], 8);
        assert_eq!(component.samples[15 * 16 + 15], 63);
        assert_eq!(component.block(1, 1), block);
        assert_eq!(component.block(0, 0), [0; BLOCK_LEN]);
        assert_eq!(component.blocks(), (2, 2));
    }
}
