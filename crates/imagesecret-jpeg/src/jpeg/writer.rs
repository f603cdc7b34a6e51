//! Serializes a [`SegmentGroup`] back into a JPEG byte stream.

use byteorder::{BigEndian, WriteBytesExt};
use std::io::Write;

use super::marker::Marker;
use super::segment::{Segment, SegmentGroup};
use crate::error::{JpegError, Result};

/// Writes every segment in its original order, with `scan_body` replacing
/// the entropy-coded data of the scan.
pub fn write_jpeg(group: &SegmentGroup, scan_body: &[u8]) -> Result<Vec<u8>> {
    let estimated = group
        .segments()
        .iter()
        .map(|s| match s {
            Segment::Structural(_) => 2,
            Segment::Generic { data, .. }
            | Segment::Frame { data, .. }
            | Segment::HuffmanTables { data, .. } => data.len() + 4,
            Segment::Scan { header_data, .. } => header_data.len() + 4,
        })
        .sum::<usize>()
        + scan_body.len();
    let mut output = Vec::with_capacity(estimated);

    for segment in group.segments() {
        match segment {
            Segment::Structural(marker) => output.write_all(&marker.to_bytes())?,
            Segment::Generic { marker, data } => write_segment(&mut output, *marker, data)?,
            Segment::Frame { data, .. } => write_segment(&mut output, Marker::SOF(0), data)?,
            Segment::HuffmanTables { data, .. } => write_segment(&mut output, Marker::DHT, data)?,
            Segment::Scan { header_data, .. } => {
                write_segment(&mut output, Marker::SOS, header_data)?;
                output.write_all(scan_body)?;
            }
        }
    }

    Ok(output)
}

fn write_segment<W: Write>(output: &mut W, marker: Marker, data: &[u8]) -> Result<()> {
    let length = u16::try_from(data.len() + 2).map_err(|_| {
        JpegError::invalid(format!(
            "segment {marker:?} body of {} bytes does not fit a length field",
            data.len()
        ))
    })?;
    output.write_all(&marker.to_bytes())?;
    output.write_u16::<BigEndian>(length)?;
    output.write_all(data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_scan_reproduces_the_input() {
        let mut jpeg = vec![0xFF, 0xD8];
        jpeg.extend_from_slice(&[0xFF, 0xFE, 0x00, 0x05, b'h', b'e', b'y']);
        jpeg.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x0B, 8, 0, 8, 0, 8, 1, 1, 0x11, 0]);
        jpeg.extend_from_slice(&[0xFF, 0xC4, 0x00, 0x14, 0x00, 1]);
        jpeg.extend_from_slice(&[0; 15]);
        jpeg.push(0);
        jpeg.extend_from_slice(&[0xFF, 0xC4, 0x00, 0x14, 0x10, 1]);
        jpeg.extend_from_slice(&[0; 15]);
        jpeg.push(0);
        jpeg.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 1, 1, 0x00, 0, 63, 0]);
        jpeg.extend_from_slice(&[0x3F, 0xFF, 0xD9]);

        let group = SegmentGroup::read(&jpeg).unwrap();
        let (_, body) = group.scan().unwrap();
        assert_eq!(body, &[0x3F]);
        assert_eq!(write_jpeg(&group, body).unwrap(), jpeg);
    }

    #[test]
    fn trailing_data_is_replaced_by_a_single_eoi() {
        let mut jpeg = vec![0xFF, 0xD8];
        jpeg.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x0B, 8, 0, 8, 0, 8, 1, 1, 0x11, 0]);
        jpeg.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 1, 1, 0x00, 0, 63, 0]);
        jpeg.extend_from_slice(&[0x3F, 0xFF, 0xD9, 0xDE, 0xAD]);

        let group = SegmentGroup::read(&jpeg).unwrap();
        let written = write_jpeg(&group, &[0x12, 0xFF, 0x00]).unwrap();

        assert_eq!(&written[written.len() - 5..], &[0x12, 0xFF, 0x00, 0xFF, 0xD9]);
        // one byte body grows to three, the two trailer bytes are gone
        assert_eq!(written.len(), jpeg.len() - 1 + 3 - 2);
    }
}
