//! JPEG container model: the ordered list of segments of one image.
//!
//! Only the segments needed to walk the entropy-coded data are decoded
//! (SOF0, DHT, SOS, DRI). Everything else is kept as opaque bytes so the
//! image can be written back unchanged apart from its scan body.

use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Cursor, Read};

use super::huffman::{HuffmanTable, HuffmanTables, TableClass};
use super::marker::{Marker, MARKER_PREFIX};
use crate::error::{JpegError, Result};

/// Component entry of the frame header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameComponent {
    pub id: u8,
    pub h_sampling: u8,
    pub v_sampling: u8,
    pub quant_table_id: u8,
}

/// Baseline frame header (SOF0).
#[derive(Debug, Clone)]
pub struct FrameHeader {
    pub precision: u8,
    pub height: u16,
    pub width: u16,
    pub components: Vec<FrameComponent>,
}

impl FrameHeader {
    fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = Cursor::new(data);
        let precision = reader.read_u8()?;
        let height = reader.read_u16::<BigEndian>()?;
        let width = reader.read_u16::<BigEndian>()?;
        let count = reader.read_u8()?;

        if precision != 8 {
            return Err(JpegError::unsupported(format!(
                "{precision}-bit sample precision is not supported"
            )));
        }
        if height == 0 {
            return Err(JpegError::unsupported(
                "image height defined by a DNL segment is not supported",
            ));
        }
        if width == 0 {
            return Err(JpegError::invalid("frame header declares a width of 0"));
        }
        if count == 0 {
            return Err(JpegError::invalid("frame header has no components"));
        }

        let mut components = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let id = reader.read_u8()?;
            let sampling = reader.read_u8()?;
            let quant_table_id = reader.read_u8()?;
            let component = FrameComponent {
                id,
                h_sampling: sampling >> 4,
                v_sampling: sampling & 0x0F,
                quant_table_id,
            };
            if !(1..=4).contains(&component.h_sampling) || !(1..=4).contains(&component.v_sampling)
            {
                return Err(JpegError::invalid(format!(
                    "component {id} has sampling factors {}x{}",
                    component.h_sampling, component.v_sampling
                )));
            }
            components.push(component);
        }

        Ok(FrameHeader {
            precision,
            height,
            width,
            components,
        })
    }

    /// Largest horizontal and vertical sampling factors over all components.
    pub fn max_sampling(&self) -> (u8, u8) {
        self.components.iter().fold((1, 1), |(h, v), c| {
            (h.max(c.h_sampling), v.max(c.v_sampling))
        })
    }
}

/// Component entry of the scan header, linked to its frame component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanComponent {
    pub component_id: u8,
    /// Index into [`FrameHeader::components`].
    pub frame_index: usize,
    pub dc_table_id: u8,
    pub ac_table_id: u8,
}

#[derive(Debug, Clone)]
pub struct ScanHeader {
    pub components: Vec<ScanComponent>,
}

impl ScanHeader {
    fn parse(data: &[u8], frame: &FrameHeader) -> Result<Self> {
        let mut reader = Cursor::new(data);
        let count = reader.read_u8()? as usize;
        if !(1..=4).contains(&count) {
            return Err(JpegError::invalid(format!(
                "scan header declares {count} components"
            )));
        }

        let mut components = Vec::with_capacity(count);
        for _ in 0..count {
            let component_id = reader.read_u8()?;
            let tables = reader.read_u8()?;
            let frame_index = frame
                .components
                .iter()
                .position(|c| c.id == component_id)
                .ok_or_else(|| {
                    JpegError::invalid(format!(
                        "scan references unknown component {component_id}"
                    ))
                })?;
            let (dc_table_id, ac_table_id) = (tables >> 4, tables & 0x0F);
            if dc_table_id > 3 || ac_table_id > 3 {
                return Err(JpegError::invalid(format!(
                    "component {component_id} selects Huffman tables {dc_table_id}/{ac_table_id}"
                )));
            }
            components.push(ScanComponent {
                component_id,
                frame_index,
                dc_table_id,
                ac_table_id,
            });
        }

        let spectral_start = reader.read_u8()?;
        let spectral_end = reader.read_u8()?;
        let approximation = reader.read_u8()?;
        if spectral_start != 0 || spectral_end != 63 || approximation != 0 {
            return Err(JpegError::unsupported(format!(
                "scan with spectral selection {spectral_start}..={spectral_end} and approximation 0x{approximation:02X} is not sequential"
            )));
        }
        if count != frame.components.len() {
            return Err(JpegError::unsupported(format!(
                "scan covers {count} of {} components, non-interleaved images are not supported",
                frame.components.len()
            )));
        }

        Ok(ScanHeader { components })
    }
}

#[derive(Debug, Clone)]
pub enum Segment {
    /// Marker without a body (SOI, EOI).
    Structural(Marker),
    /// Any length-prefixed segment kept as opaque bytes.
    Generic { marker: Marker, data: Vec<u8> },
    /// SOF0 frame header together with its raw body.
    Frame { header: FrameHeader, data: Vec<u8> },
    /// DHT segment, one or more tables.
    HuffmanTables { tables: Vec<HuffmanTable>, data: Vec<u8> },
    /// SOS header followed by the entropy-coded body (restart markers included).
    Scan {
        header: ScanHeader,
        header_data: Vec<u8>,
        body: Vec<u8>,
    },
}

impl Segment {
    pub fn marker(&self) -> Marker {
        match self {
            Segment::Structural(marker) | Segment::Generic { marker, .. } => *marker,
            Segment::Frame { .. } => Marker::SOF(0),
            Segment::HuffmanTables { .. } => Marker::DHT,
            Segment::Scan { .. } => Marker::SOS,
        }
    }
}

/// All segments of one image in stream order.
///
/// Starts with SOI, holds exactly one frame header and one scan, and ends
/// with the EOI that follows the scan body.
#[derive(Debug, Clone)]
pub struct SegmentGroup {
    segments: Vec<Segment>,
}

impl SegmentGroup {
    /// Parses `data` up to and including the scan body.
    pub fn read(data: &[u8]) -> Result<Self> {
        let mut reader = Cursor::new(data);
        if reader.read_u16::<BigEndian>()? != u16::from_be_bytes(Marker::SOI.to_bytes()) {
            return Err(JpegError::invalid("not a JPEG file (missing SOI marker)"));
        }

        let mut segments = vec![Segment::Structural(Marker::SOI)];
        let mut frame: Option<FrameHeader> = None;

        loop {
            let marker = read_marker(&mut reader)?;
            match marker {
                Marker::EOI => {
                    return Err(JpegError::invalid(
                        "end of image reached before start of scan",
                    ))
                }
                _ if marker.is_standalone() => segments.push(Segment::Structural(marker)),
                Marker::SOF(0) => {
                    let data = read_body(&mut reader, marker)?;
                    if frame.is_some() {
                        return Err(JpegError::invalid("more than one frame header"));
                    }
                    let header = FrameHeader::parse(&data)?;
                    frame = Some(header.clone());
                    segments.push(Segment::Frame { header, data });
                }
                Marker::SOF(n) => {
                    return Err(JpegError::unsupported(format!(
                        "frame type SOF{n} is not supported, only baseline DCT with Huffman coding is"
                    )))
                }
                Marker::DHT => {
                    let data = read_body(&mut reader, marker)?;
                    let tables = parse_huffman_tables(&data)?;
                    segments.push(Segment::HuffmanTables { tables, data });
                }
                Marker::SOS => {
                    let header_data = read_body(&mut reader, marker)?;
                    let frame = frame
                        .as_ref()
                        .ok_or_else(|| JpegError::invalid("start of scan before frame header"))?;
                    let header = ScanHeader::parse(&header_data, frame)?;
                    let offset = reader.position() as usize;
                    let body = read_scan_body(&data[offset..])?.to_vec();
                    log::debug!(
                        "scan of {} components, {} entropy-coded bytes at offset {offset}",
                        header.components.len(),
                        body.len()
                    );
                    segments.push(Segment::Scan {
                        header,
                        header_data,
                        body,
                    });
                    segments.push(Segment::Structural(Marker::EOI));
                    break;
                }
                _ => {
                    let data = read_body(&mut reader, marker)?;
                    segments.push(Segment::Generic { marker, data });
                }
            }
        }

        Ok(SegmentGroup { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn frame(&self) -> Result<&FrameHeader> {
        self.segments
            .iter()
            .find_map(|s| match s {
                Segment::Frame { header, .. } => Some(header),
                _ => None,
            })
            .ok_or_else(|| JpegError::invalid("missing frame header (SOF0)"))
    }

    /// Scan header and entropy-coded body.
    pub fn scan(&self) -> Result<(&ScanHeader, &[u8])> {
        self.segments
            .iter()
            .find_map(|s| match s {
                Segment::Scan { header, body, .. } => Some((header, body.as_slice())),
                _ => None,
            })
            .ok_or_else(|| JpegError::invalid("missing start of scan (SOS)"))
    }

    /// Huffman tables in effect for the scan, later definitions winning.
    pub fn huffman_tables(&self) -> HuffmanTables {
        let mut tables = HuffmanTables::default();
        for segment in &self.segments {
            if let Segment::HuffmanTables { tables: defined, .. } = segment {
                for table in defined {
                    tables.insert(table.clone());
                }
            }
        }
        tables
    }

    /// MCUs per restart interval, 0 when restarts are disabled.
    pub fn restart_interval(&self) -> Result<u16> {
        let mut interval = 0;
        for segment in &self.segments {
            if let Segment::Generic {
                marker: Marker::DRI,
                data,
            } = segment
            {
                let bytes: [u8; 2] = data.as_slice().try_into().map_err(|_| {
                    JpegError::invalid(format!("DRI segment of {} bytes", data.len()))
                })?;
                interval = u16::from_be_bytes(bytes);
            }
        }
        Ok(interval)
    }
}

/// Finds the next marker, skipping stray bytes and `0xFF` fill bytes.
fn read_marker<R: Read>(reader: &mut R) -> Result<Marker> {
    loop {
        if reader.read_u8()? != MARKER_PREFIX {
            continue;
        }
        let mut code = reader.read_u8()?;
        while code == MARKER_PREFIX {
            code = reader.read_u8()?;
        }
        if let Some(marker) = Marker::from_u8(code) {
            return Ok(marker);
        }
    }
}

/// Reads a length-prefixed segment body; the length counts its own two bytes.
fn read_body<R: Read>(reader: &mut R, marker: Marker) -> Result<Vec<u8>> {
    let length = reader.read_u16::<BigEndian>()? as usize;
    if length < 2 {
        return Err(JpegError::invalid(format!(
            "segment {marker:?} declares length {length}"
        )));
    }
    let mut data = vec![0u8; length - 2];
    reader.read_exact(&mut data)?;
    Ok(data)
}

fn parse_huffman_tables(data: &[u8]) -> Result<Vec<HuffmanTable>> {
    let mut reader = Cursor::new(data);
    let mut tables = Vec::new();

    while (reader.position() as usize) < data.len() {
        let class_and_id = reader.read_u8()?;
        let class = TableClass::from_u8(class_and_id >> 4)?;
        let id = class_and_id & 0x0F;
        if id > 3 {
            return Err(JpegError::invalid(format!(
                "Huffman table destination {id} out of range"
            )));
        }

        let mut counts = [0u8; 16];
        reader.read_exact(&mut counts)?;
        let total: usize = counts.iter().map(|&n| n as usize).sum();
        let mut values = vec![0u8; total];
        reader.read_exact(&mut values)?;

        tables.push(HuffmanTable::build(class, id, &counts, &values)?);
    }

    Ok(tables)
}

/// Returns the entropy-coded data at the start of `data`.
///
/// Stuffed bytes and restart markers belong to the body; the first other
/// marker ends it. Only EOI may follow a scan.
fn read_scan_body(data: &[u8]) -> Result<&[u8]> {
    let mut i = 0;
    while i < data.len() {
        if data[i] != MARKER_PREFIX {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        while j < data.len() && data[j] == MARKER_PREFIX {
            j += 1;
        }
        let Some(&code) = data.get(j) else {
            break;
        };
        match Marker::from_u8(code) {
            None | Some(Marker::RST(_)) => i = j + 1,
            Some(Marker::DNL) => {
                return Err(JpegError::unsupported(
                    "DNL marker in entropy-coded data is not supported",
                ))
            }
            Some(Marker::EOI) => return Ok(&data[..i]),
            Some(other) => {
                return Err(JpegError::unsupported(format!(
                    "marker {other:?} after the first scan, multi-scan images are not supported"
                )))
            }
        }
    }
    Ok(&data[..i])
}
