//! JPEG marker codes (ITU T.81 Table B.1).
//!
//! Only the markers the container model treats specially get their own
//! variant; everything else is carried as [`Marker::Other`] and copied
//! through untouched.

/// Prefix byte of every marker.
pub const MARKER_PREFIX: u8 = 0xFF;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Marker {
    /// Start of image.
    SOI,
    /// End of image.
    EOI,
    /// Start of frame, parameter is the frame type (0 = baseline DCT).
    SOF(u8),
    /// Define Huffman tables.
    DHT,
    /// Define quantization tables.
    DQT,
    /// Define restart interval.
    DRI,
    /// Start of scan.
    SOS,
    /// Define number of lines.
    DNL,
    /// Restart marker with its modulo-8 counter.
    RST(u8),
    /// Application segment.
    APP(u8),
    /// Comment.
    COM,
    /// Any other marker code, kept verbatim.
    Other(u8),
}

impl Marker {
    /// Decodes the second marker byte.
    ///
    /// Returns `None` for `0x00` (stuffed byte) and `0xFF` (fill byte).
    pub fn from_u8(code: u8) -> Option<Marker> {
        use Marker::*;
        let marker = match code {
            0x00 | 0xFF => return None,
            0xC4 => DHT,
            // 0xC8 (JPG) and 0xCC (DAC) share the SOF range but are not frame headers
            0xC8 | 0xCC => Other(code),
            0xC0..=0xCF => SOF(code - 0xC0),
            0xD0..=0xD7 => RST(code - 0xD0),
            0xD8 => SOI,
            0xD9 => EOI,
            0xDA => SOS,
            0xDB => DQT,
            0xDC => DNL,
            0xDD => DRI,
            0xE0..=0xEF => APP(code - 0xE0),
            0xFE => COM,
            _ => Other(code),
        };
        Some(marker)
    }

    /// Second marker byte.
    pub fn to_u8(self) -> u8 {
        use Marker::*;
        match self {
            SOI => 0xD8,
            EOI => 0xD9,
            SOF(n) => 0xC0 + n,
            DHT => 0xC4,
            DQT => 0xDB,
            DRI => 0xDD,
            SOS => 0xDA,
            DNL => 0xDC,
            RST(n) => 0xD0 + n,
            APP(n) => 0xE0 + n,
            COM => 0xFE,
            Other(code) => code,
        }
    }

    /// Both marker bytes as they appear in the stream.
    pub fn to_bytes(self) -> [u8; 2] {
        [MARKER_PREFIX, self.to_u8()]
    }

    /// Standalone markers carry no length field and no body.
    pub fn is_standalone(self) -> bool {
        matches!(
            self,
            Marker::SOI | Marker::EOI | Marker::RST(..) | Marker::Other(0x01)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_frame_and_table_markers() {
        assert_eq!(Marker::from_u8(0xD8), Some(Marker::SOI));
        assert_eq!(Marker::from_u8(0xC0), Some(Marker::SOF(0)));
        assert_eq!(Marker::from_u8(0xC2), Some(Marker::SOF(2)));
        assert_eq!(Marker::from_u8(0xC4), Some(Marker::DHT));
        assert_eq!(Marker::from_u8(0xCC), Some(Marker::Other(0xCC)));
        assert_eq!(Marker::from_u8(0xD3), Some(Marker::RST(3)));
        assert_eq!(Marker::from_u8(0xE1), Some(Marker::APP(1)));
        assert_eq!(Marker::from_u8(0x00), None);
        assert_eq!(Marker::from_u8(0xFF), None);
    }

    #[test]
    fn every_marker_code_survives_a_round_trip() {
        for code in 0x01..=0xFEu8 {
            let marker = Marker::from_u8(code).unwrap();
            assert_eq!(marker.to_u8(), code, "marker 0x{code:02X}");
        }
    }

    #[test]
    fn standalone_markers() {
        assert!(Marker::SOI.is_standalone());
        assert!(Marker::EOI.is_standalone());
        assert!(Marker::RST(7).is_standalone());
        assert!(!Marker::SOS.is_standalone());
        assert!(!Marker::APP(0).is_standalone());
        assert_eq!(Marker::DHT.to_bytes(), [0xFF, 0xC4]);
    }
}
