use crate::flags::MessageFlags;

/// Size of the packed, little-endian wire header in bytes.
pub const HEADER_LEN: usize = 16;

/// The 16-byte header that precedes every message payload.
///
/// `kind` is kept as a raw byte here rather than [`crate::MessageType`]
/// because the header can be parsed off the wire before the type byte
/// has been validated — semantic validation (version match, known type)
/// is `statelink-codec`'s job, not this crate's.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageHeader {
    pub version: u8,
    pub kind: u8,
    pub flags: MessageFlags,
    pub sequence: u32,
    pub payload_length: u32,
    pub checksum: u32,
}

impl MessageHeader {
    /// Pack this header into its 16-byte little-endian wire form.
    pub fn to_bytes(self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[0] = self.version;
        buf[1] = self.kind;
        buf[2..4].copy_from_slice(&self.flags.bits().to_le_bytes());
        buf[4..8].copy_from_slice(&self.sequence.to_le_bytes());
        buf[8..12].copy_from_slice(&self.payload_length.to_le_bytes());
        buf[12..16].copy_from_slice(&self.checksum.to_le_bytes());
        buf
    }

    /// Parse a header from the first [`HEADER_LEN`] bytes of `buf`.
    ///
    /// Returns `None` only if `buf` is shorter than [`HEADER_LEN`];
    /// callers that need semantic validation (version/type/checksum)
    /// should go through `statelink-codec::decode`.
    pub fn from_bytes(buf: &[u8]) -> Option<Self> {
        if buf.len() < HEADER_LEN {
            return None;
        }
        Some(MessageHeader {
            version: buf[0],
            kind: buf[1],
            flags: MessageFlags::from_bits_truncate(u16::from_le_bytes([buf[2], buf[3]])),
            sequence: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
            payload_length: u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]),
            checksum: u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MessageType;

    #[test]
    fn round_trips_through_bytes() {
        let header = MessageHeader {
            version: 1,
            kind: MessageType::Command.as_u8(),
            flags: MessageFlags::RELIABLE | MessageFlags::URGENT,
            sequence: 42,
            payload_length: 7,
            checksum: 0xDEAD_BEEF,
        };
        let bytes = header.to_bytes();
        assert_eq!(bytes.len(), HEADER_LEN);
        let parsed = MessageHeader::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn rejects_short_buffers() {
        assert!(MessageHeader::from_bytes(&[0u8; HEADER_LEN - 1]).is_none());
    }

    #[test]
    fn reserved_flag_bits_are_truncated_on_parse() {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0] = 1;
        bytes[1] = MessageType::Heartbeat.as_u8();
        bytes[2..4].copy_from_slice(&0xFFFFu16.to_le_bytes());
        let parsed = MessageHeader::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.flags.bits(), 0b1111);
    }
}
