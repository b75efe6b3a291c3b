//! Message framing: encode/decode a [`MessageHeader`] + payload, with
//! payload-checksum verification on decode.
//!
//! This crate knows nothing about connection state or callbacks — it is
//! a pure function pair plus the checksum it uses to validate a frame.

mod checksum;
mod error;

pub use checksum::payload_checksum;
pub use error::CodecError;

use bytes::{BufMut, Bytes, BytesMut};
use statelink_wire::{MessageFlags, MessageHeader, MessageType, HEADER_LEN, PROTOCOL_VERSION};
use tracing::warn;

/// A successfully decoded frame: header fields plus the payload slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMessage {
    pub kind: MessageType,
    pub flags: MessageFlags,
    pub sequence: u32,
    pub payload: Bytes,
}

/// Encode a message into its wire form: 16-byte header followed by
/// `payload`. Does not itself enforce `max_message_size` — callers that
/// care (the protocol engine) check the result's length against their
/// configured limit before handing it to the transport.
pub fn encode(kind: MessageType, flags: MessageFlags, sequence: u32, payload: &[u8]) -> Bytes {
    let header = MessageHeader {
        version: PROTOCOL_VERSION,
        kind: kind.as_u8(),
        flags,
        sequence,
        payload_length: payload.len() as u32,
        checksum: payload_checksum(payload),
    };

    let mut buf = BytesMut::with_capacity(HEADER_LEN + payload.len());
    buf.put_slice(&header.to_bytes());
    buf.put_slice(payload);
    buf.freeze()
}

/// Decode a frame previously produced by [`encode`].
///
/// Rejects (in this order): a buffer shorter than the header; a buffer
/// shorter than `header + payload_length`; a `version` other than
/// [`PROTOCOL_VERSION`]; a `kind` byte outside `1..=5`; a payload
/// checksum mismatch. `max_message_size` additionally bounds the total
/// frame size (header + claimed payload length).
pub fn decode(buf: &[u8], max_message_size: usize) -> Result<DecodedMessage, CodecError> {
    if buf.len() < HEADER_LEN {
        let err = CodecError::Truncated {
            needed: HEADER_LEN,
            got: buf.len(),
        };
        warn!(error = %err, "decode rejected frame");
        return Err(err);
    }

    // Safe: length checked above.
    let header = MessageHeader::from_bytes(buf).expect("buf.len() >= HEADER_LEN");

    let total_len = HEADER_LEN + header.payload_length as usize;
    if total_len > max_message_size {
        let err = CodecError::Oversize {
            size: total_len,
            max: max_message_size,
        };
        warn!(error = %err, "decode rejected frame");
        return Err(err);
    }

    if buf.len() < total_len {
        let err = CodecError::Truncated {
            needed: total_len,
            got: buf.len(),
        };
        warn!(error = %err, "decode rejected frame");
        return Err(err);
    }

    if header.version != PROTOCOL_VERSION {
        let err = CodecError::VersionMismatch {
            expected: PROTOCOL_VERSION,
            got: header.version,
        };
        warn!(error = %err, "decode rejected frame");
        return Err(err);
    }

    let kind = MessageType::from_u8(header.kind).ok_or_else(|| {
        let err = CodecError::InvalidType(header.kind);
        warn!(error = %err, "decode rejected frame");
        err
    })?;

    let payload = &buf[HEADER_LEN..total_len];
    let computed = payload_checksum(payload);
    if computed != header.checksum {
        let err = CodecError::ChecksumFail {
            expected: header.checksum,
            computed,
        };
        warn!(error = %err, "decode rejected frame");
        return Err(err);
    }

    Ok(DecodedMessage {
        kind,
        flags: header.flags,
        sequence: header.sequence,
        payload: Bytes::copy_from_slice(payload),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: usize = statelink_wire::DEFAULT_MAX_MESSAGE_SIZE;

    #[test]
    fn round_trips_a_command_message() {
        let payload = b"ping";
        let framed = encode(MessageType::Command, MessageFlags::RELIABLE, 7, payload);
        let decoded = decode(&framed, MAX).unwrap();
        assert_eq!(decoded.kind, MessageType::Command);
        assert_eq!(decoded.flags, MessageFlags::RELIABLE);
        assert_eq!(decoded.sequence, 7);
        assert_eq!(&decoded.payload[..], payload);
    }

    #[test]
    fn round_trips_an_empty_payload() {
        let framed = encode(MessageType::Heartbeat, MessageFlags::empty(), 1, &[]);
        let decoded = decode(&framed, MAX).unwrap();
        assert!(decoded.payload.is_empty());
    }

    #[test]
    fn rejects_too_short_buffer() {
        let err = decode(&[0u8; 4], MAX).unwrap_err();
        assert_eq!(
            err,
            CodecError::Truncated {
                needed: HEADER_LEN,
                got: 4
            }
        );
    }

    #[test]
    fn rejects_truncated_payload() {
        let framed = encode(MessageType::Command, MessageFlags::empty(), 1, b"hello");
        let short = &framed[..framed.len() - 1];
        assert!(matches!(
            decode(short, MAX),
            Err(CodecError::Truncated { .. })
        ));
    }

    #[test]
    fn rejects_bad_version() {
        let mut framed = encode(MessageType::Command, MessageFlags::empty(), 1, b"x").to_vec();
        framed[0] = 9;
        assert_eq!(
            decode(&framed, MAX).unwrap_err(),
            CodecError::VersionMismatch {
                expected: 1,
                got: 9
            }
        );
    }

    #[test]
    fn rejects_unknown_type() {
        let mut framed = encode(MessageType::Command, MessageFlags::empty(), 1, b"x").to_vec();
        framed[1] = 200;
        assert_eq!(decode(&framed, MAX).unwrap_err(), CodecError::InvalidType(200));
    }

    #[test]
    fn rejects_checksum_mismatch_on_bit_flip() {
        let mut framed = encode(MessageType::Command, MessageFlags::empty(), 1, b"ping").to_vec();
        let last = framed.len() - 1;
        framed[last] ^= 0x01;
        assert!(matches!(
            decode(&framed, MAX),
            Err(CodecError::ChecksumFail { .. })
        ));
    }

    #[test]
    fn rejects_oversize_frames() {
        let framed = encode(MessageType::Command, MessageFlags::empty(), 1, &[0u8; 100]);
        assert!(matches!(
            decode(&framed, HEADER_LEN + 10),
            Err(CodecError::Oversize { .. })
        ));
    }

    #[test]
    fn every_single_bit_flip_in_payload_is_detected() {
        let payload = b"the-quick-brown-fox";
        let framed = encode(MessageType::Command, MessageFlags::empty(), 1, payload).to_vec();
        for byte_idx in HEADER_LEN..framed.len() {
            for bit in 0..8u8 {
                let mut corrupted = framed.clone();
                corrupted[byte_idx] ^= 1 << bit;
                assert!(
                    decode(&corrupted, MAX).is_err(),
                    "bit {bit} of byte {byte_idx} should have been caught"
                );
            }
        }
    }
}
