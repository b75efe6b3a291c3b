use bitflags::bitflags;

bitflags! {
    /// Per-message flag bitmask, carried in bytes 2-3 of the header.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MessageFlags: u16 {
        /// Sender wants delivery acknowledged (advisory only — the core
        /// does not implement retransmission).
        const RELIABLE   = 1 << 0;
        /// Payload is encrypted by a higher layer. Opaque to the core.
        const ENCRYPTED  = 1 << 1;
        /// Payload is compressed by a higher layer. Opaque to the core.
        const COMPRESSED = 1 << 2;
        /// Sender requests priority handling. Advisory only.
        const URGENT     = 1 << 3;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_match_wire_layout() {
        assert_eq!(MessageFlags::RELIABLE.bits(), 1);
        assert_eq!(MessageFlags::ENCRYPTED.bits(), 2);
        assert_eq!(MessageFlags::COMPRESSED.bits(), 4);
        assert_eq!(MessageFlags::URGENT.bits(), 8);
    }

    #[test]
    fn combines_with_bitor() {
        let combined = MessageFlags::ENCRYPTED | MessageFlags::RELIABLE;
        assert!(combined.contains(MessageFlags::ENCRYPTED));
        assert!(combined.contains(MessageFlags::RELIABLE));
        assert!(!combined.contains(MessageFlags::URGENT));
        assert_eq!(combined.bits(), 3);
    }

    #[test]
    fn from_bits_preserves_unknown_bits_as_truncated() {
        // bitflags 2's default from_bits is strict; from_bits_truncate
        // drops reserved bits, which is what the decoder wants.
        let raw: u16 = 0b1111_0000_0000_1111;
        let truncated = MessageFlags::from_bits_truncate(raw);
        assert_eq!(truncated.bits(), 0b1111);
    }
}
