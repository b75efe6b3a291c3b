use std::fmt;

/// Message type, carried in byte 1 of the header.
///
/// Wire-compatible: `repr(u8)` matches the on-wire encoding directly.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageType {
    Handshake = 1,
    Auth = 2,
    Command = 3,
    Error = 4,
    Heartbeat = 5,
}

impl MessageType {
    /// Convert from a wire byte. `None` if the value isn't one of the
    /// five known types.
    pub fn from_u8(val: u8) -> Option<Self> {
        Some(match val {
            1 => MessageType::Handshake,
            2 => MessageType::Auth,
            3 => MessageType::Command,
            4 => MessageType::Error,
            5 => MessageType::Heartbeat,
            _ => return None,
        })
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for MessageType {
    type Error = UnknownMessageType;

    fn try_from(val: u8) -> Result<Self, Self::Error> {
        MessageType::from_u8(val).ok_or(UnknownMessageType(val))
    }
}

impl From<MessageType> for u8 {
    fn from(kind: MessageType) -> u8 {
        kind.as_u8()
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageType::Handshake => "handshake",
            MessageType::Auth => "auth",
            MessageType::Command => "command",
            MessageType::Error => "error",
            MessageType::Heartbeat => "heartbeat",
        };
        f.write_str(name)
    }
}

/// Error when converting from an unknown wire message-type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessageType(pub u8);

impl fmt::Display for UnknownMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown message type: {}", self.0)
    }
}

impl std::error::Error for UnknownMessageType {}
