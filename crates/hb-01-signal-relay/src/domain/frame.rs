//! Transport-level message unit.

/// One message as received from, or sent to, a WebSocket peer.
///
/// Forwarding keeps both the bytes and the frame kind, so a text control
/// envelope leaves the relay as the same text frame it arrived in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
}

impl Frame {
    /// Raw payload bytes
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Frame::Text(text) => text.as_bytes(),
            Frame::Binary(data) => data,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Frame::Binary(_))
    }
}

impl From<String> for Frame {
    fn from(text: String) -> Self {
        Frame::Text(text)
    }
}

impl From<&str> for Frame {
    fn from(text: &str) -> Self {
        Frame::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Frame {
    fn from(data: Vec<u8>) -> Self {
        Frame::Binary(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_of_each_kind() {
        assert_eq!(Frame::from("hi").as_bytes(), b"hi");
        assert_eq!(Frame::from(vec![0xde, 0xad]).as_bytes(), &[0xde, 0xad]);
        assert!(Frame::Binary(Vec::new()).is_empty());
        assert!(!Frame::from("x").is_binary());
    }
}
