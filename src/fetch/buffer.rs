/// Append-only accumulator for a response body under construction. Chunks go
/// in as they arrive off the wire and are never reordered or trimmed.
#[derive(Debug, Default)]
pub struct BodyBuffer {
    bytes: Vec<u8>,
}

impl BodyBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    pub fn append(&mut self, chunk: &[u8]) {
        self.bytes.extend_from_slice(chunk);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_preserve_arrival_order() {
        let mut buffer = BodyBuffer::new();
        buffer.append(b"first ");
        buffer.append(b"second ");
        buffer.append(b"third");
        assert_eq!(buffer.as_slice(), b"first second third");
    }

    #[test]
    fn clear_empties_the_buffer() {
        let mut buffer = BodyBuffer::new();
        buffer.append(b"leftover");
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
    }

    #[test]
    fn binary_chunks_survive_unchanged() {
        let mut buffer = BodyBuffer::new();
        buffer.append(&[0x00, 0xff, 0x7f]);
        buffer.append(&[0x01]);
        assert_eq!(buffer.into_bytes(), vec![0x00, 0xff, 0x7f, 0x01]);
    }
}
