use crate::token::Serialize;

/// Accumulates the markup produced by a pass.
#[derive(Debug, Default, Clone)]
pub struct OutputBuffer {
    buffer: String,
}

impl OutputBuffer {
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        OutputBuffer {
            buffer: String::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn write_str(&mut self, chunk: &str) {
        self.buffer.push_str(chunk);
    }

    #[inline]
    pub fn write_token(&mut self, token: &dyn Serialize) {
        token.serialize(&mut self.buffer);
    }

    #[inline]
    pub fn prepend(&mut self, chunk: &str) {
        self.buffer.insert_str(0, chunk);
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.buffer
    }
}
