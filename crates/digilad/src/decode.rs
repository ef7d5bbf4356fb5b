//! Streaming-safe UTF-8 decoding.
//!
//! Chunk boundaries on a byte stream fall wherever the transport likes,
//! including in the middle of a multi-byte character. `StreamDecoder` carries
//! the incomplete tail of one chunk into the next so every character comes
//! out intact and exactly once.

use crate::errors::{ChatError, ChatResult};

#[derive(Debug, Default)]
pub struct StreamDecoder {
    carry: Vec<u8>,
}

impl StreamDecoder {
    pub fn new() -> Self {
        StreamDecoder::default()
    }

    /// Decode the next chunk, returning all text that is complete so far.
    /// An incomplete trailing sequence is held back for the next call; a
    /// sequence that can never become valid is an error.
    pub fn decode(&mut self, input: &[u8]) -> ChatResult<String> {
        let mut buf = std::mem::take(&mut self.carry);
        buf.extend_from_slice(input);

        match std::str::from_utf8(&buf) {
            Ok(_) => String::from_utf8(buf).map_err(|_| ChatError::InvalidUtf8),
            // error_len() of None means the buffer merely ends mid-character.
            Err(err) if err.error_len().is_none() => {
                let tail = buf.split_off(err.valid_up_to());
                self.carry = tail;
                String::from_utf8(buf).map_err(|_| ChatError::InvalidUtf8)
            }
            Err(_) => Err(ChatError::InvalidUtf8),
        }
    }

    /// Signal end of stream. Fails if bytes of an unfinished character are
    /// still pending.
    pub fn finish(self) -> ChatResult<()> {
        if self.carry.is_empty() {
            Ok(())
        } else {
            Err(ChatError::InvalidUtf8)
        }
    }
}
