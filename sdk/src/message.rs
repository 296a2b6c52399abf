use bitpacker_schema::{ByteBuffer, ByteBufferMut, WireError};
use crate::compress;

/// A class with a generated codec. Every class in a schema implements this,
/// so any of them can be sent as a standalone message; nested classes are
/// written with `encode_to`/`decode_from` and carry no header.
pub trait Message: Sized {
    /// Schema version written at the start of every message.
    const VERSION: &'static str;

    /// Whether whole messages are zlib-compressed. Fixed at generation time.
    const COMPRESSED: bool = false;

    /// Writes the fields of `self` in declaration order.
    fn encode_to(&self, bb: &mut ByteBufferMut);

    /// Reads the fields of `Self` in declaration order.
    fn decode_from(bb: &mut ByteBuffer<'_>) -> Result<Self, WireError>;

    /// Encodes `self` as a standalone message: the version string followed
    /// by the fields, compressed as a whole when `COMPRESSED` is set.
    fn encode(&self) -> Result<Vec<u8>, WireError> {
        let mut bb = ByteBufferMut::new();
        bb.write_string(Self::VERSION);
        self.encode_to(&mut bb);
        log::trace!("encoded message v{} ({} bytes)", Self::VERSION, bb.len());

        if Self::COMPRESSED {
            compress::deflate(bb.as_slice())
        } else {
            Ok(bb.data())
        }
    }

    /// Decodes a standalone message produced by [`Message::encode`]. Fails
    /// on a version mismatch before any field is read.
    fn decode(data: &[u8]) -> Result<Self, WireError> {
        if Self::COMPRESSED {
            let raw = compress::inflate(data)?;
            decode_message(&raw)
        } else {
            decode_message(data)
        }
    }
}

/// Reads the version header and fields of an uncompressed message.
pub fn decode_message<M: Message>(data: &[u8]) -> Result<M, WireError> {
    let mut bb = ByteBuffer::new(data);
    bb.expect_version(M::VERSION)?;
    let message = M::decode_from(&mut bb)?;
    if bb.remaining() > 0 {
        log::trace!("ignoring {} trailing byte(s)", bb.remaining());
    }
    Ok(message)
}
