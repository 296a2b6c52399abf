//! zlib wrapping for compressed messages. The whole encoded message,
//! version header included, is compressed as one stream.

use std::io::{Read, Write};
use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};
use bitpacker_schema::WireError;

pub fn deflate(data: &[u8]) -> Result<Vec<u8>, WireError> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2 + 16), Compression::default());
    encoder.write_all(data)?;
    let out = encoder.finish()?;
    log::trace!("deflated {} -> {} bytes", data.len(), out.len());
    Ok(out)
}

pub fn inflate(data: &[u8]) -> Result<Vec<u8>, WireError> {
    let mut decoder = ZlibDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    log::trace!("inflated {} -> {} bytes", data.len(), out.len());
    Ok(out)
}
