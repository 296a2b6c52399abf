use crate::{error::WireError, FLOAT_SCALE};
use std::str;

/// Longest legal varint: ten 7-bit groups cover a full 64-bit value.
const MAX_VARINT_SHIFT: u32 = 70;

/// Deepest class nesting a decoder will follow before giving up.
pub const MAX_DEPTH: usize = 256;

/// A BitPacker byte buffer meant for reading.
///
/// Example usage:
///
/// ```
/// let mut bb = bitpacker_schema::ByteBuffer::new(&[4, 240, 159, 141, 149, 144, 78]);
/// assert_eq!(bb.read_string().unwrap(), "🍕");
/// assert_eq!(bb.read_float().unwrap(), 0.5);
/// ```
///
pub struct ByteBuffer<'a> {
    data: &'a [u8],
    index: usize,
    depth: usize,
}

impl<'a> ByteBuffer<'a> {
    /// Create a new ByteBuffer that wraps the provided byte slice. The lifetime
    /// of the returned ByteBuffer must not outlive the lifetime of the byte
    /// slice.
    pub fn new(data: &'a [u8]) -> ByteBuffer<'a> {
        ByteBuffer { data, index: 0, depth: 0 }
    }

    /// Retrieves the underlying byte slice.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Retrieves the current read position. This starts off as 0 and ends up
    /// as `self.data().len()` when everything has been read.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.index
    }

    /// Fails with [`WireError::BufferUnderflow`] unless `len` more bytes are
    /// available. Every read goes through this check.
    pub fn ensure(&self, len: usize) -> Result<(), WireError> {
        if len > self.remaining() {
            Err(WireError::BufferUnderflow {
                needed:    len,
                remaining: self.remaining(),
            })
        } else {
            Ok(())
        }
    }

    /// Read a one-byte boolean. Any non-zero byte is `true`.
    pub fn read_bool(&mut self) -> Result<bool, WireError> {
        Ok(self.read_byte()? != 0)
    }

    pub fn read_byte(&mut self) -> Result<u8, WireError> {
        self.ensure(1)?;
        let value = self.data[self.index];
        self.index += 1;
        Ok(value)
    }

    /// Read `len` raw bytes. The returned slice aliases the input.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], WireError> {
        self.ensure(len)?;
        let value = &self.data[self.index..self.index + len];
        self.index += len;
        Ok(value)
    }

    /// Read a zig-zag encoded signed 32-bit integer.
    pub fn read_var_int(&mut self) -> Result<i32, WireError> {
        let value = self.read_var_uint()?;
        Ok(((value >> 1) as i32) ^ -((value & 1) as i32))
    }

    /// Read an unsigned varint, keeping the low 32 bits of the accumulated
    /// value.
    pub fn read_var_uint(&mut self) -> Result<u32, WireError> {
        Ok(self.read_var_uint64()? as u32)
    }

    /// Read a zig-zag encoded signed 64-bit integer.
    pub fn read_var_int64(&mut self) -> Result<i64, WireError> {
        let value = self.read_var_uint64()?;
        Ok(((value >> 1) as i64) ^ -((value & 1) as i64))
    }

    /// Read an unsigned varint of up to ten bytes.
    pub fn read_var_uint64(&mut self) -> Result<u64, WireError> {
        let mut shift: u32 = 0;
        let mut result: u64 = 0;

        loop {
            let byte = self.read_byte()?;
            result |= ((byte & 127) as u64) << shift;

            if (byte & 128) == 0 {
                return Ok(result);
            }

            shift += 7;
            if shift >= MAX_VARINT_SHIFT {
                return Err(WireError::VarintOverflow);
            }
        }
    }

    /// Read a fixed-point float: a zig-zag 64-bit integer divided by
    /// [`FLOAT_SCALE`].
    pub fn read_float(&mut self) -> Result<f64, WireError> {
        Ok(self.read_var_int64()? as f64 / FLOAT_SCALE)
    }

    /// Read a length-prefixed UTF-8 string. The result borrows the input.
    pub fn read_string(&mut self) -> Result<&'a str, WireError> {
        let len = self.read_var_uint()? as usize;
        let bytes = self.read_bytes(len)?;
        str::from_utf8(bytes).map_err(|_| WireError::InvalidUtf8)
    }

    /// Read the version header and compare it byte for byte with `expected`.
    pub fn expect_version(&mut self, expected: &str) -> Result<(), WireError> {
        let found = self.read_string()?;
        if found != expected {
            return Err(WireError::VersionMismatch {
                expected: expected.to_owned(),
                found:    found.to_owned(),
            });
        }
        Ok(())
    }

    /// Read an array element count. Negative counts are rejected.
    pub fn read_array_len(&mut self) -> Result<usize, WireError> {
        let len = self.read_var_int()?;
        if len < 0 {
            return Err(WireError::InvalidLength(len));
        }
        Ok(len as usize)
    }

    /// Marks the start of a class decode. Fails with
    /// [`WireError::DepthLimit`] once nesting passes [`MAX_DEPTH`].
    pub fn enter(&mut self) -> Result<(), WireError> {
        if self.depth >= MAX_DEPTH {
            return Err(WireError::DepthLimit(MAX_DEPTH));
        }
        self.depth += 1;
        Ok(())
    }

    /// Marks the end of a class decode started with [`ByteBuffer::enter`].
    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Current class nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// A capacity hint for a collection of `len` elements that can never
    /// exceed the bytes left, since every element takes at least one byte.
    pub fn capacity_hint(&self, len: usize) -> usize {
        len.min(self.remaining())
    }
}

#[cfg(test)]
fn underflows<T: std::fmt::Debug>(result: Result<T, WireError>) -> bool {
    matches!(result, Err(WireError::BufferUnderflow { .. }))
}

#[test]
fn read_bool() {
    let read = |bytes| ByteBuffer::new(bytes).read_bool().ok();
    assert_eq!(read(&[]), None);
    assert_eq!(read(&[0]), Some(false));
    assert_eq!(read(&[1]), Some(true));
    assert_eq!(read(&[2]), Some(true));
}

#[test]
fn read_bytes() {
    let read = |bytes, len| ByteBuffer::new(bytes).read_bytes(len).ok();
    assert_eq!(read(&[], 0), Some(vec![].as_slice()));
    assert_eq!(read(&[], 1), None);
    assert_eq!(read(&[0], 1), Some(vec![0].as_slice()));
    assert_eq!(read(&[0], 2), None);

    let mut bb = ByteBuffer::new(&[1, 2, 3, 4, 5]);
    assert_eq!(bb.read_bytes(3).ok(), Some(vec![1, 2, 3].as_slice()));
    assert_eq!(bb.remaining(), 2);
    match bb.read_bytes(3) {
        Err(WireError::BufferUnderflow { needed, remaining }) => {
            assert_eq!((needed, remaining), (3, 2));
        }
        other => panic!("expected underflow, got {:?}", other),
    }
    assert_eq!(bb.read_bytes(2).ok(), Some(vec![4, 5].as_slice()));
}

#[test]
fn read_var_int() {
    let read = |bytes| ByteBuffer::new(bytes).read_var_int().ok();
    assert_eq!(read(&[]), None);
    assert_eq!(read(&[0]), Some(0));
    assert_eq!(read(&[1]), Some(-1));
    assert_eq!(read(&[2]), Some(1));
    assert_eq!(read(&[3]), Some(-2));
    assert_eq!(read(&[127]), Some(-64));
    assert_eq!(read(&[128]), None);
    assert_eq!(read(&[128, 1]), Some(64));
    assert_eq!(read(&[129, 2]), Some(-129));
    assert_eq!(read(&[253, 255, 7]), Some(-65535));
    assert_eq!(read(&[254, 255, 7]), Some(65535));
    assert_eq!(read(&[254, 255, 255, 255, 15]), Some(2147483647));
    assert_eq!(read(&[255, 255, 255, 255, 15]), Some(-2147483648));
}

#[test]
fn read_var_uint() {
    let read = |bytes| ByteBuffer::new(bytes).read_var_uint().ok();
    assert_eq!(read(&[]), None);
    assert_eq!(read(&[0]), Some(0));
    assert_eq!(read(&[127]), Some(127));
    assert_eq!(read(&[128]), None);
    assert_eq!(read(&[128, 0]), Some(0));
    assert_eq!(read(&[128, 1]), Some(128));
    assert_eq!(read(&[129, 2]), Some(257));
    assert_eq!(read(&[255, 255, 255, 255, 15]), Some(4294967295));
    // Bits past 32 are dropped.
    assert_eq!(read(&[128, 128, 128, 128, 16]), Some(0));
    assert!(underflows(ByteBuffer::new(&[255, 255]).read_var_uint()));
}

#[test]
fn read_var_uint64() {
    let read = |bytes| ByteBuffer::new(bytes).read_var_uint64().ok();
    assert_eq!(read(&[0]), Some(0));
    assert_eq!(read(&[254, 255, 7]), Some(131070));
    assert_eq!(read(&[128, 128, 128, 128, 16]), Some(0x1_0000_0000));
    assert_eq!(
        read(&[255, 255, 255, 255, 255, 255, 255, 255, 255, 1]),
        Some(u64::MAX)
    );
    assert!(matches!(
        ByteBuffer::new(&[128; 11]).read_var_uint64(),
        Err(WireError::VarintOverflow)
    ));
}

#[test]
fn read_var_int64() {
    let read = |bytes| ByteBuffer::new(bytes).read_var_int64().ok();
    assert_eq!(read(&[1]), Some(-1));
    assert_eq!(read(&[254, 255, 255, 255, 15]), Some(2147483647));
    assert_eq!(
        read(&[254, 255, 255, 255, 255, 255, 255, 255, 255, 1]),
        Some(i64::MAX)
    );
    assert_eq!(
        read(&[255, 255, 255, 255, 255, 255, 255, 255, 255, 1]),
        Some(i64::MIN)
    );
}

#[test]
fn read_float() {
    let read = |bytes| ByteBuffer::new(bytes).read_float().ok();
    assert_eq!(read(&[]), None);
    assert_eq!(read(&[0]), Some(0.0));
    assert_eq!(read(&[144, 78]), Some(0.5));
    assert_eq!(read(&[143, 78]), Some(-0.5));
    assert_eq!(read(&[168, 195, 1]), Some(1.25));
    assert_eq!(read(&[2]), Some(0.0001));
}

#[test]
fn read_string() {
    let read = |bytes| ByteBuffer::new(bytes).read_string().ok();
    assert_eq!(read(&[]), None);
    assert_eq!(read(&[0]), Some(""));
    assert_eq!(read(&[1]), None);
    assert_eq!(read(&[1, 97]), Some("a"));
    assert_eq!(read(&[3, 97, 98, 99]), Some("abc"));
    assert_eq!(read(&[4, 240, 159, 141, 149]), Some("🍕"));
    assert!(underflows(ByteBuffer::new(&[2, 97]).read_string()));
    assert!(matches!(
        ByteBuffer::new(&[1, 255]).read_string(),
        Err(WireError::InvalidUtf8)
    ));
}

#[test]
fn read_array_len() {
    let read = |bytes| ByteBuffer::new(bytes).read_array_len().ok();
    assert_eq!(read(&[0]), Some(0));
    assert_eq!(read(&[8]), Some(4));
    assert!(matches!(
        ByteBuffer::new(&[1]).read_array_len(),
        Err(WireError::InvalidLength(-1))
    ));
    let bb = ByteBuffer::new(&[1, 2, 3]);
    assert_eq!(bb.capacity_hint(1_000_000), 3);
}

#[test]
fn nesting_depth() {
    let mut bb = ByteBuffer::new(&[]);
    for _ in 0..MAX_DEPTH {
        assert!(bb.enter().is_ok());
    }
    assert!(matches!(bb.enter(), Err(WireError::DepthLimit(MAX_DEPTH))));
    assert_eq!(bb.depth(), MAX_DEPTH);

    bb.leave();
    assert!(bb.enter().is_ok());
    for _ in 0..MAX_DEPTH + 3 {
        bb.leave();
    }
    assert_eq!(bb.depth(), 0);
}

#[test]
fn expect_version() {
    let mut bb = ByteBuffer::new(&[3, 49, 46, 48, 7]);
    assert!(bb.expect_version("1.0").is_ok());
    assert_eq!(bb.index(), 4);

    match ByteBuffer::new(&[3, 49, 46, 48]).expect_version("2.0") {
        Err(WireError::VersionMismatch { expected, found }) => {
            assert_eq!(expected, "2.0");
            assert_eq!(found, "1.0");
        }
        other => panic!("expected version mismatch, got {:?}", other),
    }
    assert!(underflows(ByteBuffer::new(&[3, 49]).expect_version("1.0")));
}

#[test]
fn read_sequence() {
    let mut bb = ByteBuffer::new(&[
        0, 144, 78, 4, 240, 159, 141, 149, 149, 154, 239, 58, 1,
    ]);
    assert_eq!(bb.read_float().ok(), Some(0.0));
    assert_eq!(bb.read_float().ok(), Some(0.5));
    assert_eq!(bb.read_string().ok(), Some("🍕"));
    assert_eq!(bb.read_var_uint().ok(), Some(123456789));
    assert_eq!(bb.read_bool().ok(), Some(true));
    assert_eq!(bb.remaining(), 0);
}

/// A BitPacker byte buffer meant for writing.
///
/// Example usage:
///
/// ```
/// let mut bb = bitpacker_schema::ByteBufferMut::new();
/// bb.write_string("🍕");
/// bb.write_float(0.5);
/// assert_eq!(bb.data(), [4, 240, 159, 141, 149, 144, 78]);
/// ```
///
#[derive(Default)]
pub struct ByteBufferMut {
    data: Vec<u8>,
}

impl ByteBufferMut {
    /// Creates an empty ByteBufferMut ready for writing.
    pub fn new() -> ByteBufferMut {
        ByteBufferMut { data: vec![] }
    }

    pub fn with_capacity(capacity: usize) -> ByteBufferMut {
        ByteBufferMut {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Consumes this buffer and returns the underlying backing store. Use this
    /// to get the data out when you're done writing to the buffer.
    pub fn data(self) -> Vec<u8> {
        self.data
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Returns the number of bytes written so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn write_bool(&mut self, value: bool) {
        self.data.push(if value { 1 } else { 0 });
    }

    pub fn write_byte(&mut self, value: u8) {
        self.data.push(value);
    }

    pub fn write_bytes(&mut self, value: &[u8]) {
        self.data.extend_from_slice(value);
    }

    /// Write a zig-zag encoded signed 32-bit integer.
    pub fn write_var_int(&mut self, value: i32) {
        self.write_var_uint(((value << 1) ^ (value >> 31)) as u32);
    }

    pub fn write_var_uint(&mut self, value: u32) {
        self.write_var_uint64(value as u64);
    }

    /// Write a zig-zag encoded signed 64-bit integer.
    pub fn write_var_int64(&mut self, value: i64) {
        self.write_var_uint64(((value << 1) ^ (value >> 63)) as u64);
    }

    pub fn write_var_uint64(&mut self, mut value: u64) {
        // 1-byte fast path
        if value < 0x80 {
            self.data.push(value as u8);
            return;
        }

        while value >= 0x80 {
            self.data.push((value as u8 & 127) | 128);
            value >>= 7;
        }
        self.data.push(value as u8);
    }

    /// Write a fixed-point float. The scaled value is truncated toward zero
    /// and saturates at the `i64` range; NaN encodes as zero.
    pub fn write_float(&mut self, value: f64) {
        self.write_var_int64((value * FLOAT_SCALE) as i64);
    }

    /// Write a UTF-8 string as its byte length followed by the bytes.
    pub fn write_string(&mut self, value: &str) {
        self.write_var_uint(value.len() as u32);
        self.data.extend_from_slice(value.as_bytes());
    }

    /// Write an array element count as a signed 32-bit varint.
    pub fn write_array_len(&mut self, len: usize) {
        self.write_var_int(len as i32);
    }
}

#[cfg(test)]
fn write_once(cb: fn(&mut ByteBufferMut)) -> Vec<u8> {
    let mut bb = ByteBufferMut::new();
    cb(&mut bb);
    bb.data()
}

#[test]
fn write_bool() {
    assert_eq!(write_once(|bb| bb.write_bool(false)), [0]);
    assert_eq!(write_once(|bb| bb.write_bool(true)), [1]);
}

#[test]
fn write_var_int() {
    assert_eq!(write_once(|bb| bb.write_var_int(0)), [0]);
    assert_eq!(write_once(|bb| bb.write_var_int(-1)), [1]);
    assert_eq!(write_once(|bb| bb.write_var_int(1)), [2]);
    assert_eq!(write_once(|bb| bb.write_var_int(-64)), [127]);
    assert_eq!(write_once(|bb| bb.write_var_int(63)), [126]);
    assert_eq!(write_once(|bb| bb.write_var_int(64)), [128, 1]);
    assert_eq!(write_once(|bb| bb.write_var_int(-129)), [129, 2]);
    assert_eq!(write_once(|bb| bb.write_var_int(65535)), [254, 255, 7]);
    assert_eq!(
        write_once(|bb| bb.write_var_int(2147483647)),
        [254, 255, 255, 255, 15]
    );
    assert_eq!(
        write_once(|bb| bb.write_var_int(-2147483648)),
        [255, 255, 255, 255, 15]
    );
}

#[test]
fn write_var_uint() {
    assert_eq!(write_once(|bb| bb.write_var_uint(0)), [0]);
    assert_eq!(write_once(|bb| bb.write_var_uint(127)), [127]);
    assert_eq!(write_once(|bb| bb.write_var_uint(128)), [128, 1]);
    assert_eq!(write_once(|bb| bb.write_var_uint(16383)), [255, 127]);
    assert_eq!(write_once(|bb| bb.write_var_uint(16384)), [128, 128, 1]);
    assert_eq!(
        write_once(|bb| bb.write_var_uint(4294967295)),
        [255, 255, 255, 255, 15]
    );
}

#[test]
fn write_var_64() {
    assert_eq!(
        write_once(|bb| bb.write_var_uint64(u64::MAX)),
        [255, 255, 255, 255, 255, 255, 255, 255, 255, 1]
    );
    assert_eq!(
        write_once(|bb| bb.write_var_int64(i64::MIN)),
        [255, 255, 255, 255, 255, 255, 255, 255, 255, 1]
    );
    assert_eq!(
        write_once(|bb| bb.write_var_int64(i64::MAX)),
        [254, 255, 255, 255, 255, 255, 255, 255, 255, 1]
    );
    assert_eq!(write_once(|bb| bb.write_var_int64(-65535)), [253, 255, 7]);
}

#[test]
fn write_float() {
    assert_eq!(write_once(|bb| bb.write_float(0.0)), [0]);
    assert_eq!(write_once(|bb| bb.write_float(-0.0)), [0]);
    assert_eq!(write_once(|bb| bb.write_float(0.5)), [144, 78]);
    assert_eq!(write_once(|bb| bb.write_float(-0.5)), [143, 78]);
    assert_eq!(write_once(|bb| bb.write_float(1.25)), [168, 195, 1]);
    // Truncation toward zero, not rounding.
    assert_eq!(write_once(|bb| bb.write_float(0.00019)), [2]);
    assert_eq!(write_once(|bb| bb.write_float(-0.00019)), [1]);
    assert_eq!(write_once(|bb| bb.write_float(f64::NAN)), [0]);
    assert_eq!(
        write_once(|bb| bb.write_float(f64::INFINITY)),
        [254, 255, 255, 255, 255, 255, 255, 255, 255, 1]
    );
}

#[test]
fn write_string() {
    assert_eq!(write_once(|bb| bb.write_string("")), [0]);
    assert_eq!(write_once(|bb| bb.write_string("abc")), [3, 97, 98, 99]);
    assert_eq!(
        write_once(|bb| bb.write_string("🍕")),
        [4, 240, 159, 141, 149]
    );
}

#[test]
fn write_sequence() {
    let mut bb = ByteBufferMut::new();
    bb.write_float(0.0);
    bb.write_float(0.5);
    bb.write_string("🍕");
    bb.write_var_uint(123456789);
    bb.write_bool(true);
    assert_eq!(bb.len(), 13);
    assert_eq!(
        bb.data(),
        [0, 144, 78, 4, 240, 159, 141, 149, 149, 154, 239, 58, 1]
    );
}
