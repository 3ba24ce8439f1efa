use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};

/// Source of bits, most significant bit of each byte first
pub trait BitRead {
    /// Read `count` bits (at most 32) as an unsigned value.
    /// Returns `None` once fewer than `count` bits remain.
    fn read_bits(&mut self, count: u32) -> io::Result<Option<u32>>;

    fn bits_read(&self) -> u64;
}

/// Bit source that can be replayed from the start
pub trait BitRewind: BitRead {
    /// Rewind to the first bit of the input
    fn reset(&mut self) -> io::Result<()>;
}

/// Sink of bits, most significant bit of each byte first
pub trait BitWrite {
    /// Write the low `count` bits (at most 32) of `value`
    fn write_bits(&mut self, count: u32, value: u32) -> io::Result<()>;

    /// Pad the trailing partial byte with zeros and flush the sink
    fn flush_bits(&mut self) -> io::Result<()>;

    fn bits_written(&self) -> u64;
}

pub struct BitInputStream<R> {
    inner: R,
    pending: u64,
    pending_bits: u32,
    bits_read: u64,
}

impl<R: Read> BitInputStream<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending: 0,
            pending_bits: 0,
            bits_read: 0,
        }
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: Read> BitRead for BitInputStream<R> {
    fn read_bits(&mut self, count: u32) -> io::Result<Option<u32>> {
        debug_assert!(count <= 32);

        while self.pending_bits < count {
            match self.next_byte()? {
                Some(byte) => {
                    self.pending = (self.pending << 8) | byte as u64;
                    self.pending_bits += 8;
                }
                None => return Ok(None),
            }
        }

        let shift = self.pending_bits - count;
        let mask = (1u64 << count) - 1;
        let value = ((self.pending >> shift) & mask) as u32;
        self.pending_bits = shift;
        self.pending &= (1u64 << shift) - 1;
        self.bits_read += count as u64;

        Ok(Some(value))
    }

    fn bits_read(&self) -> u64 {
        self.bits_read
    }
}

impl<R: Read + Seek> BitRewind for BitInputStream<R> {
    fn reset(&mut self) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(0))?;
        self.pending = 0;
        self.pending_bits = 0;
        self.bits_read = 0;
        Ok(())
    }
}

/// Bit writer over any byte sink. The trailing partial byte is flushed on
/// `close` or, failing that, when the stream is dropped.
pub struct BitOutputStream<W: Write> {
    inner: Option<W>,
    current: u8,
    filled: u32,
    bits_written: u64,
}

impl<W: Write> BitOutputStream<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: Some(inner),
            current: 0,
            filled: 0,
            bits_written: 0,
        }
    }

    fn sink(&mut self) -> io::Result<&mut W> {
        self.inner.as_mut().ok_or_else(closed)
    }

    fn push_bit(&mut self, bit: bool) -> io::Result<()> {
        if bit {
            self.current |= 1 << (7 - self.filled);
        }
        self.filled += 1;

        if self.filled == 8 {
            let byte = self.current;
            self.sink()?.write_all(&[byte])?;
            self.current = 0;
            self.filled = 0;
        }
        Ok(())
    }

    /// Flush pending bits and hand back the sink
    pub fn close(mut self) -> io::Result<W> {
        self.flush_bits()?;
        self.inner.take().ok_or_else(closed)
    }
}

impl<W: Write> BitWrite for BitOutputStream<W> {
    fn write_bits(&mut self, count: u32, value: u32) -> io::Result<()> {
        debug_assert!(count <= 32);

        for pos in (0..count).rev() {
            self.push_bit((value >> pos) & 1 == 1)?;
        }
        self.bits_written += count as u64;
        Ok(())
    }

    fn flush_bits(&mut self) -> io::Result<()> {
        if self.filled > 0 {
            let byte = self.current;
            self.sink()?.write_all(&[byte])?;
            self.current = 0;
            self.filled = 0;
        }
        self.sink()?.flush()
    }

    fn bits_written(&self) -> u64 {
        self.bits_written
    }
}

fn closed() -> io::Error {
    io::Error::new(ErrorKind::BrokenPipe, "bit stream already closed")
}

impl<W: Write> Drop for BitOutputStream<W> {
    fn drop(&mut self) {
        if self.inner.is_some() {
            let _ = self.flush_bits();
        }
    }
}
