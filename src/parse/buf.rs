use std::{
    cmp::{max, min},
    fmt,
    io::{self, Read},
    ops,
};

use super::{Input, ParseError};


/// The initial size of the buffer in bytes.
const START_BUFFER_SIZE: usize = 8 * 1024;

/// The maximum size the internal buffer can grow to. Parsers only ever look
/// at one small piece of data at a time (one header line, one ASCII row, one
/// binary value), so this is only reached for degenerated input like a
/// gigantic header line without linebreak.
const MAX_BUFFER_SIZE: usize = 4 * 1024 * 1024;


/// A read-ahead buffer around an `io::Read` that counts consumed bytes.
///
/// The underlying reader is always read in big chunks, so its position is
/// usually somewhere after the data that was actually parsed. The only
/// reliable position is `consumed_total`, which is exactly the number of bytes
/// the parsers consumed.
pub(crate) struct Buffer<R: Read> {
    buf: Vec<u8>,
    reader: R,
    start: usize,
    end: usize,
    consumed_total: u64,
}

impl<R: Read> fmt::Debug for Buffer<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("capacity", &self.buf.len())
            .field("buffered", &(self.end - self.start))
            .field("consumed_total", &self.consumed_total)
            .finish()
    }
}

impl<R: Read> Buffer<R> {
    pub(crate) fn new(reader: R) -> Result<Self, ParseError> {
        let mut out = Self {
            buf: vec![0; START_BUFFER_SIZE],
            reader,
            start: 0,
            end: 0,
            consumed_total: 0,
        };

        // Read once to prefill the buffer.
        out.fill(1, false)?;

        Ok(out)
    }

    fn len(&self) -> usize {
        self.end - self.start
    }

    fn cap(&self) -> usize {
        self.buf.len()
    }

    /// Makes room for at least `additional` bytes after `self.end`, either by
    /// moving the data to the front or by growing the buffer.
    fn make_room(&mut self, additional: usize) -> Result<(), ParseError> {
        let space_after = self.cap() - self.end;
        if space_after >= additional {
            return Ok(());
        }

        let space_before = self.start;

        // Moving is only worth it if the data to move is small compared to the
        // buffer. Otherwise alternating small and big requests would copy the
        // same bytes over and over again.
        if space_after + space_before >= additional && self.len() < self.cap() / 2 {
            self.buf.copy_within(self.start..self.end, 0);
        } else {
            if self.len() + additional > MAX_BUFFER_SIZE {
                return Err(ParseError::LookAheadTooBig);
            }

            // At least our current length + `additional`, but no less than
            // twice the current buffer size.
            let new_len = min(
                max(self.len() + additional, self.cap() * 2),
                MAX_BUFFER_SIZE,
            );

            let mut new = Vec::with_capacity(new_len);
            new.extend_from_slice(&self.buf[self.start..self.end]);
            new.resize(new_len, 0);
            self.buf = new;
        }

        // In both cases, the data starts at the very beginning now.
        self.end -= self.start;
        self.start = 0;

        Ok(())
    }

    /// Reads until at least `additional` new bytes are in the buffer. If the
    /// reader is exhausted before that, either `UnexpectedEof` is returned
    /// (`require_all`) or the function just returns.
    fn fill(&mut self, additional: usize, require_all: bool) -> Result<(), ParseError> {
        self.make_room(additional)?;

        let mut bytes_read = 0;
        while bytes_read < additional {
            match self.reader.read(&mut self.buf[self.end..]) {
                Ok(0) => {
                    // `self.buf[self.end..]` is not empty (`make_room`), so the
                    // reader is exhausted.
                    if require_all {
                        return Err(ParseError::UnexpectedEof(
                            self.consumed_total + self.len() as u64,
                        ));
                    }
                    break;
                }
                Ok(n) => {
                    self.end += n;
                    bytes_read += n;
                }
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }
}

impl<R: Read> ops::Deref for Buffer<R> {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.buf[self.start..self.end]
    }
}

impl<R: Read> Input for Buffer<R> {
    fn prepare(&mut self, num_bytes: usize) -> Result<(), ParseError> {
        if self.len() < num_bytes {
            let diff = num_bytes - self.len();
            self.fill(diff, true)?;
        }

        Ok(())
    }

    fn saturating_prepare(&mut self, num_bytes: usize) -> Result<(), ParseError> {
        if self.len() < num_bytes {
            let diff = num_bytes - self.len();
            self.fill(diff, false)?;
        }

        Ok(())
    }

    fn consume(&mut self, num_bytes: usize) {
        assert!(self.start + num_bytes <= self.end);

        self.start += num_bytes;
        self.consumed_total += num_bytes as u64;

        // If we consumed all the data, we set both indices to 0.
        if self.start == self.end {
            self.start = 0;
            self.end = 0;
        }
    }

    fn offset(&self) -> u64 {
        self.consumed_total
    }
}
