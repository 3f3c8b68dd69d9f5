//! Low level byte input used by the PLY reader.
//!
//! Everything here works on an [`Input`]: a byte slice view into a read-ahead
//! buffer which knows exactly how many bytes of the underlying stream were
//! consumed so far. Parsers never ask the underlying reader for its position
//! (which, with buffering, is always somewhere after the logical position),
//! they only look at [`Input::offset`].

use std::{
    fmt,
    io,
    ops,
};

use failure::Fail;


pub(crate) mod buf;

pub(crate) use self::buf::Buffer;


pub(crate) trait Input: ops::Deref<Target = [u8]> {
    /// Makes sure at least `num_bytes` bytes are available in the slice.
    /// Returns `UnexpectedEof` if the stream ends before that.
    fn prepare(&mut self, num_bytes: usize) -> Result<(), ParseError>;

    /// Like `prepare`, but hitting the end of the stream is not an error. After
    /// this call, fewer than `num_bytes` are available only if the stream is
    /// exhausted.
    fn saturating_prepare(&mut self, num_bytes: usize) -> Result<(), ParseError>;

    /// Removes `num_bytes` from the front. They have to be available already.
    fn consume(&mut self, num_bytes: usize);

    /// Number of bytes consumed since the start of the stream.
    fn offset(&self) -> u64;


    fn is_eof(&mut self) -> Result<bool, ParseError> {
        self.saturating_prepare(1)?;
        Ok(self.is_empty())
    }

    fn spanned_data(&self, num_bytes: usize) -> SpannedData<'_> {
        SpannedData {
            data: &self[..num_bytes],
            span: Span::new(self.offset(), self.offset() + num_bytes as u64),
        }
    }

    fn skip(&mut self, num_bytes: usize) -> Result<(), ParseError> {
        self.prepare(num_bytes)?;
        self.consume(num_bytes);

        Ok(())
    }

    /// Passes the next line to `func` and consumes it, including its line
    /// terminator.
    ///
    /// Lines end with `\n` or `\r\n`; the terminator is not part of the data
    /// passed to `func`, but its bytes are consumed (and thus counted by
    /// `offset`). The last line of a stream may lack a terminator. If the
    /// stream is already exhausted, `UnexpectedEof` is returned.
    fn take_line<F, O, E>(&mut self, func: F) -> Result<O, E>
    where
        F: FnOnce(SpannedData<'_>) -> Result<O, E>,
        E: From<ParseError>,
    {
        let mut pos = 0;
        let mut terminated = false;
        loop {
            if self.len() <= pos {
                self.saturating_prepare(pos + 1)?;
                if self.len() <= pos {
                    break;
                }
            }

            if self[pos] == b'\n' {
                terminated = true;
                break;
            }

            pos += 1;
        }

        if pos == 0 && !terminated {
            return Err(ParseError::UnexpectedEof(self.offset()).into());
        }

        let content_len = if pos > 0 && self[pos - 1] == b'\r' { pos - 1 } else { pos };
        let out = func(self.spanned_data(content_len))?;
        self.consume(if terminated { pos + 1 } else { pos });

        Ok(out)
    }
}

#[derive(Debug)]
pub struct SpannedData<'a> {
    pub data: &'a [u8],
    pub span: Span,
}

impl<'a> SpannedData<'a> {
    pub fn assert_ascii(&self) -> Result<&'a str, ParseError> {
        if !self.data.is_ascii() {
            Err(ParseError::NotAscii(self.span))
        } else {
            // ASCII is always valid UTF-8.
            std::str::from_utf8(self.data).map_err(|_| ParseError::NotAscii(self.span))
        }
    }
}

/// A byte range `lo..hi` in the input stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    lo: u64,
    hi: u64,
}

impl Span {
    pub fn new(lo: u64, hi: u64) -> Self {
        Self { lo, hi }
    }

    pub fn lo(&self) -> u64 {
        self.lo
    }

    pub fn hi(&self) -> u64 {
        self.hi
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}..{}", self.lo, self.hi)
    }
}

#[derive(Debug, Fail)]
pub enum ParseError {
    #[fail(display = "IO error: {}", _0)]
    Io(io::Error),

    #[fail(display = "unexpected EOF while parsing (at {})", _0)]
    UnexpectedEof(u64),

    #[fail(display = "unexpected non-ASCII data at {}", _0)]
    NotAscii(Span),

    #[fail(
        display = "parsing lookahead got too big (due to a really degenerated \
            file, e.g. a header line without linebreak)"
    )]
    LookAheadTooBig,
}

impl From<io::Error> for ParseError {
    fn from(src: io::Error) -> Self {
        ParseError::Io(src)
    }
}


macro_rules! gen_endian_parser {
    ($name:ident, $ty:ident, $method:ident, $endian:ident) => {
        pub(crate) fn $name(input: &mut impl Input) -> Result<$ty, ParseError> {
            use byteorder::{ByteOrder, $endian};

            const LEN: usize = std::mem::size_of::<$ty>();
            input.prepare(LEN)?;
            let v = $endian::$method(&input[..LEN]);
            input.consume(LEN);

            Ok(v)
        }
    }
}

pub(crate) fn u8_we(input: &mut impl Input) -> Result<u8, ParseError> {
    input.prepare(1)?;
    let v = input[0];
    input.consume(1);

    Ok(v)
}

gen_endian_parser!(u16_le, u16, read_u16, LittleEndian);
gen_endian_parser!(f32_le, f32, read_f32, LittleEndian);
gen_endian_parser!(f64_le, f64, read_f64, LittleEndian);

