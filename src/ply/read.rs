use std::{
    cmp::min,
    fs::File,
    io,
    path::Path,
    str::FromStr,
};

use log::{debug, warn};
use smallvec::SmallVec;

use crate::{
    Point, PointCloud,
    parse::{self, Buffer, Input},
};
use super::{
    Error, Format,
    header::{self, Header},
    prop::{Channel, PropertyTag},
};


/// Upper bound for the number of points we allocate memory for up front. The
/// vertex count comes straight from the header, so we don't trust it for big
/// allocations; the vectors simply grow if the file really has more points.
///
/// This does not limit the size of the result. Binary rows without any
/// property occupy zero bytes, so a tiny file can declare billions of points
/// that are all produced (with default values) without reading anything.
const MAX_PREALLOC: u64 = 1 << 20;


// ===========================================================================
// ===== Definition of `Reader`
// ===========================================================================

/// A reader able to read PLY point clouds.
///
/// The header is parsed when the reader is created (via [`Reader::open`] or
/// [`Reader::new`]), so you can inspect it with [`Reader::header`] before
/// decoding the body with [`Reader::read`].
#[derive(Debug)]
pub struct Reader<R: io::Read> {
    buf: Buffer<R>,
    header: Header,
}

impl Reader<File> {
    /// Tries to open the file specified by the given path and creates a new
    /// `Reader` from that file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        // We don't need a `BufReader` here, because we will use our internal
        // parse buffer anyway.
        Self::new(File::open(path)?)
    }
}

impl<R: io::Read> Reader<R> {
    /// Creates a new `Reader` from the given `io::Read` instance and parses
    /// the header of the given input.
    ///
    /// If you want to open a file, rather use [`Reader::open`].
    pub fn new(reader: R) -> Result<Self, Error> {
        let mut buf = Buffer::new(reader)?;
        let header = header::parse(&mut buf)?;

        debug!(
            "parsed PLY header: format {}, {} vertices, {} bytes, properties [{}]",
            header.format(),
            header.vertex_count(),
            header.header_len(),
            header.properties().iter().map(|p| p.to_string()).collect::<Vec<_>>().join(", "),
        );

        Ok(Self { buf, header })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn format(&self) -> Format {
        self.header.format()
    }

    pub fn vertex_count(&self) -> u64 {
        self.header.vertex_count()
    }

    /// Decodes all vertex rows and returns the point cloud.
    ///
    /// Data after the last vertex row (e.g. other elements) is not read.
    pub fn read(mut self) -> Result<PointCloud, Error> {
        // The body has to start exactly where the header ended. The buffer
        // might already hold body bytes, but never consumed any of them.
        debug_assert_eq!(self.buf.offset(), self.header.header_len());

        if self.header.format() == Format::BinaryLittleEndian
            && self.header.row_len() == 0
            && self.header.vertex_count() > 0
        {
            warn!(
                "PLY vertex rows have no properties; producing {} default points without \
                    reading any body data",
                self.header.vertex_count(),
            );
        }

        let cloud = match self.header.format() {
            Format::Ascii => read_body::<AsciiDecoder, _>(&mut self.buf, &self.header)?,
            Format::BinaryLittleEndian => {
                read_body::<BleDecoder, _>(&mut self.buf, &self.header)?
            }
        };

        debug!(
            "decoded {} PLY vertices from {} body bytes",
            cloud.len(),
            self.buf.offset() - self.header.header_len(),
        );

        Ok(cloud)
    }
}

/// Decodes `header.vertex_count()` rows with the decoder `D`.
fn read_body<D: RowDecoder, I: Input>(buf: &mut I, header: &Header) -> Result<PointCloud, Error> {
    let count = header.vertex_count();
    let mut cloud = PointCloud::with_capacity(min(count, MAX_PREALLOC) as usize);

    // Attributes that are not declared keep their default for all rows.
    let mut point = Point::default();
    for row in 0..count {
        D::decode_row(buf, header.properties(), row, &mut point)?;
        cloud.push(&point);
    }

    Ok(cloud)
}


// ===========================================================================
// ===== Row decoders
// ===========================================================================

/// Helper trait to abstract over the two body encodings.
trait RowDecoder {
    /// Reads one row with the given property layout and overwrites the
    /// corresponding fields of `point`.
    fn decode_row(
        buf: &mut impl Input,
        props: &[PropertyTag],
        row: u64,
        point: &mut Point,
    ) -> Result<(), Error>;
}

/// Maps a float color channel in `0.0..=1.0` to a byte. Truncates, so `0.5`
/// becomes 127. The `as` cast saturates values outside of the byte range.
fn color_from_f32(v: f32) -> u8 {
    (v * 255.0) as u8
}

/// Reduces a 16 bit color channel to 8 bit by keeping the high byte.
fn color_from_u16(v: u16) -> u8 {
    (v >> 8) as u8
}

fn set_channel(point: &mut Point, channel: Channel, v: u8) {
    point.color[channel.index()] = v;
}

/// Binary little endian encoding. Rows are packed without any padding.
enum BleDecoder {}
impl RowDecoder for BleDecoder {
    fn decode_row(
        buf: &mut impl Input,
        props: &[PropertyTag],
        _row: u64,
        point: &mut Point,
    ) -> Result<(), Error> {
        for prop in props {
            match *prop {
                PropertyTag::Color8(c) => set_channel(point, c, parse::u8_we(buf)?),
                PropertyTag::Color16(c) => {
                    set_channel(point, c, color_from_u16(parse::u16_le(buf)?));
                }
                PropertyTag::Color32(c) => {
                    set_channel(point, c, color_from_f32(parse::f32_le(buf)?));
                }
                PropertyTag::Position32(a) => point.position[a.index()] = parse::f32_le(buf)?,
                PropertyTag::Position64(a) => {
                    point.position[a.index()] = parse::f64_le(buf)? as f32;
                }
                PropertyTag::Data(len) => buf.skip(len.as_usize())?,
            }
        }

        Ok(())
    }
}

/// ASCII encoding: one row per line, values separated by whitespace. Numbers
/// are parsed with Rust's `FromStr`, which always uses `.` as decimal point.
enum AsciiDecoder {}
impl RowDecoder for AsciiDecoder {
    fn decode_row(
        buf: &mut impl Input,
        props: &[PropertyTag],
        row: u64,
        point: &mut Point,
    ) -> Result<(), Error> {
        let truncated = |reason: String| Error::TruncatedBody { row, reason };

        let res = buf.take_line(|line| {
            let text = line.assert_ascii().map_err(|e| truncated(e.to_string()))?;
            let words = text.split_whitespace().collect::<SmallVec<[&str; 16]>>();
            if words.len() < props.len() {
                return Err(truncated(format!(
                    "expected {} values, found {}",
                    props.len(),
                    words.len(),
                )));
            }

            fn value<T: FromStr>(word: &str, prop: &PropertyTag) -> Result<T, String>
            where
                T::Err: ToString,
            {
                word.parse::<T>().map_err(|e| {
                    format!("invalid value {:?} for {}: {}", word, prop, e.to_string())
                })
            }

            for (word, prop) in words.iter().zip(props) {
                match *prop {
                    PropertyTag::Color8(c) => {
                        set_channel(point, c, value::<u8>(word, prop).map_err(truncated)?);
                    }
                    PropertyTag::Color16(c) => {
                        let v = value::<u16>(word, prop).map_err(truncated)?;
                        set_channel(point, c, color_from_u16(v));
                    }
                    PropertyTag::Color32(c) => {
                        let v = value::<f32>(word, prop).map_err(truncated)?;
                        set_channel(point, c, color_from_f32(v));
                    }
                    PropertyTag::Position32(a) => {
                        point.position[a.index()] = value::<f32>(word, prop).map_err(truncated)?;
                    }
                    PropertyTag::Position64(a) => {
                        let v = value::<f64>(word, prop).map_err(truncated)?;
                        point.position[a.index()] = v as f32;
                    }
                    PropertyTag::Data(_) => {}
                }
            }

            Ok(())
        });

        match res {
            Err(Error::Io(ref e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(truncated("end of file reached, row is missing".into()))
            }
            other => other,
        }
    }
}
