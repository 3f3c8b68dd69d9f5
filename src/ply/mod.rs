//! Reading (and writing) PLY point clouds.
//!
//! Only a small dialect of PLY is supported: ASCII or binary little endian
//! encoding and a single `vertex` element whose `x`, `y`, `z`, `red`, `green`,
//! `blue` and `alpha` properties are decoded. All other vertex properties are
//! skipped; other elements are ignored.
//!
//! ```no_run
//! use plycloud::ply;
//!
//! let cloud = ply::open("scan.ply")?;
//! println!("{} points", cloud.len());
//! # Ok::<(), ply::Error>(())
//! ```

use std::{
    fs::File,
    io,
    path::Path,
};

use derive_more::Display;
use failure::Fail;

use crate::{
    PointCloud,
    parse::{ParseError, Span},
};


mod header;
mod prop;
mod read;
pub mod write;

#[cfg(test)]
mod tests;


pub use self::{
    header::Header,
    prop::{Axis, BaseTag, Channel, PropertyTag, ScalarLen, resolve},
    read::Reader,
    write::{Config, Writer},
};


/// The encoding of the body of a PLY file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum Format {
    #[display(fmt = "ascii")]
    Ascii,
    #[display(fmt = "binary_little_endian")]
    BinaryLittleEndian,
}

impl Format {
    /// The exact header line selecting this format.
    pub fn header_line(&self) -> &'static str {
        match self {
            Format::Ascii => "format ascii 1.0",
            Format::BinaryLittleEndian => "format binary_little_endian 1.0",
        }
    }
}

/// Everything that can go wrong while reading a PLY file. Any error aborts
/// reading; no partial point cloud is ever returned.
#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "IO error: {}", _0)]
    Io(io::Error),

    #[fail(display = "not a PLY file (first line is not exactly \"ply\")")]
    BadMagic,

    #[fail(
        display = "unsupported format line {:?} (expected \"format ascii 1.0\" or \
            \"format binary_little_endian 1.0\")",
        _0
    )]
    UnsupportedFormatLine(String),

    #[fail(
        display = "invalid header line {:?} at {} (expected \"comment\", \"element\", \
            \"property\" or \"end_header\")",
        line,
        span
    )]
    BadElementDeclaration {
        line: String,
        span: Span,
    },

    #[fail(display = "unsupported type '{}' of property '{}'", ty, name)]
    UnsupportedPropertyType {
        ty: String,
        name: String,
    },

    #[fail(display = "type '{}' is not allowed for property '{}'", ty, name)]
    InvalidPropertyType {
        ty: String,
        name: String,
    },

    #[fail(display = "malformed or missing vertex row {}: {}", row, reason)]
    TruncatedBody {
        row: u64,
        reason: String,
    },
}

/// The category of an [`Error`], without any details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    BadMagic,
    UnsupportedFormatLine,
    BadElementDeclaration,
    UnsupportedPropertyType,
    InvalidPropertyType,
    TruncatedBody,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::BadMagic => ErrorKind::BadMagic,
            Error::UnsupportedFormatLine(_) => ErrorKind::UnsupportedFormatLine,
            Error::BadElementDeclaration { .. } => ErrorKind::BadElementDeclaration,
            Error::UnsupportedPropertyType { .. } => ErrorKind::UnsupportedPropertyType,
            Error::InvalidPropertyType { .. } => ErrorKind::InvalidPropertyType,
            Error::TruncatedBody { .. } => ErrorKind::TruncatedBody,
        }
    }
}

impl From<io::Error> for Error {
    fn from(src: io::Error) -> Self {
        Error::Io(src)
    }
}

impl From<ParseError> for Error {
    fn from(src: ParseError) -> Self {
        match src {
            ParseError::Io(e) => Error::Io(e),
            ParseError::UnexpectedEof(at) => Error::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("unexpected end of stream at byte {}", at),
            )),
            other => Error::Io(io::Error::new(io::ErrorKind::InvalidData, other.to_string())),
        }
    }
}

/// Reads a whole PLY point cloud from the given reader.
pub fn read(reader: impl io::Read) -> Result<PointCloud, Error> {
    Reader::new(reader)?.read()
}

/// Opens the file at `path` and reads it as PLY point cloud.
pub fn open(path: impl AsRef<Path>) -> Result<PointCloud, Error> {
    Reader::<File>::open(path)?.read()
}
