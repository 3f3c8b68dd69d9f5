//! Parsing the header of a PLY file.

use log::{trace, warn};
use smallvec::SmallVec;

use crate::parse::{Input, ParseError, Span};
use super::{
    Error, Format,
    prop::{PropertyTag, resolve_property},
};


/// Everything the body decoders need to know about a file, plus some
/// information for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub(crate) format: Format,
    pub(crate) vertex_count: u64,
    pub(crate) properties: Vec<PropertyTag>,
    pub(crate) header_len: u64,
    pub(crate) comments: Vec<String>,
}

impl Header {
    pub fn format(&self) -> Format {
        self.format
    }

    /// The number of vertices (rows) declared by `element vertex N`. Zero if
    /// the file has no vertex element.
    pub fn vertex_count(&self) -> u64 {
        self.vertex_count
    }

    /// The vertex properties in declaration order, which is the column order
    /// of the body.
    pub fn properties(&self) -> &[PropertyTag] {
        &self.properties
    }

    /// The exact number of bytes of the header, including the line terminator
    /// of `end_header`. The body starts at this offset.
    pub fn header_len(&self) -> u64 {
        self.header_len
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Size of one binary vertex row in bytes.
    pub fn row_len(&self) -> usize {
        self.properties.iter().map(|p| p.len().as_usize()).sum()
    }
}

/// One header line: the raw text (for errors and comments), the lowercase
/// whitespace separated words and where the line is.
struct Line {
    text: String,
    words: SmallVec<[String; 4]>,
    span: Span,
}

impl Line {
    fn error(&self) -> Error {
        Error::BadElementDeclaration {
            line: self.text.clone(),
            span: self.span,
        }
    }
}

fn next_line(buf: &mut impl Input) -> Result<Line, Error> {
    buf.take_line(|line| {
        let text = String::from_utf8_lossy(line.data).into_owned();
        let words = text.split_whitespace().map(|w| w.to_lowercase()).collect();
        Ok::<_, Error>(Line { text, words, span: line.span })
    })
}

/// Parses the header, leaving `buf` at the first byte of the body.
///
/// The first two lines have to match exactly. After that, directives are
/// matched case-insensitively.
pub(crate) fn parse(buf: &mut impl Input) -> Result<Header, Error> {
    // ===== Magic number and format line =====================================
    let is_ply = buf.take_line(|line| Ok::<_, ParseError>(line.data == b"ply"));
    match is_ply {
        Ok(true) => {}
        // A first line too long for the buffer is certainly not "ply" either
        Ok(false)
            | Err(ParseError::UnexpectedEof(_))
            | Err(ParseError::LookAheadTooBig) => return Err(Error::BadMagic),
        Err(e) => return Err(e.into()),
    }

    let format = buf.take_line(|line| {
        match line.data {
            b"format ascii 1.0" => Ok(Format::Ascii),
            b"format binary_little_endian 1.0" => Ok(Format::BinaryLittleEndian),
            other => {
                let line = String::from_utf8_lossy(other).into_owned();
                Err(Error::UnsupportedFormatLine(line))
            }
        }
    })?;


    // ===== Elements and properties ==========================================
    let mut vertex_count = 0;
    let mut properties = Vec::new();
    let mut comments = Vec::new();

    // Whether `property` lines currently belong to the vertex element.
    let mut in_vertex = false;
    let mut seen_vertex = false;

    loop {
        let line = next_line(buf)?;
        let words = &line.words;

        match words.first().map(|w| w.as_str()) {
            Some("end_header") if words.len() == 1 => break,

            Some("comment") => {
                let comment = line.text.trim_start()["comment".len()..].trim();
                trace!("PLY header comment: {:?}", comment);
                comments.push(comment.to_string());
            }

            // `element <name> <count>`. Only the vertex count is needed, the
            // declarations of other elements just end the vertex properties.
            Some("element") if words.len() >= 2 && words[1] == "vertex" => {
                if words.len() != 3 {
                    return Err(line.error());
                }

                vertex_count = words[2].parse::<u64>().map_err(|_| line.error())?;
                in_vertex = true;
                seen_vertex = true;
            }
            Some("element") if words.len() >= 2 => {
                in_vertex = false;

                let count = words.get(2).and_then(|w| w.parse::<u64>().ok());
                if !seen_vertex && count != Some(0) {
                    warn!(
                        "PLY element '{}' is declared before 'vertex'; its data is not \
                            skipped and will be misread as vertex data",
                        words[1],
                    );
                } else {
                    trace!("ignoring PLY element '{}' ({:?} entries)", words[1], count);
                }
            }

            // `property <type> <name>` or `property list <len_type> <type> <name>`
            Some("property") => {
                if words.len() < 3 {
                    return Err(line.error());
                }

                if in_vertex {
                    let tag = match words.len() {
                        3 => resolve_property(&words[1], &words[2])?,
                        _ if words[1] == "list" => {
                            return Err(Error::UnsupportedPropertyType {
                                ty: words[1].clone(),
                                name: words[words.len() - 1].clone(),
                            });
                        }
                        _ => return Err(line.error()),
                    };
                    properties.push(tag);
                }
            }

            _ => return Err(line.error()),
        }
    }

    Ok(Header {
        format,
        vertex_count,
        properties,
        header_len: buf.offset(),
        comments,
    })
}
