//! Writing PLY point clouds.
//!
//! The writer always produces the same layout: a single `vertex` element with
//! `float` properties `x`, `y`, `z` followed by `uchar` properties `red`,
//! `green`, `blue` and `alpha`. Every file written here can be read again by
//! [`Reader`][super::Reader] without loss.
//!
//! For ASCII encoding we simply use the `fmt::Display` impl of `f32` and `u8`.
//! It prints the shortest representation that parses back to the same value.

use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use log::debug;

use crate::PointCloud;
use super::{Error, Format};


// ===============================================================================================
// ===== PLY Config
// ===============================================================================================

/// Used to configure and create a [`Writer`].
///
/// Most importantly, this is the file encoding. Additionally, you can add
/// comments to the file header.
#[derive(Clone, Debug)]
pub struct Config {
    format: Format,
    comments: Vec<String>,
}

impl Config {
    /// Creates a new configuration with binary little endian encoding.
    pub fn binary() -> Self {
        Self::new(Format::BinaryLittleEndian)
    }

    /// Creates a new configuration with ASCII encoding.
    ///
    /// ASCII files are a lot bigger and slower to read. Only use them if you
    /// need to look at the data with a text editor.
    pub fn ascii() -> Self {
        Self::new(Format::Ascii)
    }

    pub fn new(format: Format) -> Self {
        Self {
            format,
            comments: vec![],
        }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Adds a `comment` line to the file header.
    ///
    /// The given string must not contain `'\n'` or `'\r'`, or else this method
    /// panics.
    pub fn add_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();

        assert!(
            !comment.contains('\n') && !comment.contains('\r'),
            "PLY comments must not contain line breaks!",
        );

        self.comments.push(comment);
        self
    }

    /// Creates a writer with the given `io::Write` instance and `self` as
    /// configuration.
    pub fn into_writer<W: io::Write>(self, writer: W) -> Writer<W> {
        Writer::new(self, writer)
    }

    /// Writes the given point cloud into a new `Vec<u8>`.
    pub fn write_to_memory(&self, cloud: &PointCloud) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        self.clone().into_writer(&mut out).write(cloud)?;

        Ok(out)
    }
}


// ===============================================================================================
// ===== PLY Writer
// ===============================================================================================

/// A writer able to write binary and ASCII PLY point clouds.
///
/// # Example
///
/// ```no_run
/// use std::{fs::File, io::BufWriter};
/// use plycloud::{PointCloud, ply::{self, Config}};
///
/// fn save_both(cloud: &PointCloud) -> Result<(), ply::Error> {
///     // Unbuffered file access is usually a lot slower.
///     let file = File::create("cloud_ascii.ply")?;
///     Config::ascii().into_writer(BufWriter::new(file)).write(cloud)?;
///
///     let file = File::create("cloud_binary.ply")?;
///     Config::binary().into_writer(BufWriter::new(file)).write(cloud)?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Writer<W: io::Write> {
    config: Config,
    writer: W,
}

impl<W: io::Write> Writer<W> {
    pub fn new(config: Config, writer: W) -> Self {
        Self { config, writer }
    }

    /// Writes header and body of the given point cloud.
    pub fn write(mut self, cloud: &PointCloud) -> Result<(), Error> {
        let w = &mut self.writer;

        // ===== Header (always ASCII) ========================================
        w.write_all(b"ply\n")?;
        writeln!(w, "{}", self.config.format.header_line())?;
        for comment in &self.config.comments {
            writeln!(w, "comment {}", comment)?;
        }

        writeln!(w, "element vertex {}", cloud.len())?;
        for name in &["x", "y", "z"] {
            writeln!(w, "property float {}", name)?;
        }
        for name in &["red", "green", "blue", "alpha"] {
            writeln!(w, "property uchar {}", name)?;
        }
        w.write_all(b"end_header\n")?;


        // ===== Body =========================================================
        match self.config.format {
            Format::Ascii => {
                for (p, [r, g, b, a]) in cloud.iter() {
                    writeln!(w, "{} {} {} {} {} {} {}", p.x, p.y, p.z, r, g, b, a)?;
                }
            }
            Format::BinaryLittleEndian => {
                for (p, color) in cloud.iter() {
                    w.write_f32::<LittleEndian>(p.x)?;
                    w.write_f32::<LittleEndian>(p.y)?;
                    w.write_f32::<LittleEndian>(p.z)?;
                    w.write_all(&color)?;
                }
            }
        }

        w.flush()?;
        debug!("wrote {} points as {} PLY", cloud.len(), self.config.format);

        Ok(())
    }
}
