use std::fs::File;

use failure::{Error, ResultExt};
use plycloud::{
    PointCloud,
    ply::{self, Reader},
};


pub mod convert;
pub mod info;


/// Opens the given file and parses its PLY header.
///
/// Import failures are also reported through `log` with the file name, so
/// they show up in the log of batch jobs, not only on the terminal.
fn open_reader(path: &str) -> Result<Reader<File>, Error> {
    let reader = Reader::open(path).map_err(|e| log_import_error(path, e));
    Ok(reader.context(format!("failed to read header of '{}'", path))?)
}

/// Decodes the body of an already opened file.
fn read_body(path: &str, reader: Reader<File>) -> Result<PointCloud, Error> {
    let cloud = reader.read().map_err(|e| log_import_error(path, e));
    Ok(cloud.context(format!("failed to read body of '{}'", path))?)
}

fn log_import_error(path: &str, e: ply::Error) -> ply::Error {
    log::error!("cannot import point cloud '{}' ({:?}): {}", path, e.kind(), e);
    e
}
