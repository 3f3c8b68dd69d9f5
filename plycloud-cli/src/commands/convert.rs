use std::{
    fs::OpenOptions,
    io::BufWriter,
    path::Path,
    time::Instant,
};

use failure::{bail, Error, ResultExt};
use plycloud::ply::Config;

use crate::{
    args::{ConvertArgs, GlobalArgs},
    commands::{open_reader, read_body},
    ui,
};


pub fn run(_global_args: &GlobalArgs, args: &ConvertArgs) -> Result<(), Error> {
    let start_time = Instant::now();

    // Check this first to not waste time reading a file we can't write.
    if !args.force && Path::new(&args.target).exists() {
        bail!("'{}' already exists (use '--force' to overwrite it)", args.target);
    }

    let reader = open_reader(&args.source)?;
    info!(
        "Source: {} vertices ({} encoding)",
        ui::fmt_with_thousand_sep(reader.vertex_count()),
        reader.format(),
    );

    let before_load = Instant::now();
    let cloud = progress!(["Reading '{}'", args.source] => {
        read_body(&args.source, reader)?
    });
    let load_time = before_load.elapsed();

    if cloud.is_empty() {
        warn!("'{}' does not contain any points, writing an empty point cloud", args.source);
    }

    let before_write = Instant::now();
    progress!(["Writing '{}'", args.target] => {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&args.target)
            .context(format!("failed to open '{}' for writing", args.target))?;

        Config::new(args.target_encoding)
            .add_comment(format!("converted from {}", file_name(&args.source)))
            .into_writer(BufWriter::new(file))
            .write(&cloud)
            .context(format!("failed to write '{}'", args.target))?;
    });
    let write_time = before_write.elapsed();

    info!(
        "Processing time: {:.2?} ({:.2?} loading, {:.2?} writing)",
        start_time.elapsed(),
        load_time,
        write_time,
    );

    Ok(())
}

/// The last component of `path`, lossily converted and without line breaks so
/// it can be put into a header comment.
fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
        .replace(|c: char| c == '\n' || c == '\r', " ")
}
