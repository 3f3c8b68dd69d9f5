//! Defines `Args` which is used to parse command line arguments.

use structopt::StructOpt;
use plycloud::ply::Format;


#[derive(StructOpt, Debug)]
#[structopt(raw(setting = "structopt::clap::AppSettings::VersionlessSubcommands"))]
pub struct Args {
    #[structopt(flatten)]
    pub global: GlobalArgs,

    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(StructOpt, Debug)]
pub struct GlobalArgs {
    /// Show debug log messages of the PLY reader and writer (unless `RUST_LOG`
    /// is set, which takes precedence).
    #[structopt(short = "-v", long = "--verbose")]
    pub verbose: bool,
}

#[derive(StructOpt, Debug)]
pub enum Command {
    /// Print information about a PLY point cloud.
    #[structopt(name = "info")]
    Info {
        #[structopt(flatten)]
        args: InfoArgs,
    },

    /// Reads a PLY point cloud and writes it again with `float` positions and
    /// `uchar` RGBA colors.
    #[structopt(name = "convert")]
    Convert {
        #[structopt(flatten)]
        args: ConvertArgs,
    },
}

#[derive(StructOpt, Debug)]
pub struct InfoArgs {
    /// If specified, the body of the file is decoded, too. This checks whether
    /// the file is completely valid and prints the bounds of all points.
    #[structopt(long = "--read-body")]
    pub read_body: bool,

    /// Path to the PLY file.
    pub file: String,
}

#[derive(StructOpt, Debug)]
pub struct ConvertArgs {
    /// Specify the target file encoding. Valid values: 'binary' (binary little
    /// endian) and 'ascii'.
    #[structopt(
        short = "-e",
        long = "--target-encoding",
        default_value = "binary",
        parse(try_from_str = "parse_format"),
    )]
    pub target_encoding: Format,

    /// Path to the source PLY file.
    pub source: String,

    /// Path to the target PLY file.
    pub target: String,

    /// Overwrite the target file if it already exists.
    #[structopt(short = "-f", long = "--force")]
    pub force: bool,
}

fn parse_format(src: &str) -> Result<Format, String> {
    match src {
        "binary" | "ble" => Ok(Format::BinaryLittleEndian),
        "ascii" => Ok(Format::Ascii),
        other => Err(format!(
            "'{}' is not a valid encoding (valid: 'binary', 'ascii')",
            other,
        )),
    }
}
