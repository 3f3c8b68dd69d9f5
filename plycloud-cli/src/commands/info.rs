use cgmath::Point3;
use failure::Error;
use term_painter::{Color, ToStyle};
use plycloud::{PointCloud, ply::Header};

use crate::{
    args::{GlobalArgs, InfoArgs},
    commands::{open_reader, read_body},
    ui,
};


pub fn run(_global_args: &GlobalArgs, args: &InfoArgs) -> Result<(), Error> {
    let reader = open_reader(&args.file)?;
    print_header(reader.header());

    if args.read_body {
        let cloud = progress!(["Decoding body of '{}'", args.file] => {
            read_body(&args.file, reader)?
        });
        println!();
        print_body_info(&BodyInfo::about(&cloud));
    }

    Ok(())
}

fn print_header(header: &Header) {
    let value_style = Color::BrightWhite.bold();
    let label_style = Color::White.bold();

    println!(
        "Format: {} (header: {} bytes)",
        value_style.paint(header.format()),
        ui::fmt_with_thousand_sep(header.header_len()),
    );
    println!(
        "Vertices: {}",
        Color::Green.bold().paint(ui::fmt_with_thousand_sep(header.vertex_count())),
    );

    println!();
    println!("{}", label_style.paint("Vertex properties:"));
    if header.properties().is_empty() {
        println!("   {}", Color::White.dim().paint("-"));
    }
    for (i, prop) in header.properties().iter().enumerate() {
        println!(
            "  {: >2}. {} ({} bytes)",
            i,
            Color::BrightBlue.bold().paint(prop),
            prop.len().as_usize(),
        );
    }
    println!("  row length: {} bytes", header.row_len());

    if !header.comments().is_empty() {
        println!();
        println!("{}", label_style.paint("Comments:"));
        for comment in header.comments() {
            println!("  {}", comment);
        }
    }
}

fn print_body_info(info: &BodyInfo) {
    match info.bounds {
        Some((min, max)) => {
            println!("Bounds min: ({}, {}, {})", min.x, min.y, min.z);
            println!("Bounds max: ({}, {}, {})", max.x, max.y, max.z);
        }
        None => println!("Bounds: {}", Color::White.dim().paint("- (no points)")),
    }
    println!("Distinct alpha values: {}", info.distinct_alphas);
}

/// Information that can only be obtained from the decoded points.
#[derive(Debug, PartialEq)]
struct BodyInfo {
    /// Axis aligned bounding box `(min, max)`, `None` for empty clouds.
    bounds: Option<(Point3<f32>, Point3<f32>)>,
    distinct_alphas: usize,
}

impl BodyInfo {
    fn about(cloud: &PointCloud) -> Self {
        let bounds = cloud.positions.iter().fold(None, |acc, &p| {
            let (min, max) = acc.unwrap_or((p, p));
            Some((
                Point3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                Point3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
            ))
        });

        let mut seen = [false; 256];
        for color in &cloud.colors {
            seen[color[3] as usize] = true;
        }

        Self {
            bounds,
            distinct_alphas: seen.iter().filter(|&&b| b).count(),
        }
    }
}
