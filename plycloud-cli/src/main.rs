use failure::Error;
use structopt::StructOpt;

#[macro_use]
mod ui;

mod args;
mod commands;

use crate::args::{Args, Command};


/// We just catch potential errors here and pretty print them. The actual
/// useful code is in `run()`.
fn main() {
    let args = Args::from_args();
    init_logger(&args);

    if let Err(e) = run(&args) {
        error!("An error occured: {}", e);

        for cause in e.iter_causes() {
            error!("  ... caused by: {}", cause);
        }

        if std::env::var("RUST_BACKTRACE") == Ok("1".to_string()) {
            error!();
            error!("{}", e.backtrace());
        }

        std::process::exit(1);
    }
}

/// `RUST_LOG` always wins. Without it, only warnings of the library are shown,
/// or everything down to `debug` with `--verbose`.
fn init_logger(args: &Args) {
    let default = if args.global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn run(args: &Args) -> Result<(), Error> {
    let global_args = &args.global;

    match &args.command {
        Command::Info { args } => commands::info::run(global_args, args)?,
        Command::Convert { args } => commands::convert::run(global_args, args)?,
    }

    Ok(())
}
