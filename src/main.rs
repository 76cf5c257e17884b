//Enable more cargo lint tests
#![warn(rust_2018_idioms)]

use std::fs;
use std::path::Path;

use log::{info, warn, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode};

use sqz::tools::cli::{sqzopts_init, Mode, SqzOpts};
use sqz::{compress_with_progress, decompress_with_progress};

const SUFFIX: &str = ".sqz";

fn main() -> Result<(), sqz::Error> {
    // Available log levels are Error, Warn, Info, Debug, Trace
    TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stdout,
        simplelog::ColorChoice::AlwaysAnsi,
    )
    .unwrap();

    let options = sqzopts_init();
    if options.files.is_empty() {
        warn!("No input files given. Try --help.");
        return Ok(());
    }

    for file in &options.files {
        match options.op_mode {
            Mode::Zip => zip_file(file, &options)?,
            Mode::Unzip => unzip_file(file, &options)?,
        }
    }
    info!("Done.");
    Ok(())
}

fn zip_file(name: &str, options: &SqzOpts) -> Result<(), sqz::Error> {
    let data = fs::read(name)?;
    let out_name = format!("{}{}", name, SUFFIX);
    check_output(&out_name, options)?;

    let packed = compress_with_progress(&data, &mut progress_logger())?;
    info!(
        "{}: {} bytes in, {} bytes out ({:.1}%)",
        name,
        data.len(),
        packed.len(),
        percent(packed.len(), data.len()),
    );

    fs::write(&out_name, packed)?;
    if !options.keep_input_files {
        fs::remove_file(name)?;
    }
    Ok(())
}

fn unzip_file(name: &str, options: &SqzOpts) -> Result<(), sqz::Error> {
    let data = fs::read(name)?;
    let out_name = match name.strip_suffix(SUFFIX) {
        Some(stem) => stem.to_string(),
        None => {
            warn!("{} does not end in {}, writing {}.out", name, SUFFIX, name);
            format!("{}.out", name)
        }
    };
    check_output(&out_name, options)?;

    let plain = decompress_with_progress(&data, &mut progress_logger())?;
    info!("{}: restored {} bytes", out_name, plain.len());

    fs::write(&out_name, plain)?;
    if !options.keep_input_files {
        fs::remove_file(name)?;
    }
    Ok(())
}

/// Refuse to clobber an existing file unless --force was given.
fn check_output(name: &str, options: &SqzOpts) -> Result<(), sqz::Error> {
    if Path::new(name).exists() && !options.force_overwrite {
        return Err(sqz::Error::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} exists; use --force to overwrite", name),
        )));
    }
    Ok(())
}

/// Observer that logs progress once per decile.
fn progress_logger() -> impl FnMut(u8) {
    let mut last_decile = 0;
    move |percent: u8| {
        if percent / 10 > last_decile {
            last_decile = percent / 10;
            info!("  ...{}%", percent);
        }
    }
}

fn percent(out: usize, input: usize) -> f64 {
    if input == 0 {
        100.0
    } else {
        out as f64 * 100.0 / input as f64
    }
}
