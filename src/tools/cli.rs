use std::process::exit;
use std::{fmt::Display, fmt::Formatter};

/// Verbosity of user information
#[derive(Debug)]
pub enum Verbosity {
    Quiet,
    Errors,
    Warnings,
    Info,
    Debug,
    Trace,
}

/// Zip or Unzip
#[derive(Debug)]
pub enum Mode {
    Zip,
    Unzip,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug)]
pub struct SqzOpts {
    /// Vec of names of files to read for input
    pub files: Vec<String>,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Don't remove input files after processing
    pub keep_input_files: bool,
    /// Compress/Decompress
    pub op_mode: Mode,
    /// Verbosity of user information
    pub verbose: Verbosity,
}

impl SqzOpts {
    pub fn new() -> Self {
        Self {
            files: vec![],
            force_overwrite: false,
            keep_input_files: false,
            op_mode: Mode::Zip,
            verbose: Verbosity::Errors,
        }
    }
}

impl Default for SqzOpts {
    fn default() -> Self {
        Self::new()
    }
}

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse the command line into an options struct, setting the log level as
/// a side effect.
pub fn sqzopts_init() -> SqzOpts {
    let mut cli = SqzOpts::new();

    let args = std::env::args().skip(1);
    for mut arg in args {
        if arg.starts_with("--") {
            match arg.as_str() {
                "--help" => help(),
                "--decompress" => cli.op_mode = Mode::Unzip,
                "--compress" => cli.op_mode = Mode::Zip,
                "--keep" => cli.keep_input_files = true,
                "--force" => cli.force_overwrite = true,
                "--quiet" => cli.verbose = Verbosity::Quiet,
                "--version" => version(),
                other => eprintln!("Unexpected command line argument: {}", other),
            }
        } else if arg.starts_with('-') {
            arg.remove(0);
            while !arg.is_empty() {
                // Stacked v's raise the verbosity one level each.
                if arg.starts_with('v') {
                    let mut level = 0;
                    while arg.starts_with('v') {
                        arg.remove(0);
                        level += 1;
                    }
                    cli.verbose = match level {
                        1 => Verbosity::Errors,
                        2 => Verbosity::Warnings,
                        3 => Verbosity::Info,
                        4 => Verbosity::Debug,
                        _ => Verbosity::Trace,
                    };
                    continue;
                }
                match arg.remove(0) {
                    'h' => help(),
                    'd' => cli.op_mode = Mode::Unzip,
                    'z' => cli.op_mode = Mode::Zip,
                    'k' => cli.keep_input_files = true,
                    'f' => cli.force_overwrite = true,
                    'q' => cli.verbose = Verbosity::Quiet,
                    'V' => version(),
                    other => {
                        eprintln!("Unexpected command line argument: {}", other);
                        help()
                    }
                }
            }
        } else {
            cli.files.push(arg);
        };
    }

    // Set the log level
    match cli.verbose {
        Verbosity::Quiet => log::set_max_level(log::LevelFilter::Off),
        Verbosity::Errors => log::set_max_level(log::LevelFilter::Error),
        Verbosity::Warnings => log::set_max_level(log::LevelFilter::Warn),
        Verbosity::Info => log::set_max_level(log::LevelFilter::Info),
        Verbosity::Debug => log::set_max_level(log::LevelFilter::Debug),
        Verbosity::Trace => log::set_max_level(log::LevelFilter::Trace),
    };
    cli
}

/// Prints help information
fn help() {
    println!(
        "
   usage: sqz [flags and input files in any order]

   -h --help           print this message
   -d --decompress     force decompression
   -z --compress       force compression
   -k --keep           keep (don't delete) input files
   -f --force          overwrite existing output files
   -q --quiet          suppress noncritical error messages
   -v                  be verbose (a 2nd -v gives more)
   -V --version        display software version

   If invoked as `sqz', default action is to compress.
   Compressing FILE produces FILE.sqz; decompressing FILE.sqz
   restores FILE. You can combine short flags, so `-v -k' means
   the same as -vk or -kv, &c.
   "
    );
    exit(0);
}

fn version() {
    println!("Version: {}, written in Rust", VERSION);
    exit(0);
}
