// Command-line front end for oxilzw.
//
// Subcommands mirror the library surface: `compress` and `decompress` stream
// between files or stdio, `info` decodes a stream without keeping the output,
// `config` prints the format constants.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use log::{info, warn};

use crate::codec::{CodecOptions, CodecStats, DictionaryCodec};
use crate::io::inspect;
use crate::lzw::bitstream::DEFAULT_READ_CHUNK;
use crate::lzw::{FIRST_DYNAMIC_CODE, INITIAL_CODE_WIDTH, MAX_CODE_WIDTH, MAX_ENTRY_LEN, RESET_CODE};

const BUF_SIZE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Adaptive-dictionary (LZW) compressor.
#[derive(Parser, Debug)]
#[command(
    name = "oxilzw",
    version,
    about = "LZW stream compressor/decompressor",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Compress an input stream.
    Compress(CompressArgs),
    /// Decompress an input stream.
    Decompress(StreamArgs),
    /// Decode a compressed file and summarize it.
    Info(InfoArgs),
    /// Print build/format details.
    Config,
}

#[derive(Args, Debug)]
struct StreamArgs {
    /// Input file (default: stdin).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "input_pos")]
    input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "output_pos")]
    output: Option<PathBuf>,

    /// Write output to stdout.
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Input file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    input_pos: Option<PathBuf>,

    /// Output file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    output_pos: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CompressArgs {
    #[command(flatten)]
    io: StreamArgs,

    /// Widest code to emit before resetting the dictionary.
    #[arg(
        long = "max-code-width",
        value_parser = clap::value_parser!(u8).range(INITIAL_CODE_WIDTH as i64..=MAX_CODE_WIDTH as i64),
        default_value_t = MAX_CODE_WIDTH
    )]
    max_code_width: u8,
}

#[derive(Args, Debug)]
struct InfoArgs {
    /// Compressed input file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Compress,
    Decompress,
    Info,
    Config,
}

#[derive(Debug)]
struct Options {
    command: Command,
    use_stdout: bool,
    force: bool,
    quiet: bool,
    verbose: u8,
    json_output: bool,
    max_code_width: u8,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
}

fn resolve_options(cli: Cli) -> Options {
    let mut opts = Options {
        command: Command::Config,
        use_stdout: false,
        force: cli.force,
        quiet: cli.quiet,
        verbose: cli.verbose.min(2),
        json_output: cli.json_output,
        max_code_width: MAX_CODE_WIDTH,
        input_file: None,
        output_file: None,
    };

    match cli.command {
        Cmd::Compress(args) => {
            opts.command = Command::Compress;
            opts.max_code_width = args.max_code_width;
            apply_stream_args(&mut opts, args.io);
        }
        Cmd::Decompress(args) => {
            opts.command = Command::Decompress;
            apply_stream_args(&mut opts, args);
        }
        Cmd::Info(args) => {
            opts.command = Command::Info;
            opts.input_file = Some(args.input);
        }
        Cmd::Config => {}
    }
    opts
}

fn apply_stream_args(opts: &mut Options, args: StreamArgs) {
    opts.use_stdout = args.stdout;
    opts.input_file = args.input.or(args.input_pos);
    opts.output_file = args.output.or(args.output_pos);
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("oxilzw".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let _ = resolve_options(cli);
    }
}

fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn emit_json(value: serde_json::Value) {
    match serde_json::to_string_pretty(&value) {
        Ok(s) => eprintln!("{s}"),
        Err(e) => eprintln!("oxilzw: json: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("oxilzw version {version} (Rust)");

    let file_io = cfg!(feature = "file-io") as u8;
    let ptr_size = std::mem::size_of::<*const ()>();

    eprintln!("FILE_IO={file_io}");
    eprintln!("INITIAL_CODE_WIDTH={INITIAL_CODE_WIDTH}");
    eprintln!("MAX_CODE_WIDTH={MAX_CODE_WIDTH}");
    eprintln!("RESET_CODE={RESET_CODE}");
    eprintln!("FIRST_DYNAMIC_CODE={FIRST_DYNAMIC_CODE}");
    eprintln!("MAX_ENTRY_LEN={MAX_ENTRY_LEN}");
    eprintln!("READ_CHUNK={DEFAULT_READ_CHUNK}");
    eprintln!("sizeof(usize)={ptr_size}");

    0
}

// ---------------------------------------------------------------------------
// Stream plumbing
// ---------------------------------------------------------------------------

fn open_input(opts: &Options) -> Result<Box<dyn Read>, i32> {
    match &opts.input_file {
        Some(path) => match File::open(path) {
            Ok(f) => Ok(Box::new(BufReader::with_capacity(BUF_SIZE, f))),
            Err(e) => {
                eprintln!("oxilzw: input file: {}: {e}", path.display());
                Err(1)
            }
        },
        None => Ok(Box::new(BufReader::with_capacity(BUF_SIZE, io::stdin()))),
    }
}

/// Open the output, returning the path it was created at (if a file).
fn open_output(opts: &Options) -> Result<(Box<dyn Write>, Option<&Path>), i32> {
    match (opts.use_stdout, &opts.output_file) {
        (true, _) | (_, None) => Ok((
            Box::new(BufWriter::with_capacity(BUF_SIZE, io::stdout().lock())),
            None,
        )),
        (false, Some(path)) => {
            if path.exists() && !opts.force {
                eprintln!(
                    "oxilzw: output file exists, use -f to overwrite: {}",
                    path.display()
                );
                return Err(1);
            }
            match File::create(path) {
                Ok(f) => Ok((
                    Box::new(BufWriter::with_capacity(BUF_SIZE, f)),
                    Some(path.as_path()),
                )),
                Err(e) => {
                    eprintln!("oxilzw: output file: {}: {e}", path.display());
                    Err(1)
                }
            }
        }
    }
}

fn discard_partial_output(path: Option<&Path>) {
    if let Some(path) = path
        && let Err(e) = fs::remove_file(path)
    {
        warn!("could not remove partial output {}: {e}", path.display());
    }
}

fn report(command: &str, stats: &CodecStats, opts: &Options) {
    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "oxilzw: {command}: {} -> {} bytes, {} codes, {} resets, max width {}",
            stats.bytes_in, stats.bytes_out, stats.codes, stats.resets, stats.max_code_width
        );
    }
    if opts.json_output {
        emit_json(serde_json::json!({
            "command": command,
            "input_size": stats.bytes_in,
            "output_size": stats.bytes_out,
            "codes": stats.codes,
            "resets": stats.resets,
            "initial_code_width": stats.initial_code_width,
            "max_code_width": stats.max_code_width,
        }));
    }
}

// ---------------------------------------------------------------------------
// Compress / decompress commands
// ---------------------------------------------------------------------------

fn cmd_compress(opts: &Options) -> i32 {
    let codec_opts = CodecOptions {
        max_code_width: opts.max_code_width,
        ..CodecOptions::default()
    };
    let mut codec = match DictionaryCodec::with_options(codec_opts) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("oxilzw: {e}");
            return 1;
        }
    };
    run_pass(opts, "compress", |reader, writer| {
        codec.compress(reader, writer).map(|()| codec.stats())
    })
}

fn cmd_decompress(opts: &Options) -> i32 {
    let mut codec = DictionaryCodec::new();
    run_pass(opts, "decompress", |reader, writer| {
        codec.decompress(reader, writer).map(|()| codec.stats())
    })
}

/// Open both ends, run one codec pass, flush and report.
fn run_pass<F>(opts: &Options, command: &str, pass: F) -> i32
where
    F: FnOnce(&mut dyn Read, &mut dyn Write) -> crate::Result<CodecStats>,
{
    let mut reader = match open_input(opts) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let (mut writer, created) = match open_output(opts) {
        Ok(w) => w,
        Err(code) => return code,
    };

    let stats = match pass(&mut *reader, &mut *writer) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("oxilzw: {command} error: {e}");
            drop(writer);
            discard_partial_output(created);
            return 1;
        }
    };

    if let Err(e) = writer.flush() {
        eprintln!("oxilzw: write flush error: {e}");
        return 1;
    }

    info!(
        "{command}: {} -> {} bytes",
        stats.bytes_in, stats.bytes_out
    );
    report(command, &stats, opts);
    0
}

// ---------------------------------------------------------------------------
// Info command
// ---------------------------------------------------------------------------

fn cmd_info(opts: &Options) -> i32 {
    let mut reader = match open_input(opts) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let summary = match inspect(&mut reader) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("oxilzw: info: {e}");
            return 1;
        }
    };

    if opts.json_output {
        emit_json(serde_json::json!({
            "command": "info",
            "header_code_width": summary.header_code_width,
            "compressed_size": summary.compressed_size,
            "decoded_size": summary.decoded_size,
            "codes": summary.codes,
            "resets": summary.resets,
            "max_code_width": summary.max_code_width,
        }));
    }
    if !opts.quiet {
        println!("header code width:  {}", summary.header_code_width);
        println!("compressed size:    {}", summary.compressed_size);
        println!("decoded size:       {}", summary.decoded_size);
        println!("codes:              {}", summary.codes);
        println!("resets:             {}", summary.resets);
        println!("max code width:     {}", summary.max_code_width);
    }
    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();
    let mut opts = resolve_options(cli);

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_filter(opts.verbose)),
    )
    .format_timestamp(None)
    .format_target(false)
    .init();

    // Warn if -c overrides output filename.
    if opts.use_stdout
        && let Some(path) = opts.output_file.take()
        && !opts.quiet
    {
        warn!("-c option overrides output filename: {}", path.display());
    }

    let exit_code = match opts.command {
        Command::Compress => cmd_compress(&opts),
        Command::Decompress => cmd_decompress(&opts),
        Command::Info => cmd_info(&opts),
        Command::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
