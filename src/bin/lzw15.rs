//! lzw15 – command line front end for the LZW codec.
//!
//! Compresses files in place (`foo` becomes `foo.lz15`) or filters
//! stdin to stdout when no file is named. The raw codec stream carries
//! no metadata, so each `.lz15` file opens with a small header: a magic
//! tag, a format version, and the uncompressed length, which
//! decompression uses to size its output buffer.

use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const MAGIC: [u8; 2] = [b'L', b'Z'];
const FORMAT_VERSION: u8 = 1;
const HEADER_SIZE: usize = 8;
const SUFFIX: &str = "lz15";

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Pack,
    Unpack,
    Info,
}

struct Opts {
    mode: Mode,
    to_stdout: bool,
    keep_input: bool,
    overwrite: bool,
    verbose: bool,
    files: Vec<String>,
}

fn usage() {
    eprintln!("Usage: lzw15 [-dckflv] [FILE]...");
    eprintln!();
    eprintln!("Compress FILEs to FILE.{SUFFIX} with the 15-bit LZW codec, or");
    eprintln!("filter stdin to stdout when no FILE is given.");
    eprintln!();
    eprintln!("  -d, --decompress   restore .{SUFFIX} files");
    eprintln!("  -c, --stdout       write results to stdout, keep inputs");
    eprintln!("  -k, --keep         keep input files");
    eprintln!("  -f, --force        replace existing output files");
    eprintln!("  -l, --list         show the sizes recorded in .{SUFFIX} files");
    eprintln!("  -v, --verbose      report per-file sizes");
    eprintln!("  -h, --help         show this help");
}

fn apply_flag(opts: &mut Opts, flag: char) -> Result<(), String> {
    match flag {
        'd' => opts.mode = Mode::Unpack,
        'c' => opts.to_stdout = true,
        'k' => opts.keep_input = true,
        'f' => opts.overwrite = true,
        'l' => opts.mode = Mode::Info,
        'v' => opts.verbose = true,
        'h' => {
            usage();
            std::process::exit(0);
        }
        _ => return Err(format!("unrecognized option -{flag}")),
    }
    Ok(())
}

fn parse_args() -> Result<Opts, String> {
    let mut opts = Opts {
        mode: Mode::Pack,
        to_stdout: false,
        keep_input: false,
        overwrite: false,
        verbose: false,
        files: Vec::new(),
    };

    for arg in env::args().skip(1) {
        if let Some(long) = arg.strip_prefix("--") {
            let flag = match long {
                "decompress" => 'd',
                "stdout" => 'c',
                "keep" => 'k',
                "force" => 'f',
                "list" => 'l',
                "verbose" => 'v',
                "help" => 'h',
                _ => return Err(format!("unrecognized option --{long}")),
            };
            apply_flag(&mut opts, flag)?;
        } else if let Some(short) = arg.strip_prefix('-') {
            if short.is_empty() {
                return Err("stray '-' in arguments".to_string());
            }
            for flag in short.chars() {
                apply_flag(&mut opts, flag)?;
            }
        } else {
            opts.files.push(arg);
        }
    }

    Ok(opts)
}

/// Frame a compressed stream: magic, version, reserved byte, original
/// length, then the codec output.
fn pack(data: &[u8]) -> Result<Vec<u8>, String> {
    let stream = lzw15::compress(data).map_err(|e| e.to_string())?;
    let mut packed = Vec::with_capacity(HEADER_SIZE + stream.len());
    packed.extend_from_slice(&MAGIC);
    packed.push(FORMAT_VERSION);
    packed.push(0);
    packed.extend_from_slice(&(data.len() as u32).to_le_bytes());
    packed.extend_from_slice(&stream);
    Ok(packed)
}

/// Check the framing and return the recorded original length.
fn parse_header(data: &[u8]) -> Result<usize, String> {
    if data.len() < HEADER_SIZE || data[0..2] != MAGIC {
        return Err(format!("missing {SUFFIX} header"));
    }
    if data[2] != FORMAT_VERSION {
        return Err(format!("unsupported format version {}", data[2]));
    }
    Ok(u32::from_le_bytes([data[4], data[5], data[6], data[7]]) as usize)
}

fn unpack(data: &[u8]) -> Result<Vec<u8>, String> {
    let original_len = parse_header(data)?;
    let recovered =
        lzw15::expand(&data[HEADER_SIZE..], original_len).map_err(|e| e.to_string())?;
    if recovered.len() != original_len {
        return Err(format!(
            "decoded {} bytes where the header promised {original_len}",
            recovered.len()
        ));
    }
    Ok(recovered)
}

/// Write `bytes` to `target`, honoring the overwrite rule.
fn emit(opts: &Opts, target: &Path, bytes: &[u8]) -> Result<(), String> {
    if target.exists() && !opts.overwrite {
        return Err(format!(
            "refusing to replace {} without -f",
            target.display()
        ));
    }
    fs::write(target, bytes).map_err(|e| format!("cannot write {}: {e}", target.display()))
}

fn run_pack(opts: &Opts, path: &str) -> Result<(), String> {
    let data = fs::read(path).map_err(|e| format!("cannot read {path}: {e}"))?;
    let packed = pack(&data)?;

    if opts.to_stdout {
        io::stdout()
            .write_all(&packed)
            .map_err(|e| format!("writing stdout: {e}"))?;
        return Ok(());
    }

    let target = PathBuf::from(format!("{path}.{SUFFIX}"));
    emit(opts, &target, &packed)?;

    if opts.verbose {
        let percent = if data.is_empty() {
            0.0
        } else {
            100.0 * packed.len() as f64 / data.len() as f64
        };
        eprintln!(
            "{path}: {} bytes in, {} bytes out ({percent:.1}%)",
            data.len(),
            packed.len()
        );
    }
    if !opts.keep_input {
        fs::remove_file(path).map_err(|e| format!("cannot remove {path}: {e}"))?;
    }
    Ok(())
}

fn run_unpack(opts: &Opts, path: &str) -> Result<(), String> {
    let data = fs::read(path).map_err(|e| format!("cannot read {path}: {e}"))?;
    let recovered = unpack(&data).map_err(|e| format!("{path}: {e}"))?;

    if opts.to_stdout {
        io::stdout()
            .write_all(&recovered)
            .map_err(|e| format!("writing stdout: {e}"))?;
        return Ok(());
    }

    let source = Path::new(path);
    if source.extension().and_then(|e| e.to_str()) != Some(SUFFIX) {
        return Err(format!(
            "{path} does not end in .{SUFFIX}; use -c to decompress to stdout"
        ));
    }
    let target = source.with_extension("");
    emit(opts, &target, &recovered)?;

    if opts.verbose {
        eprintln!("{path}: restored {} bytes", recovered.len());
    }
    if !opts.keep_input {
        fs::remove_file(path).map_err(|e| format!("cannot remove {path}: {e}"))?;
    }
    Ok(())
}

fn run_info(path: &str) -> Result<(), String> {
    let data = fs::read(path).map_err(|e| format!("cannot read {path}: {e}"))?;
    let original_len = parse_header(&data).map_err(|e| format!("{path}: {e}"))?;
    let percent = if original_len == 0 {
        0.0
    } else {
        100.0 * data.len() as f64 / original_len as f64
    };
    println!(
        "{path}: {} compressed, {original_len} original ({percent:.1}%)",
        data.len()
    );
    Ok(())
}

fn run_stdio(opts: &Opts) -> Result<(), String> {
    let mut data = Vec::new();
    io::stdin()
        .read_to_end(&mut data)
        .map_err(|e| format!("reading stdin: {e}"))?;

    let out = match opts.mode {
        Mode::Unpack => unpack(&data)?,
        _ => pack(&data)?,
    };

    io::stdout()
        .write_all(&out)
        .map_err(|e| format!("writing stdout: {e}"))
}

fn main() -> ExitCode {
    let opts = match parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("lzw15: {e}");
            return ExitCode::FAILURE;
        }
    };

    if opts.files.is_empty() {
        if opts.mode == Mode::Info {
            eprintln!("lzw15: -l needs file arguments");
            return ExitCode::FAILURE;
        }
        return match run_stdio(&opts) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("lzw15: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let mut failures = 0;
    for path in &opts.files {
        let result = match opts.mode {
            Mode::Pack => run_pack(&opts, path),
            Mode::Unpack => run_unpack(&opts, path),
            Mode::Info => run_info(path),
        };
        if let Err(e) = result {
            eprintln!("lzw15: {e}");
            failures += 1;
        }
    }
    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
