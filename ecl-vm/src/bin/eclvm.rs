//! Command-line front end: loads an ECL file, optionally dumps its header
//! and include lists, then runs it to completion (spec.md §6's CLI
//! contract).

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ecl_vm::context::Difficulty;
use ecl_vm::{EclImage, ExecutionContext, Scheduler};
use tracing::error;

/// Load and run an ECL bytecode file.
#[derive(Parser, Debug)]
#[command(name = "eclvm", version, about)]
struct Args {
    /// Path to the ECL file to run.
    file: PathBuf,

    /// Dump header fields in key-value form after loading.
    #[arg(short = 'H', long = "dump-header")]
    dump_header: bool,

    /// Dump both include lists and the subroutine name table.
    #[arg(short = 'I', long = "dump-includes")]
    dump_includes: bool,

    /// Trace each executed instruction as disassembled text.
    #[arg(short, long)]
    verbose: bool,

    /// Active difficulty.
    #[arg(short, long, value_enum, default_value = "lunatic")]
    difficulty: Difficulty,

    /// Seed the random-number generator (otherwise seeded from the clock),
    /// for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose { "trace" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .without_time()
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("eclvm: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> ecl_vm::Result<()> {
    let bytes = fs::read(&args.file).map_err(|e| ecl_vm::EclError::Io(e.to_string()))?;
    let image = EclImage::load(bytes)?;

    if args.dump_header {
        dump_header(&image);
    }
    if args.dump_includes {
        dump_includes(&image);
    }

    let seed = args.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    });
    let mut ctx = ExecutionContext::with_seed(args.difficulty, seed);
    ctx.verbose = args.verbose;

    let mut scheduler = Scheduler::new(&image)?;
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    scheduler.run(&mut ctx, &mut lock)
}

fn dump_header(image: &EclImage) {
    let h = image.header();
    println!("revision: {}", h.revision);
    println!("include_length: {}", h.include_length);
    println!("include_offset: {}", h.include_offset);
    println!("sub_count: {}", h.sub_count);
}

fn dump_includes(image: &EclImage) {
    for (tag, list) in [("ANIM", image.anim()), ("ECLI", image.ecli())] {
        println!("{tag}:");
        for i in 0..list.len() {
            if let Some(s) = list.get(image.buf(), i) {
                println!("  {}", String::from_utf8_lossy(s));
            }
        }
    }
    println!("subs:");
    for name in image.sub_names() {
        println!("  {name}");
    }
}
