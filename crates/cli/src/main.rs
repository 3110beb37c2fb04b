//! Twin64 emulator command-line runner.
//!
//! This binary loads a flat program image into physical memory and runs it. It performs:
//! 1. **Configuration:** Reads an optional JSON config; otherwise uses the built-in defaults.
//! 2. **Loading:** Copies the image to the load address, which also becomes the reset address.
//! 3. **Execution:** Resets the CPU and runs until `HALT`, a trap, or the cycle budget.
//! 4. **Reporting:** Prints the stop reason, register dump, console output and statistics.
//!
//! Logging goes through `tracing`; `RUST_LOG` overrides the default filter.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use twin64_core::common::CpuError;
use twin64_core::config::{Config, ConfigError};
use twin64_core::sim::loader::{self, LoadError};
use twin64_core::{Cpu, StopReason};

#[derive(Parser, Debug)]
#[command(
    name = "t64sim",
    author,
    version,
    about = "Twin64 instruction-set emulator",
    long_about = "Run a flat Twin64 binary image.\n\nExamples:\n  t64sim run -f prog.bin\n  t64sim run -f prog.bin --config t64.json --max-steps 100000\n  t64sim run -f prog.bin --trace --input 'hello'"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a binary image until it halts, traps or exhausts the cycle budget.
    Run {
        /// Binary image to execute.
        #[arg(short, long)]
        file: PathBuf,

        /// Physical load address; defaults to the configured start address.
        #[arg(long, value_parser = parse_address)]
        load_address: Option<u64>,

        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Maximum number of cycles to execute.
        #[arg(long)]
        max_steps: Option<u64>,

        /// Log every retired instruction with its disassembly.
        #[arg(long)]
        trace: bool,

        /// Bytes queued on the console input before execution starts.
        #[arg(long)]
        input: Option<String>,

        /// Print statistics as JSON instead of the text report.
        #[arg(long)]
        json: bool,
    },
}

/// Errors that end a CLI run before or during execution.
#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Load(#[from] LoadError),
    #[error("{0}")]
    Cpu(#[from] CpuError),
    #[error("cannot encode statistics: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses a decimal or `0x`-prefixed hexadecimal address.
fn parse_address(text: &str) -> Result<u64, String> {
    let parsed = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")).map_or_else(
        || text.parse::<u64>(),
        |hex| u64::from_str_radix(&hex.replace('_', ""), 16),
    );
    parsed.map_err(|e| format!("invalid address '{text}': {e}"))
}

fn init_tracing(trace: bool) {
    let default = if trace { "trace" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            file,
            load_address,
            config,
            max_steps,
            trace,
            input,
            json,
        } => {
            init_tracing(trace);
            let opts = RunOptions {
                file,
                load_address,
                config,
                max_steps,
                trace,
                input,
                json,
            };
            match cmd_run(&opts) {
                Ok(code) => code,
                Err(e) => {
                    eprintln!("[!] {e}");
                    ExitCode::from(2)
                }
            }
        }
    }
}

/// Options collected from the `run` subcommand.
struct RunOptions {
    file: PathBuf,
    load_address: Option<u64>,
    config: Option<PathBuf>,
    max_steps: Option<u64>,
    trace: bool,
    input: Option<String>,
    json: bool,
}

/// Loads the image, runs it and prints the report.
///
/// # Returns
///
/// Exit code 0 when the program halted or completed its budget, 1 when it trapped.
fn cmd_run(opts: &RunOptions) -> Result<ExitCode, CliError> {
    let mut config = match &opts.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if opts.trace {
        config.general.trace_instructions = true;
    }
    if let Some(addr) = opts.load_address {
        config.general.start_address = addr;
    }
    let load_addr = config.general.start_address;

    println!(
        "Configuration: phys {} KiB  io {} KiB  tlb {}  policy {:?}",
        config.memory.phys_mem_size / 1024,
        config.memory.io_mem_size / 1024,
        config.tlb.entries,
        config.general.trap_policy
    );

    let mut cpu = Cpu::new(&config)?;
    let image = loader::load_image(&opts.file)?;
    loader::install_image(&mut cpu, &image, load_addr)?;
    println!("[*] Loaded {} ({} bytes) at {load_addr:#x}", opts.file.display(), image.len());

    if let Some(text) = &opts.input {
        if let Some(console) = cpu.memory_mut().console_mut() {
            console.push_input(text.as_bytes());
        } else {
            tracing::warn!("console disabled; --input ignored");
        }
    }

    cpu.reset();
    let reason = cpu.run(opts.max_steps)?;

    println!("\n[*] Stopped: {reason}");
    println!("{}", cpu.registers().dump());

    if let Some(console) = cpu.memory().console() {
        if !console.output().is_empty() {
            println!("--- console ---");
            println!("{}", String::from_utf8_lossy(console.output()));
        }
    }

    let stats = cpu.stats();
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{stats}");
    }

    Ok(match reason {
        StopReason::Trapped(_) => ExitCode::from(1),
        StopReason::Completed | StopReason::Halted | StopReason::BudgetExhausted => {
            ExitCode::SUCCESS
        }
    })
}
