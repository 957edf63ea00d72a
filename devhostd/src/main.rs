//! # Device Host Daemon
//!
//! Main entry point for the device host runtime.

use devhostd::{load_roulette_config, HostCommandParser, HostMode, HostRuntime, HostRuntimeConfig};
use services_logger::{LogLevel, Logger, StderrLog};
use std::env;
use std::io;
use std::path::Path;
use std::process;
use std::sync::Arc;

fn main() {
    let args: Vec<String> = env::args().collect();

    let (config, command_words) = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(&args[0]);
        process::exit(1);
    });

    let command = HostCommandParser::parse_words(&command_words).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(&args[0]);
        process::exit(1);
    });

    let logger = Logger::new(Arc::new(StderrLog));
    let mut runtime = HostRuntime::new(config, logger).unwrap_or_else(|e| {
        eprintln!("Failed to create runtime: {}", e);
        process::exit(1);
    });

    let stdout = io::stdout();
    if let Err(e) = runtime.execute(&command, &mut stdout.lock()) {
        eprintln!("Runtime error: {}", e);
        process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<(HostRuntimeConfig, Vec<String>), String> {
    let mut config = HostRuntimeConfig::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--mode" | "-m" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --mode".to_string());
                }
                config.mode = match args[i].as_str() {
                    "sim" => HostMode::Sim,
                    "host" => HostMode::Host,
                    other => return Err(format!("Invalid mode: {}", other)),
                };
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --seed".to_string());
                }
                config.seed = args[i]
                    .parse()
                    .map_err(|_| format!("Invalid seed value: {}", args[i]))?;
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --config".to_string());
                }
                config.roulette = load_roulette_config(Path::new(&args[i]))
                    .map_err(|e| format!("Failed to load config: {}", e))?;
            }
            "--verbose" | "-v" => {
                config.log_level = LogLevel::Debug;
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                return Err(format!("Unknown option: {}", other));
            }
            _ => break,
        }
        i += 1;
    }

    let command = if i < args.len() {
        args[i..].to_vec()
    } else {
        vec!["list".to_string()]
    };
    Ok((config, command))
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS] [COMMAND]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -m, --mode <MODE>        Platform: sim (default) or host");
    eprintln!("                           (host mode aborts the process on BANG!)");
    eprintln!("  --seed <N>               Entropy seed for sim mode");
    eprintln!("  -c, --config <FILE>      Roulette config (JSON)");
    eprintln!("  -v, --verbose            Log debug events to stderr");
    eprintln!("  -h, --help               Show this help message");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  cat <device>             Read a device to end-of-stream once");
    eprintln!("  play [rounds]            Play roulette (default 1 round)");
    eprintln!("  list                     List device nodes (default)");
    eprintln!("  reload <device>          Reload a driver module");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} cat korbo", program);
    eprintln!("  {} --seed 7 play 20", program);
}
