//! Quotient CLI - extended regular expressions on the command line.
//!
//! Usage:
//!   quotient match <pattern> <input>...   # Full-string match per operand
//!   quotient grep <pattern> [file]        # Lines matching in full
//!   quotient compile <pattern> [-o path]  # Compile, report, optionally save
//!   quotient inspect <path>               # Shape of a saved DFA
//!
//! Patterns match the entire input: use `.*needle.*` to search. `&` is
//! intersection, `~` complement, so `.*&~(.*ab.*)` is "anything without
//! an ab".

use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use quotient::{matches, Dfa, Pattern};

#[derive(Parser)]
#[command(name = "quotient")]
#[command(about = "Extended regular expressions via Brzozowski derivatives", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match each input string in full against a pattern
    Match {
        /// Pattern (extended syntax: | & ~ * + ? . [] ())
        pattern: String,

        /// Strings to test
        inputs: Vec<String>,

        /// Drive the derivative matcher directly instead of the DFA
        #[arg(long)]
        direct: bool,
    },

    /// Print the lines of a file (or stdin) that match in full
    Grep {
        pattern: String,

        /// Input file; reads stdin when omitted
        file: Option<PathBuf>,
    },

    /// Compile a pattern and report the automaton shape
    Compile {
        pattern: String,

        /// Write the compiled DFA to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the shape of a previously saved DFA
    Inspect {
        path: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Match {
            pattern,
            inputs,
            direct,
        } => cmd_match(&pattern, &inputs, direct),
        Commands::Grep { pattern, file } => cmd_grep(&pattern, file.as_deref()),
        Commands::Compile { pattern, output } => cmd_compile(&pattern, output.as_deref()),
        Commands::Inspect { path } => cmd_inspect(&path),
    }
}

/// Match each operand; exit 0 when anything matched.
fn cmd_match(pattern: &str, inputs: &[String], direct: bool) -> Result<i32> {
    let compiled = Pattern::new(pattern)?;

    let mut any = false;
    for input in inputs {
        let hit = if direct {
            matches(compiled.exp(), input)
        } else {
            compiled.is_match(input)
        };
        any |= hit;
        println!("{}\t{}", if hit { "match" } else { "no-match" }, input);
    }

    Ok(if any { 0 } else { 1 })
}

/// Filter matching lines. File input is matched in parallel; stdin is
/// streamed line by line.
fn cmd_grep(pattern: &str, file: Option<&Path>) -> Result<i32> {
    let compiled = Pattern::new(pattern)?;
    let mut any = false;

    match file {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            let lines: Vec<&str> = text.lines().collect();
            let hits: Vec<&str> = lines
                .par_iter()
                .filter(|line| compiled.is_match(line))
                .copied()
                .collect();
            any = !hits.is_empty();
            for line in hits {
                println!("{}", line);
            }
        }
        None => {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let line = line?;
                if compiled.is_match(&line) {
                    any = true;
                    println!("{}", line);
                }
            }
        }
    }

    Ok(if any { 0 } else { 1 })
}

fn cmd_compile(pattern: &str, output: Option<&Path>) -> Result<i32> {
    let compiled = Pattern::new(pattern)?;

    if let Some(path) = output {
        compiled.dfa().save(path)?;
    }

    println!("{}", serde_json::to_string_pretty(&compiled.stats())?);
    Ok(0)
}

fn cmd_inspect(path: &Path) -> Result<i32> {
    let dfa = Dfa::load(path)?;
    println!("{}", serde_json::to_string_pretty(&dfa.stats())?);
    Ok(0)
}
