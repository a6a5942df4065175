//! `jcs` CLI: canonicalize JSON (RFC 8785) from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Canonicalize stdin to stdout
//! echo '{"b": 1.0, "a": "x"}' | jcs
//!
//! # Canonicalize a file
//! jcs data.json
//!
//! # Write the result to a file instead of stdout
//! jcs data.json -o data.canonical.json
//!
//! # Verify a document is already canonical (exit status 1 if not)
//! jcs --check data.canonical.json
//! ```
//!
//! On success the canonical text is written followed by a newline. On any read
//! or transform failure a diagnostic goes to stderr, nothing goes to stdout,
//! and the exit status is 1.

use anyhow::{Context, Result};
use clap::Parser;
use jcs_core::limits::DEFAULT_MAX_DEPTH;
use jcs_core::Limits;
use std::io::{self, Read, Write};

#[derive(Parser)]
#[command(
    name = "jcs",
    version,
    about = "JSON Canonicalization Scheme (RFC 8785) CLI"
)]
struct Cli {
    /// Input file (reads from stdin if omitted)
    input: Option<String>,

    /// Output file (writes to stdout if omitted)
    #[arg(short, long, conflicts_with = "check")]
    output: Option<String>,

    /// Only verify that the input is already canonical; a single trailing
    /// newline is ignored
    #[arg(long)]
    check: bool,

    /// Maximum array/object nesting depth
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let limits = Limits::new().with_max_depth(cli.max_depth);

    let input = read_input(cli.input.as_deref())?;
    let canonical =
        jcs_core::transform_with_limits(&input, limits).context("Canonicalization error")?;

    if cli.check {
        let body = input.strip_suffix(b"\n").unwrap_or(&input[..]);
        if canonical.as_bytes() != body {
            anyhow::bail!("Input is not in canonical form");
        }
        return Ok(());
    }

    write_output(cli.output.as_deref(), &canonical)
}

fn read_input(path: Option<&str>) -> Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path).with_context(|| format!("Failed to read file: {}", path)),
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

/// Write the canonical text plus a trailing newline in a single write, so a
/// failure never leaves partial output behind on stdout.
fn write_output(path: Option<&str>, canonical: &str) -> Result<()> {
    let mut content = String::with_capacity(canonical.len() + 1);
    content.push_str(canonical);
    content.push('\n');

    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .context("Failed to write to stdout")?;
            stdout.flush().context("Failed to flush stdout")?;
        }
    }
    Ok(())
}
