//! `bin2c`: write a binary file out as C source.

use std::path::PathBuf;

use anyhow::{Context, bail};
use bin2c::{Embedder, OutputMode, PointerWidth, Symbol};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "bin2c",
    version,
    about = "Convert a binary file into C source exposing its bytes as a static blob"
)]
struct Args {
    /// Use the faster but non-portable inline asm method.
    #[arg(long)]
    use_asm: bool,

    /// Exported symbol. Defaults to the file name with `-` and `.` replaced by `_`.
    #[arg(long, value_name = "NAME")]
    symbol: Option<String>,

    /// Width of `size_t` for the asm method. Defaults to this machine's.
    #[arg(long, value_name = "BITS", value_parser = ["32", "64"])]
    pointer_width: Option<String>,

    /// Refuse symbols that are not valid C identifiers.
    #[arg(long)]
    strict: bool,

    /// Log each step.
    #[arg(short, long)]
    verbose: bool,

    /// Source binary data.
    #[arg(value_name = "BINARY")]
    binary: PathBuf,

    /// Destination C source.
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let symbol = match args.symbol {
        Some(name) => Symbol::new(name),
        None => Symbol::from_path(&args.binary)?,
    };
    if let Err(issue) = symbol.check() {
        if args.strict {
            bail!("symbol '{symbol}' is not a valid C identifier: {issue}");
        }
        warn!(%symbol, %issue, "symbol is not a valid C identifier");
    }

    let mode = if args.use_asm {
        OutputMode::Asm
    } else {
        OutputMode::Array
    };
    let width = match args.pointer_width.as_deref() {
        Some("32") => PointerWidth::Bits32,
        Some("64") => PointerWidth::Bits64,
        _ => PointerWidth::host(),
    };

    let report = Embedder::new(mode)
        .pointer_width(width)
        .embed(&args.binary, &args.output, &symbol)
        .with_context(|| {
            format!(
                "failed to convert '{}' into '{}'",
                args.binary.display(),
                args.output.display()
            )
        })?;

    info!(
        symbol = %report.symbol,
        length = report.length,
        mode = ?report.mode,
        "wrote {}",
        report.destination.display()
    );
    Ok(())
}
