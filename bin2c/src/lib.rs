//! Turn a binary file into C source that links the file's bytes as a static blob.
//!
//! Build systems use this to embed resources (fonts, certificates, compiled web
//! assets) straight into a firmware or executable image instead of loading them
//! from a filesystem at runtime.
//!
//! ## How It Works
//!
//! The generated source always exports exactly two names for a given symbol:
//!
//! - `<symbol>_len`: a `size_t` holding the byte count of the source file.
//! - `<symbol>`: the bytes themselves, in file order.
//!
//! Two strategies produce them:
//!
//! 1.  **[`OutputMode::Array`]** (the default): the file is streamed into a
//!     `const uint8_t[]` literal, twelve hex bytes per line. Portable to any C
//!     compiler.
//! 2.  **[`OutputMode::Asm`]**: a top-level `asm` block places the bytes in
//!     `.rodata` with an `.incbin` directive. Much smaller output and faster to
//!     compile, but needs a GNU-compatible assembler and ELF-style sections. The
//!     source file is read by the assembler at build time, not by `bin2c`.
//!
//! ## Usage
//!
//! From a build script, with the `build` feature enabled in `[build-dependencies]`:
//!
//! ```no_run
//! # #[cfg(feature = "build")]
//! # fn main() {
//! // build.rs
//! let source = bin2c::Config::new("assets/font.ttf")
//!     .mode(bin2c::OutputMode::Asm)
//!     .build()
//!     .expect("Failed to embed font");
//! // Hand `source` to your C compiler, e.g. `cc::Build::new().file(source)`.
//! # }
//! # #[cfg(not(feature = "build"))]
//! # fn main() {}
//! ```
//!
//! Or directly:
//!
//! ```no_run
//! use bin2c::{Embedder, OutputMode, Symbol};
//!
//! let symbol = Symbol::from_path("assets/my-font.ttf")?; // `my_font_ttf`
//! let report = Embedder::new(OutputMode::Array).embed(
//!     "assets/my-font.ttf",
//!     "generated/my_font_ttf.c",
//!     &symbol,
//! )?;
//! println!("embedded {} bytes", report.length);
//! # Ok::<(), bin2c::Error>(())
//! ```

use std::{io, path::PathBuf};

pub mod embed;
pub mod symbol;

pub use embed::{BYTES_PER_LINE, Embedder, OutputMode, PointerWidth, Report};
pub use symbol::{Symbol, SymbolIssue, sanitize};

/// A specialized `Result` type for conversions.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur while turning a binary into C source.
///
/// A failed conversion may leave a partially written destination behind. Its
/// presence alone says nothing about success.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Could not read source binary '{}'", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not write destination '{}'", path.display())]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not write generated source")]
    Output(#[source] io::Error),
    #[error("Source binary '{}' changed during conversion: expected {expected} bytes, read {actual}", path.display())]
    LengthMismatch {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },
    #[error("Source path '{}' is not valid UTF-8 and cannot be written into `.incbin`", .0.display())]
    NonUtf8Path(PathBuf),
    #[error("Path '{}' has no file name to derive a symbol from", .0.display())]
    NoFileName(PathBuf),
    #[error("Symbol '{symbol}' is not usable as a C identifier: {issue}")]
    InvalidSymbol { symbol: String, issue: SymbolIssue },
    #[error("Environment variable '{0}' not set by Cargo")]
    Var(&'static str),
    #[error("Unsupported pointer width '{0}'")]
    UnsupportedPointerWidth(String),
}

//
// ===== BUILD-TIME CODE =====
//

#[cfg(feature = "build")]
mod build;
#[cfg(feature = "build")]
pub use build::Config;
