//! Build-script helper for `bin2c`.
use std::{
    env,
    path::{Path, PathBuf},
};

use tracing::warn;

use crate::{Embedder, Error, OutputMode, PointerWidth, Result, Symbol};

/// A builder for turning one file into C source from a `build.rs` script.
///
/// Everything it needs comes from the builder itself or from the variables Cargo
/// hands to build scripts, read only when [`build`](Self::build) runs.
///
/// # Example
/// ```no_run
/// // in build.rs
/// let source = bin2c::Config::new("web/dist/index.html.gz")
///     .mode(bin2c::OutputMode::Asm)
///     .build()
///     .expect("Failed to embed web assets");
/// // `index_html_gz` and `index_html_gz_len` are defined in `source`.
/// ```
#[derive(Debug)]
pub struct Config {
    path: PathBuf,
    mode: OutputMode,
    symbol: Option<String>,
    out_dir: Option<PathBuf>,
    strict: bool,
}

impl Config {
    /// Creates a new configuration for the file at `path`.
    ///
    /// Relative paths resolve against the build script's working directory,
    /// which Cargo sets to the crate root (`CARGO_MANIFEST_DIR`).
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            mode: OutputMode::default(),
            symbol: None,
            out_dir: None,
            strict: false,
        }
    }

    /// Selects the emission strategy. Defaults to [`OutputMode::Array`].
    #[must_use]
    pub const fn mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    /// Exports the blob under `name` instead of the sanitized file name.
    #[must_use]
    pub fn symbol(mut self, name: impl Into<String>) -> Self {
        self.symbol = Some(name.into());
        self
    }

    /// Writes the generated source into `dir` instead of `OUT_DIR`.
    #[must_use]
    pub fn out_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.out_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Fails the build when the symbol is not a usable C identifier, instead
    /// of only warning about it.
    #[must_use]
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Generates `<out_dir>/<symbol>.c` and returns its path.
    ///
    /// In [`OutputMode::Asm`] the length constant is sized for the target's
    /// pointer width (`CARGO_CFG_TARGET_POINTER_WIDTH`), not the host's, and the
    /// source path is made absolute so the assembler finds it from any working
    /// directory.
    ///
    /// # Errors
    /// Returns an [`Error`] if a Cargo variable is missing, the symbol is
    /// rejected in strict mode, or the conversion itself fails.
    pub fn build(self) -> Result<PathBuf> {
        let symbol = match self.symbol {
            Some(name) => Symbol::new(name),
            None => Symbol::from_path(&self.path)?,
        };
        if self.strict {
            symbol.validate()?;
        } else if let Err(issue) = symbol.check() {
            println!("cargo:warning=bin2c: symbol '{symbol}' is not a valid C identifier: {issue}");
            warn!(%symbol, %issue, "symbol is not a valid C identifier");
        }

        let out_dir = match self.out_dir {
            Some(dir) => dir,
            None => env::var_os("OUT_DIR")
                .map(PathBuf::from)
                .ok_or(Error::Var("OUT_DIR"))?,
        };

        let mut embedder = Embedder::new(self.mode);
        let source = match self.mode {
            OutputMode::Array => self.path,
            OutputMode::Asm => {
                embedder = embedder.pointer_width(target_pointer_width()?);
                std::path::absolute(&self.path).map_err(|source| Error::SourceUnreadable {
                    path: self.path.clone(),
                    source,
                })?
            }
        };
        println!("cargo:rerun-if-changed={}", source.display());

        let destination = out_dir.join(format!("{symbol}.c"));
        let report = embedder.embed(&source, &destination, &symbol)?;
        Ok(report.destination)
    }
}

/// Reads the pointer width of the target being built.
fn target_pointer_width() -> Result<PointerWidth> {
    let bits = env::var("CARGO_CFG_TARGET_POINTER_WIDTH")
        .map_err(|_| Error::Var("CARGO_CFG_TARGET_POINTER_WIDTH"))?;
    bits.parse()
        .ok()
        .and_then(PointerWidth::from_bits)
        .ok_or(Error::UnsupportedPointerWidth(bits))
}
