//! The two emission strategies and the [`Embedder`] that drives them.
use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{Error, Result, Symbol};

/// Bytes rendered per line by [`OutputMode::Array`].
pub const BYTES_PER_LINE: usize = 12;

const PREAMBLE: &str = "#include <stddef.h>\n#include <stdint.h>\n\n";

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// How the bytes end up in the generated source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputMode {
    /// A `const uint8_t[]` literal. Works with any C compiler.
    #[default]
    Array,
    /// A top-level `asm` block pulling the file in with `.incbin`.
    ///
    /// Needs a GNU-compatible assembler targeting ELF-style sections.
    ///
    /// The `size_t` width is fixed when the source is generated (see
    /// [`PointerWidth`]) and written as plain `#define BALIGN` / `#define TYPE`
    /// lines. Python `bin2c.py` output instead picks them under
    /// `#if SIZE_MAX == UINT64_MAX`, so the two do not diff equal.
    Asm,
}

/// Width of `size_t` on the platform the generated source is built for.
///
/// Only [`OutputMode::Asm`] cares: the length constant is laid down by an
/// assembler directive, so its size and alignment must match what C code
/// reading `<symbol>_len` expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerWidth {
    Bits32,
    Bits64,
}

impl PointerWidth {
    /// The width of the platform `bin2c` itself was compiled for.
    #[must_use]
    pub const fn host() -> Self {
        if cfg!(target_pointer_width = "64") {
            Self::Bits64
        } else {
            Self::Bits32
        }
    }

    /// Maps a bit count, as found in `CARGO_CFG_TARGET_POINTER_WIDTH`.
    ///
    /// 16-bit targets are treated as 32-bit, they have no narrower directive.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            16 | 32 => Some(Self::Bits32),
            64 => Some(Self::Bits64),
            _ => None,
        }
    }

    /// `.balign` argument, in bytes.
    #[must_use]
    pub const fn alignment(self) -> u32 {
        match self {
            Self::Bits32 => 4,
            Self::Bits64 => 8,
        }
    }

    /// Data directive emitting one `size_t` word.
    #[must_use]
    pub const fn length_directive(self) -> &'static str {
        match self {
            Self::Bits32 => ".int",
            Self::Bits64 => ".quad",
        }
    }
}

impl Default for PointerWidth {
    fn default() -> Self {
        Self::host()
    }
}

/// The outcome of a successful [`Embedder::embed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub symbol: Symbol,
    /// Byte count declared in `<symbol>_len`.
    pub length: u64,
    pub mode: OutputMode,
    pub destination: PathBuf,
}

/// Converts one source binary per call.
///
/// # Example
/// ```no_run
/// use bin2c::{Embedder, OutputMode, PointerWidth, Symbol};
///
/// let report = Embedder::new(OutputMode::Asm)
///     .pointer_width(PointerWidth::Bits32)
///     .embed("cert.der", "cert_der.c", &Symbol::new("cert_der"))?;
/// assert_eq!(report.symbol.as_str(), "cert_der");
/// # Ok::<(), bin2c::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Embedder {
    mode: OutputMode,
    width: PointerWidth,
}

impl Embedder {
    /// Creates an embedder for `mode`, targeting the host pointer width.
    #[must_use]
    pub const fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            width: PointerWidth::host(),
        }
    }

    /// Overrides the pointer width used by [`OutputMode::Asm`].
    #[must_use]
    pub const fn pointer_width(mut self, width: PointerWidth) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub const fn mode(&self) -> OutputMode {
        self.mode
    }

    #[must_use]
    pub const fn width(&self) -> PointerWidth {
        self.width
    }

    /// Writes the generated source for `source` to `out` and returns the
    /// declared length.
    ///
    /// # Errors
    /// - [`Error::SourceUnreadable`] if the source cannot be size-queried, or,
    ///   for [`OutputMode::Array`], opened or read.
    /// - [`Error::NonUtf8Path`] if, for [`OutputMode::Asm`], the source path is
    ///   not valid UTF-8.
    /// - [`Error::Output`] if writing to `out` fails.
    /// - [`Error::LengthMismatch`] if the file changed size while streaming.
    pub fn render<W: Write>(
        &self,
        source: impl AsRef<Path>,
        symbol: &Symbol,
        mut out: W,
    ) -> Result<u64> {
        let source = source.as_ref();
        let input = self.open(source)?;
        self.emit(input, source, symbol, &mut out)
    }

    /// Converts `source` into a freshly created (or truncated) `destination`.
    ///
    /// For [`OutputMode::Array`] the source is opened before the destination
    /// is touched, so an unreadable source leaves no output behind. A read or
    /// write failure later on leaves a partial destination that must not be
    /// used.
    ///
    /// For [`OutputMode::Asm`] only the size of `source` is queried. Its path
    /// goes verbatim into the `.incbin` directive and is resolved by the
    /// assembler at build time. A path that is not valid UTF-8 cannot be
    /// written verbatim and fails with [`Error::NonUtf8Path`] before the
    /// destination is touched.
    ///
    /// # Errors
    /// As [`render`](Self::render), with write failures reported as
    /// [`Error::DestinationUnwritable`].
    pub fn embed(
        &self,
        source: impl AsRef<Path>,
        destination: impl AsRef<Path>,
        symbol: &Symbol,
    ) -> Result<Report> {
        let (source, destination) = (source.as_ref(), destination.as_ref());
        let input = self.open(source)?;

        let unwritable = |source| Error::DestinationUnwritable {
            path: destination.to_path_buf(),
            source,
        };
        let mut out = BufWriter::new(File::create(destination).map_err(unwritable)?);
        let length = self
            .emit(input, source, symbol, &mut out)
            .and_then(|length| out.flush().map(|()| length).map_err(Error::Output))
            .map_err(|err| match err {
                Error::Output(source) => unwritable(source),
                other => other,
            })?;

        Ok(Report {
            symbol: symbol.clone(),
            length,
            mode: self.mode,
            destination: destination.to_path_buf(),
        })
    }

    fn open(&self, source: &Path) -> Result<Input> {
        let unreadable = |err| Error::SourceUnreadable {
            path: source.to_path_buf(),
            source: err,
        };
        let metadata = fs::metadata(source).map_err(unreadable)?;
        if metadata.is_dir() {
            return Err(unreadable(io::ErrorKind::IsADirectory.into()));
        }
        let length = metadata.len();

        Ok(match self.mode {
            OutputMode::Array => Input::Stream {
                length,
                reader: BufReader::new(File::open(source).map_err(unreadable)?),
            },
            OutputMode::Asm => Input::Deferred {
                length,
                path: source
                    .to_str()
                    .ok_or_else(|| Error::NonUtf8Path(source.to_path_buf()))?
                    .to_owned(),
            },
        })
    }

    fn emit<W: Write>(
        &self,
        input: Input,
        source: &Path,
        symbol: &Symbol,
        out: &mut W,
    ) -> Result<u64> {
        debug!(
            %symbol,
            mode = ?self.mode,
            length = input.length(),
            path = %source.display(),
            "generating source"
        );
        match input {
            Input::Stream { length, reader } => {
                write_array(reader, length, source, symbol, out)
            }
            Input::Deferred { length, path } => {
                write_asm(&path, length, symbol, self.width, out).map_err(Error::Output)?;
                Ok(length)
            }
        }
    }
}

/// A source binary after its size query.
enum Input {
    Stream {
        length: u64,
        reader: BufReader<File>,
    },
    /// Left on disk for the assembler to read.
    Deferred { length: u64, path: String },
}

impl Input {
    const fn length(&self) -> u64 {
        match self {
            Self::Stream { length, .. } | Self::Deferred { length, .. } => *length,
        }
    }
}

fn write_array<R: Read, W: Write>(
    mut reader: R,
    length: u64,
    path: &Path,
    symbol: &Symbol,
    out: &mut W,
) -> Result<u64> {
    write!(
        out,
        "{PREAMBLE}const size_t {} = {length};\nconst uint8_t {symbol}[] = {{\n",
        symbol.len_symbol()
    )
    .map_err(Error::Output)?;

    let mut chunk = [0; BYTES_PER_LINE];
    let mut line = String::with_capacity(BYTES_PER_LINE * 6 + 4);
    let mut emitted = 0u64;
    loop {
        let read =
            read_chunk(&mut reader, &mut chunk).map_err(|source| Error::SourceUnreadable {
                path: path.to_path_buf(),
                source,
            })?;
        if read == 0 {
            break;
        }
        format_line(&chunk[..read], &mut line);
        out.write_all(line.as_bytes()).map_err(Error::Output)?;
        emitted += read as u64;
    }
    out.write_all(b"};\n").map_err(Error::Output)?;

    if emitted != length {
        return Err(Error::LengthMismatch {
            path: path.to_path_buf(),
            expected: length,
            actual: emitted,
        });
    }
    Ok(length)
}

/// Fills `chunk` unless the reader runs dry first. Returns the bytes read.
fn read_chunk(reader: &mut impl Read, chunk: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < chunk.len() {
        match reader.read(&mut chunk[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

/// Renders `    0x0A, 0xFF, ...,\n` into `line`.
fn format_line(bytes: &[u8], line: &mut String) {
    line.clear();
    line.push_str("    ");
    for (i, &byte) in bytes.iter().enumerate() {
        if i > 0 {
            line.push_str(", ");
        }
        line.push_str("0x");
        line.push(HEX_DIGITS[usize::from(byte >> 4)] as char);
        line.push(HEX_DIGITS[usize::from(byte & 0xF)] as char);
    }
    line.push_str(",\n");
}

fn write_asm<W: Write>(
    path: &str,
    length: u64,
    symbol: &Symbol,
    width: PointerWidth,
    out: &mut W,
) -> io::Result<()> {
    let align = width.alignment();
    let directive = width.length_directive();
    let len_symbol = symbol.len_symbol();
    write!(
        out,
        r#"{PREAMBLE}#define BALIGN "{align}"
#define TYPE "{directive}"

asm (
    ".section .rodata\n"
    ".balign " BALIGN "\n"
    ".global {len_symbol}\n"
    "{len_symbol}:\n"
    TYPE " {length}\n"
    ".global {symbol}\n"
    "{symbol}:\n"
    ".incbin \"{path}\"\n"
    ".balign " BALIGN "\n"
    ".section .text\n"
);
"#
    )
}
