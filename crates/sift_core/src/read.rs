//! Text file reading and binary content detection.
//!
//! Small files are read with a single `read` syscall. Large files are
//! memory-mapped so the OS page cache is used directly, avoiding a heap
//! copy until the content is confirmed to be text.

use std::io::Read;
use std::path::Path;

use thiserror::Error;

/// Number of bytes to check for null bytes when detecting binary content.
/// Matches how git handles this as binary files almost always have nulls in headers.
const BINARY_CHECK_BYTES: usize = 8000;

/// File extensions that are always treated as binary, regardless of content.
const BINARY_EXTENSIONS: &[&str] = &[
    "o", "obj", "a", "so", "dylib", "dll", "exe", "pyc", "pyo", "class", "rlib", "rmeta", // Compiled code
    "png", "jpg", "jpeg", "gif", "ico", "webp", "bmp", "tiff", "heic", "avif", // Images
    "mp3", "mp4", "wav", "avi", "mov", "flac", "ogg", "webm", "mkv", // Audio/Video
    "zip", "tar", "gz", "bz2", "xz", "7z", "rar", "zst", // Archives
    "ttf", "otf", "woff", "woff2", // Fonts
    "wasm", "bin", "dat", "pdf", // Other binary
];

/// Files at or above this size are memory-mapped instead of heap-read.
const MMAP_THRESHOLD: u64 = 32 * 1024;

/// Why a corpus file's content could not be produced for scanning.
///
/// Every variant is file-level recoverable: the scanner logs it, skips the
/// file, and continues with the rest of the corpus.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The file could not be opened or read.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The file exceeds the configured maximum size.
    #[error("file is {size} bytes, over the {limit} byte limit")]
    TooLarge {
        /// Actual size of the file in bytes.
        size: u64,
        /// The configured maximum size in bytes.
        limit: u64,
    },

    /// The content contains null bytes and is treated as binary.
    #[error("binary content")]
    Binary,

    /// The content is not valid UTF-8 text.
    #[error("invalid UTF-8 at byte {valid_up_to}")]
    NotUtf8 {
        /// Byte offset of the first invalid sequence.
        valid_up_to: usize,
    },
}

/// Returns `true` if the file extension is in the known binary list.
///
/// The check is case-insensitive.
#[must_use]
pub fn has_binary_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| BINARY_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Returns `true` if the first [`BINARY_CHECK_BYTES`] of `bytes` contain
/// a null byte, which strongly indicates binary data.
#[must_use]
pub fn is_binary_bytes(bytes: &[u8]) -> bool {
    let check_len = bytes.len().min(BINARY_CHECK_BYTES);
    bytes[..check_len].contains(&0)
}

/// Reads a file as UTF-8 text for scanning.
///
/// Fails with a recoverable [`ReadError`] when the file is missing,
/// unreadable, over `max_size`, binary, or not valid UTF-8.
pub fn read_text_file(path: &Path, max_size: Option<u64>) -> Result<String, ReadError> {
    let mut file = std::fs::File::open(path)?;
    let len = file.metadata()?.len();

    if let Some(limit) = max_size
        && len > limit
    {
        return Err(ReadError::TooLarge { size: len, limit });
    }

    if len >= MMAP_THRESHOLD {
        read_large_file_mmap(&file)
    } else {
        read_small_file(&mut file, len)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "files above max_size are already rejected; remaining sizes fit in usize"
)]
fn read_small_file(file: &mut std::fs::File, len: u64) -> Result<String, ReadError> {
    let mut bytes = Vec::with_capacity(len as usize);
    file.read_to_end(&mut bytes)?;

    if is_binary_bytes(&bytes) {
        return Err(ReadError::Binary);
    }

    String::from_utf8(bytes).map_err(|e| ReadError::NotUtf8 {
        valid_up_to: e.utf8_error().valid_up_to(),
    })
}

fn read_large_file_mmap(file: &std::fs::File) -> Result<String, ReadError> {
    // SAFETY: The map is read-only and dropped before this function returns.
    // Concurrent file truncation could cause SIGBUS, but this is the same
    // risk `git` and `ripgrep` accept for mmap-based file reading.
    #[expect(unsafe_code, reason = "mmap requires unsafe; lifetime is scoped to this function")]
    let mmap = unsafe { memmap2::Mmap::map(file) }?;

    if is_binary_bytes(&mmap) {
        return Err(ReadError::Binary);
    }

    std::str::from_utf8(&mmap)
        .map(String::from)
        .map_err(|e| ReadError::NotUtf8 {
            valid_up_to: e.valid_up_to(),
        })
}
