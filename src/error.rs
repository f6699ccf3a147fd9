use std::path::PathBuf;

/// Custom Result type for graphseq operations, wrapping the custom [`Error`] type
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the graphseq library, encompassing all possible error
/// cases that can occur while building or serving the binary stores.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub enum Error {
    /// Errors related to store header processing
    HeaderError(#[from] HeaderError),
    /// Errors that occur while reading a mapped store
    ReadError(#[from] ReadError),
    /// Errors that occur during the offline build step
    BuildError(#[from] BuildError),
    /// Standard I/O errors from the Rust standard library
    IoError(#[from] std::io::Error),
    /// UTF-8 encoding/decoding errors
    Utf8Error(#[from] std::str::Utf8Error),
    /// JSON serialization errors
    JsonError(#[from] serde_json::Error),
    /// Generic errors that can occur in any part of the system
    AnyhowError(#[from] anyhow::Error),
}

/// Errors specific to processing and validating store headers
#[derive(thiserror::Error, Debug)]
pub enum HeaderError {
    /// The magic number in the header does not match the expected constant.
    ///
    /// No backward-compatibility translation is attempted: a mismatched store
    /// is rejected outright.
    #[error("Invalid magic number: {found} (expected {expected})")]
    InvalidMagicNumber { found: u64, expected: u64 },

    /// The header region is smaller than the fixed header size
    #[error("Invalid number of bytes provided: {0}. Expected at least: {1}")]
    InvalidSize(usize, usize),

    /// The k-mer length recorded in a graph store header is outside 1..=32
    #[error("Unsupported k-mer length: {0}")]
    UnsupportedKmerLength(u64),
}

/// Errors that can occur while reading a memory-mapped store
#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    /// A range or byte accessor was called while the store is not open
    #[error("Store is not open")]
    StoreUnavailable,

    /// The file being opened is not a regular file
    #[error("File is not regular")]
    IncompatibleFile,

    /// The file size is inconsistent with the header's entry count
    #[error(
        "Number of bytes in file does not match expectation - possibly truncated at byte pos {0}"
    )]
    FileTruncation(usize),

    /// Attempted to access a record index that is beyond the available range
    #[error("Requested record index ({0}) is out of record range ({1})")]
    OutOfRange(u64, u64),
}

/// Errors that can occur during the offline build step
#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    /// The input file cannot be opened or mapped
    #[error("Cannot map source file: {}", .0.display())]
    SourceUnavailable(PathBuf),

    /// The output file cannot be created or written
    #[error("Cannot write destination file: {}", .0.display())]
    DestinationUnavailable(PathBuf),

    /// The requested k-mer length cannot be packed into a 64-bit key
    #[error("Unsupported k-mer length: {0} (expected 1..=32)")]
    UnsupportedKmerLength(usize),
}
