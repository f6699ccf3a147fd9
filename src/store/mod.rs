//! # Indexed sequence store
//!
//! A write-once binary container for variable-length FASTA records with O(1)
//! random access to any record by its logical index.
//!
//! The store is produced offline by [`build`] and served read-only through
//! [`StoreReader`] via memory mapping.
//!
//! ## File format
//!
//! All integers are little-endian.
//!
//! | Offset | Size (bytes)   | Name      | Description                         |
//! | ------ | -------------- | --------- | ----------------------------------- |
//! | 0      | 8              | magic     | Magic number (1234567890)           |
//! | 8      | 8              | entries   | Number of records                   |
//! | 16     | entries × 32   | directory | One [`DirectoryEntry`] per record   |
//! | ...    | variable       | data      | Concatenated name+sequence bytes    |
//!
//! ### Directory entry (32 bytes)
//!
//! | Offset | Size | Name            | Description                          |
//! | ------ | ---- | --------------- | ------------------------------------ |
//! | 0      | 8    | name offset     | Absolute offset of the name bytes    |
//! | 8      | 8    | name length     | Name length in bytes                 |
//! | 16     | 8    | sequence offset | Absolute offset of the sequence bytes|
//! | 24     | 8    | sequence length | Sequence length in bytes             |
//!
//! The directory is ordered by logical record index (input order). The data
//! section is ordered by descending sequence length: each record's name bytes
//! are immediately followed by its sequence bytes, records back-to-back with
//! no padding or separators, newlines elided. Offsets and lengths describe
//! non-overlapping contiguous regions, all past the directory.

mod header;
mod reader;
mod writer;

pub use header::{DirectoryEntry, StoreHeader, SIZE_DIRECTORY_ENTRY, SIZE_HEADER, STORE_MAGIC};
pub use reader::StoreReader;
pub use writer::build;
