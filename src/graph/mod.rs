//! # K-mer graph store
//!
//! A write-once binary container mapping fixed-length nucleotide strings
//! (de Bruijn graph vertices) to their coverage and edge bitmasks.
//!
//! The store is produced offline by [`GraphBuilder`] and served read-only
//! through [`GraphReader`], which materializes one [`crate::Vertex`] per
//! successful lookup.
//!
//! ## File format
//!
//! All integers are little-endian.
//!
//! | Offset | Size (bytes) | Name        | Description                        |
//! | ------ | ------------ | ----------- | ---------------------------------- |
//! | 0      | 8            | magic       | Magic number (2345678987)          |
//! | 8      | 8            | entries     | Number of vertex records           |
//! | 16     | 8            | kmer length | Fixed key length, 1..=32           |
//! | 24     | 4 × 16       | dispatch    | Per-first-symbol `{first, count}`  |
//! | 88     | entries × 24 | records     | [`VertexRecord`]s                  |
//!
//! Records are grouped into four contiguous partitions by the key's first
//! symbol (in code order) and sorted within each partition by the packed key
//! suffix. Keys are implicit: the first symbol comes from the partition, the
//! rest from the stored suffix code. A lookup reads the dispatch slot for
//! the key's first symbol, then binary-searches that partition, bounding the
//! search space to roughly a quarter of the store before any comparison.

mod header;
mod reader;
mod writer;

pub use header::{GraphHeader, Partition, VertexRecord, GRAPH_MAGIC, MAX_KMER_LENGTH, SIZE_HEADER, SIZE_RECORD};
pub use reader::GraphReader;
pub use writer::GraphBuilder;
