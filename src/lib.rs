//! # graphseq
//!
//! Memory-mapped storage layer for a genomic-sequence browsing service.
//!
//! Two write-once / read-many binary stores:
//!
//! - [`store`] — an indexed sequence store built from FASTA text, serving
//!   any record's name and sequence bytes by logical index with direct
//!   offset arithmetic over a memory map.
//! - [`graph`] — a k-mer graph store resolving a fixed-length nucleotide
//!   key to a [`Vertex`]: its coverage plus 4-slot edge bitmasks from which
//!   the neighboring k-mers are derived on demand.
//!
//! Both stores are built offline, single-threaded, then served read-only;
//! a mapped store is safe for concurrent readers because the underlying
//! file never changes after the build step.
//!
//! ## Usage
//!
//! ```no_run
//! use graphseq::prelude::*;
//!
//! fn main() -> Result<()> {
//!     // Offline: index a FASTA file
//!     graphseq::store::build("contigs.fasta", "contigs.store")?;
//!
//!     // Serving: open read-only, fetch a record by logical index
//!     let mut store = StoreReader::new();
//!     store.open("contigs.store")?;
//!     let name = store.name(0)?;
//!     let sequence = store.sequence(0)?;
//!
//!     // Graph lookups materialize a transient vertex
//!     let mut graph = GraphReader::new();
//!     graph.open("contigs.graph")?;
//!     let mut vertex = Vertex::new();
//!     if graph.find("ACGTACGTACGTACGTACGTA", &mut vertex) {
//!         println!("{}", vertex.to_json()?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod codec;
mod error;
pub mod graph;
pub mod store;
mod vertex;

pub mod prelude;

pub use error::{BuildError, Error, HeaderError, ReadError, Result};
pub use graph::{GraphBuilder, GraphReader};
pub use store::StoreReader;
pub use vertex::Vertex;

#[cfg(test)]
mod testing {
    use super::prelude::*;
    use anyhow::Result;
    use tempfile::tempdir;

    /// The end-to-end scenario: two records, the longer one physically
    /// first, both logically addressable in input order.
    #[test]
    fn test_store_round_trip_with_reorder() -> Result<()> {
        let dir = tempdir()?;
        let input = dir.path().join("input.fasta");
        let output = dir.path().join("contigs.store");
        std::fs::write(&input, b">a\nACGT\n>b\nAC\n")?;

        let entries = crate::store::build(&input, &output)?;
        assert_eq!(entries, 2);

        let mut store = StoreReader::new();
        store.open(&output)?;
        assert_eq!(store.entry_count(), 2);
        assert_eq!(store.name(0)?, b"a");
        assert_eq!(store.name(1)?, b"b");
        assert_eq!(store.sequence(0)?, b"ACGT");
        assert_eq!(store.sequence(1)?, b"AC");

        // length-4 record precedes the length-2 record physically
        let (offset_a, _) = store.name_range(0)?;
        let (offset_b, _) = store.name_range(1)?;
        assert!(offset_a < offset_b);
        Ok(())
    }

    #[test]
    fn test_store_round_trip_many_records() -> Result<()> {
        let dir = tempdir()?;
        let input = dir.path().join("input.fasta");
        let output = dir.path().join("contigs.store");

        let mut fasta = Vec::new();
        let mut expected = Vec::new();
        for i in 0..50u32 {
            let name = format!("record-{i}");
            // lengths vary non-monotonically to exercise the reorder
            let sequence = "ACGT".repeat(1 + (i as usize * 7) % 13);
            fasta.extend_from_slice(format!(">{name}\n{sequence}\n").as_bytes());
            expected.push((name, sequence));
        }
        std::fs::write(&input, &fasta)?;

        assert_eq!(crate::store::build(&input, &output)?, 50);
        let mut store = StoreReader::new();
        store.open(&output)?;
        for (i, (name, sequence)) in expected.iter().enumerate() {
            let i = i as u64;
            assert_eq!(store.name(i)?, name.as_bytes());
            assert_eq!(store.sequence(i)?, sequence.as_bytes());
        }

        // physical layout is ordered by non-increasing sequence length
        let mut ranges: Vec<(u64, u64)> = (0..50)
            .map(|i| store.sequence_range(i))
            .collect::<crate::Result<_>>()?;
        ranges.sort_unstable_by_key(|&(offset, _)| offset);
        for pair in ranges.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
        Ok(())
    }

    /// Graph lookups feed the JSON projection consumed by the query layer.
    #[test]
    fn test_graph_lookup_to_json() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("contigs.graph");

        let mut builder = GraphBuilder::new(3)?;
        builder.add_sequence(b"ACGTA");
        builder.write_to(&path)?;

        let mut graph = GraphReader::new();
        graph.open(&path)?;

        let mut vertex = Vertex::new();
        assert!(graph.find("CGT", &mut vertex));
        assert_eq!(
            vertex.to_json()?,
            r#"{"value":"CGT","coverage":1,"parents":["A"],"children":["A"]}"#
        );
        Ok(())
    }

    /// Both stores built from the same genomic data and served together.
    #[test]
    fn test_store_and_graph_agree_on_sequence() -> Result<()> {
        let dir = tempdir()?;
        let input = dir.path().join("input.fasta");
        let store_path = dir.path().join("contigs.store");
        let graph_path = dir.path().join("contigs.graph");
        std::fs::write(&input, b">contig\nACGTACG\nTACGT\n")?;

        crate::store::build(&input, &store_path)?;
        let mut store = StoreReader::new();
        store.open(&store_path)?;
        let sequence = store.sequence(0)?.to_vec();
        assert_eq!(sequence, b"ACGTACGTACGT");

        let mut builder = GraphBuilder::new(5)?;
        builder.add_sequence(&sequence);
        builder.write_to(&graph_path)?;

        let mut graph = GraphReader::new();
        graph.open(&graph_path)?;
        let mut vertex = Vertex::new();
        // every k-window of the stored sequence must resolve
        for window in sequence.windows(5) {
            let key = std::str::from_utf8(window)?;
            assert!(graph.find(key, &mut vertex), "missing {key}");
        }
        Ok(())
    }
}
