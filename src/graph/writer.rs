//! Offline builder producing k-mer graph store files
//!
//! The builder slides a k-wide window over input sequences, counting how
//! often each k-mer is observed and recording which single-symbol extensions
//! occur on either side. Windows containing non-ACGT symbols are skipped, as
//! are edges to such windows. The resulting vertices are written grouped by
//! first symbol and sorted by packed key suffix, which is the layout the
//! reader's dispatch-table lookup expects.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use log::info;

use super::header::{GraphHeader, Partition, VertexRecord, MAX_KMER_LENGTH};
use crate::codec::{code_of, is_symbol, NUM_CODES};
use crate::error::{BuildError, Result};

#[derive(Debug, Clone, Copy, Default)]
struct VertexCounts {
    coverage: u32,
    parent_mask: u8,
    child_mask: u8,
}

/// Accumulates k-mers and their edges from raw sequences, then writes a
/// graph store file
pub struct GraphBuilder {
    kmer_length: usize,
    /// Keyed by the fully packed k-mer (2 bits per symbol, first symbol in
    /// the most significant position)
    vertices: HashMap<u64, VertexCounts>,
}

impl GraphBuilder {
    /// Creates a builder for k-mers of `kmer_length` symbols.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UnsupportedKmerLength`] when `kmer_length` is
    /// outside `1..=32`: a key suffix must pack into a single u64.
    pub fn new(kmer_length: usize) -> Result<Self> {
        if kmer_length == 0 || kmer_length as u64 > MAX_KMER_LENGTH {
            return Err(BuildError::UnsupportedKmerLength(kmer_length).into());
        }
        Ok(Self {
            kmer_length,
            vertices: HashMap::new(),
        })
    }

    /// Observes every k-mer window of `sequence`, bumping coverage and
    /// recording parent/child presence from the adjacent symbols.
    pub fn add_sequence(&mut self, sequence: &[u8]) {
        let k = self.kmer_length;
        if sequence.len() < k {
            return;
        }
        let valid: Vec<bool> = windows_valid(sequence, k);
        for start in 0..=sequence.len() - k {
            if !valid[start] {
                continue;
            }
            let key = pack_kmer(&sequence[start..start + k]);
            let counts = self.vertices.entry(key).or_default();
            counts.coverage = counts.coverage.saturating_add(1);
            if start > 0 && valid[start - 1] {
                counts.parent_mask |= 1 << code_of(sequence[start - 1]);
            }
            if start + k < sequence.len() && valid[start + 1] {
                counts.child_mask |= 1 << code_of(sequence[start + k]);
            }
        }
    }

    /// Returns the number of distinct k-mers observed so far.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Writes the graph store file at `path` and returns the number of
    /// vertex records written.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DestinationUnavailable`] when the output cannot
    /// be created or written.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<u64> {
        let path = path.as_ref();
        let stream = File::create(path)
            .map_err(|_| BuildError::DestinationUnavailable(path.to_path_buf()))?;
        self.write_records(&mut BufWriter::new(stream))
            .map_err(|_| BuildError::DestinationUnavailable(path.to_path_buf()))?;
        info!(
            "wrote {} vertices (k={}) to {}",
            self.vertices.len(),
            self.kmer_length,
            path.display()
        );
        Ok(self.vertices.len() as u64)
    }

    fn write_records<W: std::io::Write>(&self, writer: &mut W) -> Result<()> {
        // Ascending full-key order groups records by first symbol and sorts
        // each group by suffix, exactly the reader's search layout.
        let mut keys: Vec<u64> = self.vertices.keys().copied().collect();
        keys.sort_unstable();

        let suffix_bits = 2 * (self.kmer_length - 1);
        let mut partitions = [Partition::default(); NUM_CODES];
        for &key in &keys {
            partitions[(key >> suffix_bits) as usize].count += 1;
        }
        let mut first = 0;
        for partition in &mut partitions {
            partition.first = first;
            first += partition.count;
        }

        let header = GraphHeader::new(keys.len() as u64, self.kmer_length as u64, partitions);
        header.write_bytes(writer)?;
        let suffix_only = (1u64 << suffix_bits) - 1;
        for &key in &keys {
            let counts = &self.vertices[&key];
            let record = VertexRecord {
                suffix_code: key & suffix_only,
                coverage: counts.coverage,
                parent_mask: counts.parent_mask,
                child_mask: counts.child_mask,
                annotation_offset: 0,
            };
            record.write_bytes(writer)?;
        }
        Ok(())
    }
}

/// Packs a whole k-mer, 2 bits per symbol, first symbol most significant.
fn pack_kmer(kmer: &[u8]) -> u64 {
    kmer.iter()
        .fold(0u64, |acc, &symbol| (acc << 2) | u64::from(code_of(symbol)))
}

/// Marks which k-wide windows consist solely of valid symbols.
fn windows_valid(sequence: &[u8], k: usize) -> Vec<bool> {
    let mut valid = vec![false; sequence.len() - k + 1];
    let mut run = 0usize;
    for (i, &symbol) in sequence.iter().enumerate() {
        run = if is_symbol(symbol) { run + 1 } else { 0 };
        if i + 1 >= k {
            valid[i + 1 - k] = run >= k;
        }
    }
    valid
}
