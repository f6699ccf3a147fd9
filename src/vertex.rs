//! In-memory model of one de Bruijn graph vertex
//!
//! A [`Vertex`] carries the k-mer text, its observed coverage, and two 4-slot
//! presence bitmasks for incoming (parent) and outgoing (child) edges, one
//! slot per nucleotide code (see [`crate::codec`]). Neighbor k-mers are never
//! stored; they are derived on demand by shifting the vertex sequence one
//! symbol, so every edge endpoint is always exactly k symbols long.
//!
//! Instances are transient: the graph store constructs one per successful
//! lookup and the caller owns it.

use std::io::Write;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::codec::{code_of, symbol_of, NUM_CODES};
use crate::error::Result;

/// One k-mer vertex with its coverage and edge presence bitmasks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vertex {
    /// The k-mer text over the alphabet {A, C, G, T}
    sequence: String,
    /// How many times this k-mer was observed in the source data
    coverage: u32,
    /// Presence of a parent edge, indexed by nucleotide code
    parents: [bool; NUM_CODES],
    /// Presence of a child edge, indexed by nucleotide code
    children: [bool; NUM_CODES],
    /// Byte offset of this vertex's annotations in a sibling store
    annotation_offset: u64,
}

impl Vertex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the vertex sequence and resets both presence bitmasks.
    ///
    /// Previously recorded edges are discarded: they were relative to the old
    /// sequence, so callers must re-add edges after reassignment.
    pub fn set_sequence(&mut self, sequence: &str) {
        self.sequence.clear();
        self.sequence.push_str(sequence);
        self.parents = [false; NUM_CODES];
        self.children = [false; NUM_CODES];
    }

    #[must_use]
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn set_coverage(&mut self, coverage: u32) {
        self.coverage = coverage;
    }

    #[must_use]
    pub fn coverage(&self) -> u32 {
        self.coverage
    }

    pub fn set_annotation_offset(&mut self, offset: u64) {
        self.annotation_offset = offset;
    }

    #[must_use]
    pub fn annotation_offset(&self) -> u64 {
        self.annotation_offset
    }

    /// Marks an incoming edge from the k-mer ending in `symbol`; idempotent.
    pub fn add_parent(&mut self, symbol: u8) {
        self.parents[code_of(symbol) as usize] = true;
    }

    /// Marks an outgoing edge to the k-mer starting in `symbol`; idempotent.
    pub fn add_child(&mut self, symbol: u8) {
        self.children[code_of(symbol) as usize] = true;
    }

    #[must_use]
    pub fn has_parent(&self, symbol: u8) -> bool {
        self.parents[code_of(symbol) as usize]
    }

    #[must_use]
    pub fn has_child(&self, symbol: u8) -> bool {
        self.children[code_of(symbol) as usize]
    }

    /// Restores both presence bitmasks from their packed on-disk form.
    ///
    /// Bit `i` of each mask corresponds to the symbol with code `i`.
    pub fn set_edge_masks(&mut self, parent_mask: u8, child_mask: u8) {
        for code in 0..NUM_CODES {
            self.parents[code] = (parent_mask >> code) & 1 == 1;
            self.children[code] = (child_mask >> code) & 1 == 1;
        }
    }

    /// Packs both presence bitmasks into their on-disk form.
    #[must_use]
    pub fn edge_masks(&self) -> (u8, u8) {
        let mut parent_mask = 0u8;
        let mut child_mask = 0u8;
        for code in 0..NUM_CODES {
            if self.parents[code] {
                parent_mask |= 1 << code;
            }
            if self.children[code] {
                child_mask |= 1 << code;
            }
        }
        (parent_mask, child_mask)
    }

    /// Returns the parent k-mers in ascending code order.
    ///
    /// Each parent is the flagged symbol prepended to the sequence with its
    /// last symbol dropped, preserving the fixed k-mer width.
    #[must_use]
    pub fn parents(&self) -> Vec<String> {
        let base = &self.sequence[..self.sequence.len().saturating_sub(1)];
        self.flagged(&self.parents)
            .map(|symbol| format!("{}{base}", symbol as char))
            .collect()
    }

    /// Returns the child k-mers in ascending code order.
    ///
    /// Each child is the sequence with its first symbol dropped, the flagged
    /// symbol appended.
    #[must_use]
    pub fn children(&self) -> Vec<String> {
        let base = if self.sequence.is_empty() {
            ""
        } else {
            &self.sequence[1..]
        };
        self.flagged(&self.children)
            .map(|symbol| format!("{base}{}", symbol as char))
            .collect()
    }

    fn flagged<'a>(&self, presence: &'a [bool; NUM_CODES]) -> impl Iterator<Item = u8> + 'a {
        (0..NUM_CODES as u8)
            .filter(|&code| presence[code as usize])
            .map(symbol_of)
    }

    /// Serializes the vertex as JSON into `writer`.
    ///
    /// This is the wire shape consumed by the query layer and must stay
    /// exactly `{"value", "coverage", "parents", "children"}` with the edge
    /// lists as single-character strings in ascending code order.
    pub fn write_json<W: Write>(&self, writer: &mut W) -> Result<()> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Serializes the vertex as a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for Vertex {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let symbols =
            |presence: &[bool; NUM_CODES]| -> Vec<String> {
                (0..NUM_CODES as u8)
                    .filter(|&code| presence[code as usize])
                    .map(|code| (symbol_of(code) as char).to_string())
                    .collect()
            };
        let mut state = serializer.serialize_struct("Vertex", 4)?;
        state.serialize_field("value", &self.sequence)?;
        state.serialize_field("coverage", &self.coverage)?;
        state.serialize_field("parents", &symbols(&self.parents))?;
        state.serialize_field("children", &symbols(&self.children))?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vertex {
        let mut vertex = Vertex::new();
        vertex.set_sequence("ACGT");
        vertex.set_coverage(7);
        vertex
    }

    #[test]
    fn test_neighbors_shift_one_symbol() {
        let mut vertex = sample();
        vertex.add_parent(b'T');
        vertex.add_parent(b'C');
        vertex.add_child(b'G');

        // ascending code order, not insertion order
        assert_eq!(vertex.parents(), vec!["CACG", "TACG"]);
        assert_eq!(vertex.children(), vec!["CGTG"]);
    }

    #[test]
    fn test_set_sequence_discards_edges() {
        let mut vertex = sample();
        vertex.add_parent(b'A');
        vertex.add_child(b'T');
        vertex.set_sequence("TTTT");
        assert!(vertex.parents().is_empty());
        assert!(vertex.children().is_empty());
    }

    #[test]
    fn test_add_edges_idempotent() {
        let mut vertex = sample();
        vertex.add_child(b'A');
        vertex.add_child(b'A');
        assert_eq!(vertex.children(), vec!["CGTA"]);
    }

    #[test]
    fn test_edge_mask_round_trip() {
        let mut vertex = sample();
        vertex.add_parent(b'G');
        vertex.add_child(b'A');
        vertex.add_child(b'T');
        let (parent_mask, child_mask) = vertex.edge_masks();
        assert_eq!(parent_mask, 0b0100);
        assert_eq!(child_mask, 0b1001);

        let mut other = Vertex::new();
        other.set_sequence("ACGT");
        other.set_edge_masks(parent_mask, child_mask);
        assert!(other.has_parent(b'G'));
        assert!(other.has_child(b'A'));
        assert!(other.has_child(b'T'));
        assert!(!other.has_child(b'C'));
    }

    #[test]
    fn test_json_wire_shape() {
        let mut vertex = sample();
        vertex.add_parent(b'T');
        vertex.add_child(b'A');
        vertex.add_child(b'C');
        assert_eq!(
            vertex.to_json().unwrap(),
            r#"{"value":"ACGT","coverage":7,"parents":["T"],"children":["A","C"]}"#
        );
    }

    #[test]
    fn test_json_empty_edges() {
        let vertex = sample();
        assert_eq!(
            vertex.to_json().unwrap(),
            r#"{"value":"ACGT","coverage":7,"parents":[],"children":[]}"#
        );
    }
}
