//! Two-bit nucleotide symbol codec
//!
//! Maps the four nucleotide symbols to compact 2-bit codes:
//!
//! - A = 00
//! - C = 01
//! - G = 10
//! - T = 11
//!
//! The codec is shared by the vertex model (edge bitmask slots) and the graph
//! store (packed lookup keys). Any other input byte maps to code 0 and any
//! out-of-range code maps to `A`. This permissive fallback is part of the
//! historical on-disk bit layout and is kept for compatibility; only the four
//! valid symbols are round-trip safe.

/// Number of distinct nucleotide codes
pub const NUM_CODES: usize = 4;

/// Returns the 2-bit code for a nucleotide symbol.
///
/// Unknown symbols fall back to code 0 (the code for `A`) and never fail.
#[must_use]
pub const fn code_of(symbol: u8) -> u8 {
    match symbol {
        b'C' => 1,
        b'G' => 2,
        b'T' => 3,
        _ => 0,
    }
}

/// Returns the nucleotide symbol for a 2-bit code.
///
/// Out-of-range codes fall back to `A` and never fail.
#[must_use]
pub const fn symbol_of(code: u8) -> u8 {
    match code {
        1 => b'C',
        2 => b'G',
        3 => b'T',
        _ => b'A',
    }
}

/// Returns true when `symbol` is one of the four valid nucleotide symbols.
#[must_use]
pub const fn is_symbol(symbol: u8) -> bool {
    matches!(symbol, b'A' | b'C' | b'G' | b'T')
}

/// Packs every symbol after the first into a single integer, 2 bits per
/// symbol, earliest symbol in the most significant position.
///
/// The resulting integers sort in the same order as the suffix strings they
/// encode, which is what the graph store's per-partition binary search relies
/// on. Supports k-mers of up to 32 symbols (31 packed).
#[must_use]
pub fn pack_suffix(kmer: &[u8]) -> u64 {
    debug_assert!(kmer.len() <= 32);
    kmer[1..]
        .iter()
        .fold(0u64, |acc, &symbol| (acc << 2) | u64::from(code_of(symbol)))
}
