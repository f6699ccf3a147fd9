//! Offline builder converting a FASTA text file into an indexed sequence store
//!
//! The builder runs once, single-threaded, against an immutable input file:
//!
//! 1. maps the input read-only and counts records in one pass;
//! 2. measures each record's name and sequence spans in a second pass,
//!    eliding newlines from every length;
//! 3. sorts record indices by descending sequence length so that similarly
//!    sized records land next to each other in the data section;
//! 4. writes the header, the directory in logical record order, then the
//!    record bytes in the sorted physical order.
//!
//! The reorder is purely a physical-layout optimization for scan locality;
//! logical indexing through the directory is unaffected. The input file must
//! not change between the two passes.

use std::cmp::Reverse;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::info;
use memchr::{memchr, memchr_iter};
use memmap2::Mmap;

use super::header::{DirectoryEntry, StoreHeader};
use crate::error::{BuildError, Result};

/// Location of one FASTA record inside the source file.
///
/// Lengths count payload bytes only; newlines embedded in the source are
/// elided, never counted or copied.
#[derive(Debug, Clone, Copy, Default)]
struct RecordSpan {
    name_start: usize,
    name_length: u64,
    sequence_start: usize,
    sequence_length: u64,
}

/// Builds an indexed sequence store at `output` from the FASTA file at
/// `input` and returns the number of records written.
///
/// # Errors
///
/// Returns [`BuildError::SourceUnavailable`] when the input cannot be opened
/// or mapped and [`BuildError::DestinationUnavailable`] when the output
/// cannot be created or written.
pub fn build<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<u64> {
    let input = input.as_ref();
    let output = output.as_ref();

    let file = File::open(input)
        .map_err(|_| BuildError::SourceUnavailable(input.to_path_buf()))?;
    // Safety: the input is opened read-only and is immutable for the
    // duration of the build (documented precondition).
    let mmap = unsafe { Mmap::map(&file) }
        .map_err(|_| BuildError::SourceUnavailable(input.to_path_buf()))?;
    let data = &mmap[..];
    info!("mapped {} bytes from {}", data.len(), input.display());

    let entries = count_records(data);
    info!("found {entries} entries in input file");

    let spans = measure_records(data, entries as usize);

    // Physical placement order: descending sequence length. Tie order is
    // unspecified, so an unstable sort is fine.
    let mut order: Vec<usize> = (0..spans.len()).collect();
    order.sort_unstable_by_key(|&i| Reverse(spans[i].sequence_length));

    let header = StoreHeader::new(entries);
    let mut directory = vec![DirectoryEntry::default(); spans.len()];
    let mut offset = header.data_offset();
    for &i in &order {
        directory[i] = DirectoryEntry {
            name_offset: offset,
            name_length: spans[i].name_length,
            sequence_offset: offset + spans[i].name_length,
            sequence_length: spans[i].sequence_length,
        };
        offset += spans[i].name_length + spans[i].sequence_length;
    }

    let stream = File::create(output)
        .map_err(|_| BuildError::DestinationUnavailable(output.to_path_buf()))?;
    write_store(
        &mut BufWriter::new(stream),
        &header,
        &directory,
        &order,
        &spans,
        data,
    )
    .map_err(|_| BuildError::DestinationUnavailable(output.to_path_buf()))?;

    Ok(entries)
}

/// Counts FASTA records: a record begins with `>` at byte 0 or immediately
/// after a newline.
fn count_records(data: &[u8]) -> u64 {
    memchr_iter(b'>', data)
        .filter(|&i| i == 0 || data[i - 1] == b'\n')
        .count() as u64
}

/// Measures the name and sequence span of every record.
fn measure_records(data: &[u8], entries: usize) -> Vec<RecordSpan> {
    let mut spans = vec![RecordSpan::default(); entries];
    let mut current = 0;
    for marker in memchr_iter(b'>', data) {
        if !(marker == 0 || data[marker - 1] == b'\n') {
            continue;
        }
        let span = &mut spans[current];
        current += 1;

        // Name: bytes after '>' up to (excluding) the first newline.
        let name_start = marker + 1;
        let (name_length, sequence_start) = match memchr(b'\n', &data[name_start..]) {
            Some(newline) => (newline, name_start + newline + 1),
            None => (data.len() - name_start, data.len()),
        };
        span.name_start = name_start;
        span.name_length = name_length as u64;
        span.sequence_start = sequence_start;

        // Sequence: non-newline bytes of every line up to the next record
        // marker or end of file.
        let mut position = sequence_start;
        while position < data.len() && data[position] != b'>' {
            let line_end = memchr(b'\n', &data[position..]).map_or(data.len(), |n| position + n);
            span.sequence_length += (line_end - position) as u64;
            position = line_end + 1;
        }
    }
    spans
}

fn write_store<W: Write>(
    writer: &mut W,
    header: &StoreHeader,
    directory: &[DirectoryEntry],
    order: &[usize],
    spans: &[RecordSpan],
    data: &[u8],
) -> Result<()> {
    header.write_bytes(writer)?;
    for entry in directory {
        entry.write_bytes(writer)?;
    }
    for &i in order {
        copy_stripped(writer, data, spans[i].name_start, spans[i].name_length)?;
        copy_stripped(
            writer,
            data,
            spans[i].sequence_start,
            spans[i].sequence_length,
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Copies `length` payload bytes starting at `start`, skipping newlines.
fn copy_stripped<W: Write>(writer: &mut W, data: &[u8], start: usize, length: u64) -> io::Result<()> {
    let mut remaining = length as usize;
    let mut position = start;
    while remaining > 0 {
        let line_end = memchr(b'\n', &data[position..]).map_or(data.len(), |n| position + n);
        let take = remaining.min(line_end - position);
        writer.write_all(&data[position..position + take])?;
        remaining -= take;
        position = line_end + 1;
    }
    Ok(())
}
