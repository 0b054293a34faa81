//! The assembled memory image and its output encodings.
//!
//! [`Image`] is a sparse map from absolute 18-bit locations to assembled
//! words, each cell remembering the source line it came from. Three
//! encoders consume it:
//!
//! - [`write_dump`]: the `a7out` text format, one `location: word` pair
//!   per populated cell followed by the originating source line.
//! - [`write_ptr`]: a paper-tape stream of three 6-bit frames per word,
//!   every frame with the high bit set, covering the range from the
//!   relocation base to the highest populated cell (gaps read as zero).
//! - [`write_rim`]: the ptr stream followed by the RIM loader's
//!   halt-and-start word, a `jmp` to the base whose last frame carries the
//!   start bit.
//!
//! The tape encoders emit raw bytes and must be given a binary-safe sink.

use byteorder::WriteBytesExt;
use pdp7::constants::{FRAME_MARK, FRAME_START, WORD_MASK};
use std::collections::BTreeMap;
use std::io::prelude::*;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cell {
    pub word: u32,
    pub source: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Image {
    cells: BTreeMap<u32, Cell>,
}

impl Image {
    pub fn new() -> Image {
        Image::default()
    }

    pub fn set(&mut self, location: u32, word: u32, source: &str) {
        self.cells.insert(
            location & WORD_MASK,
            Cell {
                word: word & WORD_MASK,
                source: source.to_owned(),
            },
        );
    }

    pub fn get(&self, location: u32) -> Option<u32> {
        self.cells.get(&location).map(|cell| cell.word)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Highest populated location, if any.
    pub fn limit(&self) -> Option<u32> {
        self.cells.keys().next_back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &Cell)> {
        self.cells.iter().map(|(&location, cell)| (location, cell))
    }
}

pub fn write_dump<W: Write>(writer: &mut W, image: &Image) -> std::io::Result<()> {
    for (location, cell) in image.iter() {
        writeln!(writer, "{:06o}: {:06o}\t{}", location, cell.word, cell.source)?;
    }
    Ok(())
}

fn write_frames<W: Write>(writer: &mut W, word: u32, last_extra: u8) -> std::io::Result<()> {
    writer.write_u8((word >> 12) as u8 & 0o77 | FRAME_MARK)?;
    writer.write_u8((word >> 6) as u8 & 0o77 | FRAME_MARK)?;
    writer.write_u8(word as u8 & 0o77 | FRAME_MARK | last_extra)
}

pub fn write_ptr<W: Write>(writer: &mut W, image: &Image, base: u32) -> std::io::Result<()> {
    let limit = match image.limit() {
        Some(limit) => limit,
        None => return Ok(()),
    };
    for location in base..=limit {
        write_frames(writer, image.get(location).unwrap_or(0), 0)?;
    }
    Ok(())
}

pub fn write_rim<W: Write>(writer: &mut W, image: &Image, base: u32) -> std::io::Result<()> {
    write_ptr(writer, image, base)?;
    // the loader halts on this word and starts execution at the base
    write_frames(writer, 0o600000 | base, FRAME_START)
}

pub trait WriteImageExt: Write + Sized {
    fn write_dump(&mut self, image: &Image) -> std::io::Result<()> {
        write_dump(self, image)
    }

    fn write_ptr(&mut self, image: &Image, base: u32) -> std::io::Result<()> {
        write_ptr(self, image, base)
    }

    fn write_rim(&mut self, image: &Image, base: u32) -> std::io::Result<()> {
        write_rim(self, image, base)
    }
}

impl<W: Write + Sized> WriteImageExt for W {}
