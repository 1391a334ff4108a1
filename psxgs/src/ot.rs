//! Ordering table: a singly linked display list laid out in a flat word buffer.
//!
//! Each entry is a header word followed by up to 255 payload words. The
//! header's top byte is the payload count, its low 24 bits the link to the
//! next entry. While the table is being built, links are word offsets into
//! the buffer. They are rewritten into bus addresses only when the table is
//! handed to the DMA engine.
//!
//! The buffer is a fixed arena sized by the caller. Every append checks that
//! the whole entry fits before writing anything, and fails with
//! `GsError::TableFull` otherwise.

use crate::{
    error::{GsError, Result},
    hw::LIST_END
};

/// Largest payload a single header can describe.
pub const MAX_ENTRY_WORDS: usize = 255;

/// Build a header word.
#[inline]
pub const fn header(count: usize, link: u32) -> u32 {
    ((count as u32) << 24) | (link & 0x00FF_FFFF)
}

/// Words taken by `payload` words of data, headers included.
pub const fn entry_words(payload: usize) -> usize {
    let headers = if payload == 0 { 1 } else { payload.div_ceil(MAX_ENTRY_WORDS) };
    payload + headers
}

pub struct OrderingTable<'a> {
    words: &'a mut [u32],
    pos: usize,
}

impl<'a> OrderingTable<'a> {
    /// Install `words` as the list buffer, with the cursor at the start.
    pub fn new(words: &'a mut [u32]) -> Self {
        Self::with_position(words, 0)
    }

    /// Install `words` with the cursor at `pos`.
    ///
    /// Words before `pos` must already hold entries built by an ordering table.
    pub fn with_position(words: &'a mut [u32], pos: usize) -> Self {
        assert!(pos <= words.len(), "list position {} beyond buffer of {} words", pos, words.len());
        Self { words, pos }
    }

    /// Current write cursor, in words.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn capacity(&self) -> usize {
        self.words.len()
    }

    pub fn remaining(&self) -> usize {
        self.words.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }

    /// The entries written so far.
    pub fn as_words(&self) -> &[u32] {
        &self.words[..self.pos]
    }

    /// The whole buffer, including anything past the cursor.
    pub fn buffer(&self) -> &[u32] {
        self.words
    }

    /// Reset the cursor to the start of the buffer.
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// Append one entry holding `payload`. Returns the entry's origin.
    ///
    /// Payloads longer than `MAX_ENTRY_WORDS` are split over consecutive entries.
    pub fn append(&mut self, payload: &[u32]) -> Result<usize> {
        if payload.len() > MAX_ENTRY_WORDS {
            let mut entry = self.running(payload.len())?;
            for &word in payload {
                entry.push(word);
            }
            return Ok(entry.origin());
        }
        self.reserve(payload.len() + 1)?;
        let origin = self.open();
        let end = self.pos + payload.len();
        self.words[self.pos..end].copy_from_slice(payload);
        self.pos = end;
        self.close(origin);
        Ok(origin)
    }

    /// Start an entry whose payload is written word by word.
    ///
    /// `payload_len` words (plus any extra headers needed to split them) are
    /// reserved up front, so pushes cannot run out of room.
    pub fn running(&mut self, payload_len: usize) -> Result<RunningEntry<'_, 'a>> {
        let needed = entry_words(payload_len);
        self.reserve(needed)?;
        let end = self.pos + needed;
        let origin = self.open();
        Ok(RunningEntry {
            first: origin,
            origin,
            end,
            table: self,
        })
    }

    /// Walk the entries written so far.
    pub fn entries(&self) -> Entries<'_> {
        Entries {
            words: self.as_words(),
            pos: 0,
        }
    }

    fn reserve(&self, needed: usize) -> Result<()> {
        if self.pos + needed > self.words.len() {
            Err(GsError::TableFull {
                offset: self.pos,
                needed,
                capacity: self.words.len(),
            })
        } else {
            Ok(())
        }
    }

    /// Write a placeholder header and return its offset.
    fn open(&mut self) -> usize {
        let origin = self.pos;
        self.words[origin] = 0;
        self.pos += 1;
        origin
    }

    /// Patch the header at `origin` now that the next entry starts at the cursor.
    fn close(&mut self, origin: usize) {
        let count = self.pos - origin - 1;
        debug_assert!(count <= MAX_ENTRY_WORDS);
        self.words[origin] = header(count, self.pos as u32);
    }

    /// Write the end-of-list marker at the cursor without advancing it.
    pub(crate) fn terminate(&mut self) -> Result<()> {
        self.reserve(1)?;
        self.words[self.pos] = LIST_END;
        Ok(())
    }

    /// Rewrite every link from a word offset into the bus address the DMA
    /// controller will follow, given the buffer starts at `base`.
    pub(crate) fn link(&mut self, base: u32) {
        let mut pos = 0;
        while pos < self.pos {
            let count = (self.words[pos] >> 24) as usize;
            let next = pos + 1 + count;
            let addr = base.wrapping_add((next as u32) * 4);
            self.words[pos] = header(count, addr);
            pos = next;
        }
    }
}

/// An entry under construction whose length is not known up front.
///
/// When the payload reaches `MAX_ENTRY_WORDS`, the header is closed in place
/// and a fresh header continues the stream. Dropping the entry closes it.
pub struct RunningEntry<'t, 'a> {
    table: &'t mut OrderingTable<'a>,
    first: usize,
    origin: usize,
    end: usize,
}

impl RunningEntry<'_, '_> {
    pub fn push(&mut self, word: u32) {
        if self.table.pos - self.origin - 1 == MAX_ENTRY_WORDS {
            self.table.close(self.origin);
            self.origin = self.table.open();
        }
        debug_assert!(self.table.pos < self.end, "running entry overran its reservation");
        self.table.words[self.table.pos] = word;
        self.table.pos += 1;
    }

    /// Offset of the first header of this entry.
    pub fn origin(&self) -> usize {
        self.first
    }

    /// Payload words written to the current header so far.
    pub fn len(&self) -> usize {
        self.table.pos - self.origin - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for RunningEntry<'_, '_> {
    fn drop(&mut self) {
        self.table.close(self.origin);
    }
}

/// One decoded entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry<'w> {
    pub origin: usize,
    pub link: u32,
    pub payload: &'w [u32],
}

pub struct Entries<'w> {
    words: &'w [u32],
    pos: usize,
}

impl<'w> Iterator for Entries<'w> {
    type Item = Entry<'w>;

    fn next(&mut self) -> Option<Self::Item> {
        let header = *self.words.get(self.pos)?;
        let count = (header >> 24) as usize;
        let start = self.pos + 1;
        let end = (start + count).min(self.words.len());
        let entry = Entry {
            origin: self.pos,
            link: header & 0x00FF_FFFF,
            payload: &self.words[start..end],
        };
        self.pos = end;
        Some(entry)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn append_patches_header() {
        let mut buf = [0u32; 16];
        let mut ot = OrderingTable::new(&mut buf);
        let a = ot.append(&[1, 2, 3]).unwrap();
        let b = ot.append(&[4]).unwrap();
        assert_eq!((a, b), (0, 4));
        assert_eq!(ot.position(), 6);
        assert_eq!(ot.as_words(), &[header(3, 4), 1, 2, 3, header(1, 6), 4]);
    }

    #[test]
    fn full_table_is_untouched() {
        let mut buf = [0xAAAA_AAAAu32; 4];
        let mut ot = OrderingTable::new(&mut buf);
        ot.append(&[1]).unwrap();
        let err = ot.append(&[2, 3]).unwrap_err();
        assert_eq!(err, GsError::TableFull { offset: 2, needed: 3, capacity: 4 });
        assert_eq!(ot.position(), 2);
        assert_eq!(ot.buffer()[2..], [0xAAAA_AAAA, 0xAAAA_AAAA]);
    }

    #[test]
    fn running_entry_splits_long_payloads() {
        let mut buf = vec![0u32; 600];
        let mut ot = OrderingTable::new(&mut buf);
        {
            let mut entry = ot.running(300).unwrap();
            for n in 0..300 {
                entry.push(n);
            }
        }
        assert_eq!(ot.position(), 302);
        let entries = ot.entries().collect::<Vec<_>>();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].payload.len(), 255);
        assert_eq!(entries[0].link, 256);
        assert_eq!(entries[1].origin, 256);
        assert_eq!(entries[1].payload.len(), 45);
        assert_eq!(entries[1].payload[44], 299);
        assert_eq!(entries[1].link, 302);
    }

    #[test]
    fn running_entry_of_exactly_one_block() {
        let mut buf = vec![0u32; 300];
        let mut ot = OrderingTable::new(&mut buf);
        {
            let mut entry = ot.running(255).unwrap();
            for n in 0..255 {
                entry.push(n);
            }
            assert_eq!(entry.len(), 255);
        }
        assert_eq!(ot.entries().count(), 1);
        assert_eq!(ot.as_words()[0], header(255, 256));
    }

    #[test]
    fn link_rewrites_offsets_to_addresses() {
        let mut buf = [0u32; 8];
        let mut ot = OrderingTable::new(&mut buf);
        ot.append(&[7, 7]).unwrap();
        ot.append(&[9]).unwrap();
        ot.terminate().unwrap();
        ot.link(0x8010_0000);
        assert_eq!(ot.as_words()[0], header(2, 0x10_000C));
        assert_eq!(ot.as_words()[3], header(1, 0x10_0014));
        assert_eq!(ot.buffer()[5], LIST_END);
    }

    #[test]
    fn resume_at_position() {
        let mut buf = [0u32; 8];
        {
            let mut ot = OrderingTable::new(&mut buf);
            ot.append(&[1]).unwrap();
        }
        let mut ot = OrderingTable::with_position(&mut buf, 2);
        ot.append(&[2]).unwrap();
        assert_eq!(ot.as_words(), &[header(1, 2), 1, header(1, 4), 2]);
    }
}
