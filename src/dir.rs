use crate::dir_entry::{DecodedDirEntry, FileAttributes};
use crate::error::{Error, Result};
use crate::file::File;
use crate::volume::Volume;

/// Result of one `dir_read` step: either an entry, or a dedicated exhausted state
/// distinct from an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirReadStatus<'a> {
    Entry(&'a DecodedDirEntry),
    Exhausted,
}

/// A handle over the root directory's snapshot taken at mount time.
///
/// Only the root path is recognized; this crate has no subdirectory support, matching
/// the on-disk root directory region's fixed-capacity, no-subdirectory structure.
pub struct Dir<'a> {
    entries: &'a [DecodedDirEntry],
    cursor: usize,
}

impl<'a> Dir<'a> {
    pub(crate) fn new(entries: &'a [DecodedDirEntry]) -> Self {
        Dir { entries, cursor: 0 }
    }

    /// Number of valid (non-deleted, non-label, non-LFN) entries in the snapshot.
    pub fn num_entries(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_volume_label()).count()
    }

    /// Reads the entry at the cursor and advances it, or reports exhaustion.
    ///
    /// The volume label, if present in the snapshot, is skipped here rather than at
    /// scan time: it is not a file to enumerate, but it must remain findable by name
    /// (see `find_entry`) so that opening it by name is rejected as a directory, not
    /// reported as not found.
    pub fn dir_read(&mut self) -> DirReadStatus<'a> {
        while let Some(entry) = self.entries.get(self.cursor) {
            self.cursor += 1;
            if entry.is_volume_label() {
                continue;
            }
            return DirReadStatus::Entry(entry);
        }
        DirReadStatus::Exhausted
    }

    /// Linear scan for the first entry whose reconstructed 8.3 name equals `name`,
    /// byte-exact (case-sensitive). Unlike iteration, this also matches the volume
    /// label, so `open_file` can reject it correctly instead of reporting not-found.
    pub fn find_entry(&self, name: &str) -> Option<&'a DecodedDirEntry> {
        self.entries.iter().find(|e| e.name() == name)
    }

    /// Opens `name` as a file, materializing its whole payload.
    ///
    /// Fails with `Error::NotFound` if no entry matches, or `Error::IsADirectory` if
    /// the match is a directory or the volume label.
    pub fn open_file(&self, volume: &Volume, name: &str) -> Result<File> {
        let entry = self.find_entry(name).ok_or(Error::NotFound)?;
        if entry.is_dir() || entry.is_volume_label() {
            return Err(Error::IsADirectory);
        }
        File::open(volume, entry)
    }

    /// Releases the snapshot view. `Dir` borrows from its `Volume`, so this is a no-op
    /// beyond dropping the handle; provided for parity with the explicit open/close
    /// pairing the rest of the consumer API uses.
    pub fn close(self) {
        drop(self)
    }
}

impl<'a> Iterator for Dir<'a> {
    type Item = &'a DecodedDirEntry;

    fn next(&mut self) -> Option<Self::Item> {
        match self.dir_read() {
            DirReadStatus::Entry(entry) => Some(entry),
            DirReadStatus::Exhausted => None,
        }
    }
}
