use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{Error, Result};

/// Size in bytes of a single sector. The whole crate addresses storage in these units;
/// no other layer performs byte-level seek arithmetic against the backing file.
pub const SECTOR_SIZE: u64 = 512;

/// A random-access reader over a file, addressed in fixed 512-byte sectors.
///
/// `BlockDevice` is the crate's only I/O boundary: every other component reads
/// sectors through it and never touches `std::fs::File` directly.
pub struct BlockDevice {
    file: File,
    total_sectors: u64,
}

impl BlockDevice {
    /// Opens `path` for binary reading and probes its length to derive the sector count.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound
            } else {
                Error::DeviceReadFault(err)
            }
        })?;
        let len = file.metadata()?.len();
        let total_sectors = (len + SECTOR_SIZE - 1) / SECTOR_SIZE;
        trace!("opened block device: {} sectors ({} bytes)", total_sectors, len);
        Ok(BlockDevice { file, total_sectors })
    }

    /// Total number of 512-byte sectors backing this device.
    pub fn total_sectors(&self) -> u64 {
        self.total_sectors
    }

    /// Reads `count` sectors starting at `first_sector` into `out`.
    ///
    /// `out` must be at least `count * 512` bytes; only the first `count * 512` bytes
    /// of `out` are written. Returns the number of sectors read. A non-positive `count`
    /// or a read reaching past the end of the device fails with `Error::Range`; an
    /// absent or undersized `out` fails with `Error::InvalidInput`.
    pub fn read(&mut self, first_sector: u64, count: u64, out: &mut [u8]) -> Result<u64> {
        if count == 0 {
            return Err(Error::Range);
        }
        let needed = (count * SECTOR_SIZE) as usize;
        if out.len() < needed {
            return Err(Error::InvalidInput);
        }
        if first_sector + count > self.total_sectors {
            return Err(Error::Range);
        }
        self.file.seek(SeekFrom::Start(first_sector * SECTOR_SIZE))?;
        self.file.read_exact(&mut out[..needed])?;
        trace!("read {} sectors starting at {}", count, first_sector);
        Ok(count)
    }

    /// Reads `count` sectors starting at `first_sector`, returning a freshly allocated buffer.
    pub fn read_vec(&mut self, first_sector: u64, count: u64) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; (count * SECTOR_SIZE) as usize];
        self.read(first_sector, count, &mut buf)?;
        Ok(buf)
    }

    /// Releases the underlying file handle.
    ///
    /// Equivalent to dropping the device; provided for parity with the explicit
    /// open/close pairing the rest of the consumer API uses.
    pub fn close(self) {
        drop(self)
    }
}
