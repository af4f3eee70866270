use std::io::{self, Read, Seek, SeekFrom};

use crate::dir_entry::DecodedDirEntry;
use crate::error::{Error, Result};
use crate::table::ClusterChain;
use crate::volume::Volume;

/// Seek origin, mirroring the abstract `SET`/`CUR`/`END` whence values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    Set,
    Cur,
    End,
}

/// An open FAT12 file.
///
/// The whole payload is materialized into an owned buffer at `open` time by walking
/// the cluster chain once; there is no further dependency on the mounted `Volume`
/// after that, so `File` carries no lifetime parameter.
pub struct File {
    payload: Vec<u8>,
    pos: u64,
}

impl File {
    /// Looks up `name` in `volume`'s root directory and materializes its contents.
    pub(crate) fn open(volume: &Volume, entry: &DecodedDirEntry) -> Result<Self> {
        let geometry = volume.geometry();
        let size = entry.len() as usize;
        let mut payload = Vec::with_capacity(size);
        let mut remaining = size;

        if remaining > 0 {
            let chain = ClusterChain::new(volume.table(), entry.first_cluster);
            let cluster_size = geometry.cluster_size() as usize;
            let data_area = volume.data_area();
            for cluster in chain {
                if remaining == 0 {
                    break;
                }
                let cluster = cluster?;
                let sector = geometry.sector_of_cluster(cluster) - geometry.data_lba;
                let start = sector as usize * geometry.bytes_per_sector as usize;
                let take = cluster_size.min(remaining);
                payload.extend_from_slice(&data_area[start..start + take]);
                remaining -= take;
            }
        }

        trace!("opened file {:?}: {} bytes materialized", entry.name(), payload.len());
        Ok(File { payload, pos: 0 })
    }

    /// Copies whole `elem_size`-byte elements from the current position into `dst`,
    /// stopping short of `count` at end of file. Returns the number of elements copied.
    pub fn read_elements(&mut self, dst: &mut [u8], elem_size: usize, count: usize) -> Result<usize> {
        if elem_size == 0 {
            return Err(Error::InvalidInput);
        }
        let max_by_dst = dst.len() / elem_size;
        let mut copied = 0;
        while copied < max_by_dst.min(count) {
            let start = self.pos as usize;
            if start + elem_size > self.payload.len() {
                break;
            }
            let dst_start = copied * elem_size;
            dst[dst_start..dst_start + elem_size].copy_from_slice(&self.payload[start..start + elem_size]);
            self.pos += elem_size as u64;
            copied += 1;
        }
        Ok(copied)
    }

    /// Moves the cursor per `whence`; the result must land in `[0, size]` or this
    /// fails with `Error::NoSuchAddress`.
    pub fn seek_to(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        let size = self.payload.len() as i64;
        let base = match whence {
            Whence::Set => 0,
            Whence::Cur => self.pos as i64,
            Whence::End => size,
        };
        let new_pos = base.checked_add(offset).ok_or(Error::NoSuchAddress)?;
        if new_pos < 0 || new_pos > size {
            return Err(Error::NoSuchAddress);
        }
        self.pos = new_pos as u64;
        Ok(self.pos)
    }

    /// Releases the materialized payload.
    pub fn close(self) {
        drop(self)
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

impl Read for File {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let start = self.pos as usize;
        if start >= self.payload.len() {
            return Ok(0);
        }
        let n = buf.len().min(self.payload.len() - start);
        buf[..n].copy_from_slice(&self.payload[start..start + n]);
        self.pos += n as u64;
        Ok(n)
    }
}

impl Seek for File {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let (whence, offset) = match pos {
            SeekFrom::Start(n) => (Whence::Set, n as i64),
            SeekFrom::Current(n) => (Whence::Cur, n),
            SeekFrom::End(n) => (Whence::End, n),
        };
        self.seek_to(offset, whence).map_err(io::Error::from)
    }
}
