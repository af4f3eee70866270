use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::device::{BlockDevice, SECTOR_SIZE};
use crate::dir_entry::DIR_ENTRY_SIZE;
use crate::error::{Error, Result};

/// The decoded BIOS Parameter Block fields this crate needs downstream.
///
/// Fields are read little-endian at their format-defined offsets within sector 0;
/// fields irrelevant to a read-only FAT12 volume (OEM name, boot code, volume label, ...)
/// are not retained.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SuperSector {
    pub(crate) bytes_per_sector: u16,
    pub(crate) sectors_per_cluster: u8,
    pub(crate) reserved_sectors: u16,
    pub(crate) fat_count: u8,
    pub(crate) root_dir_capacity: u16,
    pub(crate) logical_sectors16: u16,
    pub(crate) sectors_per_fat: u16,
    pub(crate) logical_sectors32: u32,
}

impl SuperSector {
    /// Decodes sector 0 and validates it. Fails with `CorruptedFileSystem` when any
    /// of the BPB sanity checks do not hold.
    pub(crate) fn decode(sector: &[u8; SECTOR_SIZE as usize]) -> Result<Self> {
        let mut rdr = Cursor::new(&sector[..]);
        // bootjmp(3) + oem_name(8)
        rdr.set_position(11);
        let bytes_per_sector = rdr.read_u16::<LittleEndian>()?;
        let sectors_per_cluster = rdr.read_u8()?;
        let reserved_sectors = rdr.read_u16::<LittleEndian>()?;
        let fat_count = rdr.read_u8()?;
        let root_dir_capacity = rdr.read_u16::<LittleEndian>()?;
        let logical_sectors16 = rdr.read_u16::<LittleEndian>()?;
        let _media = rdr.read_u8()?;
        let sectors_per_fat = rdr.read_u16::<LittleEndian>()?;
        let _sectors_per_track = rdr.read_u16::<LittleEndian>()?;
        let _heads = rdr.read_u16::<LittleEndian>()?;
        let _hidden_sectors = rdr.read_u32::<LittleEndian>()?;
        let logical_sectors32 = rdr.read_u32::<LittleEndian>()?;

        let bpb = SuperSector {
            bytes_per_sector,
            sectors_per_cluster,
            reserved_sectors,
            fat_count,
            root_dir_capacity,
            logical_sectors16,
            sectors_per_fat,
            logical_sectors32,
        };
        bpb.validate()?;
        debug!("decoded super sector: {:?}", bpb);
        Ok(bpb)
    }

    fn validate(&self) -> Result<()> {
        let bytes_per_sector_ok =
            matches!(self.bytes_per_sector, 512 | 1024 | 2048 | 4096);
        let sectors_per_cluster_ok = (1..=128).contains(&self.sectors_per_cluster);
        let reserved_sectors_ok = self.reserved_sectors >= 1;
        let fat_count_ok = (1..=2).contains(&self.fat_count);
        // exactly one of the two logical-sector fields is zero (logical XOR, not bitwise)
        let logical_sectors_ok = (self.logical_sectors16 == 0) != (self.logical_sectors32 == 0);

        if !(bytes_per_sector_ok
            && sectors_per_cluster_ok
            && reserved_sectors_ok
            && fat_count_ok
            && logical_sectors_ok)
        {
            warn!("super sector failed validation: {:?}", self);
            return Err(Error::CorruptedFileSystem);
        }
        Ok(())
    }

    pub(crate) fn volume_sectors(&self) -> u32 {
        if self.logical_sectors16 != 0 {
            self.logical_sectors16 as u32
        } else {
            self.logical_sectors32
        }
    }
}

/// The volume layout derived from a validated `SuperSector`. Pure, total, no I/O.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Geometry {
    pub(crate) bytes_per_sector: u32,
    pub(crate) sectors_per_cluster: u32,
    pub(crate) fat1_lba: u32,
    pub(crate) fat2_lba: u32,
    pub(crate) sectors_per_fat: u32,
    pub(crate) rootdir_lba: u32,
    pub(crate) rootdir_sectors: u32,
    pub(crate) root_dir_capacity: u32,
    pub(crate) data_lba: u32,
    pub(crate) user_sectors: u32,
    pub(crate) total_clusters: u32,
}

impl Geometry {
    pub(crate) fn derive(bpb: &SuperSector) -> Self {
        let bytes_per_sector = bpb.bytes_per_sector as u32;
        let sectors_per_cluster = bpb.sectors_per_cluster as u32;
        let reserved_sectors = bpb.reserved_sectors as u32;
        let fat_count = bpb.fat_count as u32;
        let sectors_per_fat = bpb.sectors_per_fat as u32;

        let fat1_lba = reserved_sectors;
        let fat2_lba = fat1_lba + sectors_per_fat;
        let rootdir_lba = reserved_sectors + fat_count * sectors_per_fat;
        let root_dir_bytes = bpb.root_dir_capacity as u32 * DIR_ENTRY_SIZE as u32;
        let rootdir_sectors = (root_dir_bytes + bytes_per_sector - 1) / bytes_per_sector;
        let data_lba = rootdir_lba + rootdir_sectors;

        let volume_sectors = bpb.volume_sectors();
        let user_sectors = volume_sectors - reserved_sectors - fat_count * sectors_per_fat - rootdir_sectors;
        let total_clusters = user_sectors / sectors_per_cluster + 1;

        let geometry = Geometry {
            bytes_per_sector,
            sectors_per_cluster,
            fat1_lba,
            fat2_lba,
            sectors_per_fat,
            rootdir_lba,
            rootdir_sectors,
            root_dir_capacity: bpb.root_dir_capacity as u32,
            data_lba,
            user_sectors,
            total_clusters,
        };
        debug!("derived geometry: {:?}", geometry);
        geometry
    }

    pub(crate) fn cluster_size(&self) -> u32 {
        self.sectors_per_cluster * self.bytes_per_sector
    }

    /// LBA of the first sector of `cluster` (cluster numbers start at 2).
    pub(crate) fn sector_of_cluster(&self, cluster: u32) -> u32 {
        self.data_lba + (cluster - 2) * self.sectors_per_cluster
    }
}

pub(crate) fn read_boot_sector(device: &mut BlockDevice) -> Result<SuperSector> {
    let mut buf = [0u8; SECTOR_SIZE as usize];
    device.read(0, 1, &mut buf)?;
    SuperSector::decode(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bpb(bytes_per_sector: u16, sectors_per_cluster: u8, reserved_sectors: u16, fat_count: u8, logical16: u16, logical32: u32) -> SuperSector {
        SuperSector {
            bytes_per_sector,
            sectors_per_cluster,
            reserved_sectors,
            fat_count,
            root_dir_capacity: 16,
            logical_sectors16: logical16,
            sectors_per_fat: 1,
            logical_sectors32: logical32,
        }
    }

    #[test]
    fn validate_rejects_bad_cluster_size() {
        let sector = bpb(512, 0, 1, 2, 20, 0);
        assert!(sector.validate().is_err());
    }

    #[test]
    fn validate_rejects_both_logical_sectors_set() {
        let sector = bpb(512, 1, 1, 2, 20, 100);
        assert!(sector.validate().is_err());
    }

    #[test]
    fn validate_rejects_neither_logical_sectors_set() {
        let sector = bpb(512, 1, 1, 2, 0, 0);
        assert!(sector.validate().is_err());
    }

    #[test]
    fn validate_accepts_well_formed_bpb() {
        let sector = bpb(512, 1, 1, 2, 20, 0);
        assert!(sector.validate().is_ok());
    }

    #[test]
    fn geometry_matches_spec_scenario() {
        let sector = bpb(512, 1, 1, 2, 20, 0);
        let geometry = Geometry::derive(&sector);
        assert_eq!(geometry.fat1_lba, 1);
        assert_eq!(geometry.fat2_lba, 2);
        assert_eq!(geometry.rootdir_lba, 3);
        assert_eq!(geometry.rootdir_sectors, 1);
        assert_eq!(geometry.data_lba, 4);
        // 20 total sectors minus 1 reserved, 2 FAT, 1 root dir sector leaves 16
        // data sectors; total_clusters keeps the +1 cluster-numbering offset on top.
        assert_eq!(geometry.user_sectors, 16);
        assert_eq!(geometry.total_clusters, 17);
    }
}
