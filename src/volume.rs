use crate::boot_sector::{read_boot_sector, Geometry};
use crate::device::BlockDevice;
use crate::dir::Dir;
use crate::dir_entry::{read_root_slot, DecodedDirEntry, RootSlot, DIR_ENTRY_SIZE};
use crate::error::{Error, Result};
use crate::table::FatTable;

/// The only directory path this crate recognizes: the fixed-size root directory
/// region has no subdirectories to descend into.
const ROOT_PATH: &str = "\\";

/// A mounted FAT12 volume: validated geometry, both decoded FAT copies, the root
/// directory snapshot, and the whole data area, all read once at `mount` time.
///
/// The crate never re-reads the boot sector, FAT, or root directory after mounting.
/// Holding the data area in memory trades RAM for simplicity over streaming cluster
/// reads from the block device on every file open.
pub struct Volume {
    geometry: Geometry,
    table: FatTable,
    root_entries: Vec<DecodedDirEntry>,
    data_area: Vec<u8>,
}

impl Volume {
    /// Reads the boot sector, validates it, loads and cross-checks both FAT copies,
    /// scans the root directory, and loads the data area. Fails with
    /// `Error::CorruptedFileSystem` if any of those steps find the volume ill-formed;
    /// the partially opened `device` is dropped on any error path.
    pub fn mount(mut device: BlockDevice) -> Result<Self> {
        let bpb = read_boot_sector(&mut device)?;
        let geometry = Geometry::derive(&bpb);
        let table = FatTable::load(
            &mut device,
            geometry.fat1_lba,
            geometry.fat2_lba,
            geometry.sectors_per_fat,
            geometry.total_clusters,
        )?;
        let root_entries = read_root_directory(&mut device, &geometry)?;
        let data_area = device.read_vec(geometry.data_lba as u64, geometry.user_sectors as u64)?;
        debug!("mounted volume with {} root entries, {} byte data area", root_entries.len(), data_area.len());
        Ok(Volume { geometry, table, root_entries, data_area })
    }

    /// Opens the directory at `path`. Only `"\\"` (the root) is recognized; any other
    /// path fails with `Error::NotFound`, since this crate has no subdirectory support.
    pub fn dir_open(&self, path: &str) -> Result<Dir<'_>> {
        if path != ROOT_PATH {
            return Err(Error::NotFound);
        }
        Ok(Dir::new(&self.root_entries))
    }

    /// Returns a handle over the already-scanned root directory.
    ///
    /// Cheap: `Dir` borrows the snapshot taken at mount time rather than re-reading it.
    /// Equivalent to `dir_open("\\")`, which can never fail.
    pub fn root_dir(&self) -> Dir<'_> {
        self.dir_open(ROOT_PATH).expect("root path is always valid")
    }

    pub(crate) fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub(crate) fn table(&self) -> &FatTable {
        &self.table
    }

    pub(crate) fn data_area(&self) -> &[u8] {
        &self.data_area
    }

    /// Releases the FAT table, root directory snapshot, and data area.
    pub fn unmount(self) {
        drop(self)
    }
}

/// Scans the root directory region into a flat snapshot.
///
/// The volume-label entry, if present, is kept in the snapshot alongside ordinary
/// file/directory entries: `Dir`'s lookup path needs to find it by name in order to
/// reject `open_file` against it with `Error::IsADirectory`. `Dir`'s *iteration* path
/// (`dir_read`/`num_entries`/`Iterator`) is responsible for excluding it, the way
/// `examples/original_source/file_reader.c`'s `search_for_file` scans the raw,
/// unfiltered root array while its listing path filters separately.
fn read_root_directory(device: &mut BlockDevice, geometry: &Geometry) -> Result<Vec<DecodedDirEntry>> {
    let raw = device.read_vec(geometry.rootdir_lba as u64, geometry.rootdir_sectors as u64)?;
    let mut entries = Vec::new();
    for chunk in raw.chunks_exact(DIR_ENTRY_SIZE) {
        match read_root_slot(chunk) {
            RootSlot::EndOfDirectory => break,
            RootSlot::Deleted | RootSlot::LfnFragment => continue,
            RootSlot::Entry(entry) => entries.push(entry),
        }
    }
    Ok(entries)
}
