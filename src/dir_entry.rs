use byteorder::{ByteOrder, LittleEndian};
use bitflags::bitflags;

use crate::time::DateTime;

/// Size in bytes of a single 8.3 directory entry.
pub(crate) const DIR_ENTRY_SIZE: usize = 32;

const DIR_ENTRY_FREE_MARKER: u8 = 0x00;
const DIR_ENTRY_DELETED_FLAG: u8 = 0xE5;
const DIR_ENTRY_REALLY_E5_FLAG: u8 = 0x05;

bitflags! {
    /// FAT file attribute byte, at offset 11 of a directory entry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FileAttributes: u8 {
        const READ_ONLY = 0x01;
        const HIDDEN    = 0x02;
        const SYSTEM    = 0x04;
        const VOLUME_ID = 0x08;
        const DIRECTORY = 0x10;
        const ARCHIVE   = 0x20;
        /// The four low bits set together mark a long-file-name fragment, never a real file.
        const LFN = Self::READ_ONLY.bits() | Self::HIDDEN.bits() | Self::SYSTEM.bits() | Self::VOLUME_ID.bits();
    }
}

/// Reconstructs an 8.3 short name (`NAME.EXT`, or `NAME` with no extension) from the
/// raw 8+3 on-disk bytes.
///
/// The presence of an extension is decided by inspecting the *first* extension byte
/// (`raw[8]`), not `raw[9]` as a padded name would suggest at a glance; a name with a
/// one-character extension (e.g. `"A       C  "`) would otherwise be misread as having
/// none.
pub(crate) fn short_name_to_string(raw: &[u8; 11]) -> String {
    let name_len = raw[0..8].iter().rposition(|&b| b != b' ').map(|p| p + 1).unwrap_or(0);
    let mut name: Vec<u8> = raw[..name_len].to_vec();
    if name.first() == Some(&DIR_ENTRY_REALLY_E5_FLAG) {
        name[0] = DIR_ENTRY_DELETED_FLAG;
    }
    if raw[8] != b' ' {
        let ext_len = raw[8..11].iter().rposition(|&b| b != b' ').map(|p| p + 1).unwrap_or(0);
        name.push(b'.');
        name.extend_from_slice(&raw[8..8 + ext_len]);
    }
    name.iter().map(|&b| b as char).collect()
}

/// The disposition of a 32-byte slot encountered while scanning the root directory.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum RootSlot {
    /// `0x00` in the name's first byte: the root directory has no further entries past this point.
    EndOfDirectory,
    /// `0xE5` in the name's first byte: a deleted file, skipped.
    Deleted,
    /// Attribute nibble `0x0F`: a long-file-name fragment, skipped (no LFN support).
    LfnFragment,
    /// An ordinary 8.3 file, directory, or volume-label entry.
    ///
    /// The volume label is decoded here rather than being its own variant: it is
    /// excluded from directory *iteration* (see `Dir`'s filtering) but must still be
    /// reachable by name lookup, since `search`/`open_file` needs to find it in order
    /// to reject it with `Error::IsADirectory` rather than `Error::NotFound`.
    Entry(DecodedDirEntry),
}

/// A directory entry decoded from its raw 32-byte on-disk form, holding everything
/// this crate's consumer-facing `Dir`/`File` types need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDirEntry {
    pub(crate) name: String,
    pub(crate) attrs: FileAttributes,
    pub(crate) first_cluster: u32,
    pub(crate) size: u32,
    pub(crate) created: DosDateTime,
}

/// Raw DOS creation date/time fields, kept undecoded until a caller asks for them
/// (decoding touches the seconds-resolution fix and is otherwise unused on the hot path).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DosDateTime {
    pub(crate) date: u16,
    pub(crate) time: u16,
}

impl DosDateTime {
    pub fn decode(&self) -> DateTime {
        DateTime::decode(self.date, self.time)
    }
}

/// Classifies and, for ordinary entries, decodes one 32-byte root directory slot.
pub(crate) fn read_root_slot(raw: &[u8]) -> RootSlot {
    debug_assert_eq!(raw.len(), DIR_ENTRY_SIZE);

    if raw[0] == DIR_ENTRY_FREE_MARKER {
        return RootSlot::EndOfDirectory;
    }
    if raw[0] == DIR_ENTRY_DELETED_FLAG {
        return RootSlot::Deleted;
    }
    let attrs = FileAttributes::from_bits_truncate(raw[11]);
    if attrs & FileAttributes::LFN == FileAttributes::LFN {
        return RootSlot::LfnFragment;
    }

    let mut short_name_raw = [0u8; 11];
    short_name_raw.copy_from_slice(&raw[0..11]);
    let name = short_name_to_string(&short_name_raw);

    let creation_time = LittleEndian::read_u16(&raw[14..16]);
    let creation_date = LittleEndian::read_u16(&raw[16..18]);
    let first_cluster_hi = LittleEndian::read_u16(&raw[20..22]) as u32;
    let first_cluster_lo = LittleEndian::read_u16(&raw[26..28]) as u32;
    let first_cluster = (first_cluster_hi << 16) | first_cluster_lo;
    let size = LittleEndian::read_u32(&raw[28..32]);

    RootSlot::Entry(DecodedDirEntry {
        name,
        attrs,
        first_cluster,
        size,
        created: DosDateTime { date: creation_date, time: creation_time },
    })
}

impl DecodedDirEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> u32 {
        self.size
    }

    pub fn is_dir(&self) -> bool {
        self.attrs.contains(FileAttributes::DIRECTORY)
    }

    pub fn is_read_only(&self) -> bool {
        self.attrs.contains(FileAttributes::READ_ONLY)
    }

    pub fn is_hidden(&self) -> bool {
        self.attrs.contains(FileAttributes::HIDDEN)
    }

    pub fn is_system(&self) -> bool {
        self.attrs.contains(FileAttributes::SYSTEM)
    }

    pub fn is_archive(&self) -> bool {
        self.attrs.contains(FileAttributes::ARCHIVE)
    }

    /// Whether this slot is the volume label rather than a file or directory.
    /// Excluded from `Dir` iteration; still reachable through `Dir::find_entry`.
    pub fn is_volume_label(&self) -> bool {
        self.attrs.contains(FileAttributes::VOLUME_ID)
    }

    pub fn created(&self) -> DateTime {
        self.created.decode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_plain() {
        assert_eq!(short_name_to_string(b"A       \x20\x20\x20"), "A");
    }

    #[test]
    fn short_name_with_extension() {
        assert_eq!(short_name_to_string(b"README  TXT"), "README.TXT");
    }

    #[test]
    fn short_name_one_char_extension() {
        // if the check used raw[9] instead of raw[8] this would be read as having no extension
        assert_eq!(short_name_to_string(b"A       C  "), "A.C");
    }

    #[test]
    fn short_name_restores_e5_first_byte() {
        let mut raw = *b"AAAAAAAATXT";
        raw[0] = DIR_ENTRY_REALLY_E5_FLAG;
        assert_eq!(short_name_to_string(&raw), "\u{e5}AAAAAAA.TXT");
    }

    #[test]
    fn read_root_slot_classifies_terminator() {
        let raw = [0u8; DIR_ENTRY_SIZE];
        assert_eq!(read_root_slot(&raw), RootSlot::EndOfDirectory);
    }

    #[test]
    fn read_root_slot_classifies_deleted() {
        let mut raw = [b' '; DIR_ENTRY_SIZE];
        raw[0] = DIR_ENTRY_DELETED_FLAG;
        assert_eq!(read_root_slot(&raw), RootSlot::Deleted);
    }

    #[test]
    fn read_root_slot_classifies_lfn_fragment() {
        let mut raw = [b' '; DIR_ENTRY_SIZE];
        raw[0] = b'X';
        raw[11] = FileAttributes::LFN.bits();
        assert_eq!(read_root_slot(&raw), RootSlot::LfnFragment);
    }

    #[test]
    fn read_root_slot_decodes_volume_label_as_a_findable_entry() {
        let mut raw = [b' '; DIR_ENTRY_SIZE];
        raw[0] = b'X';
        raw[11] = FileAttributes::VOLUME_ID.bits();
        match read_root_slot(&raw) {
            RootSlot::Entry(entry) => assert!(entry.is_volume_label()),
            other => panic!("expected Entry, got {:?}", other),
        }
    }

    #[test]
    fn read_root_slot_decodes_ordinary_entry() {
        let mut raw = [b' '; DIR_ENTRY_SIZE];
        raw[0..11].copy_from_slice(b"A       TXT");
        raw[11] = FileAttributes::ARCHIVE.bits();
        LittleEndian::write_u16(&mut raw[20..22], 0);
        LittleEndian::write_u16(&mut raw[26..28], 5);
        LittleEndian::write_u32(&mut raw[28..32], 42);
        match read_root_slot(&raw) {
            RootSlot::Entry(entry) => {
                assert_eq!(entry.name(), "A.TXT");
                assert_eq!(entry.first_cluster, 5);
                assert_eq!(entry.len(), 42);
                assert!(entry.is_archive());
                assert!(!entry.is_dir());
            }
            other => panic!("expected Entry, got {:?}", other),
        }
    }
}
