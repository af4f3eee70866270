//! Read-only accessor for FAT12-formatted block-device images.
//!
//! Typical use: `BlockDevice::open` a flat image file, `Volume::mount` it, then read
//! files and enumerate the root directory through `Dir`/`File`.

#[macro_use]
extern crate log;

mod boot_sector;
mod device;
mod dir;
mod dir_entry;
mod error;
mod file;
mod table;
mod time;
mod volume;

pub use device::{BlockDevice, SECTOR_SIZE};
pub use dir::{Dir, DirReadStatus};
pub use dir_entry::{DecodedDirEntry, FileAttributes};
pub use error::{Error, Result};
pub use file::{File, Whence};
pub use time::{Date, DateTime, Time};
pub use volume::Volume;
