use std::env;

use fat12::{BlockDevice, Volume};

fn format_file_size(size: u32) -> String {
    const KB: u32 = 1024;
    const MB: u32 = 1024 * KB;
    if size < KB {
        format!("{}B", size)
    } else if size < MB {
        format!("{}KB", size / KB)
    } else {
        format!("{}MB", size / MB)
    }
}

fn main() {
    let image_path = env::args().nth(1).expect("usage: ls <image>");
    let device = BlockDevice::open(&image_path).expect("open device");
    let volume = Volume::mount(device).expect("mount volume");

    for entry in volume.root_dir() {
        let created = entry.created();
        #[cfg(feature = "chrono")]
        let created = chrono::NaiveDateTime::from(created).format("%Y-%m-%d %H:%M:%S").to_string();
        #[cfg(not(feature = "chrono"))]
        let created = format!("{:04}-{:02}-{:02}", created.date.year, created.date.month, created.date.day);
        let kind = if entry.is_dir() { "<DIR>" } else { "     " };
        println!("{:>6}  {}  {}  {}", format_file_size(entry.len()), kind, created, entry.name());
    }
}
