use std::env;
use std::io::prelude::*;
use std::str;

use fat12::{BlockDevice, Volume};

fn main() {
    let image_path = env::args().nth(1).expect("usage: cat <image> <name>");
    let name = env::args().nth(2).expect("usage: cat <image> <name>");

    let device = BlockDevice::open(&image_path).expect("open device");
    let volume = Volume::mount(device).expect("mount volume");
    let root = volume.root_dir();
    let mut file = root.open_file(&volume, &name).expect("open file");
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).expect("read file");
    print!("{}", str::from_utf8(&buf).unwrap_or("<non-utf8 content>"));
}
