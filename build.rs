//! Places `memory.x` on the linker search path and adds the RP2040 link
//! scripts to the firmware example. Host builds only get the search path.

use std::env;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

fn main() {
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());
    File::create(out.join("memory.x"))
        .unwrap()
        .write_all(include_bytes!("memory.x"))
        .unwrap();
    println!("cargo:rustc-link-search={}", out.display());

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=memory.x");

    let bare_metal = env::var("CARGO_CFG_TARGET_OS").map_or(false, |os| os == "none");
    if bare_metal {
        println!("cargo:rustc-link-arg-examples=--nmagic");
        println!("cargo:rustc-link-arg-examples=-Tlink.x");
        println!("cargo:rustc-link-arg-examples=-Tlink-rp.x");
        println!("cargo:rustc-link-arg-examples=-Tdefmt.x");
    }
}
