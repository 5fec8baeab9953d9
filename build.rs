use rustc_version::{version_meta, Channel};

fn main() {
    // benches need `#![feature(test)]`
    if let Channel::Nightly = version_meta().unwrap().channel {
        println!("cargo:rustc-cfg=rustc_nightly");
    }
}
