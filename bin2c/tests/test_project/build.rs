use std::{env, fs, path::PathBuf};

use bin2c::{Config, OutputMode};

/// Blob names and sizes: empty, shorter than a line, exactly a line, many lines.
const BLOBS: [(&str, usize); 4] = [("empty", 0), ("short", 5), ("line", 12), ("long", 1000)];

/// Bytes without a short repeating period.
fn scrambled(len: usize) -> Vec<u8> {
    let mut state: u32 = 0x1234_5678;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        })
        .collect()
}

fn main() {
    let out_dir = PathBuf::from(env::var_os("OUT_DIR").expect("OUT_DIR not set"));
    let blobs = out_dir.join("blobs");
    fs::create_dir_all(&blobs).expect("Failed to create blob directory");

    // `.section .rodata` is ELF syntax.
    let with_asm = env::var("CARGO_CFG_TARGET_OS").is_ok_and(|os| os == "linux");

    let mut build = cc::Build::new();
    for (name, len) in BLOBS {
        let data = scrambled(len);

        let source = blobs.join(format!("{name}.bin"));
        fs::write(&source, &data).expect("Failed to write blob");
        build.file(Config::new(&source).strict(true).build().expect("Failed to embed blob"));

        if with_asm {
            let source = blobs.join(format!("{name}-asm.bin"));
            fs::write(&source, &data).expect("Failed to write blob");
            build.file(
                Config::new(&source)
                    .mode(OutputMode::Asm)
                    .strict(true)
                    .build()
                    .expect("Failed to embed blob"),
            );
        }
    }
    build.warnings(false).compile("blobs");
}
