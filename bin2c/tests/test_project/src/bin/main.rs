//! Links the blobs generated by `build.rs` and compares them with the files
//! they were generated from.

/// Checks one blob against the file it was generated from.
macro_rules! check_blob {
    ($file:literal, $data:ident, $len:ident) => {{
        const EXPECTED: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/blobs/", $file));

        #[allow(non_upper_case_globals)]
        unsafe extern "C" {
            static $len: usize;
            static $data: [u8; EXPECTED.len()];
        }

        // SAFETY: the generated C source defines both symbols with these types.
        let (len, data) = unsafe { ($len, &$data) };
        assert_eq!(len, EXPECTED.len(), "length of {}", $file);
        assert_eq!(&data[..], EXPECTED, "bytes of {}", $file);
        println!("{}: {len} bytes match", $file);
    }};
}

fn main() {
    check_blob!("empty.bin", empty_bin, empty_bin_len);
    check_blob!("short.bin", short_bin, short_bin_len);
    check_blob!("line.bin", line_bin, line_bin_len);
    check_blob!("long.bin", long_bin, long_bin_len);

    #[cfg(target_os = "linux")]
    {
        check_blob!("empty-asm.bin", empty_asm_bin, empty_asm_bin_len);
        check_blob!("short-asm.bin", short_asm_bin, short_asm_bin_len);
        check_blob!("line-asm.bin", line_asm_bin, line_asm_bin_len);
        check_blob!("long-asm.bin", long_asm_bin, long_asm_bin_len);
    }

    println!("All blobs match their source files.");
}
