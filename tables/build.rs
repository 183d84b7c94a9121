use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use odd_sieve::{SieveBuilder, SieveConfig};

/// Bounds whose composite tables are compiled into the crate.
const BAKED: [u64; 3] = [101, 1_000, 65_536];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = std::env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("tables.rs");
    let mut file = BufWriter::new(File::create(dest_path).unwrap());

    let builder = SieveBuilder::new(SieveConfig::default());

    for bound in BAKED {
        let sieve = builder.build(bound).unwrap();
        let table = sieve.composites().unwrap();
        let bytes = table.as_bytes();

        writeln!(file, "/// Bound of [`COMPOSITES_{bound}`].").unwrap();
        writeln!(file, "pub const BOUND_{bound}: u64 = {bound};").unwrap();
        writeln!(file, "/// Entries tracked by [`COMPOSITES_{bound}`].").unwrap();
        writeln!(
            file,
            "pub const CAPACITY_{bound}: usize = {};",
            table.capacity()
        )
        .unwrap();
        writeln!(
            file,
            "/// Packed composite flags for odd numbers in `[3, {bound}]` in a \
             const-sized `[u8; {}]`, generated in `build.rs`.",
            bytes.len()
        )
        .unwrap();
        writeln!(
            file,
            "pub static COMPOSITES_{bound}: [u8; {}] = [",
            bytes.len()
        )
        .unwrap();
        for chunk in bytes.chunks(16) {
            let row: Vec<String> = chunk.iter().map(|b| format!("{b:#04x}")).collect();
            writeln!(file, "    {},", row.join(", ")).unwrap();
        }
        writeln!(file, "];").unwrap();
    }

    writeln!(
        file,
        "/// Every baked `(bound, composites)` pair, smallest bound first."
    )
    .unwrap();
    writeln!(
        file,
        "pub static BAKED: [(u64, &[u8]); {}] = [",
        BAKED.len()
    )
    .unwrap();
    for bound in BAKED {
        writeln!(file, "    (BOUND_{bound}, &COMPOSITES_{bound}),").unwrap();
    }
    writeln!(file, "];").unwrap();
}
