//! Restore an obscured image from a challenge directory.
//!
//! Usage:
//! ```sh
//! cargo run --example restore -- <dir> <rounds>
//! ```

use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <dir> <rounds>", args[0]);
        process::exit(1);
    }

    let dir = std::path::Path::new(&args[1]);
    let rounds: u32 = match args[2].parse() {
        Ok(n) => n,
        Err(_) => {
            eprintln!("Error: rounds must be a non-negative integer");
            process::exit(1);
        }
    };

    match bitmask_restore::restore(dir, rounds) {
        Ok(reports) => {
            for r in &reports {
                println!(
                    "round {}: {} (score {})",
                    r.round, r.identification.operation, r.identification.score
                );
            }
            println!("Done: restored image written to {}", dir.join("I_O.bmp").display());
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
