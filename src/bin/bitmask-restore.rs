use std::path::PathBuf;
use std::process;

use clap::Parser;

use bitmask_restore::{RestorationPipeline, RoundReport, RESTORED_IMAGE};

#[derive(Parser)]
#[command(
    name = "bitmask-restore",
    about = "Recover an image obscured by layered byte-wise transforms and additive masks",
    version,
    after_help = "Expects M.bmp (mask image), I_M.bmp (noise image), I_D.bmp (obscured image)\n\
                  and M0.txt..M<N-1>.txt (per-round mask files) in the input directory.\n\
                  The restored image is written to I_O.bmp."
)]
struct Cli {
    /// Number of masking rounds to undo
    rounds: u32,

    /// Directory containing the input images and round files
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Output file (default: I_O.bmp in the input directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Suppress per-round output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.rounds == 0 {
        eprintln!("Error: at least one round is required");
        process::exit(1);
    }

    if !cli.dir.is_dir() {
        eprintln!("Error: input directory does not exist: {}", cli.dir.display());
        process::exit(1);
    }

    let output = cli
        .output
        .unwrap_or_else(|| cli.dir.join(RESTORED_IMAGE));

    let mut pipeline = match RestorationPipeline::load(&cli.dir) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("[FAIL] {e}");
            process::exit(1);
        }
    };

    if !cli.quiet {
        let (w, h) = pipeline.dimensions();
        eprintln!("Loaded {w}x{h} obscured image, undoing {} round(s)", cli.rounds);
    }

    let reports = match pipeline.run(cli.rounds) {
        Ok(reports) => reports,
        Err(e) => {
            eprintln!("[FAIL] {e}");
            process::exit(1);
        }
    };

    if !cli.quiet {
        for r in &reports {
            print_report(r);
        }
    }

    if let Err(e) = pipeline.export(&output) {
        eprintln!("[FAIL] could not write {}: {e}", output.display());
        process::exit(1);
    }

    if !cli.quiet {
        eprintln!("[OK] restored image written to {}", output.display());
    }
}

fn print_report(report: &RoundReport) {
    let id = &report.identification;
    let quality = if id.is_exact() { "exact" } else { "best guess" };
    eprintln!(
        "[Round {}] {} (score {}, {}; seed {}, {} masked pixels)",
        report.round, id.operation, id.score, quality, report.seed, report.num_pixels
    );
}
