// ============================================================================
// Blockout CLI — headless batch erasing via command-line arguments
// ============================================================================
//
// Usage examples:
//   blockout --input photo.png --block-size 32 --erase 50 --output result.png
//   blockout -i photo.jpg -b 16 -e 200 --seed 7 -o out.png
//   blockout -i "shots/*.png" -b 64 -e 10 --output-dir erased/
//
// No GUI is opened in CLI mode. All processing runs synchronously on the
// current thread.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use crate::editor::BlockEditor;
use crate::io::{DEFAULT_JPEG_QUALITY, decode_image};

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// Blockout headless block eraser.
///
/// Randomly blacken rectangular blocks of an image without opening the GUI.
#[derive(Parser, Debug)]
#[command(
    name = "blockout",
    about = "Blockout headless batch block eraser",
    long_about = "Partition images into fixed-size blocks and randomly erase a\n\
                  chosen number of them, without opening the GUI. Reads any\n\
                  format the image crate decodes; the output format follows the\n\
                  output file's extension.\n\n\
                  Example:\n  \
                  blockout --input photo.png --block-size 32 --erase 50 --output result.png\n  \
                  blockout -i \"*.jpg\" -b 16 -e 100 --output-dir erased/"
)]
pub struct CliArgs {
    /// Input file(s). Glob patterns accepted (e.g. "*.png", "shots/*.jpg").
    #[arg(short, long, required = true, num_args = 1..)]
    pub input: Vec<String>,

    /// Output file path. Only valid for single-file input.
    /// For batch input use --output-dir instead.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output directory for batch processing.
    /// Files are written here with the original name.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Side length in pixels of the square blocks the image is tiled into.
    /// Edge blocks are clipped to the image bounds.
    #[arg(short, long, default_value_t = 64, value_name = "PIXELS")]
    pub block_size: u32,

    /// Number of random blocks to erase per image.
    /// Values past the block count erase everything and stop.
    #[arg(short, long, default_value_t = 0, value_name = "N")]
    pub erase: usize,

    /// Number of erased blocks to restore afterwards, most recent first.
    #[arg(long, default_value_t = 0, value_name = "N")]
    pub restore: usize,

    /// RNG seed for reproducible erase patterns.
    /// In batch mode each file uses seed + its input position.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// JPEG quality for .jpg/.jpeg output (1–100, default 90).
    #[arg(short, long, default_value_t = DEFAULT_JPEG_QUALITY, value_name = "1-100")]
    pub quality: u8,

    /// Print per-file block statistics and timing information.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Returns `true` when any CLI-mode flag is present in the real process
    /// arguments. Used by `main()` to route before creating an eframe window.
    pub fn is_cli_mode() -> bool {
        std::env::args().any(|a| a == "--input" || a == "-i")
    }
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run all CLI processing and return an OS exit code.
/// `0` = all files succeeded, `1` = one or more files failed.
pub fn run(args: CliArgs) -> ExitCode {
    if args.block_size == 0 {
        eprintln!("error: --block-size must be a positive integer.");
        return ExitCode::FAILURE;
    }

    let inputs = resolve_inputs(&args.input);
    if inputs.is_empty() {
        eprintln!("error: no input files matched the given pattern(s).");
        return ExitCode::FAILURE;
    }

    // Multiple inputs require --output-dir, not --output
    if inputs.len() > 1 && args.output.is_some() && args.output_dir.is_none() {
        eprintln!(
            "error: {} input files given but --output only accepts a single file path.\n\
             Use --output-dir to specify a destination directory for batch processing.",
            inputs.len()
        );
        return ExitCode::FAILURE;
    }

    if let Some(dir) = &args.output_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!(
                "error: could not create output directory '{}': {}",
                dir.display(),
                e
            );
            return ExitCode::FAILURE;
        }
    }

    let total = inputs.len();
    let multi = total > 1;
    let mut any_failure = false;

    for (idx, input_path) in inputs.iter().enumerate() {
        if multi || args.verbose {
            println!("[{}/{}] {}", idx + 1, total, input_path.display());
        }

        let file_start = Instant::now();

        let output_path = match build_output_path(
            input_path,
            args.output.as_deref(),
            args.output_dir.as_deref(),
        ) {
            Some(p) => p,
            None => {
                eprintln!(
                    "  error: cannot determine output path for '{}'.",
                    input_path.display()
                );
                any_failure = true;
                continue;
            }
        };

        // Distinct per-file seed so a seeded batch is still reproducible
        let seed = args.seed.map(|s| s.wrapping_add(idx as u64));

        match run_one(input_path, &output_path, &args, seed) {
            Ok(()) => {
                if args.verbose || multi {
                    println!(
                        "  → {} ({:.0}ms)",
                        output_path.display(),
                        file_start.elapsed().as_secs_f64() * 1000.0
                    );
                }
            }
            Err(e) => {
                eprintln!("  error: {}", e);
                any_failure = true;
            }
        }
    }

    if any_failure { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

// ============================================================================
// Per-file processing pipeline
// ============================================================================

fn run_one(
    input: &Path,
    output: &Path,
    args: &CliArgs,
    seed: Option<u64>,
) -> Result<(), String> {
    // -- Step 1: Load ----------------------------------------------------
    let image = decode_image(input).map_err(|e| format!("load failed: {}", e))?;

    let mut editor = match seed {
        Some(s) => BlockEditor::with_seed(image, args.block_size, s),
        None => BlockEditor::new(image, args.block_size),
    }
    .map_err(|e| e.to_string())?;

    // -- Step 2: Erase / restore -----------------------------------------
    let erased = editor.erase_n(args.erase);
    let restored = editor.restore_n(args.restore);

    if args.verbose {
        let (w, h) = editor.dimensions();
        println!(
            "  {}×{} px, {} blocks of {} px: erased {}, restored {}, {} active",
            w,
            h,
            editor.block_count(),
            args.block_size,
            erased,
            restored,
            editor.active_count(),
        );
        if erased < args.erase {
            println!(
                "  note: --erase {} clamped to {} (no active blocks left)",
                args.erase, erased
            );
        }
    }

    // -- Step 3: Save ----------------------------------------------------
    editor
        .save_with_quality(output, args.quality)
        .map_err(|e| format!("save failed: {}", e))?;

    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Expand glob patterns and literal paths into a deduplicated, ordered list.
fn resolve_inputs(patterns: &[String]) -> Vec<PathBuf> {
    let mut result: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        let as_path = Path::new(pattern);

        if as_path.exists() {
            // Literal path — use directly
            if !result.iter().any(|p| p.as_path() == as_path) {
                result.push(as_path.to_path_buf());
            }
            continue;
        }

        // Treat as glob pattern
        match glob::glob(pattern) {
            Ok(entries) => {
                let mut matched = false;
                for entry in entries.flatten() {
                    if !result.contains(&entry) {
                        result.push(entry);
                    }
                    matched = true;
                }
                if !matched {
                    eprintln!("warning: pattern '{}' matched no files.", pattern);
                }
            }
            Err(e) => {
                eprintln!("warning: invalid glob '{}': {}", pattern, e);
            }
        }
    }

    result
}

/// Compute the output path for a single input file.
///
/// Priority:
/// 1. `--output` (explicit path, used for single-file input)
/// 2. `--output-dir` (batch directory, keeps the input file name)
/// 3. Fallback: same directory as input with `_erased` appended to the stem
fn build_output_path(
    input: &Path,
    output: Option<&Path>,
    output_dir: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(out) = output {
        return Some(out.to_path_buf());
    }

    if let Some(dir) = output_dir {
        return Some(dir.join(input.file_name()?));
    }

    let stem = input.file_stem()?.to_string_lossy();
    let ext = input.extension()?.to_string_lossy();
    Some(input.with_file_name(format!("{}_erased.{}", stem, ext)))
}
