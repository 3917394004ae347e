use std::path::PathBuf;

use clap::Subcommand;

pub mod convert;
mod execute;

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a big-endian (Xbox 360) ESM/ESP/ESL plugin to little-endian (PC)
    #[command(long_about = "Convert a big-endian (Xbox 360) ESM/ESP/ESL plugin to little-endian (PC)

Reads the whole plugin, walks every GRUP and record, and rewrites each
header field and subrecord from big-endian to little-endian. The output
is the same length as the input unless a skip option drops records.

Examples:
  esm-endian convert Skyrim.esm
  esm-endian convert Skyrim.esm -o Skyrim.pc.esm
  esm-endian convert Skyrim.esm --skip-type LAND
  esm-endian convert Skyrim.esm --skip-land 0x0001A2B3")]
    Convert {
        /// Input plugin file (big-endian)
        input: PathBuf,

        /// Output file path (defaults to `<input>.pc.esm` or `$ESM_OUTPUT_PATH`)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Omit every record with this 4-letter signature (repeatable)
        #[arg(long = "skip-type", value_name = "SIG")]
        skip_type: Vec<String>,

        /// Omit the record with this hex formId, e.g. 0x0001A2B3 (repeatable)
        #[arg(long = "skip-land", value_name = "HEX")]
        skip_land: Vec<String>,

        /// Abort on the first subrecord with no registry schema
        #[arg(long)]
        strict: bool,

        /// Verbose logging and a post-conversion fallback-usage report
        #[arg(short, long)]
        verbose: bool,
    },
}
