//! CLI interface for the `convert` command.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;

use crate::cli::progress::{print_done, simple_spinner};
use crate::converter::{self, ConvertOptions};
use crate::parser::is_valid_signature;

const DEFAULT_OUTPUT_SUFFIX: &str = "pc.esm";

pub fn execute(
    input: &Path,
    output: Option<&Path>,
    skip_type: &[String],
    skip_land: &[String],
    strict: bool,
    verbose: bool,
) -> anyhow::Result<()> {
    let output_path = resolve_output_path(input, output);
    let options = build_options(skip_type, skip_land, strict)?;

    let started = Instant::now();
    let spinner = if verbose {
        None
    } else {
        Some(simple_spinner(&format!("Converting {}...", input.display())))
    };

    let bytes = std::fs::read(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let (out_bytes, stats) = converter::convert(&bytes, &options)
        .with_context(|| format!("converting {}", input.display()))?;
    std::fs::write(&output_path, &out_bytes)
        .with_context(|| format!("writing {}", output_path.display()))?;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    print_done(started.elapsed());
    println!(
        "wrote {} ({} records, {} GRUPs, {} subrecords, {} XXXX sentinels)",
        output_path.display(),
        stats.records_converted,
        stats.grups_converted,
        stats.subrecords_converted,
        stats.xxxx_sentinels
    );
    if stats.records_skipped > 0 {
        println!(
            "skipped {} records ({} bytes elided)",
            stats.records_skipped, stats.bytes_elided
        );
    }

    if verbose {
        let report = stats.fallback_report();
        if report.is_empty() {
            println!("no fallback subrecords encountered");
        } else {
            println!("fallback usage (sorted by count):");
            for (key, count) in report {
                println!(
                    "  {count:>6}  {} {}/{} size={}",
                    key.kind,
                    crate::model::signature_str(&key.record_type),
                    crate::model::signature_str(&key.sub_sig),
                    key.size
                );
            }
        }
    }

    Ok(())
}

fn resolve_output_path(input: &Path, output: Option<&Path>) -> PathBuf {
    if let Some(out) = output {
        return out.to_path_buf();
    }
    if let Ok(env_path) = std::env::var("ESM_OUTPUT_PATH") {
        return PathBuf::from(env_path);
    }
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    input.with_file_name(format!("{stem}.{DEFAULT_OUTPUT_SUFFIX}"))
}

fn build_options(skip_type: &[String], skip_land: &[String], strict: bool) -> anyhow::Result<ConvertOptions> {
    let mut options = ConvertOptions {
        strict_unknown: strict,
        ..ConvertOptions::default()
    };

    for sig in skip_type {
        let bytes = sig.as_bytes();
        anyhow::ensure!(
            bytes.len() == 4,
            "--skip-type expects a 4-letter signature, got '{sig}'"
        );
        let mut arr = [0u8; 4];
        arr.copy_from_slice(bytes);
        anyhow::ensure!(
            is_valid_signature(&arr),
            "--skip-type '{sig}' is not 4 printable uppercase ASCII letters or digits"
        );
        options.skip_record_types.insert(arr);
    }

    for hex in skip_land {
        let trimmed = hex.trim_start_matches("0x").trim_start_matches("0X");
        let form_id = u32::from_str_radix(trimmed, 16)
            .with_context(|| format!("--skip-land expects a hex formId, got '{hex}'"))?;
        options.skip_form_ids.insert(form_id);
    }

    Ok(options)
}
