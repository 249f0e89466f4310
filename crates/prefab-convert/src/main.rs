use std::path::PathBuf;
use std::process;

use clap::Parser;
use prefab_convert::{format_summary, run_batch, ConvertOptions, Direction, OutputMode};

/// Convert sparse-list (v1) prefabs to the layered bracket notation (v2).
#[derive(Parser)]
#[command(name = "prefab-convert", version)]
struct ConvertArgs {
    /// Prefab JSON files to convert in place.
    #[arg(required = true, value_name = "PREFAB")]
    inputs: Vec<PathBuf>,

    /// Convert v2 prefabs back to v1 instead.
    #[arg(long)]
    reverse: bool,

    /// Convert and report without writing anything.
    #[arg(long, conflicts_with = "stdout")]
    dry_run: bool,

    /// Print converted documents to stdout instead of rewriting files.
    #[arg(long)]
    stdout: bool,

    /// Overwrite originals without keeping a backup copy.
    #[arg(long)]
    no_backup: bool,
}

impl ConvertArgs {
    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            direction: if self.reverse {
                Direction::Downgrade
            } else {
                Direction::Upgrade
            },
            output: if self.dry_run {
                OutputMode::DryRun
            } else if self.stdout {
                OutputMode::Stdout
            } else {
                OutputMode::InPlace
            },
            backup: !self.no_backup,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = ConvertArgs::parse();
    let options = args.options();

    let report = run_batch(&args.inputs, &options);

    if options.output == OutputMode::Stdout {
        for json in report.converted.iter().filter_map(|file| file.json.as_deref()) {
            println!("{json}");
        }
    }

    eprintln!("\n{}", format_summary(&report));

    if report.has_failures() {
        eprintln!(
            "ERROR: {} file(s) failed to convert, exiting with code 1",
            report.failures.len()
        );
        process::exit(1);
    }

    log::info!("Conversion complete.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args_upgrade_in_place() {
        let args = ConvertArgs::try_parse_from(["prefab-convert", "a.json"]).expect("parse");
        let options = args.options();
        assert_eq!(options.direction, Direction::Upgrade);
        assert_eq!(options.output, OutputMode::InPlace);
        assert!(options.backup);
    }

    #[test]
    fn test_reverse_dry_run_no_backup() {
        let args = ConvertArgs::try_parse_from([
            "prefab-convert",
            "--reverse",
            "--dry-run",
            "--no-backup",
            "a.json",
            "b.json",
        ])
        .expect("parse");
        assert_eq!(args.inputs.len(), 2);
        let options = args.options();
        assert_eq!(options.direction, Direction::Downgrade);
        assert_eq!(options.output, OutputMode::DryRun);
        assert!(!options.backup);
    }

    #[test]
    fn test_inputs_required() {
        assert!(ConvertArgs::try_parse_from(["prefab-convert"]).is_err());
    }

    #[test]
    fn test_dry_run_conflicts_with_stdout() {
        assert!(
            ConvertArgs::try_parse_from(["prefab-convert", "--dry-run", "--stdout", "a.json"])
                .is_err()
        );
    }
}
