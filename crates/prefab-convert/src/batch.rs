use std::fs;
use std::path::{Path, PathBuf};

use prefab_codec::{convert, downgrade, Conversion, Converted};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::error::ConvertError;
use crate::options::{ConvertOptions, Direction, OutputMode};
use crate::report::BatchReport;

/// A file whose document was converted.
#[derive(Debug, Clone)]
pub struct ConvertedFile {
    pub path: PathBuf,
    /// Occupied cells in the converted prefab.
    pub block_count: usize,
    /// Layer lines (upgrade) or block entries (downgrade) written.
    pub entry_count: usize,
    /// Blocks dropped for lying outside the declared size.
    pub dropped: usize,
    /// Where the original was moved, if a backup was made.
    pub backup: Option<PathBuf>,
    /// The converted document, tab-indented. Only kept for
    /// `OutputMode::Stdout`; in-place runs write it out and drop it.
    pub json: Option<String>,
}

/// What happened to one input file.
#[derive(Debug, Clone)]
pub enum FileOutcome {
    Converted(ConvertedFile),
    /// The document was already in the target format.
    Skipped { path: PathBuf, version: u64 },
}

/// Convert every file in `paths`. A failure on one file is recorded and the
/// run continues with the next.
pub fn run_batch(paths: &[PathBuf], options: &ConvertOptions) -> BatchReport {
    let mut report = BatchReport::default();
    for path in paths {
        log::info!("Converting: {}", display_name(path));
        match convert_file(path, options) {
            Ok(outcome) => report.record(outcome),
            Err(e) => {
                log::error!("{e}");
                report.failures.push(e);
            }
        }
    }
    report
}

/// Convert a single prefab file according to `options`.
pub fn convert_file(path: &Path, options: &ConvertOptions) -> Result<FileOutcome, ConvertError> {
    if !path.exists() {
        return Err(ConvertError::NotFound(path.to_path_buf()));
    }

    let text = fs::read_to_string(path).map_err(|source| ConvertError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc: Value = serde_json::from_str(&text).map_err(|source| ConvertError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let name = fallback_name(path);
    let codec_err = |source| ConvertError::Codec {
        path: path.to_path_buf(),
        source,
    };

    let (mut converted, json) = match options.direction {
        Direction::Upgrade => match convert(&doc, &name).map_err(codec_err)? {
            Conversion::Converted(c) => {
                let entry_count = c.document.layers.len();
                render(path, c, entry_count)?
            }
            Conversion::AlreadyCurrent { version } => return Ok(skipped(path, version)),
        },
        Direction::Downgrade => match downgrade(&doc, &name).map_err(codec_err)? {
            Conversion::Converted(c) => {
                let entry_count = c.document.blocks.len();
                render(path, c, entry_count)?
            }
            Conversion::AlreadyCurrent { version } => return Ok(skipped(path, version)),
        },
    };

    if converted.dropped > 0 {
        log::warn!(
            "  {} block(s) outside the declared size were dropped from {}",
            converted.dropped,
            display_name(path)
        );
    }

    if options.output == OutputMode::Stdout {
        converted.json = Some(json);
        return Ok(FileOutcome::Converted(converted));
    }
    if !options.writes_files() {
        return Ok(FileOutcome::Converted(converted));
    }

    let backup = if options.backup {
        backup_original(path, options.direction)?
    } else {
        None
    };
    fs::write(path, &json).map_err(|source| ConvertError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!(
        "  Saved: {} ({} {})",
        display_name(path),
        converted.entry_count,
        match options.direction {
            Direction::Upgrade => "layer lines",
            Direction::Downgrade => "block entries",
        }
    );

    Ok(FileOutcome::Converted(ConvertedFile {
        backup,
        ..converted
    }))
}

/// Serialize with tab indentation, keeping struct field order.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(serde::ser::Error::custom)
}

/// Name used for a document without one: the file name minus extension.
pub fn fallback_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Path the original is moved to before being overwritten,
/// e.g. `hut.json` -> `hut.v1.json`.
pub fn backup_path(path: &Path, direction: Direction) -> PathBuf {
    path.with_extension(direction.backup_extension())
}

/// Move the original aside unless a backup already exists. An existing
/// backup is never overwritten, so the first original survives reruns.
fn backup_original(path: &Path, direction: Direction) -> Result<Option<PathBuf>, ConvertError> {
    let backup = backup_path(path, direction);
    if backup.exists() {
        log::debug!("  Backup {} already exists, keeping it", display_name(&backup));
        return Ok(None);
    }
    fs::rename(path, &backup).map_err(|source| ConvertError::Io {
        path: backup.clone(),
        source,
    })?;
    log::info!("  Backed up to: {}", display_name(&backup));
    Ok(Some(backup))
}

fn render<D: Serialize>(
    path: &Path,
    converted: Converted<D>,
    entry_count: usize,
) -> Result<(ConvertedFile, String), ConvertError> {
    let json = to_pretty_json(&converted.document).map_err(|source| ConvertError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let file = ConvertedFile {
        path: path.to_path_buf(),
        block_count: converted.block_count,
        entry_count,
        dropped: converted.drops.len(),
        backup: None,
        json: None,
    };
    Ok((file, json))
}

fn skipped(path: &Path, version: u64) -> FileOutcome {
    log::info!(
        "  Skipping {} - already version {}",
        display_name(path),
        version
    );
    FileOutcome::Skipped {
        path: path.to_path_buf(),
        version,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_backup_path_naming() {
        assert_eq!(
            backup_path(Path::new("prefabs/hut.json"), Direction::Upgrade),
            PathBuf::from("prefabs/hut.v1.json")
        );
        assert_eq!(
            backup_path(Path::new("hut.json"), Direction::Downgrade),
            PathBuf::from("hut.v2.json")
        );
    }

    #[test]
    fn test_fallback_name_is_stem() {
        assert_eq!(fallback_name(Path::new("a/b/watchtower.json")), "watchtower");
        assert_eq!(fallback_name(Path::new("bare")), "bare");
    }

    #[test]
    fn test_pretty_json_uses_tabs() {
        let text = to_pretty_json(&json!({"size": [1, 2]})).expect("ser");
        assert_eq!(text, "{\n\t\"size\": [\n\t\t1,\n\t\t2\n\t]\n}");
    }

    #[test]
    fn test_pretty_json_keeps_non_ascii_text() {
        let text = to_pretty_json(&json!({"name": "château"})).expect("ser");
        assert_eq!(text, "{\n\t\"name\": \"château\"\n}");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let result = convert_file(
            Path::new("/definitely/not/here.json"),
            &ConvertOptions::default(),
        );
        assert!(matches!(result, Err(ConvertError::NotFound(_))));
    }
}
