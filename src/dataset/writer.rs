use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::dataset::model::DatasetDocument;
use crate::error::{DatasetError, Result};

const FILE_PREFIX: &str = "dataset_coco_art_";

/// `dataset_coco_art_<YYYYMMDD_HHMMSS>.json`
pub fn output_file_name(created: &DateTime<Local>) -> String {
    format!("{}{}.json", FILE_PREFIX, created.format("%Y%m%d_%H%M%S"))
}

/// Writes the document into `output_dir` (created if needed) and returns the file path.
///
/// Output is UTF-8 with four-space indentation. Non-ASCII text is written as is.
pub fn write_dataset(
    document: &DatasetDocument,
    output_dir: &Path,
    created: &DateTime<Local>,
) -> Result<PathBuf> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| DatasetError::Io { path, source }
    };

    fs::create_dir_all(output_dir).map_err(io_err(output_dir))?;

    let path = output_dir.join(output_file_name(created));
    let file = File::create(&path).map_err(io_err(&path))?;
    let mut writer = BufWriter::new(file);

    let mut serializer =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    document
        .serialize(&mut serializer)
        .map_err(|source| DatasetError::Serialize {
            path: path.clone(),
            source,
        })?;
    writer.flush().map_err(io_err(&path))?;

    Ok(path)
}
