use walkdir::WalkDir;
use std::path::{Path, PathBuf};

use crate::ingest::validator::is_valid_image_path;

/// A file in the image directory that passed the extension check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Lossy when the on-disk name is not valid UTF-8.
    pub file_name: String,
    pub path: PathBuf,
    pub utf8_name: bool,
}

/// Lists the image candidates directly inside `root`, sorted by file name.
///
/// Subdirectories are not entered. Names that are not valid UTF-8 are still
/// returned, flagged through `utf8_name`, so the caller can report them.
pub fn scan_directory(root: &Path, allowed: &[String]) -> walkdir::Result<Vec<Candidate>> {
    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter();

    let mut candidates = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !is_valid_image_path(entry.path(), allowed) {
            continue;
        }
        let name = entry.file_name();
        candidates.push(Candidate {
            file_name: name.to_string_lossy().into_owned(),
            path: entry.path().to_path_buf(),
            utf8_name: name.to_str().is_some(),
        });
    }
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use crate::utils::config::DEFAULT_EXTENSIONS;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_is_flat_filtered_and_sorted() -> Result<()> {
        let dir = TempDir::new()?;
        for name in ["zebra.png", "apple.JPG", "notes.txt", "Mango.gif"] {
            fs::write(dir.path().join(name), b"x")?;
        }
        fs::create_dir(dir.path().join("nested"))?;
        fs::write(dir.path().join("nested").join("inner.png"), b"x")?;

        let allowed: Vec<String> = DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect();
        let names: Vec<String> = scan_directory(dir.path(), &allowed)?
            .into_iter()
            .map(|c| c.file_name)
            .collect();

        assert_eq!(names, vec!["Mango.gif", "apple.JPG", "zebra.png"]);
        Ok(())
    }
}
