use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use serde_json::Value;

use crate::dataset::model::Category;
use crate::error::{DatasetError, Result};
use crate::utils::config::CategoryKeyPolicy;
use crate::utils::report::Reporter;

/// Loads the ordered category list from a COCO-style JSON file.
///
/// Entries come back in file order and untouched; the last one is the fallback
/// used by [`classify`]. Every failure is reported before it is returned.
pub fn load_categories(
    path: &Path,
    policy: CategoryKeyPolicy,
    reporter: &dyn Reporter,
) -> Result<Vec<Category>> {
    read_categories(path, policy).map_err(|e| {
        reporter.error(&format!("Error loading categories: {}", e));
        e
    })
}

fn read_categories(path: &Path, policy: CategoryKeyPolicy) -> Result<Vec<Category>> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut document: Value =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| DatasetError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let missing = |key| DatasetError::MissingKey {
        path: path.to_path_buf(),
        key,
    };

    if policy == CategoryKeyPolicy::RequireAnnotations && document.get("annotations").is_none() {
        return Err(missing("annotations"));
    }
    let raw = document
        .get_mut("categories")
        .map(Value::take)
        .ok_or_else(|| missing("categories"))?;

    let categories: Vec<Category> =
        serde_json::from_value(raw).map_err(|source| DatasetError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if categories.is_empty() {
        return Err(DatasetError::NoCategories {
            path: path.to_path_buf(),
        });
    }
    Ok(categories)
}

/// Picks the category for a file by case-insensitive substring match on its name.
///
/// The first category in list order whose name occurs in `file_name` wins.
/// Without a match the last category is used. `None` only for an empty list.
pub fn classify(file_name: &str, categories: &[Category]) -> Option<i64> {
    let haystack = file_name.to_lowercase();
    categories
        .iter()
        .find(|c| haystack.contains(&c.name.to_lowercase()))
        .or_else(|| categories.last())
        .map(|c| c.id)
}
