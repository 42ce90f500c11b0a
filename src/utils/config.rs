use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use anyhow::{Result, Context};
use tracing::info;

pub const DEFAULT_AUTHOR: &str = "Nom de l'auteur";
pub const DEFAULT_LOG_FILE: &str = "dataset_creation.log";
pub const DEFAULT_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Whether the category file must also carry an `annotations` key.
///
/// Existing category files are full COCO exports, so the stricter check is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryKeyPolicy {
    #[default]
    RequireAnnotations,
    CategoriesOnly,
}

/// Everything a run needs, resolved once in `main` and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub images_dir: PathBuf,
    pub output_dir: PathBuf,
    pub categories_file: PathBuf,
    pub author: String,
    /// Lowercase, without the leading dot.
    pub extensions: Vec<String>,
    pub key_policy: CategoryKeyPolicy,
    pub parallel: bool,
    pub show_progress: bool,
}

impl Config {
    /// Defaults rooted at `home`, mirroring the layout the tool has always used.
    pub fn with_home(home: &Path) -> Self {
        Self {
            images_dir: home.join("images"),
            output_dir: home.join("output_coco"),
            categories_file: home.join("Base_datos.json"),
            author: DEFAULT_AUTHOR.to_string(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            key_policy: CategoryKeyPolicy::default(),
            parallel: false,
            show_progress: true,
        }
    }

    /// Applies `KEY=VALUE` overrides read from an env file.
    pub fn apply_env(&mut self, vars: &HashMap<String, String>) {
        if let Some(v) = vars.get("COCO_IMAGES_DIR") {
            self.images_dir = PathBuf::from(v);
        }
        if let Some(v) = vars.get("COCO_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(v);
        }
        if let Some(v) = vars.get("COCO_CATEGORIES_FILE") {
            self.categories_file = PathBuf::from(v);
        }
        if let Some(v) = vars.get("COCO_AUTHOR") {
            self.author = v.clone();
        }
    }
}

pub fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Normalizes a comma separated list such as `".JPG, png"` into `["jpg", "png"]`.
pub fn parse_extensions(list: &str) -> Vec<String> {
    list.split(',')
        .map(|e| e.trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Reads an env file if it exists. A missing file is not an error.
pub fn load_env_file(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let file = File::open(path).with_context(|| format!("Failed to open env file {:?}", path))?;
    let reader = BufReader::new(file);

    let mut vars = HashMap::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            vars.insert(key.trim().to_string(), value.trim().trim_matches('"').to_string());
        }
    }

    info!("Loaded {} setting(s) from {:?}", vars.len(), path);
    Ok(vars)
}
