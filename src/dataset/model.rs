//! COCO document types as they are written to disk.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DATASET_VERSION: &str = "1.0";
pub const DATASET_DESCRIPTION: &str = "Automatically generated COCO dataset";
pub const LICENSE_ID: u64 = 1;
pub const LICENSE_NAME: &str = "generic license";

/// A category entry from the category file.
///
/// Any keys besides `id` and `name` are kept so the entry is written back exactly as loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
impl Category {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: u64,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub date_captured: String,
    pub author: String,
    pub license: u64,
    pub coco_url: String,
    pub flickr_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub id: u64,
    pub image_id: u64,
    pub category_id: i64,
    /// `[x, y, width, height]`, always the whole image.
    pub bbox: [u64; 4],
    pub area: u64,
    pub iscrowd: u8,
    pub segmentation: Vec<Vec<f64>>,
}

impl AnnotationRecord {
    /// The single full-frame annotation that accompanies an image record.
    pub fn full_frame(image: &ImageRecord, category_id: i64) -> Self {
        let (w, h) = (u64::from(image.width), u64::from(image.height));
        Self {
            id: image.id,
            image_id: image.id,
            category_id,
            bbox: [0, 0, w, h],
            area: w * h,
            iscrowd: 0,
            segmentation: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub year: i32,
    pub version: String,
    pub description: String,
    pub contributor: String,
    pub date_created: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub id: u64,
    pub name: String,
    pub url: String,
}

impl License {
    pub fn generic() -> Self {
        Self {
            id: LICENSE_ID,
            name: LICENSE_NAME.to_string(),
            url: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDocument {
    pub info: Info,
    pub images: Vec<ImageRecord>,
    pub annotations: Vec<AnnotationRecord>,
    pub categories: Vec<Category>,
    pub licenses: Vec<License>,
}
