use std::collections::HashMap;
use std::path::Path;
use anyhow::anyhow;
use chrono::{Datelike, Local};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::dataset::categories::classify;
use crate::dataset::model::{
    AnnotationRecord, Category, DatasetDocument, ImageRecord, Info, License, DATASET_DESCRIPTION,
    DATASET_VERSION, LICENSE_ID,
};
use crate::error::{DatasetError, Result};
use crate::ingest::hasher::content_digest;
use crate::ingest::scanner::{scan_directory, Candidate};
use crate::media::dimensions::{probe_dimensions, Dimensions};
use crate::utils::config::Config;
use crate::utils::report::Reporter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileErrorKind {
    /// The file name is not valid UTF-8 and cannot be stored in the dataset.
    Name,
    Read,
    Decode,
    Classify,
}

/// A candidate that was skipped instead of becoming an image record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileError {
    pub file_name: String,
    pub kind: FileErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub file_name: String,
    /// The earlier file with the same content.
    pub original: String,
}

/// Result of one pass over the image directory.
#[derive(Debug)]
pub struct AssemblyReport {
    pub document: DatasetDocument,
    pub errors: Vec<FileError>,
    pub duplicates: Vec<Duplicate>,
    pub scanned: usize,
}

/// Local time in the `2024-05-01T13:45:10.123456` form used throughout the document.
pub fn iso_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Builds a COCO document out of a flat image directory.
pub struct DatasetAssembler<'a> {
    categories: Vec<Category>,
    author: String,
    extensions: Vec<String>,
    parallel: bool,
    show_progress: bool,
    reporter: &'a dyn Reporter,
}

impl<'a> DatasetAssembler<'a> {
    pub fn new(config: &Config, categories: Vec<Category>, reporter: &'a dyn Reporter) -> Self {
        Self {
            categories,
            author: config.author.clone(),
            extensions: config.extensions.clone(),
            parallel: config.parallel,
            show_progress: config.show_progress,
            reporter,
        }
    }

    pub fn assemble(self, images_dir: &Path) -> Result<AssemblyReport> {
        if !images_dir.is_dir() {
            return Err(DatasetError::DirectoryNotFound(images_dir.to_path_buf()));
        }

        let candidates =
            scan_directory(images_dir, &self.extensions).map_err(|e| DatasetError::Io {
                path: images_dir.to_path_buf(),
                source: e.into(),
            })?;
        self.reporter.info(&format!(
            "Found {} candidate image(s) in {:?}",
            candidates.len(),
            images_dir
        ));

        let progress = self.progress_bar(candidates.len());
        let mut state = AssemblyState::new(&self);

        if self.parallel {
            let probes: Vec<_> = candidates
                .par_iter()
                .map(|c| {
                    let probe = (content_digest(&c.path), probe_dimensions(&c.path));
                    progress.inc(1);
                    probe
                })
                .collect();
            for (candidate, (digest, dims)) in candidates.iter().zip(probes) {
                state.add(candidate, digest, move || dims);
            }
        } else {
            for candidate in &candidates {
                state.add(
                    candidate,
                    content_digest(&candidate.path),
                    || probe_dimensions(&candidate.path),
                );
                progress.inc(1);
            }
        }
        progress.finish_and_clear();

        let AssemblyState {
            images,
            annotations,
            errors,
            duplicates,
            ..
        } = state;

        let now = Local::now();
        let document = DatasetDocument {
            info: Info {
                year: now.year(),
                version: DATASET_VERSION.to_string(),
                description: DATASET_DESCRIPTION.to_string(),
                contributor: self.author.clone(),
                date_created: iso_timestamp(),
            },
            images,
            annotations,
            categories: self.categories,
            licenses: vec![License::generic()],
        };

        Ok(AssemblyReport {
            document,
            errors,
            duplicates,
            scanned: candidates.len(),
        })
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "[{elapsed_precise}] Processing images {wide_bar:.green} {human_pos}/{human_len}",
        ) {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar
    }
}

/// Records accumulated while walking the candidates, in candidate order.
struct AssemblyState<'s> {
    categories: &'s [Category],
    author: &'s str,
    reporter: &'s dyn Reporter,
    seen: HashMap<String, String>,
    next_id: u64,
    images: Vec<ImageRecord>,
    annotations: Vec<AnnotationRecord>,
    errors: Vec<FileError>,
    duplicates: Vec<Duplicate>,
}

impl<'s> AssemblyState<'s> {
    fn new(assembler: &'s DatasetAssembler<'_>) -> Self {
        Self {
            categories: &assembler.categories,
            author: &assembler.author,
            reporter: assembler.reporter,
            seen: HashMap::new(),
            next_id: 1,
            images: Vec::new(),
            annotations: Vec::new(),
            errors: Vec::new(),
            duplicates: Vec::new(),
        }
    }

    /// Dedup first, then decode. Only an accepted image takes an id.
    fn add<F>(&mut self, candidate: &Candidate, digest: anyhow::Result<String>, probe: F)
    where
        F: FnOnce() -> anyhow::Result<Dimensions>,
    {
        if !candidate.utf8_name {
            let e = anyhow!("file name is not valid UTF-8: {:?}", candidate.path);
            return self.fail(candidate, FileErrorKind::Name, e);
        }

        let digest = match digest {
            Ok(d) => d,
            Err(e) => return self.fail(candidate, FileErrorKind::Read, e),
        };

        if let Some(original) = self.seen.get(&digest) {
            self.reporter.warn(&format!(
                "Skipping duplicate image {} (same content as {})",
                candidate.file_name, original
            ));
            self.duplicates.push(Duplicate {
                file_name: candidate.file_name.clone(),
                original: original.clone(),
            });
            return;
        }

        let dims = match probe() {
            Ok(d) => d,
            Err(e) => return self.fail(candidate, FileErrorKind::Decode, e),
        };

        let category_id = match classify(&candidate.file_name, self.categories) {
            Some(id) => id,
            None => {
                let e = anyhow!("no categories to classify against");
                return self.fail(candidate, FileErrorKind::Classify, e);
            }
        };

        self.seen.insert(digest, candidate.file_name.clone());
        let image = ImageRecord {
            id: self.next_id,
            file_name: candidate.file_name.clone(),
            width: dims.width,
            height: dims.height,
            date_captured: iso_timestamp(),
            author: self.author.to_string(),
            license: LICENSE_ID,
            coco_url: String::new(),
            flickr_url: String::new(),
        };
        self.annotations.push(AnnotationRecord::full_frame(&image, category_id));
        self.images.push(image);
        self.next_id += 1;
    }

    fn fail(&mut self, candidate: &Candidate, kind: FileErrorKind, err: anyhow::Error) {
        let message = format!("{:#}", err);
        self.reporter.error(&format!("Error processing {}: {}", candidate.file_name, message));
        self.errors.push(FileError {
            file_name: candidate.file_name.clone(),
            kind,
            message,
        });
    }
}
