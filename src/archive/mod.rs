// src/archive/mod.rs

//! Archive container: the load -> transform -> save pipeline.
//!
//! A [`ClassArchive`] holds every `.class` entry of a JAR as a parsed
//! [`ClassFile`] and every other entry as an opaque byte blob. Registered
//! transformers mutate the class models in place; saving re-serializes every
//! class (recomputing its code limits) and copies resources verbatim.
//!
//! Both maps are `BTreeMap`s: classes are transformed and entries written
//! in lexicographic entry-name order, so output is reproducible run-to-run.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use scrimshaw_classfile::{ClassFile, CLASS_EXT};
use tracing::{debug, info};
use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::error::{Error, Result};
use crate::transform::Transformer;

/// Suffix inserted into an input path to produce the default output path.
pub const OUTPUT_SUFFIX: &str = "_injected";

/// A loaded zip-style archive of class models and resource blobs.
pub struct ClassArchive {
    classes: BTreeMap<String, ClassFile>,
    resources: BTreeMap<String, Vec<u8>>,
    transformers: Vec<Box<dyn Transformer>>,
}

impl ClassArchive {
    /// Load an archive from disk. Class entries are parsed into models,
    /// everything else is read into memory verbatim; directory entries are
    /// skipped. The file handle is held only for the duration of the scan
    /// and released on every exit path, including parse failure.
    pub fn load(path: &Path) -> Result<Self> {
        let read_err = |source| Error::ArchiveRead {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(|e| read_err(ZipError::Io(e)))?;
        let mut zip = ZipArchive::new(BufReader::new(file)).map_err(read_err)?;

        let mut classes = BTreeMap::new();
        let mut resources = BTreeMap::new();
        for i in 0..zip.len() {
            let mut entry = zip.by_index(i).map_err(read_err)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data).map_err(|source| Error::EntryRead {
                entry: name.clone(),
                source,
            })?;
            if name.ends_with(CLASS_EXT) {
                let class = ClassFile::parse(&data).map_err(|source| Error::ClassParse {
                    entry: name.clone(),
                    source,
                })?;
                debug!(entry = %name, "parsed class entry");
                classes.insert(name, class);
            } else {
                debug!(entry = %name, bytes = data.len(), "stored resource entry");
                resources.insert(name, data);
            }
        }

        info!(
            classes = classes.len(),
            resources = resources.len(),
            path = %path.display(),
            "loaded archive"
        );
        Ok(Self {
            classes,
            resources,
            transformers: Vec::new(),
        })
    }

    /// Register a transformer. Registration order is application order;
    /// there is no removal.
    pub fn add_transformer(&mut self, transformer: Box<dyn Transformer>) {
        self.transformers.push(transformer);
    }

    /// Apply every registered transformer to every class model, in
    /// lexicographic entry-name order.
    pub fn transform(&mut self) {
        for (entry, class) in self.classes.iter_mut() {
            debug!(entry = %entry, "visiting class");
            for transformer in self.transformers.iter_mut() {
                transformer.visit(class);
            }
        }
    }

    /// Like [`transform`](Self::transform), but only classes whose entry
    /// name is in the selection are visited; the rest are left untouched.
    pub fn transform_selected(&mut self, selection: &BTreeSet<String>) {
        for (entry, class) in self.classes.iter_mut() {
            if !selection.contains(entry) {
                continue;
            }
            debug!(entry = %entry, "visiting selected class");
            for transformer in self.transformers.iter_mut() {
                transformer.visit(class);
            }
        }
    }

    /// Serialize every class model and copy every resource into a new
    /// archive at `path`. Writing is entry-by-entry and fail-fast: an error
    /// partway through aborts the save and may leave a partial output file
    /// behind (there is no temp-file-and-rename step).
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::ArchiveCreate {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = ZipWriter::new(BufWriter::new(file));
        let options = FileOptions::default();

        for (entry, class) in &self.classes {
            let canonical = class.entry_name().map_err(|source| Error::ClassSerialize {
                entry: entry.clone(),
                source,
            })?;
            let bytes = class.to_bytes().map_err(|source| Error::ClassSerialize {
                entry: canonical.clone(),
                source,
            })?;
            write_entry(&mut writer, &canonical, &bytes, options)?;
        }
        for (entry, data) in &self.resources {
            write_entry(&mut writer, entry, data, options)?;
        }

        let mut inner = writer.finish().map_err(|source| Error::EntryWrite {
            entry: "central directory".to_string(),
            source,
        })?;
        inner.flush()?;
        info!(path = %path.display(), "saved archive");
        Ok(())
    }

    /// Number of class entries.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// The set of class entry names.
    pub fn class_names(&self) -> BTreeSet<String> {
        self.classes.keys().cloned().collect()
    }

    /// Class entry names as a sorted list, for presenting choices.
    pub fn sorted_class_names(&self) -> Vec<String> {
        // Already lexicographic thanks to the BTreeMap.
        self.classes.keys().cloned().collect()
    }

    /// Resource entry names, in write order.
    pub fn resource_names(&self) -> Vec<&str> {
        self.resources.keys().map(String::as_str).collect()
    }
}

fn write_entry<W: Write + std::io::Seek>(
    writer: &mut ZipWriter<W>,
    entry: &str,
    data: &[u8],
    options: FileOptions,
) -> Result<()> {
    let write_err = |source| Error::EntryWrite {
        entry: entry.to_string(),
        source,
    };
    writer.start_file(entry, options).map_err(write_err)?;
    writer.write_all(data).map_err(|e| write_err(ZipError::Io(e)))?;
    Ok(())
}

/// Default output path: the input path with [`OUTPUT_SUFFIX`] inserted
/// before the extension, extension preserved.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    match input.extension().and_then(|e| e.to_str()) {
        Some(ext) => input.with_file_name(format!("{stem}{OUTPUT_SUFFIX}.{ext}")),
        None => input.with_file_name(format!("{stem}{OUTPUT_SUFFIX}")),
    }
}
