use super::{ObjectRegistry, Storage};
use crate::model::{ClassName, Object};
use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Storage engine persisting the registry as one JSON document.
///
/// File layout: `{"<ClassName>.<id>": {<attributes>, "__class__": "<ClassName>"}}`
pub struct FileStorage {
    registry: ObjectRegistry,

    /// Location of the JSON document
    file_path: PathBuf,

    /// Serializes save/reload so temp-file writes never interleave
    io_lock: Mutex<()>,
}

impl FileStorage {
    /// Create storage backed by `file_path`. The registry starts empty; call
    /// `reload` to load persisted state.
    pub fn with_path(file_path: impl Into<PathBuf>) -> Self {
        Self {
            registry: ObjectRegistry::new(),
            file_path: file_path.into(),
            io_lock: Mutex::new(()),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn load_into_registry(&self, records: Map<String, Value>) -> usize {
        let mut loaded = 0;

        for (key, record) in records {
            match Object::from_record(record) {
                Ok(object) => {
                    let derived = object.key();
                    if derived != key {
                        warn!(
                            file_key = %key,
                            key = %derived,
                            "Record key does not match its class and id, re-keying"
                        );
                    }
                    self.registry.insert(object);
                    loaded += 1;
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Skipping unreadable record");
                }
            }
        }

        loaded
    }
}

impl Storage for FileStorage {
    fn all(&self, class: Option<ClassName>) -> HashMap<String, Object> {
        self.registry.all(class)
    }

    fn new(&self, object: Object) {
        debug!(key = %object.key(), "Registering object");
        self.registry.insert(object);
    }

    fn get(&self, class: ClassName, id: &str) -> Option<Object> {
        self.registry.get(class, id)
    }

    fn delete(&self, object: &Object) {
        if self.registry.remove(object).is_some() {
            debug!(key = %object.key(), "Object deleted");
        }
    }

    fn count(&self, class: Option<ClassName>) -> usize {
        self.registry.count(class)
    }

    fn save(&self) -> Result<()> {
        let _guard = self
            .io_lock
            .lock()
            .map_err(|_| anyhow!("Storage file lock poisoned"))?;

        let mut records = Map::new();
        for (key, object) in self.registry.all(None) {
            let record = object
                .to_record()
                .with_context(|| format!("Failed to serialize {}", key))?;
            records.insert(key, Value::Object(record));
        }
        let count = records.len();

        write_document(&self.file_path, &Value::Object(records))?;

        debug!(
            objects = count,
            path = %self.file_path.display(),
            "Storage saved"
        );

        Ok(())
    }

    fn reload(&self) {
        let _guard = self
            .io_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let records = match read_document(&self.file_path) {
            Ok(Some(records)) => records,
            Ok(None) => {
                info!(
                    path = %self.file_path.display(),
                    "Storage file does not exist, starting empty"
                );
                return;
            }
            Err(e) => {
                warn!(
                    path = %self.file_path.display(),
                    error = %e,
                    "Failed to load storage file, keeping current state"
                );
                return;
            }
        };

        let loaded = self.load_into_registry(records);

        info!(
            objects = loaded,
            path = %self.file_path.display(),
            "Loaded objects from storage file"
        );
    }
}

/// Write the document atomically: temp file, fsync, rename
fn write_document(path: &Path, document: &Value) -> Result<()> {
    let json = serde_json::to_vec(document).context("Failed to serialize storage document")?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("Failed to create storage directory")?;
        }
    }

    let tmp_path = temp_path(path);

    let written = write_and_rename(&tmp_path, path, &json);
    if written.is_err() {
        if let Err(e) = fs::remove_file(&tmp_path) {
            if e.kind() != ErrorKind::NotFound {
                warn!(
                    path = %tmp_path.display(),
                    error = %e,
                    "Failed to remove temporary storage file"
                );
            }
        }
    }

    written
}

/// Sibling of `path` with `.tmp` appended to the full file name
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_and_rename(tmp_path: &Path, path: &Path, json: &[u8]) -> Result<()> {
    {
        let mut tmp_file =
            File::create(tmp_path).context("Failed to create temporary storage file")?;
        tmp_file
            .write_all(json)
            .context("Failed to write storage data")?;
        tmp_file
            .sync_all()
            .context("Failed to sync storage file to disk")?;
    }

    fs::rename(tmp_path, path).context("Failed to rename temporary storage file")?;

    Ok(())
}

/// Read the document. `Ok(None)` when the file does not exist.
fn read_document(path: &Path) -> Result<Option<Map<String, Value>>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).context("Failed to read storage file"),
    };

    let records: Map<String, Value> =
        serde_json::from_str(&contents).context("Failed to parse storage file")?;

    Ok(Some(records))
}
