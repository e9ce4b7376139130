use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use crate::repository::traits::KeyValueStore;

const FILE_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Stores every key as `<data_dir>/<key>.json`.
#[derive(Clone, Debug)]
pub struct FileKeyValueStore {
    data_dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Could not create data directory {}", data_dir.display()))?;
        Ok(FileKeyValueStore { data_dir })
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.{}", key, FILE_EXTENSION))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Could not read {}", path.display())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension(format!("{}.{}", FILE_EXTENSION, TMP_SUFFIX));

        let file = File::create(&tmp).with_context(|| format!("Could not create {}", tmp.display()))?;
        let mut writer = BufWriter::new(file);
        writer.write_all(value.as_bytes())?;
        writer.flush()?;
        drop(writer);

        fs::rename(&tmp, &path).with_context(|| format!("Could not replace {}", path.display()))?;
        debug!(key, path = %path.display(), bytes = value.len(), "wrote store entry");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_key_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(dir.path()).unwrap();
        assert_eq!(store.get("nothing").unwrap(), None);
    }

    #[test]
    fn test_set_then_get_survives_new_instance() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("nested")).unwrap();
        store.set("drinks", "[1,2,3]").unwrap();
        store.set("drinks", "[4]").unwrap();

        let reopened = FileKeyValueStore::new(dir.path().join("nested")).unwrap();
        assert_eq!(reopened.get("drinks").unwrap().as_deref(), Some("[4]"));
        assert!(reopened.path_for("drinks").exists());
    }
}
