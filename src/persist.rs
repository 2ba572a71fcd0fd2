use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::store::ShoppingListItem;

/// Opaque durable store for the shopping list. The navigation engine only
/// needs save/load/clear; consistency beyond that is the store's business.
pub trait ListStore: Send + Sync {
    fn save(&self, items: &[ShoppingListItem]) -> Result<()>;
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Vec<ShoppingListItem>>>;
    fn clear(&self) -> Result<()>;
}

/// JSON blob on disk, the desktop analogue of the original's browser
/// local-storage entry.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonFileStore {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ListStore for JsonFileStore {
    fn save(&self, items: &[ShoppingListItem]) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("creating {}", dir.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(items)?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing {}", self.path.display()))?;
        debug!(path = %self.path.display(), count = items.len(), "shopping list saved");
        Ok(())
    }

    fn load(&self) -> Result<Option<Vec<ShoppingListItem>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let items = serde_json::from_str(&json)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(Some(items))
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("removing {}", self.path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ItemStatus, ShoppingListItem};
    use uuid::Uuid;

    fn temp_store() -> JsonFileStore {
        let path = std::env::temp_dir().join(format!("storepilot-list-{}.json", Uuid::new_v4()));
        JsonFileStore::new(path)
    }

    #[test]
    fn test_load_before_any_save() {
        let store = temp_store();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_load_clear() {
        let store = temp_store();
        let mut items = vec![
            ShoppingListItem::new("Milk", 3.50, "dairy-cheese"),
            ShoppingListItem::new("Bread", 2.25, "bakery"),
        ];
        items[1].status = ItemStatus::InCart;

        store.save(&items).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, items);

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupted_blob_is_an_error() {
        let store = temp_store();
        fs::write(&store.path, "not json").unwrap();
        assert!(store.load().is_err());
        store.clear().unwrap();
    }
}
