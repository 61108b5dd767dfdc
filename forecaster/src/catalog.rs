use crate::models::Item;
use std::collections::HashSet;
use std::path::Path;

/// Error types for catalog loading
#[derive(Debug)]
pub enum CatalogError {
    Io(String),
    Parse(String),
    InvalidItem { index: usize, reason: String },
    DuplicateId(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io(msg) => write!(f, "Failed to read catalog: {}", msg),
            CatalogError::Parse(msg) => write!(f, "Failed to parse catalog: {}", msg),
            CatalogError::InvalidItem { index, reason } => {
                write!(f, "Invalid catalog entry #{}: {}", index, reason)
            }
            CatalogError::DuplicateId(id) => write!(f, "Duplicate item id: {}", id),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Immutable set of shop items, validated at load time.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Io(format!("{}: {}", path.display(), e)))?;
        let catalog = Self::from_json(&raw)?;

        log::info!("Loaded {} items from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let items: Vec<Item> =
            serde_json::from_str(raw).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::from_items(items)
    }

    /// Rejects the whole set if any entry is malformed.
    pub fn from_items(items: Vec<Item>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();

        for (index, item) in items.iter().enumerate() {
            if item.id.trim().is_empty() {
                return Err(CatalogError::InvalidItem {
                    index,
                    reason: "empty id".to_string(),
                });
            }
            if !item.price.is_finite() || item.price <= 0.0 {
                return Err(CatalogError::InvalidItem {
                    index,
                    reason: format!("price must be positive, got {}", item.price),
                });
            }
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::DuplicateId(item.id.clone()));
            }
        }

        Ok(Self { items })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
