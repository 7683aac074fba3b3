// ============================================================================
// STORAGE - Persistencia local (token + usuario recordado)
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use web_sys::{window, Storage};
use crate::error::AppError;

/// Almacenamiento clave/valor durable. En el navegador es `localStorage`;
/// en tests se usa `MemoryStorage`.
pub trait TokenStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    fn remove(&self, key: &str) -> Result<(), AppError>;
}

pub fn get_local_storage() -> Option<Storage> {
    window()?.local_storage().ok()?
}

/// `localStorage` del navegador
pub struct LocalStorageBackend {
    storage: Storage,
}

impl LocalStorageBackend {
    pub fn new() -> Option<Self> {
        get_local_storage().map(|storage| Self { storage })
    }
}

impl TokenStorage for LocalStorageBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.storage
            .set_item(key, value)
            .map_err(|_| AppError::Storage("Error guardando en localStorage".to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        self.storage
            .remove_item(key)
            .map_err(|_| AppError::Storage("Error eliminando de localStorage".to_string()))
    }
}

/// Almacenamiento en memoria (tests, o navegador sin localStorage)
#[derive(Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.items.borrow_mut().insert(key.to_string(), value.to_string());
        storage
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl TokenStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Backend de storage para la app: localStorage si existe, memoria si no
pub fn browser_storage() -> Rc<dyn TokenStorage> {
    match LocalStorageBackend::new() {
        Some(backend) => Rc::new(backend),
        None => {
            log::warn!("⚠️ [STORAGE] localStorage no disponible, usando memoria");
            Rc::new(MemoryStorage::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert!(storage.get("k").is_none());
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").as_deref(), Some("v"));
        storage.remove("k").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn clones_share_items() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        other.set("token", "abc").unwrap();
        assert_eq!(storage.get("token").as_deref(), Some("abc"));
    }
}
