//! Process-local record table

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::storage::{Storage, StorageEntity, StorageKey};
use crate::domain::DomainError;

type Rows<E> = HashMap<String, E>;

/// Record table held in a `RwLock`ed map.
///
/// Each call holds the lock for its whole body, which is what makes `create`
/// and `update` atomic. Contents are lost on restart.
#[derive(Debug)]
pub struct InMemoryStorage<E>
where
    E: StorageEntity,
{
    rows: RwLock<Rows<E>>,
}

impl<E> Default for InMemoryStorage<E>
where
    E: StorageEntity,
{
    fn default() -> Self {
        Self::with_entities(Vec::new())
    }
}

impl<E> InMemoryStorage<E>
where
    E: StorageEntity,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entities(entities: Vec<E>) -> Self {
        let rows = entities
            .into_iter()
            .map(|entity| (entity.key().as_str().to_string(), entity))
            .collect();

        Self {
            rows: RwLock::new(rows),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Rows<E>>, DomainError> {
        self.rows
            .read()
            .map_err(|e| DomainError::storage(format!("Storage lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Rows<E>>, DomainError> {
        self.rows
            .write()
            .map_err(|e| DomainError::storage(format!("Storage lock poisoned: {}", e)))
    }
}

#[async_trait]
impl<E> Storage<E> for InMemoryStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        Ok(self.read()?.get(key.as_str()).cloned())
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        Ok(self.read()?.values().cloned().collect())
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        let mut rows = self.write()?;
        let key = entity.key().as_str();

        if rows.contains_key(key) {
            return Err(DomainError::conflict(format!("Key '{}' is already taken", key)));
        }

        rows.insert(key.to_string(), entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, DomainError> {
        let mut rows = self.write()?;
        let Some(row) = rows.get_mut(entity.key().as_str()) else {
            return Err(DomainError::not_found(format!(
                "Key '{}' not found",
                entity.key().as_str()
            )));
        };

        *row = entity.clone();
        Ok(entity)
    }

    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
        Ok(self.write()?.remove(key.as_str()).is_some())
    }

    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        Ok(self.read()?.contains_key(key.as_str()))
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.read()?.len())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.write()?.clear();
        Ok(())
    }
}
