//! Employee store backed by generic storage

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::id_generator::IdGenerator;
use crate::domain::employee::{Employee, EmployeeDraft, EmployeeId, EmployeeRepository};
use crate::domain::storage::Storage;
use crate::domain::DomainError;

/// Default number of random ids tried before falling back to a linear probe
pub const DEFAULT_MAX_RANDOM_ATTEMPTS: u32 = 32;

/// Records inserted by [`EmployeeStore::seed_demo_data`]
const DEMO_EMPLOYEES: [(&str, &str, &str, &str, &str); 5] = [
    ("11111", "Shubham", "Samhita", "e6data", "Sd1"),
    ("11112", "Suman", "Samhita", "Oracle", "Sd1"),
    ("11113", "Saurav", "Samhita", "TCS", "Sd1"),
    ("11114", "Sumit", "Samhita", "Ciena", "Sd1"),
    ("11115", "Raj", "Samhita", "ABC", "Sd1"),
];

/// Authoritative employee table
///
/// Id allocation relies on the storage's atomic insert-if-absent: a generated
/// id is only handed out if the insert under it succeeded, so two concurrent
/// creates can never share an id.
#[derive(Debug)]
pub struct EmployeeStore {
    storage: Arc<dyn Storage<Employee>>,
    ids: IdGenerator,
    max_random_attempts: u32,
}

impl EmployeeStore {
    pub fn new(storage: Arc<dyn Storage<Employee>>) -> Self {
        Self {
            storage,
            ids: IdGenerator::default(),
            max_random_attempts: DEFAULT_MAX_RANDOM_ATTEMPTS,
        }
    }

    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_max_random_attempts(mut self, attempts: u32) -> Self {
        self.max_random_attempts = attempts;
        self
    }

    /// Insert the demo records, skipping any id already taken
    pub async fn seed_demo_data(&self) -> Result<usize, DomainError> {
        let mut inserted = 0;

        for (id, name, address, company, designation) in DEMO_EMPLOYEES {
            let id = EmployeeId::new(id).map_err(|e| DomainError::internal(e.to_string()))?;
            let draft = EmployeeDraft::new(name, address, company, designation);

            match self.storage.create(Employee::from_draft(id, draft)).await {
                Ok(_) => inserted += 1,
                Err(e) if e.is_conflict() => continue,
                Err(e) => return Err(e),
            }
        }

        info!(inserted = inserted, "Seeded demo employees");
        Ok(inserted)
    }

    /// Try to claim `id`; `None` means it was already taken
    async fn try_insert(
        &self,
        id: EmployeeId,
        draft: &EmployeeDraft,
    ) -> Result<Option<Employee>, DomainError> {
        match self
            .storage
            .create(Employee::from_draft(id, draft.clone()))
            .await
        {
            Ok(employee) => Ok(Some(employee)),
            Err(e) if e.is_conflict() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn exhausted(&self) -> DomainError {
        DomainError::identifier_exhausted(format!(
            "all {} employee identifiers are in use",
            self.ids.capacity()
        ))
    }
}

#[async_trait]
impl EmployeeRepository for EmployeeStore {
    async fn create(&self, draft: EmployeeDraft) -> Result<Employee, DomainError> {
        for _ in 0..self.max_random_attempts {
            if let Some(employee) = self.try_insert(self.ids.random(), &draft).await? {
                return Ok(employee);
            }
        }

        let capacity = self.ids.capacity();
        if self.storage.count().await? as u64 >= capacity {
            return Err(self.exhausted());
        }

        warn!(
            attempts = self.max_random_attempts,
            "Random employee ids kept colliding, probing for a free id"
        );

        let start = self.ids.random_index();
        for step in 0..capacity {
            if let Some(employee) = self.try_insert(self.ids.at(start + step), &draft).await? {
                return Ok(employee);
            }
        }

        Err(self.exhausted())
    }

    async fn get(&self, id: &EmployeeId) -> Result<Option<Employee>, DomainError> {
        debug!(employee_id = %id, "Reading employee from store");
        self.storage.get(id).await
    }

    async fn list(&self) -> Result<Vec<Employee>, DomainError> {
        self.storage.list().await
    }

    async fn update(&self, id: &EmployeeId, draft: EmployeeDraft) -> Result<Employee, DomainError> {
        self.storage
            .update(Employee::from_draft(id.clone(), draft))
            .await
    }

    async fn delete(&self, id: &EmployeeId) -> Result<bool, DomainError> {
        self.storage.delete(id).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        self.storage.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::mock::MockStorage;
    use crate::infrastructure::storage::InMemoryStorage;
    use std::collections::HashSet;

    fn store() -> EmployeeStore {
        EmployeeStore::new(Arc::new(InMemoryStorage::<Employee>::new()))
    }

    fn ann() -> EmployeeDraft {
        EmployeeDraft::new("Ann", "X", "Y", "Eng")
    }

    fn id(value: &str) -> EmployeeId {
        EmployeeId::new(value).unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_six_digit_id() {
        let store = store();

        let employee = store.create(ann()).await.unwrap();

        assert_eq!(employee.id().as_str().len(), 6);
        assert!(employee.id().as_str().chars().all(|c| c.is_ascii_digit()));
        assert_eq!(employee.name(), "Ann");

        let fetched = store.get(employee.id()).await.unwrap().unwrap();
        assert_eq!(fetched, employee);
    }

    #[tokio::test]
    async fn test_create_many_gives_distinct_ids() {
        let store = store();
        let mut seen = HashSet::new();

        for _ in 0..200 {
            let employee = store.create(ann()).await.unwrap();
            assert!(seen.insert(employee.id().clone()));
        }

        assert_eq!(store.count().await.unwrap(), 200);
    }

    #[tokio::test]
    async fn test_concurrent_creates_never_share_an_id() {
        let store = Arc::new(store().with_id_generator(IdGenerator::new(3).unwrap()));

        let handles: Vec<_> = (0..100)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.create(ann()).await })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in futures::future::join_all(handles).await {
            let employee = handle.unwrap().unwrap();
            assert!(seen.insert(employee.id().clone()));
        }

        assert_eq!(seen.len(), 100);
        assert_eq!(store.count().await.unwrap(), 100);
    }

    #[tokio::test]
    async fn test_probe_fills_the_last_free_id() {
        let store = store()
            .with_id_generator(IdGenerator::new(1).unwrap())
            .with_max_random_attempts(0);

        for _ in 0..10 {
            store.create(ann()).await.unwrap();
        }

        assert_eq!(store.count().await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_create_fails_when_id_space_is_full() {
        let store = store().with_id_generator(IdGenerator::new(1).unwrap());

        for _ in 0..10 {
            store.create(ann()).await.unwrap();
        }

        let result = store.create(ann()).await;
        assert!(matches!(
            result,
            Err(DomainError::IdentifierExhausted { .. })
        ));
        assert_eq!(store.count().await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_update_replaces_record() {
        let store = store();
        let created = store.create(ann()).await.unwrap();

        let updated = store
            .update(created.id(), EmployeeDraft::new("Ann", "Z", "Y", "Eng"))
            .await
            .unwrap();

        assert_eq!(updated.id(), created.id());
        assert_eq!(updated.address(), "Z");
        assert_eq!(
            store.get(created.id()).await.unwrap().unwrap().address(),
            "Z"
        );
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found_and_creates_nothing() {
        let store = store();

        let result = store.update(&id("11111"), ann()).await;

        assert!(result.unwrap_err().is_not_found());
        assert!(store.get(&id("11111")).await.unwrap().is_none());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = store();
        let created = store.create(ann()).await.unwrap();

        assert!(store.delete(created.id()).await.unwrap());
        assert!(!store.delete(created.id()).await.unwrap());
        assert!(store.get(created.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_storage_error_is_not_retried_as_collision() {
        let storage = Arc::new(MockStorage::<Employee>::new().with_error("table unavailable"));
        let store = EmployeeStore::new(storage.clone());

        let result = store.create(ann()).await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
        assert_eq!(storage.create_attempts(), 1);
    }

    #[tokio::test]
    async fn test_create_skips_taken_id() {
        let taken = Employee::from_draft(id("7"), ann());
        let storage = Arc::new(MockStorage::<Employee>::new().with_entity(taken));
        let store = EmployeeStore::new(storage.clone())
            .with_id_generator(IdGenerator::new(1).unwrap());

        for _ in 0..9 {
            let created = store.create(ann()).await.unwrap();
            assert_ne!(created.id().as_str(), "7");
        }
        assert_eq!(store.count().await.unwrap(), 10);

        storage.set_outage(Some("disk full".to_string()));
        assert!(store.count().await.is_err());
    }

    #[tokio::test]
    async fn test_full_space_stops_after_random_attempts() {
        let storage = Arc::new(MockStorage::<Employee>::new());
        let store = EmployeeStore::new(storage.clone())
            .with_id_generator(IdGenerator::new(1).unwrap())
            .with_max_random_attempts(4);

        for _ in 0..10 {
            store.create(ann()).await.unwrap();
        }
        let before = storage.create_attempts();

        assert!(store.create(ann()).await.is_err());
        assert_eq!(storage.create_attempts() - before, 4);
    }

    #[tokio::test]
    async fn test_seed_demo_data() {
        let store = store();

        assert_eq!(store.seed_demo_data().await.unwrap(), 5);
        assert_eq!(store.seed_demo_data().await.unwrap(), 0);

        let raj = store.get(&id("11115")).await.unwrap().unwrap();
        assert_eq!(raj.name(), "Raj");
        assert_eq!(raj.company(), "ABC");
        assert_eq!(store.count().await.unwrap(), 5);
    }
}
