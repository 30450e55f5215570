//! In-memory user directory
//!
//! Reference [`UserDirectory`] implementation used by tests and
//! single-process embedders. A single async mutex covers the whole
//! check-then-insert, which is what makes duplicate-email races resolve to
//! exactly one winner.

use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{DirectoryError, Identity, NewIdentity, UserDirectory};

/// In-memory identity store keyed by exact email
#[derive(Default)]
pub struct InMemoryDirectory {
    records: Mutex<HashMap<String, Identity>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored identities
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait::async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, DirectoryError> {
        let records = self.records.lock().await;
        Ok(records.get(email).cloned())
    }

    async fn create(&self, new: NewIdentity) -> Result<Identity, DirectoryError> {
        let mut records = self.records.lock().await;
        if records.contains_key(&new.email) {
            return Err(DirectoryError::Conflict);
        }

        let now = Utc::now();
        let identity = Identity {
            id: Uuid::new_v4(),
            email: new.email.clone(),
            password_hash: new.password_hash,
            name: new.name,
            created_at: now,
            updated_at: now,
        };

        records.insert(new.email, identity.clone());
        Ok(identity)
    }
}
