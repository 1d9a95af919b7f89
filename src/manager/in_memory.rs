//! In-memory identity store.
//!
//! Thread-safe group storage behind a tokio `RwLock`, intended for development,
//! testing and the bundled server binary. Creation order is kept so listings are
//! stable across calls. `displayName` uniqueness is checked under the same write
//! lock as the insert or update it guards.

use super::UserManager;
use crate::error::{ScimError, ScimResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Thread-safe in-memory [`UserManager`].
#[derive(Clone, Default)]
pub struct InMemoryUserManager {
    groups: Arc<RwLock<GroupTable>>,
}

#[derive(Default)]
struct GroupTable {
    by_id: HashMap<String, Value>,
    // ids in creation order
    order: Vec<String>,
}

impl GroupTable {
    fn ensure_unique_name(&self, group: &Value, own_id: &str) -> ScimResult<()> {
        let Some(name) = display_name(group) else {
            return Ok(());
        };
        let taken = self
            .by_id
            .iter()
            .any(|(id, existing)| id != own_id && display_name(existing) == Some(name));
        if taken {
            return Err(ScimError::uniqueness(format!(
                "Group with displayName '{}' already exists",
                name
            )));
        }
        Ok(())
    }
}

impl InMemoryUserManager {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored groups.
    pub async fn len(&self) -> usize {
        self.groups.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Clear all data (useful for testing).
    pub async fn clear(&self) {
        let mut table = self.groups.write().await;
        table.by_id.clear();
        table.order.clear();
    }
}

fn group_id(group: &Value) -> ScimResult<String> {
    group
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ScimError::internal("group is missing its id"))
}

fn display_name(group: &Value) -> Option<&str> {
    group.get("displayName").and_then(Value::as_str)
}

impl UserManager for InMemoryUserManager {
    async fn create_group(&self, group: Value) -> ScimResult<Value> {
        let id = group_id(&group)?;
        let mut table = self.groups.write().await;
        if table.by_id.contains_key(&id) {
            return Err(ScimError::uniqueness(format!("Group id '{}' already exists", id)));
        }
        table.ensure_unique_name(&group, &id)?;
        table.order.push(id.clone());
        table.by_id.insert(id, group.clone());
        Ok(group)
    }

    async fn get_group(&self, id: &str) -> ScimResult<Option<Value>> {
        Ok(self.groups.read().await.by_id.get(id).cloned())
    }

    async fn update_group(&self, id: &str, group: Value) -> ScimResult<Option<Value>> {
        let mut table = self.groups.write().await;
        if table.by_id.contains_key(id) {
            table.ensure_unique_name(&group, id)?;
        }
        match table.by_id.get_mut(id) {
            Some(slot) => {
                *slot = group.clone();
                Ok(Some(group))
            }
            None => Ok(None),
        }
    }

    async fn delete_group(&self, id: &str) -> ScimResult<bool> {
        let mut table = self.groups.write().await;
        if table.by_id.remove(id).is_some() {
            table.order.retain(|existing| existing != id);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn list_groups(&self) -> ScimResult<Vec<Value>> {
        let table = self.groups.read().await;
        Ok(table
            .order
            .iter()
            .filter_map(|id| table.by_id.get(id).cloned())
            .collect())
    }
}
