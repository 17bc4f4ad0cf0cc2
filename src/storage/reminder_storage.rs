use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::reminder::Reminder;

use super::model::{NewReminder, UpdateReminder};

#[async_trait]
pub trait ReminderStorage: Send + Sync {
    async fn insert(&self, reminder: NewReminder) -> anyhow::Result<Reminder>;
    /// Returns `None` when there is no reminder with the given id.
    async fn update(&self, id: &str, update: UpdateReminder) -> anyhow::Result<Option<Reminder>>;
    async fn remove(&self, id: &str) -> anyhow::Result<Option<Reminder>>;
    async fn get(&self, id: &str) -> anyhow::Result<Option<Reminder>>;
    async fn get_all(&self) -> anyhow::Result<Vec<Reminder>>;
}

pub struct InMemoryReminderStorage {
    store: RwLock<Vec<Reminder>>,
}

impl InMemoryReminderStorage {
    pub fn new() -> Self {
        Self::with_reminders(Vec::new())
    }

    pub fn with_reminders(reminders: Vec<Reminder>) -> Self {
        InMemoryReminderStorage {
            store: RwLock::new(reminders),
        }
    }
}

impl Default for InMemoryReminderStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReminderStorage for InMemoryReminderStorage {
    async fn insert(&self, reminder: NewReminder) -> anyhow::Result<Reminder> {
        let reminder = reminder.into_reminder();
        self.store.write().await.push(reminder.clone());
        log::info!("Stored reminder {}", reminder.id);
        Ok(reminder)
    }

    async fn update(&self, id: &str, update: UpdateReminder) -> anyhow::Result<Option<Reminder>> {
        let mut store = self.store.write().await;
        Ok(store.iter_mut().find(|r| r.id == id).map(|reminder| {
            update.apply(reminder);
            reminder.clone()
        }))
    }

    async fn remove(&self, id: &str) -> anyhow::Result<Option<Reminder>> {
        let mut store = self.store.write().await;
        let removed = store
            .iter()
            .position(|r| r.id == id)
            .map(|index| store.remove(index));
        Ok(removed)
    }

    async fn get(&self, id: &str) -> anyhow::Result<Option<Reminder>> {
        let store = self.store.read().await;
        Ok(store.iter().find(|r| r.id == id).cloned())
    }

    async fn get_all(&self) -> anyhow::Result<Vec<Reminder>> {
        Ok(self.store.read().await.clone())
    }
}
