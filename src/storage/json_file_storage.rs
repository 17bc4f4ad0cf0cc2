use std::{io::ErrorKind, path::PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::reminder::Reminder;

use super::{
    ReminderStorage,
    model::{NewReminder, UpdateReminder},
};

type Document = Map<String, Value>;

/// Reminders kept under one key of a JSON key-value document on disk.
///
/// Other keys in the document are left untouched. A missing document reads
/// as no reminders. Entries that do not decode are skipped on read and written
/// back unchanged, and a document that cannot be read is never overwritten.
pub struct JsonFileReminderStorage {
    path: PathBuf,
    key: String,
    lock: Mutex<()>,
}

/// The stored list split into decoded reminders and entries kept as raw JSON.
struct StoredList {
    reminders: Vec<Reminder>,
    malformed: Vec<Value>,
}

impl JsonFileReminderStorage {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read_document(&self) -> anyhow::Result<Document> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Document::new()),
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("Could not read {}", self.path.display()));
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Document::new());
        }

        match serde_json::from_slice::<Value>(&bytes)
            .with_context(|| format!("{} is not valid JSON", self.path.display()))?
        {
            Value::Object(document) => Ok(document),
            _ => anyhow::bail!("{} is not a JSON object", self.path.display()),
        }
    }

    fn decode_list(&self, document: &Document) -> anyhow::Result<StoredList> {
        let entries: &[Value] = match document.get(&self.key) {
            None | Some(Value::Null) => &[],
            Some(Value::Array(entries)) => entries,
            Some(_) => anyhow::bail!("Stored reminders under {} are not a list", self.key),
        };

        let mut list = StoredList {
            reminders: Vec::with_capacity(entries.len()),
            malformed: Vec::new(),
        };
        for entry in entries {
            match serde_json::from_value::<Reminder>(entry.clone()) {
                Ok(reminder) => list.reminders.push(reminder),
                Err(error) => {
                    log::warn!(
                        "Skipping malformed stored reminder. [key = {}, entry = {}, error = {}]",
                        self.key,
                        entry,
                        error
                    );
                    list.malformed.push(entry.clone());
                }
            }
        }

        Ok(list)
    }

    async fn load(&self) -> Vec<Reminder> {
        let loaded = self
            .read_document()
            .await
            .and_then(|document| self.decode_list(&document));

        match loaded {
            Ok(list) => list.reminders,
            Err(error) => {
                log::warn!(
                    "Could not load reminders, reading none. [path = {}, error = {:#}]",
                    self.path.display(),
                    error
                );
                Vec::new()
            }
        }
    }

    async fn write_document(&self, document: Document) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Could not create {}", parent.display()))?;
        }

        let contents = serde_json::to_vec_pretty(&Value::Object(document))?;
        tokio::fs::write(&self.path, contents)
            .await
            .with_context(|| format!("Could not write {}", self.path.display()))
    }

    /// Read-modify-write of the stored list under the storage lock. Fails
    /// without writing when the current document cannot be read.
    async fn modify<R>(&self, f: impl FnOnce(&mut Vec<Reminder>) -> R) -> anyhow::Result<R> {
        let _guard = self.lock.lock().await;
        let mut document = self.read_document().await?;
        let StoredList {
            mut reminders,
            malformed,
        } = self.decode_list(&document)?;

        let result = f(&mut reminders);

        let mut entries = reminders
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        entries.extend(malformed);
        document.insert(self.key.clone(), Value::Array(entries));
        self.write_document(document).await?;
        Ok(result)
    }
}

#[async_trait]
impl ReminderStorage for JsonFileReminderStorage {
    async fn insert(&self, reminder: NewReminder) -> anyhow::Result<Reminder> {
        let reminder = reminder.into_reminder();
        let stored = reminder.clone();
        self.modify(move |reminders| reminders.push(stored)).await?;
        log::info!("Stored reminder {}", reminder.id);
        Ok(reminder)
    }

    async fn update(&self, id: &str, update: UpdateReminder) -> anyhow::Result<Option<Reminder>> {
        self.modify(|reminders| {
            reminders.iter_mut().find(|r| r.id == id).map(|reminder| {
                update.apply(reminder);
                reminder.clone()
            })
        })
        .await
    }

    async fn remove(&self, id: &str) -> anyhow::Result<Option<Reminder>> {
        self.modify(|reminders| {
            reminders
                .iter()
                .position(|r| r.id == id)
                .map(|index| reminders.remove(index))
        })
        .await
    }

    async fn get(&self, id: &str) -> anyhow::Result<Option<Reminder>> {
        Ok(self.load().await.into_iter().find(|r| r.id == id))
    }

    async fn get_all(&self) -> anyhow::Result<Vec<Reminder>> {
        Ok(self.load().await)
    }
}
