mod json_file_storage;
mod model;
mod reminder_storage;

pub use json_file_storage::JsonFileReminderStorage;
pub use model::{NewReminder, UpdateReminder};
pub use reminder_storage::{InMemoryReminderStorage, ReminderStorage};
