mod common;
mod notification_id;
mod registration;
mod scheduler;

pub use common::{PermissionOutcome, SchedulerError, SchedulerResult, SyncReport};
pub use notification_id::compute_notification_id;
pub use registration::{RegistrationTemplate, expand, weekday_of};
pub use scheduler::ReminderScheduler;
