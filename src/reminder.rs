use std::collections::BTreeSet;

use chrono::{NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

pub type ReminderId = String;

/// Day of week as stored on a reminder. 0 is Sunday.
pub type ReminderDay = i32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: ReminderId,
    pub label: String,
    #[serde(default)]
    pub days_of_week: BTreeSet<ReminderDay>,
    #[serde(default)]
    pub times: BTreeSet<String>,
}

/// A wall-clock `HH:mm` time a reminder fires at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderFireTime(NaiveTime);

impl ReminderFireTime {
    /// Returns `None` when the string is not a valid `HH:mm` time. A trailing
    /// `:ss` is accepted and the seconds are dropped.
    pub fn parse(time: &str) -> Option<Self> {
        let time = time.trim();
        NaiveTime::parse_from_str(time, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
            .ok()
            .and_then(|time| time.with_second(0))
            .map(Self)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }
}

pub fn generate_reminder_id() -> ReminderId {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("reminder-{}-{}", Utc::now().timestamp_millis(), &suffix[..9])
}
