use std::collections::BTreeSet;

use crate::reminder::{Reminder, ReminderDay, generate_reminder_id};

pub struct NewReminder {
    pub label: String,
    pub days_of_week: BTreeSet<ReminderDay>,
    pub times: BTreeSet<String>,
}

impl NewReminder {
    pub(super) fn into_reminder(self) -> Reminder {
        Reminder {
            id: generate_reminder_id(),
            label: self.label,
            days_of_week: self.days_of_week,
            times: self.times,
        }
    }
}

#[derive(Default)]
pub struct UpdateReminder {
    pub label: Option<String>,
    pub days_of_week: Option<BTreeSet<ReminderDay>>,
    pub times: Option<BTreeSet<String>>,
}

impl UpdateReminder {
    pub(super) fn apply(self, reminder: &mut Reminder) {
        if let Some(label) = self.label {
            reminder.label = label;
        }
        if let Some(days_of_week) = self.days_of_week {
            reminder.days_of_week = days_of_week;
        }
        if let Some(times) = self.times {
            reminder.times = times;
        }
    }
}
