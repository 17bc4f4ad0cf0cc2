use chrono::Weekday;

use crate::{
    notification::{NotificationId, NotificationRegistration, RegistrationSource},
    reminder::{Reminder, ReminderDay, ReminderFireTime},
};

use super::notification_id::compute_notification_id;

/// Content shared by every registration a scheduler produces.
#[derive(Debug, Clone)]
pub struct RegistrationTemplate {
    pub body: String,
    pub channel_id: Option<String>,
}

const WEEK_FROM_SUNDAY: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Stored days count from Sunday = 0. Out of range values wrap around.
pub fn weekday_of(day: ReminderDay) -> Weekday {
    WEEK_FROM_SUNDAY[day.rem_euclid(7) as usize]
}

/// Weekly registrations for every day and time of the reminder. Times that
/// are not valid `HH:mm` values are skipped.
pub fn expand(reminder: &Reminder, template: &RegistrationTemplate) -> Vec<NotificationRegistration> {
    reminder
        .days_of_week
        .iter()
        .flat_map(|&day| {
            reminder.times.iter().filter_map(move |time| {
                let fire_at = ReminderFireTime::parse(time)?;
                Some(NotificationRegistration {
                    id: compute_notification_id(&reminder.id, day, time),
                    title: reminder.label.clone(),
                    body: template.body.clone(),
                    weekday: weekday_of(day).number_from_sunday(),
                    hour: fire_at.hour(),
                    minute: fire_at.minute(),
                    repeats: true,
                    allow_while_idle: true,
                    channel_id: template.channel_id.clone(),
                    source: RegistrationSource {
                        reminder_id: reminder.id.clone(),
                        day,
                        time: time.clone(),
                    },
                })
            })
        })
        .collect()
}

pub fn ids_of(notifications: &[NotificationRegistration]) -> Vec<NotificationId> {
    notifications.iter().map(|notification| notification.id).collect()
}
