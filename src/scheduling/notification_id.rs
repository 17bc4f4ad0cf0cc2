use crate::{notification::NotificationId, reminder::ReminderDay};

/// Stable id of the notification for one (reminder, day, time) triple.
///
/// The day is the raw value stored on the reminder, not the platform weekday.
pub fn compute_notification_id(reminder_id: &str, day: ReminderDay, time: &str) -> NotificationId {
    let input = format!("{reminder_id}-{day}-{time}");
    NotificationId::new(rolling_hash(&input).unsigned_abs())
}

/// 32-bit `h * 31 + unit` over UTF-16 code units.
fn rolling_hash(input: &str) -> i32 {
    input.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}
