use std::fmt;

use serde::{Deserialize, Serialize};

use crate::reminder::{ReminderDay, ReminderId};

/// Identifier of a single platform notification. Never 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NotificationId(u32);

impl NotificationId {
    pub fn new(value: u32) -> Self {
        Self(if value == 0 { 1 } else { value })
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a registration came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSource {
    pub reminder_id: ReminderId,
    pub day: ReminderDay,
    pub time: String,
}

/// A weekly repeating local notification derived from a reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRegistration {
    pub id: NotificationId,
    pub title: String,
    pub body: String,
    /// 1 = Sunday .. 7 = Saturday.
    pub weekday: u32,
    pub hour: u32,
    pub minute: u32,
    pub repeats: bool,
    pub allow_while_idle: bool,
    pub channel_id: Option<String>,
    pub source: RegistrationSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelImportance {
    Low,
    Default,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelVisibility {
    Private,
    Public,
    Secret,
}

/// Android notification channel grouping reminder notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub importance: ChannelImportance,
    pub visibility: ChannelVisibility,
    pub vibration: bool,
    pub sound: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Denied,
    Prompt,
    Unsupported,
}

impl PermissionState {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionState::Granted)
    }

    fn from_platform_value(value: &str) -> Self {
        match value {
            "granted" => PermissionState::Granted,
            "denied" => PermissionState::Denied,
            _ => PermissionState::Prompt,
        }
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            PermissionState::Granted => "granted",
            PermissionState::Denied => "denied",
            PermissionState::Prompt => "prompt",
            PermissionState::Unsupported => "unsupported",
        };
        f.write_str(value)
    }
}

/// Raw permission answer as reported by a platform. Platforms disagree on
/// which field carries the state, so the first one present wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionResponse {
    pub display: Option<String>,
    pub permission: Option<String>,
    pub state: Option<String>,
    pub notifications: Option<String>,
}

impl PermissionResponse {
    pub fn display(value: impl Into<String>) -> Self {
        Self {
            display: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn normalize(&self) -> PermissionState {
        self.display
            .as_deref()
            .or(self.permission.as_deref())
            .or(self.state.as_deref())
            .or(self.notifications.as_deref())
            .map(PermissionState::from_platform_value)
            .unwrap_or(PermissionState::Prompt)
    }
}
