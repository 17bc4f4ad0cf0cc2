use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::{
    notification::{ChannelDescriptor, ChannelImportance, ChannelVisibility, PermissionState},
    platform::{PermissionAnswer, PlatformKind},
};

pub const DEFAULT_STORAGE_KEY: &str = "prayer_app_reminders";

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ChannelSettings {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            id: "prayer-reminders".to_owned(),
            name: "Prayer Reminders".to_owned(),
            description: "Prayer reminder notifications".to_owned(),
        }
    }
}

impl ChannelSettings {
    pub fn descriptor(&self) -> ChannelDescriptor {
        ChannelDescriptor {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            importance: ChannelImportance::High,
            visibility: ChannelVisibility::Public,
            vibration: true,
            sound: "default".to_owned(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct NotificationSettings {
    pub body: String,
    pub channel: ChannelSettings,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            body: "Take a moment to pray.".to_owned(),
            channel: ChannelSettings::default(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct StorageSettings {
    pub path: PathBuf,
    pub key: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("reminders.json"),
            key: DEFAULT_STORAGE_KEY.to_owned(),
        }
    }
}

/// The simulated device the CLI schedules against.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct DeviceSettings {
    pub enabled: bool,
    pub kind: PlatformKind,
    pub permission: PermissionState,
    pub answer: PermissionAnswer,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            kind: PlatformKind::Android,
            permission: PermissionState::Prompt,
            answer: PermissionAnswer::Grant,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AppSettings {
    pub notifications: NotificationSettings,
    pub storage: StorageSettings,
    pub device: DeviceSettings,
}

impl AppSettings {
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("appsettings").required(false))
            .add_source(File::with_name("appsettings.local").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
