use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::notification::{
    ChannelDescriptor, NotificationId, NotificationRegistration, PermissionResponse,
    PermissionState,
};

use super::{NotificationPlatform, PlatformKind};

/// What the simulated user answers when asked for notification permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAnswer {
    Grant,
    Deny,
}

struct DeviceState {
    permission: PermissionState,
    pending: BTreeMap<NotificationId, NotificationRegistration>,
    channels: Vec<ChannelDescriptor>,
}

/// Simulated device keeping registered notifications in memory.
pub struct InMemoryDevicePlatform {
    kind: PlatformKind,
    answer: PermissionAnswer,
    state: RwLock<DeviceState>,
}

impl InMemoryDevicePlatform {
    pub fn new(kind: PlatformKind, permission: PermissionState, answer: PermissionAnswer) -> Self {
        Self {
            kind,
            answer,
            state: RwLock::new(DeviceState {
                permission,
                pending: BTreeMap::new(),
                channels: Vec::new(),
            }),
        }
    }

    pub async fn pending(&self) -> Vec<NotificationRegistration> {
        self.state.read().await.pending.values().cloned().collect()
    }

    pub async fn channels(&self) -> Vec<ChannelDescriptor> {
        self.state.read().await.channels.clone()
    }

    /// Permission withdrawn from the OS settings. Registered notifications
    /// stay registered but will not be shown.
    pub async fn revoke_permission(&self) {
        self.state.write().await.permission = PermissionState::Denied;
    }

    fn response(permission: PermissionState) -> PermissionResponse {
        PermissionResponse::display(permission.to_string())
    }
}

#[async_trait]
impl NotificationPlatform for InMemoryDevicePlatform {
    fn is_available(&self) -> bool {
        true
    }

    fn kind(&self) -> PlatformKind {
        self.kind
    }

    async fn check_permission(&self) -> anyhow::Result<PermissionResponse> {
        Ok(Self::response(self.state.read().await.permission))
    }

    async fn request_permission(&self) -> anyhow::Result<PermissionResponse> {
        let mut state = self.state.write().await;
        if state.permission == PermissionState::Prompt {
            state.permission = match self.answer {
                PermissionAnswer::Grant => PermissionState::Granted,
                PermissionAnswer::Deny => PermissionState::Denied,
            };
            log::info!("Device permission prompt answered. [permission = {}]", state.permission);
        }

        Ok(Self::response(state.permission))
    }

    async fn create_channel(&self, channel: &ChannelDescriptor) -> anyhow::Result<()> {
        if self.kind != PlatformKind::Android {
            anyhow::bail!("Notification channels are only supported on Android");
        }

        let mut state = self.state.write().await;
        state.channels.retain(|existing| existing.id != channel.id);
        state.channels.push(channel.clone());
        Ok(())
    }

    async fn schedule(&self, notifications: &[NotificationRegistration]) -> anyhow::Result<()> {
        let mut state = self.state.write().await;
        for notification in notifications {
            state.pending.insert(notification.id, notification.clone());
        }
        log::debug!("Device now holds {} notifications", state.pending.len());
        Ok(())
    }

    async fn cancel(&self, ids: &[NotificationId]) -> anyhow::Result<()> {
        let mut state = self.state.write().await;
        for id in ids {
            state.pending.remove(id);
        }
        Ok(())
    }
}
