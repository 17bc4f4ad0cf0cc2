mod in_memory;
mod unsupported;

pub use in_memory::{InMemoryDevicePlatform, PermissionAnswer};
pub use unsupported::UnsupportedPlatform;

use async_trait::async_trait;
use serde::Deserialize;

use crate::notification::{
    ChannelDescriptor, NotificationId, NotificationRegistration, PermissionResponse,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Android,
    Ios,
    Web,
}

/// Local notification capability of the device the app runs on.
///
/// `is_available` is the capability probe. Callers must not invoke any other
/// method when it returns `false`.
#[async_trait]
pub trait NotificationPlatform: Send + Sync + 'static {
    fn is_available(&self) -> bool;

    fn kind(&self) -> PlatformKind;

    async fn check_permission(&self) -> anyhow::Result<PermissionResponse>;

    async fn request_permission(&self) -> anyhow::Result<PermissionResponse>;

    async fn create_channel(&self, channel: &ChannelDescriptor) -> anyhow::Result<()>;

    async fn schedule(&self, notifications: &[NotificationRegistration]) -> anyhow::Result<()>;

    async fn cancel(&self, ids: &[NotificationId]) -> anyhow::Result<()>;
}
