use async_trait::async_trait;

use crate::notification::{
    ChannelDescriptor, NotificationId, NotificationRegistration, PermissionResponse,
};

use super::{NotificationPlatform, PlatformKind};

/// Environment without local notification support.
pub struct UnsupportedPlatform;

#[async_trait]
impl NotificationPlatform for UnsupportedPlatform {
    fn is_available(&self) -> bool {
        false
    }

    fn kind(&self) -> PlatformKind {
        PlatformKind::Web
    }

    async fn check_permission(&self) -> anyhow::Result<PermissionResponse> {
        anyhow::bail!("Local notifications are not available")
    }

    async fn request_permission(&self) -> anyhow::Result<PermissionResponse> {
        anyhow::bail!("Local notifications are not available")
    }

    async fn create_channel(&self, _channel: &ChannelDescriptor) -> anyhow::Result<()> {
        anyhow::bail!("Local notifications are not available")
    }

    async fn schedule(&self, _notifications: &[NotificationRegistration]) -> anyhow::Result<()> {
        anyhow::bail!("Local notifications are not available")
    }

    async fn cancel(&self, _ids: &[NotificationId]) -> anyhow::Result<()> {
        anyhow::bail!("Local notifications are not available")
    }
}
