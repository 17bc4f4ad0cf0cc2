use thiserror::Error;

use crate::notification::{NotificationId, PermissionState};

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Failed to query notification permission: {0:#}")]
    Permission(anyhow::Error),

    #[error("Failed to create notification channel: {0:#}")]
    Channel(anyhow::Error),

    #[error("Failed to cancel notifications: {0:#}")]
    Cancel(anyhow::Error),

    #[error("Failed to schedule notifications: {0:#}")]
    Schedule(anyhow::Error),
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// What a sync operation did on the platform.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// The platform has no notification support; nothing was attempted.
    pub skipped: bool,
    pub cancelled: Vec<NotificationId>,
    pub scheduled: Vec<NotificationId>,
    /// Best-effort steps that failed without aborting the operation.
    pub warnings: Vec<SchedulerError>,
}

impl SyncReport {
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Default::default()
        }
    }

    pub(super) fn merge(&mut self, other: SyncReport) {
        self.skipped |= other.skipped;
        self.cancelled.extend(other.cancelled);
        self.scheduled.extend(other.scheduled);
        self.warnings.extend(other.warnings);
    }
}

#[derive(Debug)]
pub struct PermissionOutcome {
    pub status: PermissionState,
    /// Set when this call moved the permission to granted.
    pub resync: Option<SchedulerResult<SyncReport>>,
    pub warnings: Vec<SchedulerError>,
}

impl PermissionOutcome {
    pub fn granted(&self) -> bool {
        self.status.is_granted()
    }
}
