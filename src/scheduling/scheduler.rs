use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::{
    appsettings::NotificationSettings,
    notification::{
        ChannelDescriptor, NotificationId, NotificationRegistration, PermissionState,
    },
    platform::{NotificationPlatform, PlatformKind},
    reminder::Reminder,
};

use super::{
    common::{PermissionOutcome, SchedulerError, SchedulerResult, SyncReport},
    registration::{self, RegistrationTemplate},
};

/// Keeps the platform's local notifications in line with reminder records.
///
/// Every operation short-circuits with a skipped report when the platform
/// probe says notifications are not available.
pub struct ReminderScheduler {
    platform: Arc<dyn NotificationPlatform>,
    channel: ChannelDescriptor,
    template: RegistrationTemplate,
    channel_initialized: AtomicBool,
}

impl ReminderScheduler {
    pub fn new(platform: Arc<dyn NotificationPlatform>, settings: &NotificationSettings) -> Self {
        let channel = settings.channel.descriptor();
        let channel_id = match platform.kind() {
            PlatformKind::Android => Some(channel.id.clone()),
            _ => None,
        };

        Self {
            platform,
            template: RegistrationTemplate {
                body: settings.body.clone(),
                channel_id,
            },
            channel,
            channel_initialized: AtomicBool::new(false),
        }
    }

    pub fn expand(&self, reminder: &Reminder) -> Vec<NotificationRegistration> {
        registration::expand(reminder, &self.template)
    }

    pub fn notification_ids(&self, reminder: &Reminder) -> Vec<NotificationId> {
        registration::ids_of(&self.expand(reminder))
    }

    pub async fn schedule(&self, reminder: &Reminder) -> SchedulerResult<SyncReport> {
        if !self.platform.is_available() {
            return Ok(SyncReport::skipped());
        }

        self.register(self.expand(reminder)).await
    }

    pub async fn cancel(&self, reminder: &Reminder) -> SchedulerResult<SyncReport> {
        if !self.platform.is_available() {
            return Ok(SyncReport::skipped());
        }

        let ids = self.notification_ids(reminder);
        if ids.is_empty() {
            return Ok(SyncReport::default());
        }

        self.platform
            .cancel(&ids)
            .await
            .map_err(SchedulerError::Cancel)?;

        Ok(SyncReport {
            cancelled: ids,
            ..Default::default()
        })
    }

    /// Replaces the registrations of `previous` with those of `current`.
    /// The old set is always cancelled before the new one is registered.
    pub async fn reschedule(
        &self,
        previous: &Reminder,
        current: &Reminder,
    ) -> SchedulerResult<SyncReport> {
        if !self.platform.is_available() {
            return Ok(SyncReport::skipped());
        }

        let mut report = SyncReport::default();
        let previous_ids = self.notification_ids(previous);
        if !previous_ids.is_empty() {
            match self.platform.cancel(&previous_ids).await {
                Ok(()) => report.cancelled = previous_ids,
                Err(error) => {
                    log::debug!(
                        "Could not cancel previous notifications. [reminder_id = {}]",
                        previous.id
                    );
                    report.warnings.push(SchedulerError::Cancel(error));
                }
            }
        }

        report.merge(self.register(self.expand(current)).await?);
        Ok(report)
    }

    pub async fn reschedule_all(&self, reminders: &[Reminder]) -> SchedulerResult<SyncReport> {
        if !self.platform.is_available() {
            return Ok(SyncReport::skipped());
        }

        let notifications = reminders
            .iter()
            .flat_map(|reminder| self.expand(reminder))
            .collect();

        self.register(notifications).await
    }

    pub async fn permission_status(&self) -> SchedulerResult<PermissionState> {
        if !self.platform.is_available() {
            return Ok(PermissionState::Unsupported);
        }

        let response = self
            .platform
            .check_permission()
            .await
            .map_err(SchedulerError::Permission)?;

        Ok(response.normalize())
    }

    /// Asks for permission unless it is already granted. When this call is
    /// what granted it, every reminder in `reminders` is registered again.
    pub async fn ensure_permission(
        &self,
        reminders: &[Reminder],
    ) -> SchedulerResult<PermissionOutcome> {
        if !self.platform.is_available() {
            return Ok(PermissionOutcome {
                status: PermissionState::Unsupported,
                resync: None,
                warnings: Vec::new(),
            });
        }

        let previous = self.permission_status().await?;
        let status = if previous.is_granted() {
            previous
        } else {
            self.platform
                .request_permission()
                .await
                .map_err(SchedulerError::Permission)?
                .normalize()
        };

        let mut outcome = PermissionOutcome {
            status,
            resync: None,
            warnings: Vec::new(),
        };

        if status.is_granted() {
            if let Err(error) = self.ensure_channel().await {
                outcome.warnings.push(error);
            }

            if !previous.is_granted() {
                log::debug!(
                    "Notification permission granted, registering {} reminders",
                    reminders.len()
                );
                outcome.resync = Some(self.reschedule_all(reminders).await);
            }
        }

        Ok(outcome)
    }

    async fn register(
        &self,
        notifications: Vec<NotificationRegistration>,
    ) -> SchedulerResult<SyncReport> {
        let mut report = SyncReport::default();
        if notifications.is_empty() {
            return Ok(report);
        }

        self.ensure_channel().await?;

        let ids = registration::ids_of(&notifications);
        match self.platform.cancel(&ids).await {
            Ok(()) => report.cancelled = ids.clone(),
            Err(error) => {
                log::debug!("Could not clear notifications before scheduling: {error}");
                report.warnings.push(SchedulerError::Cancel(error));
            }
        }

        self.platform
            .schedule(&notifications)
            .await
            .map_err(SchedulerError::Schedule)?;
        report.scheduled = ids;

        Ok(report)
    }

    async fn ensure_channel(&self) -> SchedulerResult<()> {
        if self.platform.kind() != PlatformKind::Android
            || self.channel_initialized.load(Ordering::Acquire)
        {
            return Ok(());
        }

        self.platform
            .create_channel(&self.channel)
            .await
            .map_err(SchedulerError::Channel)?;
        self.channel_initialized.store(true, Ordering::Release);

        Ok(())
    }
}
