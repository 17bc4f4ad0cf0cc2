use std::sync::Arc;

use crate::{
    notification::PermissionState,
    reminder::Reminder,
    scheduling::{PermissionOutcome, ReminderScheduler, SchedulerResult, SyncReport},
    storage::{NewReminder, ReminderStorage, UpdateReminder},
};

/// A stored reminder change together with the outcome of syncing its
/// notifications. The change is persisted whatever the sync outcome is.
#[derive(Debug)]
pub struct ReminderChange {
    pub reminder: Reminder,
    pub notifications: SchedulerResult<SyncReport>,
}

/// Reminder CRUD with notification sync, owned by the composition root.
pub struct ReminderService {
    storage: Arc<dyn ReminderStorage>,
    scheduler: ReminderScheduler,
}

impl ReminderService {
    pub fn new(storage: Arc<dyn ReminderStorage>, scheduler: ReminderScheduler) -> Self {
        Self { storage, scheduler }
    }

    pub fn scheduler(&self) -> &ReminderScheduler {
        &self.scheduler
    }

    pub async fn list(&self) -> anyhow::Result<Vec<Reminder>> {
        self.storage.get_all().await
    }

    pub async fn get(&self, id: &str) -> anyhow::Result<Option<Reminder>> {
        self.storage.get(id).await
    }

    pub async fn add(&self, reminder: NewReminder) -> anyhow::Result<ReminderChange> {
        let reminder = self.storage.insert(reminder).await?;
        let notifications = self.scheduler.schedule(&reminder).await;
        Ok(Self::change(reminder, notifications))
    }

    pub async fn update(
        &self,
        id: &str,
        update: UpdateReminder,
    ) -> anyhow::Result<Option<ReminderChange>> {
        let Some(previous) = self.storage.get(id).await? else {
            return Ok(None);
        };
        let Some(current) = self.storage.update(id, update).await? else {
            return Ok(None);
        };

        let notifications = self.scheduler.reschedule(&previous, &current).await;
        Ok(Some(Self::change(current, notifications)))
    }

    pub async fn remove(&self, id: &str) -> anyhow::Result<Option<ReminderChange>> {
        let Some(removed) = self.storage.remove(id).await? else {
            return Ok(None);
        };

        let notifications = self.scheduler.cancel(&removed).await;
        Ok(Some(Self::change(removed, notifications)))
    }

    pub async fn permission_status(&self) -> SchedulerResult<PermissionState> {
        self.scheduler.permission_status().await.inspect_err(|error| {
            log::warn!("Could not check notification permission: {error}");
        })
    }

    /// Requests notification permission, registering every stored reminder
    /// when it gets granted.
    pub async fn enable_notifications(&self) -> anyhow::Result<PermissionOutcome> {
        let reminders = self.storage.get_all().await?;
        let outcome = self.scheduler.ensure_permission(&reminders).await?;

        for warning in &outcome.warnings {
            log::warn!("{warning}");
        }
        if let Some(Err(error)) = &outcome.resync {
            log::warn!("Could not register reminders after permission was granted: {error}");
        }
        log::info!("Notification permission is {}", outcome.status);

        Ok(outcome)
    }

    /// Re-registers all stored reminders. Run on start up.
    pub async fn resync(&self) -> anyhow::Result<SyncReport> {
        if !self.permission_status().await?.is_granted() {
            log::debug!("Notifications not granted, skipping resync");
            return Ok(SyncReport::default());
        }

        let reminders = self.storage.get_all().await?;
        let report = self.scheduler.reschedule_all(&reminders).await?;
        Self::log_warnings(&report);
        log::info!(
            "Registered {} notifications for {} reminders",
            report.scheduled.len(),
            reminders.len()
        );

        Ok(report)
    }

    /// Start-up resync. Failures are logged and never stop the command that
    /// follows.
    pub async fn sync_on_startup(&self) {
        if let Err(error) = self.resync().await {
            log::warn!("Could not register reminders on start up: {error:#}");
        }
    }

    fn change(reminder: Reminder, notifications: SchedulerResult<SyncReport>) -> ReminderChange {
        match &notifications {
            Ok(report) => Self::log_warnings(report),
            Err(error) => log::warn!(
                "Notifications for reminder are out of sync. [reminder_id = {}, error = {}]",
                reminder.id,
                error
            ),
        }

        ReminderChange {
            reminder,
            notifications,
        }
    }

    fn log_warnings(report: &SyncReport) {
        for warning in &report.warnings {
            log::warn!("{warning}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::{
        platform::PlatformKind,
        scheduling::SchedulerError,
        storage::InMemoryReminderStorage,
        test_utils::{PlatformCall, RecordingPlatform, reminder, scheduler},
    };

    struct TestContext {
        platform: Arc<RecordingPlatform>,
        service: ReminderService,
    }

    impl TestContext {
        fn new(platform: RecordingPlatform, reminders: Vec<Reminder>) -> Self {
            let platform = Arc::new(platform);
            let storage = Arc::new(InMemoryReminderStorage::with_reminders(reminders));
            let service = ReminderService::new(storage, scheduler(&platform));
            Self { platform, service }
        }
    }

    fn new_reminder() -> NewReminder {
        NewReminder {
            label: "Pray for the nations".to_owned(),
            days_of_week: [1, 3].into(),
            times: ["09:00".to_owned(), "18:30".to_owned()].into(),
        }
    }

    #[tokio::test]
    async fn added_reminder_is_stored_and_scheduled() {
        let ctx = TestContext::new(RecordingPlatform::new(PlatformKind::Ios), vec![]);

        let change = ctx.service.add(new_reminder()).await.unwrap();

        assert_eq!(ctx.service.list().await.unwrap(), vec![change.reminder.clone()]);
        assert_eq!(change.notifications.unwrap().scheduled.len(), 4);
    }

    #[tokio::test]
    async fn schedule_failure_does_not_fail_the_save() {
        let platform = RecordingPlatform::new(PlatformKind::Ios);
        platform.fail_schedule.store(true, Ordering::SeqCst);
        let ctx = TestContext::new(platform, vec![]);

        let change = ctx.service.add(new_reminder()).await.unwrap();

        assert!(matches!(
            change.notifications,
            Err(SchedulerError::Schedule(_))
        ));
        assert_eq!(ctx.service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_reschedules_from_the_previous_state() {
        let stored = reminder("r1", &[1], &["09:00"]);
        let ctx = TestContext::new(RecordingPlatform::new(PlatformKind::Ios), vec![stored.clone()]);
        let previous_ids = ctx.service.scheduler().notification_ids(&stored);

        let change = ctx
            .service
            .update(
                "r1",
                UpdateReminder {
                    days_of_week: Some([2].into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        let current_ids = ctx.service.scheduler().notification_ids(&change.reminder);
        let calls = ctx.platform.calls();
        assert_eq!(calls.first(), Some(&PlatformCall::Cancel(previous_ids)));
        assert_eq!(calls.last(), Some(&PlatformCall::Schedule(current_ids)));
    }

    #[tokio::test]
    async fn removing_cancels_the_removed_reminder() {
        let stored = reminder("r1", &[1, 2], &["09:00"]);
        let ctx = TestContext::new(RecordingPlatform::new(PlatformKind::Ios), vec![stored.clone()]);
        let expected = ctx.service.scheduler().notification_ids(&stored);

        let change = ctx.service.remove("r1").await.unwrap().unwrap();

        assert_eq!(change.reminder, stored);
        assert_eq!(ctx.platform.calls(), vec![PlatformCall::Cancel(expected)]);
        assert!(ctx.service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_ids_touch_nothing() {
        let ctx = TestContext::new(RecordingPlatform::new(PlatformKind::Ios), vec![]);

        assert!(ctx.service.remove("nope").await.unwrap().is_none());
        assert!(
            ctx.service
                .update("nope", UpdateReminder::default())
                .await
                .unwrap()
                .is_none()
        );
        assert!(ctx.platform.calls().is_empty());
    }

    #[tokio::test]
    async fn enabling_notifications_registers_stored_reminders() {
        let platform = RecordingPlatform::new(PlatformKind::Ios)
            .with_permission(PermissionState::Prompt, PermissionState::Granted);
        let stored = reminder("r1", &[1], &["09:00"]);
        let ctx = TestContext::new(platform, vec![stored.clone()]);

        let outcome = ctx.service.enable_notifications().await.unwrap();

        assert!(outcome.granted());
        let expected = ctx.service.scheduler().notification_ids(&stored);
        assert_eq!(outcome.resync.unwrap().unwrap().scheduled, expected);
    }

    #[tokio::test]
    async fn resync_is_skipped_without_permission() {
        let platform = RecordingPlatform::new(PlatformKind::Ios)
            .with_permission(PermissionState::Denied, PermissionState::Denied);
        let ctx = TestContext::new(platform, vec![reminder("r1", &[1], &["09:00"])]);

        let report = ctx.service.resync().await.unwrap();

        assert!(report.scheduled.is_empty());
        assert_eq!(ctx.platform.calls(), vec![PlatformCall::CheckPermission]);
    }

    #[tokio::test]
    async fn resync_registers_everything_when_granted() {
        let reminders = vec![
            reminder("r1", &[1], &["09:00"]),
            reminder("r2", &[4], &["12:00", "bad"]),
        ];
        let ctx = TestContext::new(RecordingPlatform::new(PlatformKind::Ios), reminders);

        let report = ctx.service.resync().await.unwrap();

        assert_eq!(report.scheduled.len(), 2);
    }

    #[tokio::test]
    async fn failed_startup_sync_does_not_block_saves() {
        let platform = RecordingPlatform::new(PlatformKind::Ios);
        platform.fail_permission.store(true, Ordering::SeqCst);
        let ctx = TestContext::new(platform, vec![]);

        ctx.service.sync_on_startup().await;
        let change = ctx.service.add(new_reminder()).await.unwrap();

        assert_eq!(ctx.service.list().await.unwrap(), vec![change.reminder]);
        assert!(change.notifications.is_ok());
    }

    #[tokio::test]
    async fn unsupported_platform_keeps_crud_working() {
        let ctx = TestContext::new(RecordingPlatform::unavailable(), vec![]);

        let change = ctx.service.add(new_reminder()).await.unwrap();
        ctx.service.remove(&change.reminder.id).await.unwrap();

        assert!(change.notifications.unwrap().skipped);
        assert_eq!(
            ctx.service.permission_status().await.unwrap(),
            PermissionState::Unsupported
        );
        assert!(ctx.platform.calls().is_empty());
    }
}
