use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;

use crate::{
    appsettings::NotificationSettings,
    notification::{
        ChannelDescriptor, NotificationId, NotificationRegistration, PermissionResponse,
        PermissionState,
    },
    platform::{NotificationPlatform, PlatformKind},
    reminder::Reminder,
    scheduling::ReminderScheduler,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    CheckPermission,
    RequestPermission,
    CreateChannel(String),
    Schedule(Vec<NotificationId>),
    Cancel(Vec<NotificationId>),
}

/// Platform double recording every call made through the trait.
pub struct RecordingPlatform {
    available: bool,
    kind: PlatformKind,
    calls: Mutex<Vec<PlatformCall>>,
    permission: Mutex<PermissionState>,
    request_answer: PermissionState,
    pub fail_cancel: AtomicBool,
    pub fail_schedule: AtomicBool,
    pub fail_permission: AtomicBool,
    pub fail_channel: AtomicBool,
}

impl RecordingPlatform {
    pub fn new(kind: PlatformKind) -> Self {
        Self {
            available: true,
            kind,
            calls: Mutex::new(Vec::new()),
            permission: Mutex::new(PermissionState::Granted),
            request_answer: PermissionState::Granted,
            fail_cancel: AtomicBool::new(false),
            fail_schedule: AtomicBool::new(false),
            fail_permission: AtomicBool::new(false),
            fail_channel: AtomicBool::new(false),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(PlatformKind::Android)
        }
    }

    pub fn with_permission(self, current: PermissionState, answer: PermissionState) -> Self {
        *self.permission.lock().unwrap() = current;
        Self {
            request_answer: answer,
            ..self
        }
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn set_permission(&self, permission: PermissionState) {
        *self.permission.lock().unwrap() = permission;
    }

    fn record(&self, call: PlatformCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn response(&self) -> PermissionResponse {
        PermissionResponse::display(self.permission.lock().unwrap().to_string())
    }
}

#[async_trait]
impl NotificationPlatform for RecordingPlatform {
    fn is_available(&self) -> bool {
        self.available
    }

    fn kind(&self) -> PlatformKind {
        self.kind
    }

    async fn check_permission(&self) -> anyhow::Result<PermissionResponse> {
        self.record(PlatformCall::CheckPermission);
        if self.fail_permission.load(Ordering::SeqCst) {
            anyhow::bail!("permission plugin error");
        }
        Ok(self.response())
    }

    async fn request_permission(&self) -> anyhow::Result<PermissionResponse> {
        self.record(PlatformCall::RequestPermission);
        if self.fail_permission.load(Ordering::SeqCst) {
            anyhow::bail!("permission plugin error");
        }
        {
            let mut permission = self.permission.lock().unwrap();
            if *permission == PermissionState::Prompt {
                *permission = self.request_answer;
            }
        }
        Ok(self.response())
    }

    async fn create_channel(&self, channel: &ChannelDescriptor) -> anyhow::Result<()> {
        self.record(PlatformCall::CreateChannel(channel.id.clone()));
        if self.fail_channel.load(Ordering::SeqCst) {
            anyhow::bail!("channel plugin error");
        }
        Ok(())
    }

    async fn schedule(&self, notifications: &[NotificationRegistration]) -> anyhow::Result<()> {
        self.record(PlatformCall::Schedule(
            notifications.iter().map(|n| n.id).collect(),
        ));
        if self.fail_schedule.load(Ordering::SeqCst) {
            anyhow::bail!("schedule plugin error");
        }
        Ok(())
    }

    async fn cancel(&self, ids: &[NotificationId]) -> anyhow::Result<()> {
        self.record(PlatformCall::Cancel(ids.to_vec()));
        if self.fail_cancel.load(Ordering::SeqCst) {
            anyhow::bail!("cancel plugin error");
        }
        Ok(())
    }
}

pub fn scheduler(platform: &Arc<RecordingPlatform>) -> ReminderScheduler {
    let platform: Arc<dyn NotificationPlatform> = platform.clone();
    ReminderScheduler::new(platform, &NotificationSettings::default())
}

pub fn reminder(id: &str, days: &[i32], times: &[&str]) -> Reminder {
    Reminder {
        id: id.to_owned(),
        label: format!("Reminder {id}"),
        days_of_week: days.iter().copied().collect(),
        times: times.iter().map(|time| time.to_string()).collect(),
    }
}
