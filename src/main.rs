use std::sync::Arc;

use clap::{Parser, Subcommand};
use prayer_reminders::{
    appsettings::AppSettings,
    notification::NotificationRegistration,
    platform::{InMemoryDevicePlatform, NotificationPlatform, UnsupportedPlatform},
    reminder::{Reminder, ReminderDay},
    scheduling::{ReminderScheduler, SchedulerResult, SyncReport},
    service::{ReminderChange, ReminderService},
    storage::{JsonFileReminderStorage, NewReminder, UpdateReminder},
};

#[derive(Parser, Debug)]
#[command(name = "prayer-reminders", version, about = "Manage recurring prayer reminders")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List stored reminders.
    List,
    /// Create a reminder.
    Add {
        #[arg(long)]
        label: String,
        /// Days of week, 0 = Sunday.
        #[arg(long, value_delimiter = ',')]
        days: Vec<ReminderDay>,
        /// Times as HH:mm.
        #[arg(long, value_delimiter = ',')]
        times: Vec<String>,
    },
    /// Change a reminder.
    Edit {
        id: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long, value_delimiter = ',')]
        days: Option<Vec<ReminderDay>>,
        #[arg(long, value_delimiter = ',')]
        times: Option<Vec<String>>,
    },
    /// Delete a reminder.
    Remove { id: String },
    /// Show notification permission, optionally asking for it.
    Permission {
        #[arg(long)]
        request: bool,
    },
    /// Register notifications for every stored reminder again.
    Sync,
    /// Show notifications registered on the device.
    Pending,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let cli = Cli::parse();
    let settings = AppSettings::load()?;
    log::debug!("Loaded settings {:?}", settings);

    let device = settings.device.enabled.then(|| {
        Arc::new(InMemoryDevicePlatform::new(
            settings.device.kind,
            settings.device.permission,
            settings.device.answer,
        ))
    });
    let platform: Arc<dyn NotificationPlatform> = match &device {
        Some(device) => device.clone() as Arc<dyn NotificationPlatform>,
        None => Arc::new(UnsupportedPlatform),
    };

    let storage = Arc::new(JsonFileReminderStorage::new(
        settings.storage.path.clone(),
        settings.storage.key.clone(),
    ));
    let scheduler = ReminderScheduler::new(platform, &settings.notifications);
    let service = ReminderService::new(storage, scheduler);

    if !matches!(cli.command, Command::Sync) {
        service.sync_on_startup().await;
    }

    match cli.command {
        Command::List => {
            let reminders = service.list().await?;
            if reminders.is_empty() {
                println!("No reminders set");
            }
            for reminder in &reminders {
                println!("{}", display_reminder(reminder));
            }
        }
        Command::Add { label, days, times } => {
            let change = service
                .add(NewReminder {
                    label,
                    days_of_week: days.into_iter().collect(),
                    times: times.into_iter().collect(),
                })
                .await?;
            print_change("Added", &change);
        }
        Command::Edit {
            id,
            label,
            days,
            times,
        } => {
            let update = UpdateReminder {
                label,
                days_of_week: days.map(|days| days.into_iter().collect()),
                times: times.map(|times| times.into_iter().collect()),
            };
            match service.update(&id, update).await? {
                Some(change) => print_change("Updated", &change),
                None => println!("No reminder with id {id}"),
            }
        }
        Command::Remove { id } => match service.remove(&id).await? {
            Some(change) => print_change("Removed", &change),
            None => println!("No reminder with id {id}"),
        },
        Command::Permission { request } => {
            if request {
                let outcome = service.enable_notifications().await?;
                println!("Notification permission: {}", outcome.status);
                if let Some(resync) = &outcome.resync {
                    println!("{}", describe_sync(resync));
                }
            } else {
                println!(
                    "Notification permission: {}",
                    service.permission_status().await?
                );
            }
        }
        Command::Sync => {
            let report = service.resync().await?;
            println!("Registered {} notifications", report.scheduled.len());
        }
        Command::Pending => match &device {
            Some(device) => {
                let pending = device.pending().await;
                if pending.is_empty() {
                    println!("No notifications registered");
                }
                for notification in &pending {
                    println!("{}", display_notification(notification));
                }
            }
            None => println!("Local notifications are not available"),
        },
    }

    Ok(())
}

fn display_reminder(reminder: &Reminder) -> String {
    let days = join(reminder.days_of_week.iter());
    let times = join(reminder.times.iter());
    format!(
        "{}: {} (days {}, at {})",
        reminder.id,
        reminder.label,
        if days.is_empty() { "-".to_owned() } else { days },
        if times.is_empty() { "-".to_owned() } else { times },
    )
}

fn display_notification(notification: &NotificationRegistration) -> String {
    format!(
        "#{} weekday {} {:02}:{:02} {} ({})",
        notification.id,
        notification.weekday,
        notification.hour,
        notification.minute,
        notification.title,
        notification.source.reminder_id
    )
}

fn print_change(action: &str, change: &ReminderChange) {
    println!("{action} {}", display_reminder(&change.reminder));
    println!("{}", describe_sync(&change.notifications));
}

fn describe_sync(result: &SchedulerResult<SyncReport>) -> String {
    match result {
        Ok(report) if report.skipped => "Local notifications are not available".to_owned(),
        Ok(report) => format!(
            "Notifications: {} cancelled, {} scheduled",
            report.cancelled.len(),
            report.scheduled.len()
        ),
        Err(error) => format!("Notifications not updated: {error}"),
    }
}

fn join<T: ToString>(items: impl Iterator<Item = T>) -> String {
    items.map(|item| item.to_string()).collect::<Vec<_>>().join(", ")
}
