//! Creation Notifier Module
//!
//! When a task is created, the create handler enqueues the new row's id on
//! an in-process queue and returns immediately; a separately running worker
//! dequeues the id, re-reads the row fresh and dispatches one notification
//! email. Producer and consumer share no call stack, and no ordering is
//! guaranteed between "task created" and "notification sent".
//!
//! Failures on the worker side are terminal: they are logged and dropped,
//! never retried and never surfaced to the request that triggered them.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::store::TaskStore;

/// Fixed demo recipient for creation notifications.
pub const NOTIFY_RECIPIENT: &str = "user@example.com";

// == Mailer ==
/// Outgoing mail transport seam.
///
/// Injected into the worker and the send-email endpoint so tests can swap
/// in a recording implementation.
pub trait Mailer: Send + Sync {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

/// Mail transport failure.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct MailError(pub String);

/// Default transport: logs the message instead of speaking SMTP.
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        info!("mail to {to}: {subject} | {body}");
        Ok(())
    }
}

// == Errors ==
/// Terminal worker outcomes. Logged, never retried.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The task was deleted before the worker ran
    #[error("task {0} no longer exists")]
    TaskNotFound(u64),

    /// The mail transport rejected the dispatch
    #[error("mail dispatch failed: {0}")]
    Mail(String),
}

// == Notification Queue ==
/// Producer half of the notification channel.
///
/// `enqueue` is non-blocking fire-and-forget: by the time it runs, the HTTP
/// response for the create has already been decided, so a closed channel is
/// only logged.
#[derive(Clone)]
pub struct NotificationQueue {
    tx: mpsc::UnboundedSender<u64>,
}

impl NotificationQueue {
    /// Creates the queue and the receiver the worker will consume.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<u64>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Hands a task id to the worker. Never blocks, never fails the caller.
    pub fn enqueue(&self, task_id: u64) {
        if self.tx.send(task_id).is_err() {
            warn!("notification worker unavailable, dropping notification for task {task_id}");
        }
    }
}

// == Worker ==
/// Processes one dequeued task id.
///
/// Re-reads the row by id rather than trusting a snapshot: the task may
/// have been mutated or deleted since creation. Returns a confirmation
/// string for observability.
pub async fn process_notification(
    tasks: &RwLock<TaskStore>,
    mailer: &dyn Mailer,
    task_id: u64,
) -> Result<String, NotifyError> {
    let task = tasks
        .read()
        .await
        .get(task_id)
        .ok_or(NotifyError::TaskNotFound(task_id))?;

    let subject = format!("New task created: {}", task.title);
    let body = format!(
        "hello, task \"{}\" was successfully registered in the system.",
        task.title
    );
    mailer
        .send(NOTIFY_RECIPIENT, &subject, &body)
        .map_err(|e| NotifyError::Mail(e.to_string()))?;

    Ok(format!("Email sent for Task ID {task_id}"))
}

/// Spawns the consumer loop.
///
/// Runs until the queue is dropped or the handle is aborted on shutdown.
pub fn spawn_notification_worker(
    tasks: Arc<RwLock<TaskStore>>,
    mailer: Arc<dyn Mailer>,
    mut rx: mpsc::UnboundedReceiver<u64>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting creation notification worker");

        while let Some(task_id) = rx.recv().await {
            match process_notification(&tasks, mailer.as_ref(), task_id).await {
                Ok(confirmation) => info!("{confirmation}"),
                // Terminal: the task may have been deleted before we ran,
                // or the transport rejected the message. No retry.
                Err(err) => warn!("notification for task {task_id} dropped: {err}"),
            }
        }

        info!("Notification queue closed, worker exiting");
    })
}
