//! Where blocking API calls run.

use std::io;
use std::sync::Arc;
use std::thread;

pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Executes store jobs. The UI uses `ThreadRunner`; tests use `InlineRunner`
/// or their own deferred runners to control completion order.
pub trait TaskRunner {
    /// An `Err` means the job was dropped without running.
    fn spawn(&self, job: Job) -> io::Result<()>;
}

/// Runs every job on its own short-lived worker thread.
#[derive(Clone, Default)]
pub struct ThreadRunner {
    on_complete: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl ThreadRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `notify` after each job, e.g. to request an egui repaint.
    pub fn with_notifier(notify: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            on_complete: Some(Arc::new(notify)),
        }
    }
}

impl TaskRunner for ThreadRunner {
    fn spawn(&self, job: Job) -> io::Result<()> {
        let notify = self.on_complete.clone();
        thread::Builder::new()
            .name("lab-api".to_string())
            .spawn(move || {
                job();
                if let Some(notify) = notify {
                    notify();
                }
            })
            .map(|_| ())
    }
}

/// Runs jobs immediately on the caller's thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineRunner;

impl TaskRunner for InlineRunner {
    fn spawn(&self, job: Job) -> io::Result<()> {
        job();
        Ok(())
    }
}
