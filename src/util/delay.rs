// One-shot delayed task scheduling on a dedicated thread
//
// Each DelayedTask owns a worker thread that holds at most one pending
// closure. Scheduling a new closure supersedes the pending one (debounce,
// not queue), which is exactly the semantics the session needs for timer
// expiry, the auto-read delay, and the feedback clear.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

type Task = Box<dyn FnOnce() + Send>;

/// Commands sent to the delay thread
enum DelayCommand {
    /// Replace any pending task with this one, due after the duration
    Schedule(Duration, Task),
    /// Drop the pending task without running it
    Cancel,
    /// Exit the thread
    Shutdown,
}

/// Handle to a cancelable one-shot scheduler.
///
/// At most one task is pending at a time; `schedule` supersedes, `cancel`
/// discards. When the handle is dropped the thread is shut down and joined,
/// and a still-pending task never fires.
pub struct DelayedTask {
    sender: Sender<DelayCommand>,
    thread: Option<JoinHandle<()>>,
}

impl DelayedTask {
    /// Spawn the scheduler thread. `name` shows up in thread listings.
    pub fn spawn(name: &str) -> Self {
        let (sender, receiver) = mpsc::channel();

        let thread = thread::Builder::new()
            .name(format!("souschef-{}", name))
            .spawn(move || delay_thread_main(receiver))
            .expect("failed to spawn delay thread");

        Self {
            sender,
            thread: Some(thread),
        }
    }

    /// Schedule `task` to run after `delay`, replacing any pending task.
    ///
    /// A zero delay runs the task on the worker thread as soon as it is
    /// picked up.
    pub fn schedule<F>(&self, delay: Duration, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self
            .sender
            .send(DelayCommand::Schedule(delay, Box::new(task)))
            .is_err()
        {
            crate::warn!("[delay] Scheduler thread is gone, task dropped");
        }
    }

    /// Discard the pending task, if any. No-op when nothing is pending.
    pub fn cancel(&self) {
        let _ = self.sender.send(DelayCommand::Cancel);
    }
}

impl Drop for DelayedTask {
    fn drop(&mut self) {
        let _ = self.sender.send(DelayCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Main loop for the delay thread.
///
/// Blocks on the control channel while idle; while a task is pending, waits
/// only until its deadline so the task fires on time even with no further
/// commands arriving.
fn delay_thread_main(receiver: mpsc::Receiver<DelayCommand>) {
    let mut pending: Option<(Instant, Task)> = None;

    loop {
        let command = match &pending {
            Some((deadline, _)) => {
                let timeout = deadline.saturating_duration_since(Instant::now());
                match receiver.recv_timeout(timeout) {
                    Ok(cmd) => cmd,
                    Err(RecvTimeoutError::Timeout) => {
                        if let Some((_, task)) = pending.take() {
                            task();
                        }
                        continue;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match receiver.recv() {
                Ok(cmd) => cmd,
                Err(_) => break,
            },
        };

        match command {
            DelayCommand::Schedule(delay, task) => {
                pending = Some((Instant::now() + delay, task));
            }
            DelayCommand::Cancel => pending = None,
            DelayCommand::Shutdown => break,
        }
    }
}

#[cfg(test)]
#[path = "delay_test.rs"]
mod tests;
