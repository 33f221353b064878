//! Background submission runner
//!
//! Store and auth calls run on a spawned thread; the UI polls for the outcome
//! on each tick and stays responsive while a call is pending. There is no
//! cancellation or timeout: a call that never resolves leaves its dialog in
//! the submitting state until the process exits.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// Result of one background submission, ready to show to the user
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Success { message: String },
    Failure { message: String },
}

/// Poll result for an in-flight call
#[derive(Debug, PartialEq)]
pub enum SubmitPoll<T> {
    /// Still running
    Pending,
    /// Finished with a value
    Ready(T),
    /// The worker thread went away without reporting
    Lost,
}

/// Handle to one in-flight background call
pub struct SubmitHandle<T> {
    receiver: Receiver<T>,
}

impl<T> SubmitHandle<T> {
    /// Check for completion without blocking
    pub fn poll(&self) -> SubmitPoll<T> {
        match self.receiver.try_recv() {
            Ok(value) => SubmitPoll::Ready(value),
            Err(TryRecvError::Empty) => SubmitPoll::Pending,
            Err(TryRecvError::Disconnected) => SubmitPoll::Lost,
        }
    }
}

/// Run `call` on a background thread, reporting through the handle
pub fn spawn<T, F>(call: F) -> SubmitHandle<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(call());
    });
    SubmitHandle { receiver: rx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn wait_ready<T>(handle: &SubmitHandle<T>) -> T {
        for _ in 0..100 {
            match handle.poll() {
                SubmitPoll::Ready(value) => return value,
                SubmitPoll::Pending => thread::sleep(Duration::from_millis(10)),
                SubmitPoll::Lost => panic!("worker thread lost"),
            }
        }
        panic!("submission never completed");
    }

    #[test]
    fn test_spawn_reports_outcome() {
        let handle = spawn(|| SubmitOutcome::Success {
            message: "done".to_string(),
        });
        assert_eq!(
            wait_ready(&handle),
            SubmitOutcome::Success {
                message: "done".to_string()
            }
        );
    }

    #[test]
    fn test_handle_drains_once() {
        let handle = spawn(|| 42u32);
        assert_eq!(wait_ready(&handle), 42);
        // Channel is empty and the sender is gone
        assert_eq!(handle.poll(), SubmitPoll::Lost);
    }
}
