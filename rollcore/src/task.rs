//! Background processing handle polled once per frame
//!
//! The worker owns everything it produces until it finishes. The frame loop
//! only sees the result after `poll` moves the task to `Completed`, which
//! is the single point where new data becomes visible.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use log::error;

pub enum TaskState<T> {
    NotStarted,
    InFlight(Receiver<T>),
    Completed(T),
}

pub struct ProcessTask<T> {
    state: TaskState<T>,
}

impl<T> Default for ProcessTask<T> {
    fn default() -> Self {
        Self { state: TaskState::NotStarted }
    }
}

impl<T: Send + 'static> ProcessTask<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `job` on a worker thread. Returns `false` and does nothing while
    /// a previous job is still in flight.
    pub fn start<F>(&mut self, job: F) -> bool
    where
        F: FnOnce() -> T + Send + 'static,
    {
        if self.is_in_flight() {
            return false;
        }
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // receiver may be gone if the app closed mid-job
            let _ = tx.send(job());
        });
        self.state = TaskState::InFlight(rx);
        true
    }

    /// Check the worker without blocking. Returns `true` on the one call
    /// that publishes the result.
    pub fn poll(&mut self) -> bool {
        let TaskState::InFlight(rx) = &self.state else {
            return false;
        };
        match rx.try_recv() {
            Ok(result) => {
                self.state = TaskState::Completed(result);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                error!("processing worker exited without a result");
                self.state = TaskState::NotStarted;
                false
            }
        }
    }

    /// Forget any result and go back to `NotStarted`. Does nothing while a
    /// job is in flight.
    pub fn reset(&mut self) {
        if !self.is_in_flight() {
            self.state = TaskState::NotStarted;
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.state, TaskState::InFlight(_))
    }

    pub fn result(&self) -> Option<&T> {
        match &self.state {
            TaskState::Completed(result) => Some(result),
            _ => None,
        }
    }

    pub fn state(&self) -> &TaskState<T> {
        &self.state
    }
}
