//! Cancellable engine poller.
//!
//! Replacement for the detached forever-thread of the earliest revision:
//! ticks are delivered over a channel so the engine is still driven from
//! the relay thread, and the ticker is stopped and joined on shutdown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub struct Poller {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn spawn(interval: Duration, ticks: Sender<()>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_for_thread = stop.clone();
        let handle = thread::spawn(move || {
            while !stop_for_thread.load(Ordering::Relaxed) {
                thread::sleep(interval);
                if stop_for_thread.load(Ordering::Relaxed) {
                    break;
                }
                if ticks.send(()).is_err() {
                    // Receiver side is gone; nothing left to drive.
                    break;
                }
            }
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Signal the ticker and wait for it to finish. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
