//=========================================================================
// Worker Threads
//=========================================================================
//
// Named auxiliary threads with a bounded join.
//
// `std::thread::JoinHandle::join` cannot time out, so every worker owns
// the sending half of a zero-capacity channel. The sender is dropped when
// the body returns or unwinds, which disconnects the channel and wakes
// the joiner. A worker that misses the deadline is detached.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use log::{error, warn};

//=== WorkerExit ==========================================================

/// Outcome of [`Worker::join`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WorkerExit {
    Finished,
    Panicked,
    /// Still running when the timeout elapsed; left detached.
    Detached,
}

//=== Worker ==============================================================

pub(crate) struct Worker {
    name: &'static str,
    handle: JoinHandle<()>,
    done: Receiver<()>,
}

impl Worker {
    pub(crate) fn spawn<F>(name: &'static str, body: F) -> io::Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let (signal, done) = bounded::<()>(0);
        let handle = thread::Builder::new().name(name.to_string()).spawn(move || {
            let _signal = signal;
            body();
        })?;

        Ok(Self { name, handle, done })
    }

    /// Waits up to `timeout` for the worker to exit.
    pub(crate) fn join(self, timeout: Duration) -> WorkerExit {
        match self.done.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => match self.handle.join() {
                Ok(()) => WorkerExit::Finished,
                Err(e) => {
                    error!(target: "runtime", "Worker '{}' panicked: {:?}", self.name, e);
                    WorkerExit::Panicked
                }
            },
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    target: "runtime",
                    "Worker '{}' did not stop within {:?}, detaching",
                    self.name,
                    timeout
                );
                WorkerExit::Detached
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn join_reports_finished() {
        let worker = Worker::spawn("test-finish", || {}).unwrap();
        assert_eq!(worker.join(Duration::from_secs(5)), WorkerExit::Finished);
    }

    #[test]
    fn join_reports_panic() {
        let worker = Worker::spawn("test-panic", || panic!("boom")).unwrap();
        assert_eq!(worker.join(Duration::from_secs(5)), WorkerExit::Panicked);
    }

    #[test]
    fn join_detaches_after_timeout() {
        let release = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&release);
        let worker = Worker::spawn("test-stuck", move || {
            while !flag.load(Ordering::Acquire) {
                thread::yield_now();
            }
        })
        .unwrap();

        assert_eq!(worker.join(Duration::from_millis(20)), WorkerExit::Detached);
        release.store(true, Ordering::Release);
    }
}
