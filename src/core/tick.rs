//=========================================================================
// Tick Loop
//=========================================================================
//
// Independent logic loop running between a focus transition and the
// matching background transition.
//
// Each iteration:
//  1. Exit if the lifecycle is stopped or this loop was halted
//  2. If resumed, invoke the tick callback with the time since the
//     previous invocation
//  3. Yield to the scheduler
//
// There is no pacing: the loop runs at maximum rate while resumed. The
// explicit yield keeps single-core hosts responsive.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::app::SyncHandle;
use super::lifecycle::SharedLifecycle;
use super::worker::{Worker, WorkerExit};

//=== TickLoop ============================================================

/// Handle to a running tick thread.
pub(crate) struct TickLoop {
    worker: Worker,
    halt: Arc<AtomicBool>,
}

impl TickLoop {
    /// Spawns the tick thread.
    ///
    /// The loop polls `lifecycle` on every iteration; it ticks only while
    /// resumed and exits as soon as the lifecycle reports stopped.
    pub(crate) fn start<F>(
        lifecycle: Arc<SharedLifecycle>,
        sync: SyncHandle,
        mut tick: F,
    ) -> io::Result<Self>
    where
        F: FnMut(Duration, &SyncHandle) + Send + 'static,
    {
        let halt = Arc::new(AtomicBool::new(false));
        let halted = Arc::clone(&halt);

        let worker = Worker::spawn("aetheric-tick", move || {
            let mut last_tick: Option<Instant> = None;
            let mut ticks: u64 = 0;

            loop {
                let state = lifecycle.get();
                if state.is_stopped() || halted.load(Ordering::Acquire) {
                    break;
                }

                if !state.is_paused() {
                    let now = Instant::now();
                    let elapsed = last_tick.map_or(Duration::ZERO, |t| now - t);
                    last_tick = Some(now);

                    tick(elapsed, &sync);
                    ticks += 1;
                }

                thread::yield_now();
            }

            debug!(target: "runtime::tick", "Tick loop exiting after {} ticks", ticks);
        })?;

        info!(target: "runtime::tick", "Tick loop started");
        Ok(Self { worker, halt })
    }

    /// Waits for the loop to exit.
    ///
    /// The lifecycle must already be stopped. A loop that outlives
    /// `timeout` (a tick callback that never returns) is halted and
    /// detached so it cannot resume in a later focus period.
    pub(crate) fn stop(self, timeout: Duration) -> WorkerExit {
        self.halt.store(true, Ordering::Release);
        let exit = self.worker.join(timeout);
        info!(target: "runtime::tick", "Tick loop stopped ({:?})", exit);
        exit
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
