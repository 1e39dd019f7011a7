//! Periodic scheduler feeding automatic ticks into the world executor

use parking_lot::Mutex;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{info, warn};

use super::WorldHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerState {
    Idle,
    Running,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TickerError {
    #[error("Ticker already started")]
    AlreadyStarted,

    #[error("Ticker has been stopped")]
    Stopped,
}

/// Submits `Advance(elapsed)` every `period`, where `elapsed` is the real time
/// since the previous wakeup.
pub struct Ticker {
    period: Duration,
    world: WorldHandle,
    state: Mutex<TickerState>,
    stop_tx: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Ticker {
    pub fn new(period: Duration, world: WorldHandle) -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            period,
            world,
            state: Mutex::new(TickerState::Idle),
            stop_tx,
            task: Mutex::new(None),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> TickerState {
        *self.state.lock()
    }

    /// Schedule the first wakeup one period from now
    pub fn start(&self) -> Result<(), TickerError> {
        let mut state = self.state.lock();
        match *state {
            TickerState::Running => return Err(TickerError::AlreadyStarted),
            TickerState::Stopped => return Err(TickerError::Stopped),
            TickerState::Idle => {}
        }

        let task = tokio::spawn(run_ticker(
            self.period,
            self.world.clone(),
            self.stop_tx.subscribe(),
        ));
        *self.task.lock() = Some(task);
        *state = TickerState::Running;

        info!(period_ms = self.period.as_millis() as u64, "Ticker started");
        Ok(())
    }

    /// Cancel the pending wakeup. Ticks already queued still run.
    pub async fn stop(&self) {
        {
            let mut state = self.state.lock();
            if *state == TickerState::Stopped {
                return;
            }
            *state = TickerState::Stopped;
        }

        let _ = self.stop_tx.send(true);
        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!(error = %e, "Ticker task ended abnormally");
            }
        }

        info!("Ticker stopped");
    }
}

async fn run_ticker(period: Duration, world: WorldHandle, mut stop_rx: watch::Receiver<bool>) {
    let mut last = Instant::now();
    let mut next = last + period;

    loop {
        tokio::select! {
            _ = sleep_until(next) => {}
            _ = stop_rx.changed() => break,
        }

        let now = Instant::now();
        let elapsed = now - last;
        last = now;

        if world.advance(elapsed).await.is_err() {
            warn!("World executor closed, ticker exiting");
            break;
        }

        next = now + period;
    }
}
