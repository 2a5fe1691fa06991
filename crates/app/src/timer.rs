use std::time::Duration;

use corticogenesis_core::TimerSource;
use tokio::{
    sync::mpsc::UnboundedSender,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

/// Events posted back onto the application loop from background tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Auto-advance tick from the timer with the given generation.
    Tick(u64),
}

/// Timer source backed by a tokio interval task per running timer.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    events: UnboundedSender<AppEvent>,
}

impl IntervalTimer {
    pub fn new(events: UnboundedSender<AppEvent>) -> Self {
        Self { events }
    }
}

impl TimerSource for IntervalTimer {
    type Handle = TimerTask;

    fn start(&mut self, period: Duration, generation: u64) -> TimerTask {
        let events = self.events.clone();
        let task = tokio::spawn(async move {
            let mut ticks = time::interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if events.send(AppEvent::Tick(generation)).is_err() {
                    break;
                }
            }
        });
        TimerTask(task)
    }
}

/// Running interval task. Aborted when dropped.
#[derive(Debug)]
pub struct TimerTask(JoinHandle<()>);

impl Drop for TimerTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}
