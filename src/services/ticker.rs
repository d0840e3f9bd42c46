// Author: Dustin Pilgrim
// License: MIT

use crate::core::events::Event;
use crate::core::manager_msg::ManagerMsg;

use tokio::sync::mpsc::Sender;
use tokio::time::{Duration, MissedTickBehavior, interval};

pub const SCHEDULE_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Posts `event` every `period` until the daemon drops its receiver.
async fn run_ticker(tx: Sender<ManagerMsg>, period: Duration, event: Event, name: &'static str) {
    tracing::info!("{name} ticker started ({}ms)", period.as_millis());

    let mut ticks = interval(period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticks.tick().await;

        if tx.send(ManagerMsg::Event(event.clone())).await.is_err() {
            tracing::warn!("{name} ticker stopping (receiver dropped)");
            break;
        }
    }
}

pub async fn run_poll_ticker(tx: Sender<ManagerMsg>, poll_interval_ms: u64) {
    run_ticker(tx, Duration::from_millis(poll_interval_ms), Event::Poll, "poll").await;
}

pub async fn run_schedule_ticker(tx: Sender<ManagerMsg>) {
    run_ticker(tx, SCHEDULE_CHECK_INTERVAL, Event::ScheduleCheck, "schedule").await;
}
