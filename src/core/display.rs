// Author: Dustin Pilgrim
// License: MIT

use chrono::{Days, NaiveDateTime, NaiveTime};

use crate::core::config::ScheduleConfig;

/// Display on/off state driven by the wall-clock schedule.
///
/// A tap on the dark screen turns it on and holds it on until the next
/// scheduled switch.
#[derive(Debug, Clone)]
pub struct DisplayController {
    schedule: ScheduleConfig,
    on: bool,
    override_until: Option<NaiveDateTime>,
}

impl DisplayController {
    pub fn new(schedule: ScheduleConfig, now: NaiveDateTime) -> Self {
        let mut d = Self {
            schedule,
            on: true,
            override_until: None,
        };
        d.on = d.scheduled_on(now.time());
        d
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn override_until(&self) -> Option<NaiveDateTime> {
        self.override_until
    }

    /// False inside `[turn_off, turn_on)`, wrapping past midnight.
    pub fn scheduled_on(&self, t: NaiveTime) -> bool {
        let ScheduleConfig { enabled, turn_off, turn_on } = self.schedule;
        if !enabled || turn_off == turn_on {
            return true;
        }

        let in_off_window = if turn_off < turn_on {
            t >= turn_off && t < turn_on
        } else {
            t >= turn_off || t < turn_on
        };

        !in_off_window
    }

    /// Periodic check. Returns true when the on/off value changed.
    pub fn check(&mut self, now: NaiveDateTime) -> bool {
        if let Some(until) = self.override_until {
            if now < until {
                return false;
            }
            self.override_until = None;
            tracing::debug!("display: manual override expired");
        }

        let want = self.scheduled_on(now.time());
        self.apply(want)
    }

    /// Tap on the dark screen. Returns true when the display was turned on.
    pub fn wake(&mut self, now: NaiveDateTime) -> bool {
        if self.on {
            return false;
        }

        let until = self.next_switch_after(now);
        self.override_until = Some(until);
        tracing::info!("display: woken manually, holding on until {}", until);
        self.apply(true)
    }

    /// Earliest scheduled switch strictly after `now`.
    pub fn next_switch_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date();
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);

        [today, tomorrow]
            .into_iter()
            .flat_map(|d| [d.and_time(self.schedule.turn_off), d.and_time(self.schedule.turn_on)])
            .filter(|t| *t > now)
            .min()
            .unwrap_or(now)
    }

    pub fn set_schedule(&mut self, schedule: ScheduleConfig, now: NaiveDateTime) {
        self.schedule = schedule;
        self.override_until = None;
        let want = self.scheduled_on(now.time());
        self.apply(want);
    }

    fn apply(&mut self, on: bool) -> bool {
        if self.on == on {
            return false;
        }
        self.on = on;
        tracing::info!("display: turned {}", if on { "on" } else { "off" });
        true
    }
}
