//! Second-resolution telemetry scheduler
//!
//! Tracks the absolute next fire time instead of matching the current
//! minute, so the fire count stays exact under irregular polling.

use crate::config::schedule::SECONDS_PER_DAY;

/// Even-distribution scheduler tolerant of irregular polling
///
/// Fires whenever the clock has reached the next planned fire time, then
/// plans the following fire one period later. When the plan crosses
/// midnight it wraps and waits for the day rollover, which is detected by
/// the hour moving backwards; that detection holds at any polling rate as
/// long as the hour decreases exactly once per real day boundary.
pub struct PrecisionScheduler {
    /// Seconds since midnight of the next planned fire
    next_fire: u32,
    /// Set once the plan has wrapped past midnight
    waiting_for_rollover: bool,
    /// Hour seen by the previous poll
    last_hour: u8,
}

impl PrecisionScheduler {
    /// Create a new scheduler that fires on its first poll
    pub const fn new() -> Self {
        Self {
            next_fire: 0,
            waiting_for_rollover: false,
            last_hour: 0,
        }
    }

    /// Poll at the current wall-clock time
    ///
    /// `schedule` is the desired number of fires per day; zero or negative
    /// never fires. Returns true when the regular message should go out.
    pub fn poll(&mut self, hour: u8, minute: u8, second: u8, schedule: i32) -> bool {
        if schedule <= 0 {
            return false;
        }
        // Seconds between fires; oversubscribed schedules saturate at one
        // fire per second
        let period = (SECONDS_PER_DAY / schedule as u32).max(1);
        let now = u32::from(hour) * 3600 + u32::from(minute) * 60 + u32::from(second);

        if hour < self.last_hour {
            self.waiting_for_rollover = false;
        }

        let mut fired = false;
        if now >= self.next_fire && !self.waiting_for_rollover {
            fired = true;
            self.next_fire = now + period;
            if self.next_fire >= SECONDS_PER_DAY {
                self.waiting_for_rollover = true;
                self.next_fire -= SECONDS_PER_DAY;
            }
            log::trace!(
                "regular fire at {:02}:{:02}:{:02}, next in {} s",
                hour,
                minute,
                second,
                period
            );
        }
        self.last_hour = hour;

        fired
    }
}

impl Default for PrecisionScheduler {
    fn default() -> Self {
        Self::new()
    }
}
