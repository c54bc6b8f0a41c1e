//! Deterministic timers fed with elapsed time by the caller.
//!
//! Engines never read the wall clock for game logic. The shell loop measures
//! how much time passed between frames and hands it to `advance`, which
//! reports how many times the timer expired in that window.

use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind
{
    Once,
    Every,
}

#[derive(Clone, Debug)]
pub struct Timer
{
    kind: Kind,
    period: Duration,
    remaining: Option<Duration>,
}

impl Timer
{
    /// Fires a single time `delay` after `start`, then stops itself.
    pub fn once(delay: Duration) -> Self
    {
        Self {
            kind: Kind::Once,
            period: delay,
            remaining: None,
        }
    }

    /// Fires every `period` after `start` until stopped.
    pub fn every(period: Duration) -> Self
    {
        Self {
            kind: Kind::Every,
            period,
            remaining: None,
        }
    }

    pub fn start(&mut self)
    {
        self.remaining = Some(self.period);
    }

    pub fn stop(&mut self)
    {
        self.remaining = None;
    }

    pub fn is_running(&self) -> bool
    {
        self.remaining.is_some()
    }

    pub fn period(&self) -> Duration
    {
        self.period
    }

    pub fn advance(&mut self, dt: Duration) -> u32
    {
        let Some(remaining) = self.remaining else {
            return 0;
        };

        if dt < remaining {
            self.remaining = Some(remaining - dt);
            return 0;
        }

        match self.kind {
            Kind::Once => {
                self.remaining = None;
                1
            }
            Kind::Every => {
                if self.period.is_zero() {
                    self.remaining = Some(self.period);
                    return 1;
                }
                let overflow = dt - remaining;
                let extra = (overflow.as_nanos() / self.period.as_nanos()) as u32;
                let carried = overflow.as_nanos() % self.period.as_nanos();
                self.remaining = Some(self.period - Duration::from_nanos(carried as u64));
                1 + extra
            }
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn ms(value: u64) -> Duration
    {
        Duration::from_millis(value)
    }

    #[test]
    fn stopped_timer_never_fires()
    {
        let mut timer = Timer::every(ms(100));
        assert_eq!(timer.advance(ms(1000)), 0);
        assert!(!timer.is_running());
    }

    #[test]
    fn once_fires_a_single_time_and_stops()
    {
        let mut timer = Timer::once(ms(5000));
        timer.start();
        assert_eq!(timer.advance(ms(4999)), 0);
        assert!(timer.is_running());
        assert_eq!(timer.advance(ms(1)), 1);
        assert!(!timer.is_running());
        assert_eq!(timer.advance(ms(5000)), 0);
    }

    #[test]
    fn every_counts_each_period_and_carries_the_remainder()
    {
        let mut timer = Timer::every(ms(100));
        timer.start();
        assert_eq!(timer.advance(ms(250)), 2);
        assert_eq!(timer.advance(ms(40)), 0);
        assert_eq!(timer.advance(ms(10)), 1);
        assert!(timer.is_running());
    }

    #[test]
    fn restart_rearms_with_full_delay()
    {
        let mut timer = Timer::once(ms(100));
        timer.start();
        timer.advance(ms(90));
        timer.start();
        assert_eq!(timer.advance(ms(90)), 0);
        assert_eq!(timer.advance(ms(10)), 1);
    }

    #[test]
    fn stop_cancels_a_pending_expiry()
    {
        let mut timer = Timer::once(ms(100));
        timer.start();
        timer.stop();
        assert_eq!(timer.advance(ms(200)), 0);
    }
}
