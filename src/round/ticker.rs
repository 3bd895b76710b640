use web_time::{Duration, Instant};

/// target rate of crossing updates and repaints
pub const ANIMATION_FPS: u32 = 60;

/// throttles a callback the host may fire far more often than needed.
/// the host polls every frame, a poll only lets work through if a full period passed
/// since the last accepted one.
#[derive(Clone, Debug)]
pub struct Ticker {
    period: Duration,
    started_at: Instant,
    last_tick: Option<Instant>,
    running: bool,
}

impl Ticker {
    pub fn new(fps: u32, now: Instant) -> Self {
        assert!(fps > 0);
        Self {
            period: Duration::from_secs(1) / fps,
            started_at: now,
            last_tick: None,
            running: false,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    /// (re)starts counting at `now`
    pub fn start(&mut self, now: Instant) {
        self.started_at = now;
        self.last_tick = None;
        self.running = true;
    }

    /// returns if the ticker was running before
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    /// time since start, if a tick is due. the first poll after start only sets the clock.
    pub fn poll(&mut self, now: Instant) -> Option<Duration> {
        if !self.running {
            return None;
        }
        let Some(last) = self.last_tick else {
            self.last_tick = Some(now);
            return None;
        };
        if now.saturating_duration_since(last) > self.period {
            self.last_tick = Some(now);
            Some(self.elapsed(now))
        } else {
            None
        }
    }
}

/// wall clock time of a whole game, across all rounds
#[derive(Clone, Copy, Debug)]
pub struct Stopwatch {
    started_at: Instant,
    stopped_at: Option<Instant>,
}

impl Stopwatch {
    pub fn start(now: Instant) -> Self {
        Self { started_at: now, stopped_at: None }
    }

    pub fn is_running(&self) -> bool {
        self.stopped_at.is_none()
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        let end = self.stopped_at.unwrap_or(now);
        end.saturating_duration_since(self.started_at)
    }

    /// stopping twice keeps the first stop time
    pub fn stop(&mut self, now: Instant) -> Duration {
        let end = *self.stopped_at.get_or_insert(now);
        end.saturating_duration_since(self.started_at)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn throttles_to_period() {
        let t0 = Instant::now();
        let ms = Duration::from_millis;
        let mut ticker = Ticker::new(ANIMATION_FPS, t0);
        assert!(ticker.period() > ms(16) && ticker.period() < ms(17));
        assert_eq!(ticker.poll(t0), None, "not started yet");

        ticker.start(t0);
        assert_eq!(ticker.poll(t0), None, "first poll primes the clock");
        assert_eq!(ticker.poll(t0 + ms(5)), None);
        assert_eq!(ticker.poll(t0 + ms(20)), Some(ms(20)));
        //next tick is measured from the last accepted one
        assert_eq!(ticker.poll(t0 + ms(30)), None);
        assert_eq!(ticker.poll(t0 + ms(40)), Some(ms(40)));

        assert!(ticker.stop());
        assert!(!ticker.stop());
        assert_eq!(ticker.poll(t0 + ms(1000)), None);
    }

    #[test]
    fn restart_resets_clock() {
        let t0 = Instant::now();
        let ms = Duration::from_millis;
        let mut ticker = Ticker::new(10, t0);
        ticker.start(t0);
        ticker.poll(t0);
        assert_eq!(ticker.poll(t0 + ms(101)), Some(ms(101)));
        ticker.stop();

        let t1 = t0 + ms(500);
        ticker.start(t1);
        assert_eq!(ticker.poll(t1), None);
        assert_eq!(ticker.poll(t1 + ms(150)), Some(ms(150)));
    }

    #[test]
    fn stopwatch_freezes_on_stop() {
        let t0 = Instant::now();
        let s = Duration::from_secs;
        let mut watch = Stopwatch::start(t0);
        assert_eq!(watch.elapsed(t0 + s(3)), s(3));
        assert_eq!(watch.stop(t0 + s(5)), s(5));
        assert!(!watch.is_running());
        assert_eq!(watch.elapsed(t0 + s(60)), s(5));
        assert_eq!(watch.stop(t0 + s(70)), s(5));
    }
}
