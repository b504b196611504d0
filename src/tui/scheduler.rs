use chrono::{DateTime, Duration as ChronoDuration, Local, LocalResult, NaiveDateTime, TimeZone};
use std::time::{Duration, Instant};
use tracing::debug;

/// Added past midnight so the render lands safely on the new day.
pub const SAFETY_MARGIN: Duration = Duration::from_millis(50);

/// Wall-clock time from `now` until the next midnight, naive (no DST).
pub fn delay_until_next_midnight(now: NaiveDateTime) -> Duration {
    let next = now
        .date()
        .succ_opt()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(now);
    next.signed_duration_since(now)
        .to_std()
        .unwrap_or(Duration::ZERO)
}

/// Delay until the next local midnight, resolving DST transitions through
/// the local timezone.
fn delay_until_local_midnight(now: DateTime<Local>) -> Duration {
    let naive_next = now
        .date_naive()
        .succ_opt()
        .and_then(|d| d.and_hms_opt(0, 0, 0));
    let Some(naive_next) = naive_next else {
        return delay_until_next_midnight(now.naive_local());
    };

    let next = match Local.from_local_datetime(&naive_next) {
        LocalResult::Single(t) => t,
        LocalResult::Ambiguous(earliest, _) => earliest,
        // Midnight skipped by a DST jump: the day starts an hour later.
        LocalResult::None => match Local.from_local_datetime(&(naive_next + ChronoDuration::hours(1))) {
            LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => t,
            LocalResult::None => return delay_until_next_midnight(now.naive_local()),
        },
    };

    next.signed_duration_since(now)
        .to_std()
        .unwrap_or(Duration::ZERO)
}

/// Fires once per local day boundary. Re-armed after every firing from the
/// current clock, so timer drift never accumulates.
#[derive(Debug, Clone)]
pub struct MidnightScheduler {
    deadline: Instant,
}

impl MidnightScheduler {
    pub fn new(now: DateTime<Local>, at: Instant) -> Self {
        let mut scheduler = Self { deadline: at };
        scheduler.arm(now, at);
        scheduler
    }

    pub fn arm(&mut self, now: DateTime<Local>, at: Instant) {
        let delay = delay_until_local_midnight(now) + SAFETY_MARGIN;
        self.deadline = at + delay;
        debug!(delay_secs = delay.as_secs(), "midnight refresh armed");
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn due(&self, at: Instant) -> bool {
        at >= self.deadline
    }
}
