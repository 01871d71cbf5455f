use chrono::{DateTime, Duration, Utc};

pub const DEFAULT_COOLDOWN_HOURS: i64 = 24;

pub fn default_cooldown() -> Duration {
    Duration::hours(DEFAULT_COOLDOWN_HOURS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Eligible,
    Cooling { remaining: Duration },
}

/// True when a scored submission is allowed under the default 24 hour window.
pub fn can_submit(last_completed_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    can_submit_within(last_completed_at, now, default_cooldown())
}

pub fn can_submit_within(
    last_completed_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    cooldown: Duration,
) -> bool {
    match last_completed_at {
        None => true,
        Some(last) => now - last >= cooldown,
    }
}

/// At most one scored submission per rolling cooldown window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionGate {
    cooldown: Duration,
    last_completed_at: Option<DateTime<Utc>>,
}

impl SubmissionGate {
    pub fn new(cooldown: Duration, last_completed_at: Option<DateTime<Utc>>) -> Self {
        SubmissionGate {
            cooldown,
            last_completed_at,
        }
    }

    pub fn last_completed_at(&self) -> Option<DateTime<Utc>> {
        self.last_completed_at
    }

    pub fn can_submit(&self, now: DateTime<Utc>) -> bool {
        can_submit_within(self.last_completed_at, now, self.cooldown)
    }

    pub fn state(&self, now: DateTime<Utc>) -> GateState {
        match self.last_completed_at {
            Some(last) if !self.can_submit(now) => GateState::Cooling {
                remaining: last + self.cooldown - now,
            },
            _ => GateState::Eligible,
        }
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        match self.state(now) {
            GateState::Cooling { remaining } => Some(remaining),
            GateState::Eligible => None,
        }
    }

    pub fn record(&mut self, now: DateTime<Utc>) {
        self.last_completed_at = Some(now);
    }

    /// Pretends a full cooldown window has passed since the last submission.
    ///
    /// Debug/demo escape hatch. Returns the shifted timestamp, or `None` when
    /// nothing has been submitted yet.
    pub fn advance_day(&mut self) -> Option<DateTime<Utc>> {
        let shifted = self.last_completed_at? - self.cooldown;
        self.last_completed_at = Some(shifted);
        Some(shifted)
    }
}

/// `HH:MM:SS` countdown text.
pub fn format_countdown(remaining: &Duration) -> String {
    let secs = remaining.num_seconds().max(0);
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn absent_timestamp_is_eligible() {
        assert!(can_submit(None, t0()));
    }

    #[test]
    fn window_boundary() {
        let t = t0();
        assert!(!can_submit(Some(t), t + Duration::seconds(86_399)));
        assert!(can_submit(Some(t), t + Duration::seconds(86_400)));
    }

    #[test]
    fn state_reports_remaining_time() {
        let mut gate = SubmissionGate::new(default_cooldown(), None);
        assert_eq!(gate.state(t0()), GateState::Eligible);

        gate.record(t0());
        let later = t0() + Duration::hours(20);
        assert_eq!(
            gate.state(later),
            GateState::Cooling {
                remaining: Duration::hours(4)
            }
        );
        assert_eq!(gate.remaining(t0() + Duration::hours(24)), None);
    }

    #[test]
    fn advance_day_reopens_the_gate() {
        let mut gate = SubmissionGate::new(default_cooldown(), None);
        assert_eq!(gate.advance_day(), None);

        gate.record(t0());
        assert!(!gate.can_submit(t0()));
        assert_eq!(gate.advance_day(), Some(t0() - Duration::hours(24)));
        assert!(gate.can_submit(t0()));
    }

    #[test]
    fn custom_cooldown() {
        let gate = SubmissionGate::new(Duration::hours(1), Some(t0()));
        assert!(!gate.can_submit(t0() + Duration::minutes(59)));
        assert!(gate.can_submit(t0() + Duration::minutes(60)));
    }

    #[test]
    fn countdown_text() {
        assert_eq!(format_countdown(&Duration::seconds(3_725)), "01:02:05");
        assert_eq!(format_countdown(&Duration::seconds(-5)), "00:00:00");
    }
}
