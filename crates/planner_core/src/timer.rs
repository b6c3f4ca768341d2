//! Focus (pomodoro-style) time-tracking session.
//!
//! # Responsibility
//! - Hold the one active focus session and advance it from caller ticks.
//! - Turn a finished session into whole-minute credit for a task or habit.
//!
//! # Invariants
//! - At most one session exists; `start` replaces any running one.
//! - `cancel` is idempotent and always safe.
//! - Paused sessions ignore ticks.

/// Minutes used when the target item has no positive target.
pub const DEFAULT_FOCUS_MINUTES: u32 = 25;

/// What a focus session is credited to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// A day instance.
    Task,
    Habit,
}

impl FocusTarget {
    /// Parses `task` or `habit`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "task" => Some(Self::Task),
            "habit" => Some(Self::Habit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusSession {
    pub target_id: String,
    pub target: FocusTarget,
    pub title: String,
    pub target_minutes: u32,
    /// Unix epoch milliseconds.
    pub started_at: i64,
    pub elapsed_seconds: u64,
    pub running: bool,
}

impl FocusSession {
    /// Ring fill, clamped to 0..=100.
    pub fn progress_percent(&self) -> u32 {
        let target_seconds = u64::from(self.target_minutes) * 60;
        if target_seconds == 0 {
            return 0;
        }
        (self.elapsed_seconds * 100 / target_seconds).min(100) as u32
    }

    /// Elapsed time as `MM:SS`.
    pub fn clock_label(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.elapsed_seconds / 60,
            self.elapsed_seconds % 60
        )
    }
}

/// Minutes earned by a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusCredit {
    pub target_id: String,
    pub target: FocusTarget,
    pub minutes: u32,
}

/// Holder of the single active focus session.
#[derive(Debug, Default)]
pub struct FocusTimer {
    session: Option<FocusSession>,
}

impl FocusTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a running session, replacing any current one.
    pub fn start(
        &mut self,
        target_id: impl Into<String>,
        target: FocusTarget,
        title: impl Into<String>,
        target_minutes: Option<u32>,
        now_ms: i64,
    ) -> &FocusSession {
        self.session.insert(FocusSession {
            target_id: target_id.into(),
            target,
            title: title.into(),
            target_minutes: target_minutes
                .filter(|minutes| *minutes > 0)
                .unwrap_or(DEFAULT_FOCUS_MINUTES),
            started_at: now_ms,
            elapsed_seconds: 0,
            running: true,
        })
    }

    pub fn session(&self) -> Option<&FocusSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Advances a running session by `seconds`. Returns the elapsed total, or
    /// `None` without a session.
    pub fn tick(&mut self, seconds: u64) -> Option<u64> {
        let session = self.session.as_mut()?;
        if session.running {
            session.elapsed_seconds = session.elapsed_seconds.saturating_add(seconds);
        }
        Some(session.elapsed_seconds)
    }

    /// Pauses or resumes. Returns the new running flag.
    pub fn toggle_pause(&mut self) -> Option<bool> {
        let session = self.session.as_mut()?;
        session.running = !session.running;
        Some(session.running)
    }

    /// Drops the session without credit. Returns whether one was active.
    pub fn cancel(&mut self) -> bool {
        self.session.take().is_some()
    }

    /// Ends the session. With `save`, returns whole elapsed minutes as
    /// credit; sessions shorter than a minute earn nothing.
    pub fn finish(&mut self, save: bool) -> Option<FocusCredit> {
        let session = self.session.take()?;
        if !save {
            return None;
        }
        let minutes = u32::try_from(session.elapsed_seconds / 60).unwrap_or(u32::MAX);
        (minutes > 0).then(|| FocusCredit {
            target_id: session.target_id,
            target: session.target,
            minutes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{FocusTarget, FocusTimer, DEFAULT_FOCUS_MINUTES};

    #[test]
    fn target_names_parse() {
        assert_eq!(FocusTarget::parse(" habit "), Some(FocusTarget::Habit));
        assert_eq!(FocusTarget::parse("task"), Some(FocusTarget::Task));
        assert_eq!(FocusTarget::parse("goal"), None);
    }

    #[test]
    fn start_defaults_target_and_replaces_previous_session() {
        let mut timer = FocusTimer::new();
        timer.start("t-1", FocusTarget::Task, "Write", Some(0), 1);
        assert_eq!(
            timer.session().map(|s| s.target_minutes),
            Some(DEFAULT_FOCUS_MINUTES)
        );

        timer.start("h1", FocusTarget::Habit, "Read", Some(30), 2);
        let session = timer.session().unwrap();
        assert_eq!(session.target_id, "h1");
        assert_eq!(session.target_minutes, 30);
    }

    #[test]
    fn paused_session_ignores_ticks() {
        let mut timer = FocusTimer::new();
        timer.start("t-1", FocusTarget::Task, "Write", None, 0);
        timer.tick(90);
        assert_eq!(timer.toggle_pause(), Some(false));
        assert_eq!(timer.tick(60), Some(90));
        assert_eq!(timer.session().unwrap().clock_label(), "01:30");
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut timer = FocusTimer::new();
        assert!(!timer.cancel());
        timer.start("t-1", FocusTarget::Task, "Write", None, 0);
        assert!(timer.cancel());
        assert!(!timer.cancel());
        assert_eq!(timer.tick(1), None);
    }

    #[test]
    fn finish_credits_whole_minutes_only_when_saved() {
        let mut timer = FocusTimer::new();
        timer.start("t-1", FocusTarget::Task, "Write", None, 0);
        timer.tick(59);
        assert_eq!(timer.finish(true), None);

        timer.start("t-1", FocusTarget::Task, "Write", None, 0);
        timer.tick(150);
        let credit = timer.finish(true).unwrap();
        assert_eq!(credit.minutes, 2);
        assert!(!timer.is_active());

        timer.start("t-1", FocusTarget::Task, "Write", None, 0);
        timer.tick(600);
        assert_eq!(timer.finish(false), None);
    }
}
