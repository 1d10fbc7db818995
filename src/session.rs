use serde::{Deserialize, Serialize};

/// Lifecycle of one timed test.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    NotStarted,
    Running,
    Over,
}

/// The selectable test lengths.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(try_from = "u32", into = "u32")]
pub enum SessionDuration {
    #[value(name = "15")]
    #[strum(to_string = "15s")]
    Fifteen,
    #[value(name = "30")]
    #[strum(to_string = "30s")]
    Thirty,
    #[default]
    #[value(name = "60")]
    #[strum(to_string = "60s")]
    Sixty,
    #[value(name = "120")]
    #[strum(to_string = "120s")]
    OneTwenty,
}

impl SessionDuration {
    pub const ALL: [SessionDuration; 4] = [
        SessionDuration::Fifteen,
        SessionDuration::Thirty,
        SessionDuration::Sixty,
        SessionDuration::OneTwenty,
    ];

    pub fn secs(self) -> u32 {
        match self {
            SessionDuration::Fifteen => 15,
            SessionDuration::Thirty => 30,
            SessionDuration::Sixty => 60,
            SessionDuration::OneTwenty => 120,
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|d| *d == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|d| *d == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl TryFrom<u32> for SessionDuration {
    type Error = String;

    fn try_from(secs: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|d| d.secs() == secs)
            .ok_or_else(|| format!("unsupported duration {secs}s, expected one of 15, 30, 60, 120"))
    }
}

impl From<SessionDuration> for u32 {
    fn from(d: SessionDuration) -> Self {
        d.secs()
    }
}

/// When to extend the expected text and by how much. The boundary is
/// inclusive: with the default threshold the refill runs on the keystroke that
/// leaves the cursor exactly 50 characters from the end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefillPolicy {
    /// Refill once this many or fewer characters remain ahead of the cursor.
    pub threshold: usize,
    /// Number of words appended per refill.
    pub batch_size: usize,
}

impl Default for RefillPolicy {
    fn default() -> Self {
        Self {
            threshold: 50,
            batch_size: 100,
        }
    }
}

impl RefillPolicy {
    pub fn should_refill(&self, cursor: usize, len: usize) -> bool {
        len.saturating_sub(cursor) <= self.threshold
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub duration: SessionDuration,
    pub initial_words: usize,
    pub refill: RefillPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration: SessionDuration::default(),
            initial_words: 250,
            refill: RefillPolicy::default(),
        }
    }
}

/// Counters for one session. Holds `mistakes <= cursor` at all times;
/// `typed_chars` only ever grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub cursor: usize,
    pub mistakes: usize,
    pub typed_chars: usize,
    pub time_left_secs: u32,
    pub max_duration_secs: u32,
    pub phase: Phase,
}

impl SessionState {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            cursor: 0,
            mistakes: 0,
            typed_chars: 0,
            time_left_secs: duration_secs,
            max_duration_secs: duration_secs,
            phase: Phase::NotStarted,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::Over
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.max_duration_secs.saturating_sub(self.time_left_secs)
    }

    pub fn net_chars(&self) -> usize {
        self.cursor.saturating_sub(self.mistakes)
    }
}
