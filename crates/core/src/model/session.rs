use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use crate::model::{Band, Item, ItemId};
use crate::time::elapsed_secs;

/// Fatigue level at which a session is ended.
pub const FATIGUE_CEILING: u8 = 3;

/// Capacity of the rolling accuracy and hint-usage windows.
pub const ROLLING_WINDOW: usize = 5;

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Per-session pacing limits, fixed at start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    pub time_limit_secs: u32,
    pub max_questions: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            time_limit_secs: 300,
            max_questions: 10,
        }
    }
}

//
// ─── END REASON ────────────────────────────────────────────────────────────────
//

/// Why a session stopped serving items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndReason {
    TimeExpired,
    FatigueExceeded,
    MaxQuestionsReached,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EndReason::TimeExpired => "time-expired",
            EndReason::FatigueExceeded => "fatigue-exceeded",
            EndReason::MaxQuestionsReached => "max-questions-reached",
        };
        f.write_str(label)
    }
}

//
// ─── ROLLING WINDOW ────────────────────────────────────────────────────────────
//

/// Fixed-capacity FIFO; pushing onto a full window evicts the oldest entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingWindow<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: T) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(value);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.entries.len() == self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl RollingWindow<f64> {
    /// Mean of the window, `0.0` when empty.
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let len = self.entries.len() as f64;
        self.entries.iter().sum::<f64>() / len
    }
}

impl RollingWindow<bool> {
    #[must_use]
    pub fn count_true(&self) -> usize {
        self.entries.iter().filter(|used| **used).count()
    }
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Read-only view of the learner model returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub band: Band,
    pub asked_count: u32,
    pub ability: f64,
    pub rolling_accuracy: f64,
    pub fatigue: u8,
    pub mastery: f64,
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// Learner model and pacing counters for one (user, topic) session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub(crate) settings: SessionSettings,
    pub(crate) started_at: Option<DateTime<Utc>>,
    pub(crate) ability: f64,
    pub(crate) mastery: f64,
    pub(crate) fatigue: u8,
    pub(crate) current_band: Band,
    pub(crate) last_served_band: Option<Band>,
    pub(crate) asked_count: u32,
    pub(crate) accuracy_window: RollingWindow<f64>,
    pub(crate) hint_window: RollingWindow<bool>,
    pub(crate) seen: HashSet<ItemId>,
    pub(crate) wrong_by_subskill: HashMap<String, u32>,
    pub(crate) hard_miss_streak: u32,
    pub(crate) ended: Option<EndReason>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(SessionSettings::default())
    }
}

impl SessionState {
    #[must_use]
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings,
            started_at: None,
            ability: 0.0,
            mastery: 0.0,
            fatigue: 0,
            current_band: Band::Easy,
            last_served_band: None,
            asked_count: 0,
            accuracy_window: RollingWindow::new(ROLLING_WINDOW),
            hint_window: RollingWindow::new(ROLLING_WINDOW),
            seen: HashSet::new(),
            wrong_by_subskill: HashMap::new(),
            hard_miss_streak: 0,
            ended: None,
        }
    }

    /// Return every field to its default and adopt new pacing limits.
    pub fn reset(&mut self, settings: SessionSettings) {
        *self = Self::new(settings);
    }

    #[must_use]
    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn ability(&self) -> f64 {
        self.ability
    }

    #[must_use]
    pub fn mastery(&self) -> f64 {
        self.mastery
    }

    #[must_use]
    pub fn fatigue(&self) -> u8 {
        self.fatigue
    }

    #[must_use]
    pub fn current_band(&self) -> Band {
        self.current_band
    }

    #[must_use]
    pub fn last_served_band(&self) -> Option<Band> {
        self.last_served_band
    }

    #[must_use]
    pub fn asked_count(&self) -> u32 {
        self.asked_count
    }

    #[must_use]
    pub fn rolling_accuracy(&self) -> f64 {
        self.accuracy_window.mean()
    }

    #[must_use]
    pub fn hard_miss_streak(&self) -> u32 {
        self.hard_miss_streak
    }

    #[must_use]
    pub fn has_seen(&self, id: &ItemId) -> bool {
        self.seen.contains(id)
    }

    #[must_use]
    pub fn seen(&self) -> &HashSet<ItemId> {
        &self.seen
    }

    #[must_use]
    pub fn wrong_count(&self, subskill: &str) -> u32 {
        self.wrong_by_subskill.get(subskill).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn ended(&self) -> Option<EndReason> {
        self.ended
    }

    /// Anchor the time window at `now` if it has not been anchored yet.
    pub fn anchor(&mut self, now: DateTime<Utc>) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Seconds left in the window; the full limit before the anchor is set.
    #[must_use]
    pub fn time_remaining(&self, now: DateTime<Utc>) -> f64 {
        let limit = f64::from(self.settings.time_limit_secs);
        match self.started_at {
            None => limit,
            Some(start) => (limit - elapsed_secs(start, now)).max(0.0),
        }
    }

    /// Evaluate the termination conditions in priority order and latch the first hit.
    ///
    /// Once latched, the same reason is returned on every later call.
    pub fn check_termination(&mut self, now: DateTime<Utc>) -> Option<EndReason> {
        if self.ended.is_some() {
            return self.ended;
        }
        let reason = if self.time_remaining(now) <= 0.0 {
            Some(EndReason::TimeExpired)
        } else if self.fatigue >= FATIGUE_CEILING {
            Some(EndReason::FatigueExceeded)
        } else if self.asked_count >= self.settings.max_questions {
            Some(EndReason::MaxQuestionsReached)
        } else {
            None
        };
        self.ended = reason;
        reason
    }

    /// Mark an item as drawn for this session.
    pub fn record_served(&mut self, item: &Item) {
        self.seen.insert(item.id());
        self.asked_count = self.asked_count.saturating_add(1);
        self.last_served_band = Some(item.band());
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            band: self.current_band,
            asked_count: self.asked_count,
            ability: self.ability,
            rolling_accuracy: self.rolling_accuracy(),
            fatigue: self.fatigue,
            mastery: self.mastery,
        }
    }
}
