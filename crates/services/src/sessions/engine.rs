use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::stream::{self, StreamExt};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use quiz_core::proficiency::{self, Response};
use quiz_core::staircase;
use quiz_core::{Classification, Clock, ItemBank, ItemId, SessionSettings, SessionSnapshot};

use super::store::{SessionKey, SessionStore};
use super::view::{
    AnswerResult, AnswerSubmission, BatchReport, ExplainEntry, Explanation, NextOutcome, ServedItem,
};
use crate::ai::{fallback, TutorService};
use crate::config::EngineConfig;
use crate::error::EngineError;

/// Floor for the substituted response time when an answer carries none.
const MIN_ELAPSED_SECS: f64 = 0.1;

/// Adaptive quiz engine: item banks, per-learner sessions and the tutor.
///
/// Banks are built once and never change. Every session operation runs under
/// that session's lock, so concurrent answers for one learner are serialized.
pub struct QuizEngine {
    clock: Clock,
    banks: HashMap<String, ItemBank>,
    sessions: SessionStore,
    tutor: Arc<TutorService>,
    rng: Mutex<StdRng>,
    defaults: SessionSettings,
    explain_concurrency: usize,
}

impl QuizEngine {
    /// Build a bank per catalog topic and an empty session store.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Bank` if a catalog source cannot fill the pool.
    pub fn new(config: &EngineConfig, tutor: Arc<TutorService>) -> Result<Self, EngineError> {
        let mut rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut banks = HashMap::with_capacity(config.catalog.len());
        for source in &config.catalog {
            let bank = ItemBank::build(source, config.pool_size, &mut rng)?;
            info!(
                topic = source.topic(),
                items = bank.len(),
                "item bank ready"
            );
            banks.insert(source.topic().to_string(), bank);
        }

        Ok(Self {
            clock: Clock::default(),
            banks,
            sessions: SessionStore::new(config.defaults),
            tutor,
            rng: Mutex::new(rng),
            defaults: config.defaults,
            explain_concurrency: config.explain_concurrency.max(1),
        })
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn defaults(&self) -> SessionSettings {
        self.defaults
    }

    #[must_use]
    pub fn tutor(&self) -> &TutorService {
        &self.tutor
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.banks.keys().map(String::as_str)
    }

    /// # Errors
    ///
    /// Returns `EngineError::UnknownTopic` if no bank was built for `topic`.
    pub fn bank(&self, topic: &str) -> Result<&ItemBank, EngineError> {
        self.banks
            .get(topic)
            .ok_or_else(|| EngineError::UnknownTopic(topic.to_string()))
    }

    //
    // ─── SESSION LIFECYCLE ─────────────────────────────────────────────────────
    //

    /// Reset the session for `key` and adopt `settings`.
    ///
    /// The time window is anchored by the first `next` after the reset.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTopic`, or `InvalidSettings` when `max_questions` is
    /// zero or larger than the topic's bank.
    pub fn start(&self, key: &SessionKey, settings: SessionSettings) -> Result<(), EngineError> {
        let bank = self.bank(&key.topic)?;
        let capacity = bank.len();
        let max = usize::try_from(settings.max_questions).unwrap_or(usize::MAX);
        if max == 0 || max > capacity {
            return Err(EngineError::InvalidSettings(format!(
                "max_questions must be between 1 and {capacity}, got {}",
                settings.max_questions
            )));
        }

        self.sessions.with_session(key, |state| {
            state.reset(settings);
            Ok(())
        })?;
        info!(
            session = %key,
            time_limit_secs = settings.time_limit_secs,
            max_questions = settings.max_questions,
            "session started"
        );
        Ok(())
    }

    /// Serve the next item, or report why the session has ended.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTopic`, `PoolExhausted` when every item has been seen,
    /// or `LockPoisoned`.
    pub fn next(&self, key: &SessionKey) -> Result<NextOutcome, EngineError> {
        let bank = self.bank(&key.topic)?;
        let now = self.clock.now();

        self.sessions.with_session(key, |state| {
            state.anchor(now);
            if let Some(reason) = state.check_termination(now) {
                info!(session = %key, %reason, asked = state.asked_count(), "session ended");
                return Ok(NextOutcome::Ended { reason });
            }

            let mut rng = self.rng.lock().map_err(|_| EngineError::LockPoisoned)?;
            let item = bank
                .draw(state.current_band(), state.seen(), &mut *rng)
                .ok_or(EngineError::PoolExhausted)?;
            state.record_served(item);
            debug!(session = %key, item = %item.id(), band = %state.current_band(), "item served");

            // Non-negative and bounded by the u32 time limit.
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let time_left = state.time_remaining(now).floor() as u64;
            Ok(NextOutcome::Item {
                item: ServedItem::from(item),
                time_left,
            })
        })
    }

    /// Score one answer and update the learner model and band.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTopic`, `ItemNotFound`, `InvalidChoice`, or
    /// `SessionEnded` once a termination reason has been latched.
    pub fn answer(
        &self,
        key: &SessionKey,
        submission: &AnswerSubmission,
    ) -> Result<AnswerResult, EngineError> {
        let bank = self.bank(&key.topic)?;
        let item = bank
            .get(&submission.item_id)
            .ok_or(EngineError::ItemNotFound(submission.item_id))?;
        if !item.accepts_choice(submission.chosen_index) {
            return Err(EngineError::InvalidChoice {
                index: submission.chosen_index,
                options: item.options().len(),
            });
        }

        let elapsed_secs = submission
            .elapsed_secs
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .unwrap_or_else(|| item.expected_time().mean_secs.max(MIN_ELAPSED_SECS));
        let correct = item.is_correct(submission.chosen_index);

        self.sessions.with_session(key, |state| {
            if let Some(reason) = state.ended() {
                return Err(EngineError::SessionEnded(reason));
            }
            let response = Response {
                correct,
                hint_used: submission.hint_used,
                elapsed_secs,
            };
            proficiency::record_response(state, item, &response);
            let step = staircase::advance(state, correct, submission.hint_used);
            debug!(
                session = %key,
                item = %item.id(),
                correct,
                hint_used = submission.hint_used,
                next_band = %step.band,
                fatigue = state.fatigue(),
                "answer recorded"
            );
            Ok(AnswerResult {
                correct,
                correct_index: item.correct_index(),
                snapshot: state.snapshot(),
            })
        })
    }

    /// # Errors
    ///
    /// Returns `UnknownTopic` or `LockPoisoned`.
    pub fn snapshot(&self, key: &SessionKey) -> Result<SessionSnapshot, EngineError> {
        self.bank(&key.topic)?;
        self.sessions
            .with_session(key, |state| Ok(state.snapshot()))
    }

    //
    // ─── TUTOR ─────────────────────────────────────────────────────────────────
    //

    /// A hint for one item. Never contains the correct option's text.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTopic` or `ItemNotFound`; backend failures fall back to
    /// offline text instead.
    pub async fn hint(&self, key: &SessionKey, item_id: &ItemId) -> Result<String, EngineError> {
        let bank = self.bank(&key.topic)?;
        let item = bank
            .get(item_id)
            .ok_or(EngineError::ItemNotFound(*item_id))?;

        let hint = self
            .tutor
            .generate_hint(item.text(), item.options(), item.subskill())
            .await;
        if fallback::reveals_answer(&hint, item.options(), item.correct_index()) {
            debug!(session = %key, item = %item_id, "hint gave the answer away; using offline hint");
            return Ok(fallback::hint(item.subskill()));
        }
        Ok(hint)
    }

    /// Score a finished quiz and explain every answer.
    ///
    /// Explanations are generated with bounded concurrency and returned in
    /// entry order.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTopic` or `LockPoisoned`.
    pub async fn explain_batch(
        &self,
        key: &SessionKey,
        entries: &[ExplainEntry],
    ) -> Result<BatchReport, EngineError> {
        self.bank(&key.topic)?;
        let snapshot = self
            .sessions
            .with_session(key, |state| Ok(state.snapshot()))?;

        let score = entries.iter().filter(|entry| entry.is_correct()).count();
        let score = u32::try_from(score).unwrap_or(u32::MAX);

        let tutor = &self.tutor;
        let explanations = stream::iter(entries)
            .map(|entry: &ExplainEntry| async move {
                let explanation = tutor
                    .generate_explanation(
                        &entry.text,
                        &entry.options,
                        entry.correct_index,
                        entry.chosen_index,
                    )
                    .await;
                Explanation {
                    item_id: entry.item_id.clone(),
                    explanation,
                    chosen_index: entry.chosen_index,
                    correct_index: entry.correct_index,
                }
            })
            .buffered(self.explain_concurrency)
            .boxed()
            .collect::<Vec<_>>()
            .await;

        let classification = Classification::from_score(score);
        info!(session = %key, score, total = entries.len(), %classification, "quiz scored");
        Ok(BatchReport {
            classification,
            score,
            asked_count: entries.len(),
            snapshot,
            explanations,
        })
    }
}
