// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Serialize;

use crate::settings::SessionSettings;
use crate::types::card::Card;
use crate::types::timestamp::Timestamp;

/// Identifies one countdown. Each entry into the presenting state issues a
/// new ticket, so ticks addressed to an earlier countdown can be told apart
/// and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Ticket(u64);

impl Display for Ticket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The live countdown of the presenting state. It is owned by the phase, so
/// leaving the phase by any transition releases it.
#[derive(Debug)]
struct Countdown {
    ticket: Ticket,
    remaining: u32,
}

#[derive(Debug)]
enum Phase {
    /// No session is running.
    Idle,
    Presenting(Countdown),
    Revealed {
        timed_out: bool,
    },
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Idle,
    Presenting,
    Revealed,
    Completed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Idle => "idle",
            Status::Presenting => "presenting",
            Status::Revealed => "revealed",
            Status::Completed => "completed",
        }
    }
}

/// The side of the current card to show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Face<'a> {
    Question(&'a Card),
    Answer(&'a Card),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown is still running.
    Running { remaining: u32 },
    /// The countdown reached zero and the answer was revealed.
    TimedOut,
    /// The ticket does not belong to the live countdown. Nothing changed.
    Stale,
}

/// What the view needs to render the session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub status: Status,
    pub position: usize,
    pub total: usize,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub seconds_left: Option<u32>,
    pub timed_out: bool,
    pub ticket: Option<Ticket>,
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub card_count: usize,
    pub timeout_count: usize,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
    pub elapsed_seconds: i64,
}

/// A quiz over a fixed queue of cards, each shown with a countdown.
#[derive(Debug)]
pub struct SessionEngine {
    /// Snapshot of the cards taken when the session started.
    queue: Vec<Card>,
    position: usize,
    phase: Phase,
    /// Countdown length for every card of this session.
    duration: u32,
    /// Number of tickets issued so far.
    issued: u64,
    timeout_count: usize,
    started_at: Option<Timestamp>,
    finished_at: Option<Timestamp>,
}

impl SessionEngine {
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            position: 0,
            phase: Phase::Idle,
            duration: 0,
            issued: 0,
            timeout_count: 0,
            started_at: None,
            finished_at: None,
        }
    }

    /// Starts a session over a copy of `cards`. Any running session is
    /// replaced.
    pub fn start(&mut self, cards: &[Card], settings: &SessionSettings) {
        log::debug!(
            "Starting session with {} cards, {}s per card",
            cards.len(),
            settings.timer_duration_seconds()
        );
        self.queue = cards.to_vec();
        self.position = 0;
        self.duration = settings.timer_duration_seconds();
        self.timeout_count = 0;
        self.started_at = Some(Timestamp::now());
        self.finished_at = None;
        if self.queue.is_empty() {
            self.complete();
        } else {
            self.present();
        }
    }

    /// Shows the answer. Only valid while presenting; returns whether the
    /// state changed.
    pub fn reveal(&mut self) -> bool {
        match self.phase {
            Phase::Presenting(_) => {
                self.phase = Phase::Revealed { timed_out: false };
                true
            }
            _ => false,
        }
    }

    /// Moves past a revealed card. Only valid while revealed; returns
    /// whether the state changed.
    pub fn next(&mut self) -> bool {
        match self.phase {
            Phase::Revealed { .. } => {
                self.position += 1;
                if self.position >= self.queue.len() {
                    self.complete();
                } else {
                    self.present();
                }
                true
            }
            _ => false,
        }
    }

    /// Ends the session from any state. Returns whether a session was
    /// running.
    pub fn quit(&mut self) -> bool {
        if matches!(self.phase, Phase::Idle) {
            return false;
        }
        log::debug!("Session quit at card {}", self.position + 1);
        self.phase = Phase::Idle;
        self.queue.clear();
        self.position = 0;
        true
    }

    /// Advances the countdown by one second. At zero the answer is revealed,
    /// as with `reveal`.
    pub fn tick(&mut self, ticket: Ticket) -> TickOutcome {
        let Phase::Presenting(countdown) = &mut self.phase else {
            return TickOutcome::Stale;
        };
        if countdown.ticket != ticket {
            return TickOutcome::Stale;
        }
        countdown.remaining = countdown.remaining.saturating_sub(1);
        if countdown.remaining > 0 {
            return TickOutcome::Running {
                remaining: countdown.remaining,
            };
        }
        log::debug!("Card {} timed out", self.position + 1);
        self.timeout_count += 1;
        self.phase = Phase::Revealed { timed_out: true };
        TickOutcome::TimedOut
    }

    /// The ticket of the live countdown, if presenting.
    pub fn ticket(&self) -> Option<Ticket> {
        match &self.phase {
            Phase::Presenting(countdown) => Some(countdown.ticket),
            _ => None,
        }
    }

    pub fn status(&self) -> Status {
        match self.phase {
            Phase::Idle => Status::Idle,
            Phase::Presenting(_) => Status::Presenting,
            Phase::Revealed { .. } => Status::Revealed,
            Phase::Completed => Status::Completed,
        }
    }

    /// Whether a session is running or showing its completion.
    pub fn is_active(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.phase, Phase::Completed)
    }

    pub fn face(&self) -> Option<Face<'_>> {
        let card = self.queue.get(self.position)?;
        match self.phase {
            Phase::Presenting(_) => Some(Face::Question(card)),
            Phase::Revealed { .. } => Some(Face::Answer(card)),
            Phase::Idle | Phase::Completed => None,
        }
    }

    /// Seconds left on the countdown. Only meaningful while presenting.
    pub fn seconds_left(&self) -> Option<u32> {
        match &self.phase {
            Phase::Presenting(countdown) => Some(countdown.remaining),
            _ => None,
        }
    }

    pub fn timed_out(&self) -> bool {
        matches!(self.phase, Phase::Revealed { timed_out: true })
    }

    /// Zero-based index of the current card.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total(&self) -> usize {
        self.queue.len()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let (question, answer) = match self.face() {
            Some(Face::Question(card)) => (Some(card.question.clone()), None),
            Some(Face::Answer(card)) => (Some(card.question.clone()), Some(card.answer.clone())),
            None => (None, None),
        };
        SessionSnapshot {
            status: self.status(),
            position: self.position,
            total: self.total(),
            question,
            answer,
            seconds_left: self.seconds_left(),
            timed_out: self.timed_out(),
            ticket: self.ticket(),
        }
    }

    /// Totals for a completed session.
    pub fn summary(&self) -> Option<SessionSummary> {
        if !self.is_completed() {
            return None;
        }
        let started_at = self.started_at?;
        let finished_at = self.finished_at?;
        Some(SessionSummary {
            card_count: self.queue.len(),
            timeout_count: self.timeout_count,
            started_at,
            finished_at,
            elapsed_seconds: started_at.seconds_until(finished_at),
        })
    }

    fn present(&mut self) {
        self.issued += 1;
        self.phase = Phase::Presenting(Countdown {
            ticket: Ticket(self.issued),
            remaining: self.duration,
        });
    }

    fn complete(&mut self) {
        log::debug!("Session completed");
        self.phase = Phase::Completed;
        self.finished_at = Some(Timestamp::now());
    }
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards() -> Vec<Card> {
        vec![Card::new("A", "1"), Card::new("B", "2")]
    }

    fn settings(seconds: u32) -> SessionSettings {
        SessionSettings::new(seconds).unwrap()
    }

    fn question(engine: &SessionEngine) -> Option<&str> {
        match engine.face() {
            Some(Face::Question(card)) => Some(card.question.as_str()),
            _ => None,
        }
    }

    fn answer(engine: &SessionEngine) -> Option<&str> {
        match engine.face() {
            Some(Face::Answer(card)) => Some(card.answer.as_str()),
            _ => None,
        }
    }

    #[test]
    fn test_new_engine_is_idle() {
        let engine = SessionEngine::new();
        assert_eq!(engine.status(), Status::Idle);
        assert!(!engine.is_active());
        assert!(engine.face().is_none());
        assert!(engine.ticket().is_none());
    }

    #[test]
    fn test_lifecycle() {
        let mut engine = SessionEngine::new();
        engine.start(&cards(), &settings(5));
        assert_eq!(engine.status(), Status::Presenting);
        assert_eq!(question(&engine), Some("A"));
        assert_eq!(engine.seconds_left(), Some(5));

        assert!(engine.reveal());
        assert_eq!(engine.status(), Status::Revealed);
        assert_eq!(answer(&engine), Some("1"));
        assert_eq!(engine.seconds_left(), None);

        assert!(engine.next());
        assert_eq!(question(&engine), Some("B"));
        assert_eq!(engine.seconds_left(), Some(5));

        assert!(engine.reveal());
        assert_eq!(answer(&engine), Some("2"));

        assert!(engine.next());
        assert!(engine.is_completed());
        assert!(engine.face().is_none());
        let summary = engine.summary().unwrap();
        assert_eq!(summary.card_count, 2);
        assert_eq!(summary.timeout_count, 0);
    }

    #[test]
    fn test_timeout_reveals_answer() {
        let mut engine = SessionEngine::new();
        engine.start(&cards(), &settings(2));
        let ticket = engine.ticket().unwrap();
        assert_eq!(engine.tick(ticket), TickOutcome::Running { remaining: 1 });
        assert_eq!(engine.seconds_left(), Some(1));
        assert_eq!(engine.tick(ticket), TickOutcome::TimedOut);
        assert_eq!(engine.status(), Status::Revealed);
        assert_eq!(answer(&engine), Some("1"));
        assert!(engine.timed_out());
        assert!(engine.ticket().is_none());
    }

    #[test]
    fn test_one_second_timer_times_out_on_first_tick() {
        let mut engine = SessionEngine::new();
        engine.start(&cards(), &settings(1));
        let ticket = engine.ticket().unwrap();
        assert_eq!(engine.tick(ticket), TickOutcome::TimedOut);
        assert_eq!(answer(&engine), Some("1"));
    }

    #[test]
    fn test_tick_after_reveal_is_stale() {
        let mut engine = SessionEngine::new();
        engine.start(&cards(), &settings(1));
        let ticket = engine.ticket().unwrap();
        engine.reveal();
        assert_eq!(engine.tick(ticket), TickOutcome::Stale);
        assert_eq!(engine.status(), Status::Revealed);
        assert!(!engine.timed_out());
    }

    #[test]
    fn test_old_ticket_does_not_touch_next_card() {
        let mut engine = SessionEngine::new();
        engine.start(&cards(), &settings(3));
        let first = engine.ticket().unwrap();
        engine.reveal();
        engine.next();
        let second = engine.ticket().unwrap();
        assert_ne!(first, second);
        assert_eq!(engine.tick(first), TickOutcome::Stale);
        assert_eq!(engine.seconds_left(), Some(3));
        assert_eq!(engine.tick(second), TickOutcome::Running { remaining: 2 });
    }

    #[test]
    fn test_next_restarts_countdown_at_full_duration() {
        let mut engine = SessionEngine::new();
        engine.start(&cards(), &settings(4));
        let ticket = engine.ticket().unwrap();
        engine.tick(ticket);
        engine.tick(ticket);
        assert_eq!(engine.seconds_left(), Some(2));
        engine.reveal();
        engine.next();
        assert_eq!(engine.seconds_left(), Some(4));
    }

    #[test]
    fn test_invalid_actions_are_ignored() {
        let mut engine = SessionEngine::new();
        assert!(!engine.reveal());
        assert!(!engine.next());
        engine.start(&cards(), &settings(5));
        assert!(!engine.next());
        assert_eq!(question(&engine), Some("A"));
        engine.reveal();
        assert!(!engine.reveal());
        assert_eq!(answer(&engine), Some("1"));
    }

    #[test]
    fn test_quit() {
        let mut engine = SessionEngine::new();
        engine.start(&cards(), &settings(5));
        let ticket = engine.ticket().unwrap();
        assert!(engine.quit());
        assert_eq!(engine.status(), Status::Idle);
        assert_eq!(engine.tick(ticket), TickOutcome::Stale);
        assert!(!engine.quit());
    }

    #[test]
    fn test_quit_after_completion() {
        let mut engine = SessionEngine::new();
        engine.start(&cards()[..1], &settings(5));
        engine.reveal();
        engine.next();
        assert!(engine.is_completed());
        assert!(engine.quit());
        assert!(!engine.is_active());
    }

    #[test]
    fn test_empty_queue_completes_immediately() {
        let mut engine = SessionEngine::new();
        engine.start(&[], &settings(5));
        assert!(engine.is_completed());
        assert!(engine.ticket().is_none());
    }

    #[test]
    fn test_session_is_a_snapshot() {
        let mut source = cards();
        let mut engine = SessionEngine::new();
        engine.start(&source, &settings(5));
        source[0].question = "changed".to_string();
        source.clear();
        assert_eq!(question(&engine), Some("A"));
        assert_eq!(engine.total(), 2);
    }

    #[test]
    fn test_settings_read_at_start() {
        let mut engine = SessionEngine::new();
        let mut current = settings(5);
        engine.start(&cards(), &current);
        current = settings(9);
        engine.reveal();
        engine.next();
        assert_eq!(engine.seconds_left(), Some(5));
        engine.start(&cards(), &current);
        assert_eq!(engine.seconds_left(), Some(9));
    }

    #[test]
    fn test_timeouts_are_counted() {
        let mut engine = SessionEngine::new();
        engine.start(&cards(), &settings(1));
        let ticket = engine.ticket().unwrap();
        engine.tick(ticket);
        engine.next();
        engine.reveal();
        engine.next();
        assert_eq!(engine.summary().unwrap().timeout_count, 1);
    }

    #[test]
    fn test_snapshot_json() -> crate::error::Fallible<()> {
        let mut engine = SessionEngine::new();
        engine.start(&cards(), &settings(5));
        let json = serde_json::to_value(engine.snapshot())?;
        assert_eq!(json["status"], "presenting");
        assert_eq!(json["question"], "A");
        assert!(json["answer"].is_null());
        assert_eq!(json["secondsLeft"], 5);
        assert_eq!(json["total"], 2);
        engine.reveal();
        let json = serde_json::to_value(engine.snapshot())?;
        assert_eq!(json["status"], "revealed");
        assert_eq!(json["answer"], "1");
        assert!(json["secondsLeft"].is_null());
        Ok(())
    }
}
