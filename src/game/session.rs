//! Game session state machine
//!
//! Owns the mutable session: mode, score, lives, countdown, and the live
//! question. Transitions return [`GameEvent`]s for the presentation layer to
//! act on; the core never touches the DOM, storage, or audio itself.
//!
//! Out-of-state calls are dropped silently (they return `None`). That is a
//! deliberate policy, not an error: a double-click during the feedback
//! window, or a stale browser timer, must not mutate anything.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::choices::build_choices;
use super::question::{self, Difficulty, OpSet, Question};
use crate::consts::{SURVIVAL_LIVES, TIMED_DURATION_SECS};

/// Game mode. The learn view is a static table and bypasses the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Practice,
    Timed,
    Survival,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Practice => "Practice",
            Mode::Timed => "Timed",
            Mode::Survival => "Survival",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "practice" => Some(Mode::Practice),
            "timed" => Some(Mode::Timed),
            "survival" => Some(Mode::Survival),
            _ => None,
        }
    }

    /// Operations this mode draws questions from
    fn ops(&self) -> OpSet {
        OpSet::Mixed
    }
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Menu showing, no session running
    Idle,
    /// A question is on screen awaiting an answer
    Active,
    /// Brief highlight window after an answer, before the next question
    Feedback,
    /// Run ended, result screen showing
    Ended,
}

/// Push notifications for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A fresh question is ready to render
    QuestionLoaded {
        question: Question,
        choices: Vec<u32>,
    },
    /// An answer was judged; `answer` lets the UI highlight the right button
    AnswerResult { correct: bool, answer: u32 },
    /// The run is over
    SessionEnded { final_score: u32 },
}

/// One game session from `start` to `Ended`.
///
/// `generation` increments on every `start` and `return_to_menu`. The glue
/// tags each browser timer with the generation current at scheduling time
/// and discards callbacks whose tag no longer matches, so a timer armed for
/// a superseded session can never mutate its replacement.
#[derive(Debug)]
pub struct Session {
    mode: Mode,
    difficulty: Difficulty,
    score: u32,
    lives: u8,
    time_left: u32,
    phase: Phase,
    accepting_input: bool,
    current: Option<Question>,
    generation: u64,
    rng: Pcg32,
}

impl Session {
    pub fn new(seed: u64) -> Self {
        Self {
            mode: Mode::Practice,
            difficulty: Difficulty::default(),
            score: 0,
            lives: SURVIVAL_LIVES,
            time_left: 0,
            phase: Phase::Idle,
            accepting_input: false,
            current: None,
            generation: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    // === Read-only snapshot ===

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn accepting_input(&self) -> bool {
        self.accepting_input
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    // === Transitions ===

    /// Begin a new run, discarding any previous one.
    pub fn start(&mut self, mode: Mode, difficulty: Difficulty) -> GameEvent {
        self.generation += 1;
        self.mode = mode;
        self.difficulty = difficulty;
        self.score = 0;
        self.lives = SURVIVAL_LIVES;
        self.time_left = if mode == Mode::Timed {
            TIMED_DURATION_SECS
        } else {
            0
        };
        self.load_question()
    }

    /// One-second countdown tick (timed mode only).
    ///
    /// Ends the session the moment the clock hits zero, regardless of
    /// whether input is currently being accepted.
    pub fn tick(&mut self) -> Option<GameEvent> {
        if self.mode != Mode::Timed {
            return None;
        }
        match self.phase {
            Phase::Active | Phase::Feedback => {}
            Phase::Idle | Phase::Ended => return None,
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            return Some(self.end());
        }
        None
    }

    /// Judge an answer. Ignored unless a question is live and accepting.
    pub fn submit_answer(&mut self, value: u32) -> Option<GameEvent> {
        if self.phase != Phase::Active || !self.accepting_input {
            return None;
        }
        let answer = self.current.as_ref()?.answer;

        self.accepting_input = false;
        self.phase = Phase::Feedback;

        let correct = value == answer;
        if correct {
            self.score += 1;
        } else if self.mode == Mode::Survival {
            self.lives = self.lives.saturating_sub(1);
        }

        Some(GameEvent::AnswerResult { correct, answer })
    }

    /// Follow-up decision after the feedback window.
    ///
    /// Timer expiry outranks the round advance: whenever both are due the
    /// session resolves to `Ended`, never to a fresh question.
    pub fn advance_round(&mut self) -> Option<GameEvent> {
        if self.phase != Phase::Feedback {
            return None;
        }
        let expired = self.mode == Mode::Timed && self.time_left == 0;
        let out_of_lives = self.mode == Mode::Survival && self.lives == 0;
        if expired || out_of_lives {
            return Some(self.end());
        }
        Some(self.load_question())
    }

    /// End the run and report the final score.
    pub fn end(&mut self) -> GameEvent {
        self.phase = Phase::Ended;
        self.accepting_input = false;
        self.current = None;
        GameEvent::SessionEnded {
            final_score: self.score,
        }
    }

    /// Back to the menu. Bumps the generation so pending timers go stale.
    pub fn return_to_menu(&mut self) {
        self.generation += 1;
        self.phase = Phase::Idle;
        self.accepting_input = false;
        self.current = None;
    }

    fn load_question(&mut self) -> GameEvent {
        let question = question::generate(self.difficulty, self.mode.ops(), &mut self.rng);
        let choices = build_choices(question.answer, &mut self.rng);
        self.current = Some(question.clone());
        self.phase = Phase::Active;
        self.accepting_input = true;
        GameEvent::QuestionLoaded { question, choices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unpack the question loaded by the last transition
    fn loaded(event: GameEvent) -> (Question, Vec<u32>) {
        match event {
            GameEvent::QuestionLoaded { question, choices } => (question, choices),
            other => panic!("expected QuestionLoaded, got {other:?}"),
        }
    }

    /// A wrong value for the live question (numeric compare, so any
    /// off-by-one will do even if it is not among the choices)
    fn wrong(question: &Question) -> u32 {
        question.answer + 1
    }

    #[test]
    fn test_start_loads_first_question() {
        let mut session = Session::new(1);
        assert_eq!(session.phase(), Phase::Idle);

        let (question, choices) = loaded(session.start(Mode::Practice, Difficulty::Easy));
        assert_eq!(session.phase(), Phase::Active);
        assert!(session.accepting_input());
        assert_eq!(session.score(), 0);
        assert!(choices.contains(&question.answer));
    }

    #[test]
    fn test_practice_round_flow() {
        let mut session = Session::new(2);
        let (question, _) = loaded(session.start(Mode::Practice, Difficulty::Medium));

        let result = session.submit_answer(question.answer);
        assert_eq!(
            result,
            Some(GameEvent::AnswerResult {
                correct: true,
                answer: question.answer
            })
        );
        assert_eq!(session.score(), 1);
        assert_eq!(session.phase(), Phase::Feedback);
        assert!(!session.accepting_input());

        let (_, choices) = loaded(session.advance_round().unwrap());
        assert_eq!(session.phase(), Phase::Active);
        assert!(session.accepting_input());
        assert_eq!(choices.len(), 4);
    }

    #[test]
    fn test_double_submit_mutates_once() {
        let mut session = Session::new(3);
        let (question, _) = loaded(session.start(Mode::Survival, Difficulty::Easy));

        assert!(session.submit_answer(wrong(&question)).is_some());
        assert_eq!(session.lives(), 2);

        // Second press during the feedback window is dropped
        assert_eq!(session.submit_answer(wrong(&question)), None);
        assert_eq!(session.lives(), 2);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_submit_ignored_when_idle_or_ended() {
        let mut session = Session::new(4);
        assert_eq!(session.submit_answer(7), None);

        session.start(Mode::Practice, Difficulty::Easy);
        session.end();
        assert_eq!(session.submit_answer(7), None);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_survival_three_misses_ends_run() {
        let mut session = Session::new(5);
        let (mut question, _) = loaded(session.start(Mode::Survival, Difficulty::Hard));

        for miss in 1..=3u8 {
            let result = session.submit_answer(wrong(&question)).unwrap();
            assert!(matches!(result, GameEvent::AnswerResult { correct: false, .. }));
            assert_eq!(session.lives(), 3 - miss);

            match session.advance_round().unwrap() {
                GameEvent::QuestionLoaded { question: q, .. } => {
                    assert!(miss < 3, "run should have ended after the third miss");
                    question = q;
                }
                GameEvent::SessionEnded { final_score } => {
                    assert_eq!(miss, 3);
                    assert_eq!(final_score, 0);
                }
                other => panic!("unexpected event {other:?}"),
            }
        }

        assert_eq!(session.phase(), Phase::Ended);
        assert_eq!(session.lives(), 0);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_timed_expiry_freezes_score() {
        let mut session = Session::new(6);
        let (question, _) = loaded(session.start(Mode::Timed, Difficulty::Medium));
        assert_eq!(session.time_left(), 60);

        let mut ended = None;
        for _ in 0..60 {
            if let Some(event) = session.tick() {
                ended = Some(event);
            }
        }
        assert_eq!(ended, Some(GameEvent::SessionEnded { final_score: 0 }));
        assert_eq!(session.time_left(), 0);
        assert_eq!(session.phase(), Phase::Ended);

        // Racing submit right after expiry must not score
        assert_eq!(session.submit_answer(question.answer), None);
        assert_eq!(session.score(), 0);

        // Further ticks are dropped too
        assert_eq!(session.tick(), None);
    }

    #[test]
    fn test_expiry_outranks_pending_round_advance() {
        let mut session = Session::new(7);
        let (question, _) = loaded(session.start(Mode::Timed, Difficulty::Easy));

        // Answer, then let the clock run out during the feedback window
        session.submit_answer(question.answer);
        assert_eq!(session.phase(), Phase::Feedback);
        for _ in 0..60 {
            session.tick();
        }
        assert_eq!(session.phase(), Phase::Ended);

        // The queued advance fires late and must be dropped, not load a question
        assert_eq!(session.advance_round(), None);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn test_tick_ignored_outside_timed_mode() {
        let mut session = Session::new(8);
        session.start(Mode::Practice, Difficulty::Easy);
        assert_eq!(session.tick(), None);
        assert_eq!(session.time_left(), 0);
    }

    #[test]
    fn test_generation_bumps_on_start_and_menu() {
        let mut session = Session::new(9);
        let g0 = session.generation();

        session.start(Mode::Practice, Difficulty::Easy);
        let g1 = session.generation();
        assert!(g1 > g0);

        session.return_to_menu();
        assert!(session.generation() > g1);
        assert_eq!(session.phase(), Phase::Idle);
        assert!(!session.accepting_input());
    }

    #[test]
    fn test_restart_resets_state() {
        let mut session = Session::new(10);
        let (question, _) = loaded(session.start(Mode::Survival, Difficulty::Easy));
        session.submit_answer(wrong(&question));
        assert_eq!(session.lives(), 2);

        let (_, _) = loaded(session.start(Mode::Timed, Difficulty::Hard));
        assert_eq!(session.score(), 0);
        assert_eq!(session.lives(), 3);
        assert_eq!(session.time_left(), 60);
        assert_eq!(session.mode(), Mode::Timed);
    }
}
