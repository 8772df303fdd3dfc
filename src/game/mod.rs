//! Deterministic quiz core
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Seeded RNG only
//! - Stable, event-driven transitions
//! - No rendering or platform dependencies
//!
//! Browser timers belong to the glue; the core only reacts to the discrete
//! events they deliver (`tick`, `advance_round`).

pub mod choices;
pub mod question;
pub mod session;

pub use choices::build_choices;
pub use question::{Difficulty, OpSet, Question, generate};
pub use session::{GameEvent, Mode, Phase, Session};
