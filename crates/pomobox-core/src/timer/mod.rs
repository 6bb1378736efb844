mod engine;
mod ticker;

pub use engine::{IntervalFinished, Phase, TimerMachine, TimerSettings, TimerState};
pub use ticker::Ticker;
