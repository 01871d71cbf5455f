pub mod answers;
pub mod error;
pub mod gate;
pub mod history;
pub mod impact;
pub mod quests;
pub mod session;
pub mod xp;

pub use answers::AnswerSet;
pub use error::{TrackerError, ValidationError};
pub use gate::{format_countdown, GateState};
pub use history::{lifetime_savings, newest_first, DailyLogEntry};
pub use impact::ImpactBreakdown;
pub use quests::Quest;
pub use session::{Session, SessionSettings, Step, Submission};
pub use xp::LevelState;
