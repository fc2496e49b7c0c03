//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (KeyValueStore, ChatClient)
//! but are themselves concrete structs, not traits.

mod persistence;
mod playback;
mod tutor;
mod workbench;

pub use persistence::{
    PersistenceService, SessionRecord, SessionSummary, CURRENT_STATE_KEY, SESSIONS_KEY,
};
pub use playback::{
    random_array, ActiveRun, CancelHandle, PlaybackOutcome, PlaybackService, Speed, Visualizer,
    MAX_ARRAY_SIZE, MIN_ARRAY_SIZE, VALUE_RANGE,
};
pub use tutor::{Difficulty, TutorContext, TutorService, DEFAULT_HISTORY_WINDOW};
pub use workbench::{WorkbenchService, HISTORY_LIMIT};
