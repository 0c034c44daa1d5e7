//! Game event handling
//!
//! Events delivered by the host's hooks and the counter they drive.

pub mod counter;
pub mod events;

pub use counter::EventCounter;
pub use events::{
    is_local_goal, BallHit, GameEvent, GameStateQuery, GoalScored, PlayerId, BALL_HIT_HOOK,
    GOAL_SCORED_HOOK,
};
