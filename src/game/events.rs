//! Events delivered through the host's event hooks

use std::fmt;

/// Hook fired when any goal is scored
pub const GOAL_SCORED_HOOK: &str = "Function TAGame.GameEvent_Soccar_TA.EventGoalScored";

/// Hook fired when a car touches the ball
pub const BALL_HIT_HOOK: &str = "Function TAGame.Car_TA.OnHitBall";

/// Stable identity of a player in the current match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

/// Payload of a goal event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GoalScored {
    /// Player credited with the goal, if the host could tell
    pub scorer: Option<PlayerId>,
    /// Team that received the point
    pub team: Option<u8>,
}

/// Payload of a ball touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BallHit {
    pub by: Option<PlayerId>,
}

/// Types of events the plugin subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    GoalScored(GoalScored),
    BallHit(BallHit),
}

impl GameEvent {
    /// Name of the host hook delivering this event
    pub fn hook_name(&self) -> &'static str {
        match self {
            GameEvent::GoalScored(_) => GOAL_SCORED_HOOK,
            GameEvent::BallHit(_) => BALL_HIT_HOOK,
        }
    }
}

/// Authoritative game state provided by the host
pub trait GameStateQuery {
    /// Inside a match, freeplay or training session
    fn is_in_game(&self) -> bool;

    /// The player controlled by this client
    fn local_player(&self) -> Option<PlayerId>;
}

/// Whether `goal` was scored by the local player.
///
/// Unknown scorers never count, and neither does anything outside a game.
pub fn is_local_goal(goal: &GoalScored, game: &dyn GameStateQuery) -> bool {
    if !game.is_in_game() {
        return false;
    }
    match (goal.scorer, game.local_player()) {
        (Some(scorer), Some(local)) => scorer == local,
        _ => false,
    }
}
