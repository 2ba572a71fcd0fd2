use parking_lot::RwLock;
use std::sync::Arc;

use storepilot_geo::GridPoint;

use crate::animation::AnimationCursor;

/// Operating mode governing who may write the shared position.
///
/// `Animating` and `LiveTracking` are the two position producers; entering
/// `LiveTracking` tears down any active animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    Animating,
    LiveTracking,
}

#[derive(Clone, Default)]
pub struct SharedState {
    /// The shopper's current location on the grid.
    pub position: GridPoint,
    pub mode: Mode,
    /// Committed route, as section ids in visit order.
    pub route: Vec<String>,
    pub cursor: AnimationCursor,
    /// Single current user-visible error; a new one replaces the old.
    pub error: Option<String>,
}

pub type Blackboard = Arc<RwLock<SharedState>>;

pub fn new_blackboard(start: GridPoint) -> Blackboard {
    Arc::new(RwLock::new(SharedState {
        position: start,
        ..Default::default()
    }))
}

pub fn snapshot(bb: &Blackboard) -> SharedState {
    (*bb.read()).clone()
}

/// The single position setter. Writes only while the blackboard's mode tag
/// matches the writer's authorization, so at most one of the animation
/// driver and the tracking task can ever mutate the position.
pub fn set_position_if(bb: &Blackboard, authorized: Mode, p: GridPoint) -> bool {
    let mut g = bb.write();
    if g.mode != authorized {
        return false;
    }
    g.position = p;
    true
}

pub fn set_error(bb: &Blackboard, msg: impl Into<String>) {
    bb.write().error = Some(msg.into());
}

pub fn clear_error(bb: &Blackboard) {
    bb.write().error = None;
}
