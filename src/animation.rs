use tracing::{debug, info};

use storepilot_geo::GridPoint;

use crate::blackboard::{Blackboard, Mode};
use crate::bus::Topic;

/// Read cursor over an interpolated path. The path itself is immutable once
/// armed; only the index advances.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationCursor {
    pub path: Vec<GridPoint>,
    pub index: usize,
}

impl AnimationCursor {
    pub fn armed(path: Vec<GridPoint>) -> Self {
        AnimationCursor { path, index: 0 }
    }

    pub fn reset(&mut self) {
        self.path.clear();
        self.index = 0;
    }

    pub fn is_exhausted(&self) -> bool {
        self.index >= self.path.len()
    }
}

/// Result of one per-frame animation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Animation is not armed; nothing happened.
    Idle,
    /// The position moved one frame's worth toward the current sample.
    Moved,
    /// The position snapped onto the current sample and the cursor advanced.
    Reached,
    /// The path is exhausted; navigation is complete and the mode is Idle.
    Finished,
}

/// Advances the shared position one step toward the next unvisited path
/// sample. Called once per display frame from the render loop.
///
/// The whole step runs under a single write lock and starts by checking the
/// mode tag, so stopping navigation (which flips the tag) synchronously
/// revokes any frame that has not run yet; a late frame sees `Idle` and
/// does not touch the position.
///
/// When the remaining distance to the current sample is below
/// `movement_per_frame` the position snaps onto the sample instead of
/// overshooting and oscillating around it.
pub fn step_frame(bb: &Blackboard, movement_per_frame: f64, positions: &Topic<GridPoint>) -> StepOutcome {
    let mut g = bb.write();
    if g.mode != Mode::Animating {
        return StepOutcome::Idle;
    }

    if g.cursor.is_exhausted() {
        g.cursor.reset();
        g.mode = Mode::Idle;
        drop(g);
        info!("navigation complete");
        return StepOutcome::Finished;
    }

    let target = g.cursor.path[g.cursor.index];
    let current = g.position;
    let distance = current.distance_to(target);

    let outcome = if distance < movement_per_frame {
        g.position = target;
        g.cursor.index += 1;
        StepOutcome::Reached
    } else {
        g.position = GridPoint::new(
            current.x + (target.x - current.x) / distance * movement_per_frame,
            current.y + (target.y - current.y) / distance * movement_per_frame,
        );
        StepOutcome::Moved
    };

    let position = g.position;
    drop(g);
    debug!(x = position.x, y = position.y, "animation step");
    positions.publish(position);
    outcome
}
