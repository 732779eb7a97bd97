#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Slide movement system that advances the actor one cell at a time.
//!
//! A directional input starts a slide that keeps stepping in the same
//! direction until the next cell is the goal, a wall, or (when confined) lies
//! outside the grid. Each cell transition is interpolated over `1 / move_speed`
//! seconds of simulated time and then snapped to the exact cell centre.

use glam::Vec2;
use ice_slide_core::{
    ActorSnapshot, CellCoord, Command, Direction, Event, GridView, StopReason,
};
use log::debug;

/// Tunable parameters of the slide engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementConfig {
    /// Cells crossed per second of simulated time. Non-positive values settle
    /// one cell per tick.
    pub move_speed: f32,
    /// Stops slides at the grid edge even when no wall borders the map.
    pub confine_to_grid: bool,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            confine_to_grid: true,
        }
    }
}

/// Single in-flight transition between two neighbouring cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepAnimation {
    from: CellCoord,
    to: CellCoord,
    start: Vec2,
    end: Vec2,
    elapsed: f32,
}

impl StepAnimation {
    fn toward(from: CellCoord, direction: Direction, grid: &GridView<'_>) -> Self {
        let to = from.step(direction);
        Self {
            from,
            to,
            start: grid.position_of(from),
            end: grid.position_of(to),
            elapsed: 0.0,
        }
    }

    /// Cell the actor is leaving.
    #[must_use]
    pub const fn from(&self) -> CellCoord {
        self.from
    }

    /// Cell the actor is entering.
    #[must_use]
    pub const fn to(&self) -> CellCoord {
        self.to
    }

    /// Simulated seconds spent on this transition.
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// Slide state owned by the movement system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SlideState {
    /// No slide is active; directional input is accepted.
    Idle,
    /// A slide is active; directional input is ignored.
    Sliding {
        /// Direction of the active slide.
        direction: Direction,
        /// Transition currently being animated.
        step: StepAnimation,
    },
}

/// Pure system that reacts to world events and input to emit slide commands.
#[derive(Debug)]
pub struct Movement {
    config: MovementConfig,
    state: SlideState,
}

impl Movement {
    /// Creates an idle movement system.
    #[must_use]
    pub const fn new(config: MovementConfig) -> Self {
        Self {
            config,
            state: SlideState::Idle,
        }
    }

    /// Current slide state.
    #[must_use]
    pub const fn state(&self) -> &SlideState {
        &self.state
    }

    /// Reports whether a slide is in progress.
    #[must_use]
    pub const fn is_sliding(&self) -> bool {
        matches!(self.state, SlideState::Sliding { .. })
    }

    /// Parameters this system was created with.
    #[must_use]
    pub const fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Consumes world events and the frame's directional input to emit
    /// movement commands.
    ///
    /// Events are processed before input, so a slide that comes to rest during
    /// this batch accepts a new direction in the same call.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: Option<Direction>,
        grid: &GridView<'_>,
        actor: Option<ActorSnapshot>,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::MapBuilt { .. } => self.state = SlideState::Idle,
                Event::TimeAdvanced { dt } => self.advance(dt.as_secs_f32(), grid, out),
                _ => {}
            }
        }

        if let Some(direction) = input {
            self.begin(direction, grid, actor, out);
        }
    }

    fn begin(
        &mut self,
        direction: Direction,
        grid: &GridView<'_>,
        actor: Option<ActorSnapshot>,
        out: &mut Vec<Command>,
    ) {
        if self.is_sliding() {
            debug!("ignoring {direction:?} input while a slide is in progress");
            return;
        }
        let Some(actor) = actor else {
            debug!("ignoring {direction:?} input without an actor");
            return;
        };

        out.push(Command::BeginSlide { direction });
        match self.stop_ahead(actor.cell, direction, grid) {
            Some(reason) => out.push(Command::EndSlide { reason }),
            None => {
                self.state = SlideState::Sliding {
                    direction,
                    step: StepAnimation::toward(actor.cell, direction, grid),
                }
            }
        }
    }

    fn advance(&mut self, dt: f32, grid: &GridView<'_>, out: &mut Vec<Command>) {
        let SlideState::Sliding {
            direction,
            mut step,
        } = self.state
        else {
            return;
        };

        step.elapsed += dt;
        if step.elapsed < self.step_duration() {
            let fraction = step.elapsed * self.config.move_speed;
            out.push(Command::MoveActor {
                position: step.start.lerp(step.end, fraction),
            });
            self.state = SlideState::Sliding { direction, step };
            return;
        }

        out.push(Command::SettleActor { cell: step.to });
        self.state = match self.stop_ahead(step.to, direction, grid) {
            Some(reason) => {
                out.push(Command::EndSlide { reason });
                SlideState::Idle
            }
            None => SlideState::Sliding {
                direction,
                step: StepAnimation::toward(step.to, direction, grid),
            },
        };
    }

    fn stop_ahead(&self, cell: CellCoord, direction: Direction, grid: &GridView<'_>) -> Option<StopReason> {
        let next = cell.step(direction);
        if grid.is_goal(next) {
            Some(StopReason::Goal)
        } else if grid.is_obstacle(next) {
            Some(StopReason::Obstacle)
        } else if self.config.confine_to_grid && !grid.contains(next) {
            Some(StopReason::Boundary)
        } else {
            None
        }
    }

    fn step_duration(&self) -> f32 {
        if self.config.move_speed > 0.0 {
            1.0 / self.config.move_speed
        } else {
            0.0
        }
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(MovementConfig::default())
    }
}
