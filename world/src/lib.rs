#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state management for Lava Runner.

mod plan;

use std::time::Duration;

use lava_runner_core::{
    Actor, ActorId, ActorKind, CellKind, Command, Event, InputState, InvalidLevelPlan, LevelStatus,
    Obstacle, Surroundings, TouchKind, Vector,
};
use lava_runner_system_motion as motion;
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use plan::{actor_for, background_for, ActorSeed};

/// Longest slice of time a single actor step may integrate over, in seconds.
pub const MAX_STEP: f32 = 0.05;
/// Seconds a level keeps running after it was won or lost.
pub const FINISH_DELAY: f32 = 1.0;

/// Represents a single playable level: static grid plus live actors.
#[derive(Clone, Debug)]
pub struct Level {
    width: usize,
    height: usize,
    grid: Vec<CellKind>,
    actors: Vec<Actor>,
    player: ActorId,
    status: Option<LevelStatus>,
    finish_delay: f32,
    finish_reported: bool,
}

impl Level {
    /// Builds a level from its plan, seeding coin wobble from system entropy.
    pub fn new<S>(plan: &[S]) -> Result<Self, InvalidLevelPlan>
    where
        S: AsRef<str>,
    {
        Self::from_plan(plan, &mut ChaCha8Rng::from_entropy())
    }

    /// Builds a level from its plan using `rng` for coin wobble phases.
    pub fn from_plan<S, R>(plan: &[S], rng: &mut R) -> Result<Self, InvalidLevelPlan>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let parsed = plan::parse(plan)?;
        let actors: Vec<Actor> = parsed
            .seeds
            .into_iter()
            .enumerate()
            .map(|(index, seed)| seed.spawn(ActorId::new(index as u32), rng))
            .collect();
        let player = ActorId::new(parsed.player as u32);

        Ok(Self {
            width: parsed.width,
            height: parsed.height,
            grid: parsed.grid,
            actors,
            player,
            status: None,
            finish_delay: 0.0,
            finish_reported: false,
        })
    }

    fn cell(&self, column: usize, row: usize) -> CellKind {
        self.grid
            .get(row * self.width + column)
            .copied()
            .unwrap_or_default()
    }

    fn actor_index(&self, id: ActorId) -> Option<usize> {
        self.actors.iter().position(|actor| actor.id() == id)
    }

    fn coins_remaining(&self) -> usize {
        self.actors
            .iter()
            .filter(|actor| actor.kind() == ActorKind::Coin)
            .count()
    }

    fn is_finished(&self) -> bool {
        self.status.is_some() && self.finish_delay < 0.0
    }

    fn animate(&mut self, dt: Duration, input: InputState, out_events: &mut Vec<Event>) {
        let mut remaining = dt.as_secs_f32();
        if self.status.is_some() {
            self.finish_delay -= remaining;
        }

        while remaining > 0.0 {
            let step = remaining.min(MAX_STEP);
            self.step_actors(step, input, out_events);
            remaining -= step;
        }

        if let Some(status) = self.status {
            if self.is_finished() && !self.finish_reported {
                self.finish_reported = true;
                info!("level finished: {status:?}");
                out_events.push(Event::LevelFinished { status });
            }
        }
    }

    fn step_actors(&mut self, dt: f32, input: InputState, out_events: &mut Vec<Event>) {
        let ids: Vec<ActorId> = self.actors.iter().map(Actor::id).collect();
        for id in ids {
            // Coins collected earlier in this sub-step no longer act.
            let Some(index) = self.actor_index(id) else {
                continue;
            };

            let step = motion::act(&self.actors[index], dt, input, &*self);
            self.actors[index] = step.actor;
            for contact in step.contacts {
                self.player_touched(contact.kind, contact.actor, out_events);
            }

            if step.actor.kind() == ActorKind::Player && self.status == Some(LevelStatus::Lost) {
                if let Some(index) = self.actor_index(id) {
                    self.actors[index] = motion::sink(&self.actors[index], dt);
                }
            }
        }
    }

    fn player_touched(
        &mut self,
        touched: TouchKind,
        actor: Option<ActorId>,
        out_events: &mut Vec<Event>,
    ) {
        match touched {
            TouchKind::Lava => {
                if self.status.is_none() {
                    self.conclude(LevelStatus::Lost, out_events);
                }
            }
            TouchKind::Coin => {
                let Some(coin) = actor else {
                    return;
                };
                let Some(index) = self.actor_index(coin) else {
                    return;
                };
                if self.actors[index].kind() != ActorKind::Coin {
                    return;
                }

                let _ = self.actors.remove(index);
                let remaining = self.coins_remaining();
                debug!("coin {} collected, {remaining} left", coin.get());
                out_events.push(Event::CoinCollected { coin, remaining });

                if remaining == 0 && self.status.is_none() {
                    self.conclude(LevelStatus::Won, out_events);
                }
            }
            TouchKind::Wall | TouchKind::Player => {}
        }
    }

    fn conclude(&mut self, status: LevelStatus, out_events: &mut Vec<Event>) {
        self.status = Some(status);
        self.finish_delay = FINISH_DELAY;
        info!("level status changed to {status:?}");
        out_events.push(Event::StatusChanged { status });
    }
}

impl Surroundings for Level {
    fn obstacle_at(&self, pos: Vector, size: Vector) -> Option<Obstacle> {
        let x_start = pos.x().floor();
        let x_end = (pos.x() + size.x()).ceil();
        let y_start = pos.y().floor();
        let y_end = (pos.y() + size.y()).ceil();

        // Sides and top are rigid; the bottom is deadly.
        if x_start < 0.0 || x_end > self.width as f32 || y_start < 0.0 {
            return Some(Obstacle::Wall);
        }
        if y_end > self.height as f32 {
            return Some(Obstacle::Lava);
        }

        let (x_start, x_end) = (x_start as usize, x_end as usize);
        let (y_start, y_end) = (y_start as usize, y_end as usize);
        for row in y_start..y_end {
            for column in x_start..x_end {
                if let Some(obstacle) = self.cell(column, row).obstacle() {
                    return Some(obstacle);
                }
            }
        }
        None
    }

    fn actor_at(&self, actor: &Actor) -> Option<&Actor> {
        self.actors
            .iter()
            .find(|other| other.id() != actor.id() && actor.overlaps(other))
    }
}

/// Applies the provided command to the level, mutating state deterministically.
pub fn apply(level: &mut Level, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Animate { dt, input } => level.animate(dt, input, out_events),
        Command::TouchPlayer { touched, actor } => {
            level.player_touched(touched, actor, out_events);
        }
    }
}

/// Query functions that provide read-only access to the level state.
pub mod query {
    use lava_runner_core::{Actor, ActorId, CellKind, LevelStatus, Obstacle, Surroundings, Vector};

    use super::Level;

    /// Number of columns in the grid.
    #[must_use]
    pub fn width(level: &Level) -> usize {
        level.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub fn height(level: &Level) -> usize {
        level.height
    }

    /// Row-major background cells, `width * height` long.
    #[must_use]
    pub fn grid(level: &Level) -> &[CellKind] {
        &level.grid
    }

    /// Background cell at the provided column and row, if inside the grid.
    #[must_use]
    pub fn cell_at(level: &Level, column: usize, row: usize) -> Option<CellKind> {
        if column < level.width && row < level.height {
            Some(level.cell(column, row))
        } else {
            None
        }
    }

    /// Live actors in plan order.
    #[must_use]
    pub fn actors(level: &Level) -> &[Actor] {
        &level.actors
    }

    /// The player actor.
    #[must_use]
    pub fn player(level: &Level) -> Option<&Actor> {
        actor(level, level.player)
    }

    /// Looks up a live actor by identifier.
    #[must_use]
    pub fn actor(level: &Level, id: ActorId) -> Option<&Actor> {
        level.actors.iter().find(|actor| actor.id() == id)
    }

    /// Number of coins still waiting to be collected.
    #[must_use]
    pub fn coins_remaining(level: &Level) -> usize {
        level.coins_remaining()
    }

    /// Outcome of the level, or `None` while it is still being played.
    #[must_use]
    pub fn status(level: &Level) -> Option<LevelStatus> {
        level.status
    }

    /// Seconds left before a decided level counts as finished.
    #[must_use]
    pub fn finish_delay(level: &Level) -> f32 {
        level.finish_delay
    }

    /// Reports whether the level was decided and its linger ran out.
    #[must_use]
    pub fn is_finished(level: &Level) -> bool {
        level.is_finished()
    }

    /// First obstacle a box at `pos` with extent `size` would touch.
    #[must_use]
    pub fn obstacle_at(level: &Level, pos: Vector, size: Vector) -> Option<Obstacle> {
        level.obstacle_at(pos, size)
    }

    /// First other actor overlapping the actor with identifier `id`.
    #[must_use]
    pub fn actor_at(level: &Level, id: ActorId) -> Option<&Actor> {
        let actor = actor(level, id)?;
        level.actor_at(actor)
    }
}
