#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lava Runner engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative level, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to. Actor motion rules never touch the level directly: they read a
//! [`Surroundings`] view and answer with [`Contact`] values that the world
//! resolves.

use std::{
    ops::{Add, Mul},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Immutable two-dimensional point or displacement measured in grid cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    x: f32,
    y: f32,
}

impl Vector {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a new vector from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component, growing to the right.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component, growing downwards.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Returns the component-wise sum of both vectors.
    #[must_use]
    pub fn plus(self, other: Vector) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    /// Returns the vector scaled by `factor`.
    #[must_use]
    pub fn times(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, other: Vector) -> Vector {
        self.plus(other)
    }
}

impl Mul<f32> for Vector {
    type Output = Vector;

    fn mul(self, factor: f32) -> Vector {
        self.times(factor)
    }
}

/// Static background content of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Open air the player may move through.
    #[default]
    Empty,
    /// Solid block.
    Wall,
    /// Stationary lava that kills on contact.
    Lava,
}

impl CellKind {
    /// Reports whether the cell blocks nothing.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Converts a non-empty cell into the obstacle it represents.
    #[must_use]
    pub const fn obstacle(self) -> Option<Obstacle> {
        match self {
            Self::Empty => None,
            Self::Wall => Some(Obstacle::Wall),
            Self::Lava => Some(Obstacle::Lava),
        }
    }
}

/// Kind of obstacle reported by a background query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Obstacle {
    /// A wall cell or one of the rigid side and top level boundaries.
    Wall,
    /// A lava cell or the open bottom of the level.
    Lava,
}

/// Tag identifying an actor variant for collision dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    /// The player-controlled character.
    Player,
    /// A moving block of lava.
    Lava,
    /// A collectible coin.
    Coin,
}

impl ActorKind {
    /// Stable lowercase name of the variant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Lava => "lava",
            Self::Coin => "coin",
        }
    }
}

/// Anything the player can bump into, either background or another actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TouchKind {
    /// Solid geometry; carries no consequence.
    Wall,
    /// Deadly lava, whether a cell, the level bottom or a lava actor.
    Lava,
    /// A coin that gets collected.
    Coin,
    /// Another player actor.
    Player,
}

impl From<Obstacle> for TouchKind {
    fn from(obstacle: Obstacle) -> Self {
        match obstacle {
            Obstacle::Wall => Self::Wall,
            Obstacle::Lava => Self::Lava,
        }
    }
}

impl From<ActorKind> for TouchKind {
    fn from(kind: ActorKind) -> Self {
        match kind {
            ActorKind::Player => Self::Player,
            ActorKind::Lava => Self::Lava,
            ActorKind::Coin => Self::Coin,
        }
    }
}

/// Unique identifier assigned to an actor when its level is constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates a new actor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Variant-specific motion state carried by an actor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ActorMotion {
    /// Player velocity; horizontal speed is recomputed from input every step.
    Player {
        /// Velocity in cells per second.
        speed: Vector,
    },
    /// Lava that bounces off obstacles, or restarts from `repeat_pos` when set.
    Lava {
        /// Velocity in cells per second.
        speed: Vector,
        /// Position dripping lava jumps back to when it hits something.
        repeat_pos: Option<Vector>,
    },
    /// Coin bobbing around its resting position.
    Coin {
        /// Resting position the wobble is applied to.
        base_pos: Vector,
        /// Current wobble phase in radians.
        wobble: f32,
    },
}

impl ActorMotion {
    /// Tag of the variant.
    #[must_use]
    pub const fn kind(&self) -> ActorKind {
        match self {
            Self::Player { .. } => ActorKind::Player,
            Self::Lava { .. } => ActorKind::Lava,
            Self::Coin { .. } => ActorKind::Coin,
        }
    }
}

/// Dynamic entity living inside a level.
///
/// Actors are plain values: every update produces a replacement actor rather
/// than mutating the existing one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    id: ActorId,
    pos: Vector,
    size: Vector,
    motion: ActorMotion,
}

impl Actor {
    /// Creates a new actor.
    #[must_use]
    pub const fn new(id: ActorId, pos: Vector, size: Vector, motion: ActorMotion) -> Self {
        Self {
            id,
            pos,
            size,
            motion,
        }
    }

    /// Identifier of the actor.
    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    /// Top-left corner in grid cells.
    #[must_use]
    pub const fn pos(&self) -> Vector {
        self.pos
    }

    /// Width and height in grid cells.
    #[must_use]
    pub const fn size(&self) -> Vector {
        self.size
    }

    /// Variant-specific motion state.
    #[must_use]
    pub const fn motion(&self) -> ActorMotion {
        self.motion
    }

    /// Tag used for collision dispatch.
    #[must_use]
    pub const fn kind(&self) -> ActorKind {
        self.motion.kind()
    }

    /// Returns a copy of the actor moved to `pos`.
    #[must_use]
    pub const fn with_pos(self, pos: Vector) -> Self {
        Self { pos, ..self }
    }

    /// Returns a copy of the actor resized to `size`.
    #[must_use]
    pub const fn with_size(self, size: Vector) -> Self {
        Self { size, ..self }
    }

    /// Returns a copy of the actor carrying new motion state.
    #[must_use]
    pub const fn with_motion(self, motion: ActorMotion) -> Self {
        Self { motion, ..self }
    }

    /// Reports whether both bounding boxes overlap.
    ///
    /// Boxes whose edges merely touch do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Actor) -> bool {
        self.pos.x + self.size.x > other.pos.x
            && self.pos.x < other.pos.x + other.size.x
            && self.pos.y + self.size.y > other.pos.y
            && self.pos.y < other.pos.y + other.size.y
    }
}

/// Logical direction keys held by the player during a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputState {
    /// Left is held.
    pub left: bool,
    /// Right is held.
    pub right: bool,
    /// Up (jump) is held.
    pub up: bool,
}

impl InputState {
    /// No keys held.
    pub const IDLE: Self = Self {
        left: false,
        right: false,
        up: false,
    };
}

/// Terminal outcome of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelStatus {
    /// Every coin was collected.
    Won,
    /// The player touched lava.
    Lost,
}

/// Something the player bumped into during a motion step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Contact {
    /// What was touched.
    pub kind: TouchKind,
    /// The actor touched, when the contact came from an overlap query.
    pub actor: Option<ActorId>,
}

impl Contact {
    /// Contact with background geometry or the level boundary.
    #[must_use]
    pub fn obstacle(obstacle: Obstacle) -> Self {
        Self {
            kind: obstacle.into(),
            actor: None,
        }
    }

    /// Contact with another actor.
    #[must_use]
    pub fn actor(other: &Actor) -> Self {
        Self {
            kind: other.kind().into(),
            actor: Some(other.id()),
        }
    }
}

/// Read-only view of a level used by actor motion rules.
pub trait Surroundings {
    /// Returns the first obstacle a box at `pos` with extent `size` would touch.
    fn obstacle_at(&self, pos: Vector, size: Vector) -> Option<Obstacle>;

    /// Returns the first other actor whose box overlaps `actor`.
    fn actor_at(&self, actor: &Actor) -> Option<&Actor>;
}

/// Commands that express all permissible level mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by `dt` using the provided input snapshot.
    Animate {
        /// Wall-clock time that elapsed since the previous frame.
        dt: Duration,
        /// Keys held during the frame; reused for every sub-step.
        input: InputState,
    },
    /// Resolves a player contact directly, as the motion rules would.
    TouchPlayer {
        /// What the player touched.
        touched: TouchKind,
        /// The actor touched, if any.
        actor: Option<ActorId>,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a coin was collected and removed from the level.
    CoinCollected {
        /// Identifier of the removed coin.
        coin: ActorId,
        /// Coins still left in the level.
        remaining: usize,
    },
    /// Announces that the level status was set.
    StatusChanged {
        /// The new status.
        status: LevelStatus,
    },
    /// Announces that the post-game linger ran out. Emitted once per level.
    LevelFinished {
        /// Status the level finished with.
        status: LevelStatus,
    },
}

/// Reasons a level plan is rejected at construction.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidLevelPlan {
    /// The plan contained no rows or only zero-width rows.
    #[error("level plan is empty")]
    Empty,
    /// A row had a different width than the first row.
    #[error("row {row} is {found} cells wide, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A character outside the plan alphabet was found.
    #[error("unknown plan character {character:?} at column {column}, row {row}")]
    UnknownCharacter {
        /// The unrecognised character.
        character: char,
        /// Zero-based column of the character.
        column: usize,
        /// Zero-based row of the character.
        row: usize,
    },
    /// No player spawn `@` was found.
    #[error("level plan has no player spawn '@'")]
    MissingPlayer,
    /// More than one player spawn `@` was found.
    #[error("level plan has {count} player spawns, expected exactly one")]
    MultiplePlayers {
        /// Number of `@` characters found.
        count: usize,
    },
}
