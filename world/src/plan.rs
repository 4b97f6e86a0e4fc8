//! Level plan parsing and the character-to-actor factory.

use std::f32::consts::TAU;

use lava_runner_core::{Actor, ActorId, ActorMotion, CellKind, InvalidLevelPlan, Vector};
use rand::Rng;

const PLAYER_OFFSET: Vector = Vector::new(0.0, -0.5);
const PLAYER_SIZE: Vector = Vector::new(0.8, 1.5);
const COIN_OFFSET: Vector = Vector::new(0.2, 0.1);
const COIN_SIZE: Vector = Vector::new(0.6, 0.6);
const LAVA_SIZE: Vector = Vector::new(1.0, 1.0);

/// Actor described by a single plan character, before it joins a level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActorSeed {
    /// Player spawn (`@`).
    Player {
        /// Top-left corner after the spawn offset.
        pos: Vector,
    },
    /// Coin (`o`).
    Coin {
        /// Resting position after the spawn offset.
        pos: Vector,
    },
    /// Moving lava (`=`, `|` or `v`).
    Lava {
        /// Spawn position.
        pos: Vector,
        /// Constant velocity.
        speed: Vector,
        /// Whether the lava restarts from its spawn instead of bouncing.
        drips: bool,
    },
}

impl ActorSeed {
    /// Builds the actor, drawing a random wobble phase for coins.
    pub fn spawn<R>(self, id: ActorId, rng: &mut R) -> Actor
    where
        R: Rng + ?Sized,
    {
        match self {
            Self::Player { pos } => Actor::new(
                id,
                pos,
                PLAYER_SIZE,
                ActorMotion::Player {
                    speed: Vector::ZERO,
                },
            ),
            Self::Coin { pos } => Actor::new(
                id,
                pos,
                COIN_SIZE,
                ActorMotion::Coin {
                    base_pos: pos,
                    wobble: rng.gen_range(0.0..TAU),
                },
            ),
            Self::Lava { pos, speed, drips } => Actor::new(
                id,
                pos,
                LAVA_SIZE,
                ActorMotion::Lava {
                    speed,
                    repeat_pos: drips.then_some(pos),
                },
            ),
        }
    }

    /// Reports whether the seed spawns the player.
    #[must_use]
    pub const fn is_player(&self) -> bool {
        matches!(self, Self::Player { .. })
    }
}

/// Maps a plan character at grid position `cell` to the actor it spawns.
///
/// Returns `None` for characters that describe background cells.
#[must_use]
pub fn actor_for(character: char, cell: Vector) -> Option<ActorSeed> {
    let seed = match character {
        '@' => ActorSeed::Player {
            pos: cell.plus(PLAYER_OFFSET),
        },
        'o' => ActorSeed::Coin {
            pos: cell.plus(COIN_OFFSET),
        },
        '=' => ActorSeed::Lava {
            pos: cell,
            speed: Vector::new(2.0, 0.0),
            drips: false,
        },
        '|' => ActorSeed::Lava {
            pos: cell,
            speed: Vector::new(0.0, 2.0),
            drips: false,
        },
        'v' => ActorSeed::Lava {
            pos: cell,
            speed: Vector::new(0.0, 3.0),
            drips: true,
        },
        _ => return None,
    };
    Some(seed)
}

/// Maps a plan character to the static background it describes.
#[must_use]
pub fn background_for(character: char) -> Option<CellKind> {
    match character {
        ' ' => Some(CellKind::Empty),
        'x' => Some(CellKind::Wall),
        '!' => Some(CellKind::Lava),
        _ => None,
    }
}

#[derive(Debug)]
pub(crate) struct ParsedPlan {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) grid: Vec<CellKind>,
    pub(crate) seeds: Vec<ActorSeed>,
    /// Index into `seeds` of the single player seed.
    pub(crate) player: usize,
}

pub(crate) fn parse<S>(plan: &[S]) -> Result<ParsedPlan, InvalidLevelPlan>
where
    S: AsRef<str>,
{
    let width = plan
        .first()
        .map(|row| row.as_ref().chars().count())
        .unwrap_or(0);
    if width == 0 {
        return Err(InvalidLevelPlan::Empty);
    }

    let height = plan.len();
    let mut grid = Vec::with_capacity(width * height);
    let mut seeds = Vec::new();

    for (row, line) in plan.iter().enumerate() {
        let line = line.as_ref();
        let found = line.chars().count();
        if found != width {
            return Err(InvalidLevelPlan::RaggedRow {
                row,
                expected: width,
                found,
            });
        }

        for (column, character) in line.chars().enumerate() {
            let cell = Vector::new(column as f32, row as f32);
            if let Some(seed) = actor_for(character, cell) {
                seeds.push(seed);
                grid.push(CellKind::Empty);
                continue;
            }

            let kind = background_for(character).ok_or(InvalidLevelPlan::UnknownCharacter {
                character,
                column,
                row,
            })?;
            grid.push(kind);
        }
    }

    let players: Vec<usize> = seeds
        .iter()
        .enumerate()
        .filter(|(_, seed)| seed.is_player())
        .map(|(index, _)| index)
        .collect();
    match *players.as_slice() {
        [] => Err(InvalidLevelPlan::MissingPlayer),
        [player] => Ok(ParsedPlan {
            width,
            height,
            grid,
            seeds,
            player,
        }),
        _ => Err(InvalidLevelPlan::MultiplePlayers {
            count: players.len(),
        }),
    }
}
