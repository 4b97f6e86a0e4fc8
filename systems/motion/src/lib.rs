#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure motion rules that advance a single actor by one sub-step.
//!
//! Each rule reads the level through [`Surroundings`] and answers with the
//! replacement actor plus the contacts the player made along the way. Nothing
//! here mutates the level; the world resolves the returned contacts.

use lava_runner_core::{Actor, ActorMotion, Contact, InputState, Surroundings, Vector};

/// Horizontal player speed while a direction key is held, in cells per second.
pub const PLAYER_X_SPEED: f32 = 7.0;
/// Downward acceleration applied to the player, in cells per second squared.
pub const GRAVITY: f32 = 30.0;
/// Upward speed given to the player when a jump is honoured.
pub const JUMP_SPEED: f32 = 17.0;
/// Rate at which coin wobble phase advances, in radians per second.
pub const WOBBLE_SPEED: f32 = 8.0;
/// Amplitude of the coin wobble in cells.
pub const WOBBLE_DIST: f32 = 0.07;

/// Outcome of advancing one actor.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    /// Replacement for the actor that was advanced.
    pub actor: Actor,
    /// Contacts the player made, in the order they happened.
    pub contacts: Vec<Contact>,
}

impl Step {
    fn quiet(actor: Actor) -> Self {
        Self {
            actor,
            contacts: Vec::new(),
        }
    }
}

/// Advances `actor` by `dt` seconds using the rule for its variant.
#[must_use]
pub fn act<S>(actor: &Actor, dt: f32, input: InputState, surroundings: &S) -> Step
where
    S: Surroundings + ?Sized,
{
    match actor.motion() {
        ActorMotion::Player { speed } => step_player(*actor, speed, dt, input, surroundings),
        ActorMotion::Lava { speed, repeat_pos } => {
            Step::quiet(step_lava(*actor, speed, repeat_pos, dt, surroundings))
        }
        ActorMotion::Coin { base_pos, wobble } => {
            Step::quiet(step_coin(*actor, base_pos, wobble, dt))
        }
    }
}

/// Sinks a dead player into the floor by `dt`.
///
/// Purely cosmetic; the height never drops below zero.
#[must_use]
pub fn sink(actor: &Actor, dt: f32) -> Actor {
    let size = actor.size();
    let shrink = dt.min(size.y()).max(0.0);
    actor
        .with_pos(actor.pos().plus(Vector::new(0.0, shrink)))
        .with_size(Vector::new(size.x(), size.y() - shrink))
}

fn horizontal_speed(input: InputState) -> f32 {
    let mut speed = 0.0;
    if input.left {
        speed -= PLAYER_X_SPEED;
    }
    if input.right {
        speed += PLAYER_X_SPEED;
    }
    speed
}

fn step_player<S>(
    player: Actor,
    speed: Vector,
    dt: f32,
    input: InputState,
    surroundings: &S,
) -> Step
where
    S: Surroundings + ?Sized,
{
    let mut contacts = Vec::new();

    // Axes resolve independently so a floor never blocks walking.
    let speed_x = horizontal_speed(input);
    let sideways = player.pos().plus(Vector::new(speed_x * dt, 0.0));
    let player = match surroundings.obstacle_at(sideways, player.size()) {
        Some(obstacle) => {
            contacts.push(Contact::obstacle(obstacle));
            player
        }
        None => player.with_pos(sideways),
    };

    let falling = speed.y() + dt * GRAVITY;
    let vertical = player.pos().plus(Vector::new(0.0, falling * dt));
    let (player, speed_y) = match surroundings.obstacle_at(vertical, player.size()) {
        Some(obstacle) => {
            contacts.push(Contact::obstacle(obstacle));
            let speed_y = if input.up && falling > 0.0 {
                -JUMP_SPEED
            } else {
                0.0
            };
            (player, speed_y)
        }
        None => (player.with_pos(vertical), falling),
    };

    let player = player.with_motion(ActorMotion::Player {
        speed: Vector::new(speed_x, speed_y),
    });
    if let Some(other) = surroundings.actor_at(&player) {
        contacts.push(Contact::actor(other));
    }

    Step {
        actor: player,
        contacts,
    }
}

fn step_lava<S>(
    lava: Actor,
    speed: Vector,
    repeat_pos: Option<Vector>,
    dt: f32,
    surroundings: &S,
) -> Actor
where
    S: Surroundings + ?Sized,
{
    let next = lava.pos().plus(speed.times(dt));
    if surroundings.obstacle_at(next, lava.size()).is_none() {
        return lava.with_pos(next);
    }

    match repeat_pos {
        Some(origin) => lava.with_pos(origin),
        None => lava.with_motion(ActorMotion::Lava {
            speed: speed.times(-1.0),
            repeat_pos,
        }),
    }
}

fn step_coin(coin: Actor, base_pos: Vector, wobble: f32, dt: f32) -> Actor {
    let wobble = wobble + dt * WOBBLE_SPEED;
    let offset = wobble.sin() * WOBBLE_DIST;
    coin.with_pos(base_pos.plus(Vector::new(0.0, offset)))
        .with_motion(ActorMotion::Coin { base_pos, wobble })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lava_runner_core::ActorId;

    #[test]
    fn opposing_keys_cancel_out() {
        let both = InputState {
            left: true,
            right: true,
            up: false,
        };
        assert_eq!(horizontal_speed(both), 0.0);
        assert_eq!(horizontal_speed(InputState::IDLE), 0.0);
    }

    #[test]
    fn sink_never_inverts_the_player() {
        let player = Actor::new(
            ActorId::new(0),
            Vector::new(1.0, 1.0),
            Vector::new(0.8, 0.25),
            ActorMotion::Player {
                speed: Vector::ZERO,
            },
        );
        let sunk = sink(&player, 0.5);
        assert_eq!(sunk.size(), Vector::new(0.8, 0.0));
        assert_eq!(sunk.pos(), Vector::new(1.0, 1.25));
    }
}
