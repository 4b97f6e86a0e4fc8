#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Campaign system sequencing levels and tracking the player's remaining lives.

use lava_runner_core::{Event, LevelStatus};
use log::info;

/// Configuration parameters required to construct the campaign system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    level_count: usize,
    lives: u32,
}

impl Config {
    /// Creates a configuration for a pack of `level_count` levels and `lives` retries.
    #[must_use]
    pub const fn new(level_count: usize, lives: u32) -> Self {
        Self { level_count, lives }
    }

    /// Number of levels in the pack.
    #[must_use]
    pub const fn level_count(&self) -> usize {
        self.level_count
    }

    /// Retries granted at the start of every run.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }
}

/// Directive telling the driver which level to load next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    /// The current level was lost; replay it.
    Retry {
        /// Index of the level to replay.
        level: usize,
    },
    /// The player ran out of lives; the run starts over with full lives.
    GameOver {
        /// Index of the level the new run starts on.
        restart_level: usize,
    },
    /// The current level was won; continue with the next one.
    Advance {
        /// Index of the level to load.
        level: usize,
    },
    /// The final level was won.
    Victory,
}

/// Pure system reacting to finished levels.
#[derive(Debug)]
pub struct Campaign {
    config: Config,
    level: usize,
    lives: u32,
    complete: bool,
}

impl Campaign {
    /// Creates a campaign positioned on the first level with full lives.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            level: 0,
            lives: config.lives,
            complete: false,
        }
    }

    /// Consumes level events and emits a directive for every finished level.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Progress>) {
        for event in events {
            if self.complete {
                return;
            }
            if let Event::LevelFinished { status } = event {
                out.push(self.finish(*status));
            }
        }
    }

    fn finish(&mut self, status: LevelStatus) -> Progress {
        match status {
            LevelStatus::Lost if self.lives > 0 => {
                self.lives -= 1;
                info!("level {} lost, {} lives left", self.level + 1, self.lives);
                Progress::Retry { level: self.level }
            }
            LevelStatus::Lost => {
                info!("game over on level {}", self.level + 1);
                self.level = 0;
                self.lives = self.config.lives;
                Progress::GameOver { restart_level: 0 }
            }
            LevelStatus::Won if self.level + 1 < self.config.level_count => {
                self.level += 1;
                info!("advancing to level {}", self.level + 1);
                Progress::Advance { level: self.level }
            }
            LevelStatus::Won => {
                self.complete = true;
                info!("all {} levels cleared", self.config.level_count);
                Progress::Victory
            }
        }
    }

    /// Index of the level currently being played.
    #[must_use]
    pub const fn current_level(&self) -> usize {
        self.level
    }

    /// Retries left before the run restarts.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Reports whether the final level has been won.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lava_runner_core::ActorId;

    fn finished(status: LevelStatus) -> [Event; 1] {
        [Event::LevelFinished { status }]
    }

    #[test]
    fn ignores_events_other_than_level_finished() {
        let mut campaign = Campaign::new(Config::new(2, 1));
        let mut out = Vec::new();
        campaign.handle(
            &[
                Event::CoinCollected {
                    coin: ActorId::new(1),
                    remaining: 0,
                },
                Event::StatusChanged {
                    status: LevelStatus::Won,
                },
            ],
            &mut out,
        );
        assert!(out.is_empty());
        assert_eq!(campaign.current_level(), 0);
    }

    #[test]
    fn zero_lives_means_the_first_loss_ends_the_run() {
        let mut campaign = Campaign::new(Config::new(3, 0));
        let mut out = Vec::new();
        campaign.handle(&finished(LevelStatus::Won), &mut out);
        campaign.handle(&finished(LevelStatus::Lost), &mut out);
        assert_eq!(
            out,
            vec![
                Progress::Advance { level: 1 },
                Progress::GameOver { restart_level: 0 }
            ]
        );
        assert_eq!(campaign.current_level(), 0);
    }
}
