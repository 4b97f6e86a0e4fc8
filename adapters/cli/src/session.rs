use std::time::Duration;

use anyhow::{Context, Result};
use lava_runner_core::{Command, Event, InputState, LevelStatus};
use lava_runner_rendering::{ActorPresentation, Scene, Viewport};
use lava_runner_system_campaign::{Campaign, Config, Progress};
use lava_runner_world::{self as world, query, Level};
use log::{info, warn};
use rand_chacha::ChaCha8Rng;

use crate::level_pack::LevelPack;

/// Longest frame delta handed to the simulation.
pub(crate) const MAX_FRAME: Duration = Duration::from_millis(100);

/// Drives a level pack from start to finish: the live level, the campaign and pausing.
#[derive(Debug)]
pub(crate) struct Session {
    pack: LevelPack,
    level: Level,
    campaign: Campaign,
    rng: ChaCha8Rng,
    paused: bool,
    events: Vec<Event>,
    progress: Vec<Progress>,
}

impl Session {
    /// Starts a campaign on the first level of `pack`.
    pub(crate) fn new(pack: LevelPack, lives: u32, mut rng: ChaCha8Rng) -> Result<Self> {
        let campaign = Campaign::new(Config::new(pack.len(), lives));
        let level = build_level(&pack, campaign.current_level(), &mut rng)?;
        Ok(Self {
            pack,
            level,
            campaign,
            rng,
            paused: false,
            events: Vec::new(),
            progress: Vec::new(),
        })
    }

    /// Advances the simulation by one frame and reports any campaign transition.
    pub(crate) fn frame(&mut self, dt: Duration, input: InputState) -> Result<Option<Progress>> {
        if self.paused || self.campaign.is_complete() {
            return Ok(None);
        }

        let dt = if dt > MAX_FRAME {
            warn!("frame delta {dt:?} clamped to {MAX_FRAME:?}");
            MAX_FRAME
        } else {
            dt
        };

        self.events.clear();
        world::apply(
            &mut self.level,
            Command::Animate { dt, input },
            &mut self.events,
        );

        self.progress.clear();
        self.campaign.handle(&self.events, &mut self.progress);
        let Some(progress) = self.progress.last().copied() else {
            return Ok(None);
        };

        match progress {
            Progress::Retry { level }
            | Progress::Advance { level }
            | Progress::GameOver {
                restart_level: level,
            } => {
                self.level = build_level(&self.pack, level, &mut self.rng)?;
            }
            Progress::Victory => info!("campaign complete"),
        }
        Ok(Some(progress))
    }

    /// Pauses or resumes the simulation.
    pub(crate) fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        info!("{}", if self.paused { "paused" } else { "resumed" });
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.campaign.is_complete()
    }

    pub(crate) fn level(&self) -> &Level {
        &self.level
    }

    pub(crate) fn level_index(&self) -> usize {
        self.campaign.current_level()
    }

    pub(crate) fn level_name(&self) -> &str {
        self.pack
            .get(self.level_index())
            .map_or("", |plan| plan.name.as_str())
    }

    pub(crate) fn lives(&self) -> u32 {
        self.campaign.lives()
    }

    /// Builds a scene showing the current level through `viewport`.
    pub(crate) fn scene(&self, viewport: Viewport) -> Scene {
        let mut scene = Scene::new(
            query::width(&self.level),
            query::height(&self.level),
            query::grid(&self.level).to_vec(),
            Vec::new(),
            viewport,
        );
        self.refresh_scene(&mut scene);
        scene
    }

    /// Copies the current level state into `scene` and scrolls to the player.
    pub(crate) fn refresh_scene(&self, scene: &mut Scene) {
        scene.columns = query::width(&self.level);
        scene.rows = query::height(&self.level);
        scene.cells.clear();
        scene.cells.extend_from_slice(query::grid(&self.level));
        scene.actors.clear();
        scene.actors.extend(
            query::actors(&self.level)
                .iter()
                .map(ActorPresentation::from_actor),
        );
        scene.status = query::status(&self.level);
        scene.banner = self.banner();
        scene.follow_player();
    }

    fn banner(&self) -> Option<String> {
        if self.is_complete() {
            return Some("You win!".to_owned());
        }
        if self.paused {
            return Some(format!(
                "Paused: {} ({} lives left)",
                self.level_name(),
                self.lives()
            ));
        }
        match query::status(&self.level) {
            Some(LevelStatus::Lost) if self.lives() == 0 => Some("Game over".to_owned()),
            _ => None,
        }
    }
}

fn build_level(pack: &LevelPack, index: usize, rng: &mut ChaCha8Rng) -> Result<Level> {
    let plan = pack
        .get(index)
        .with_context(|| format!("level pack has no level {index}"))?;
    let level = Level::from_plan(plan.rows.as_slice(), rng)
        .with_context(|| format!("failed to build level {:?}", plan.name))?;
    info!("starting level {} ({})", index + 1, plan.name);
    Ok(level)
}
