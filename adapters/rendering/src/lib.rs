#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Lava Runner adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use lava_runner_core::{Actor, ActorId, ActorKind, CellKind, InputState, LevelStatus, Vector};
use std::time::Duration;
use thiserror::Error;

/// Screen pixels per grid cell.
pub const DEFAULT_SCALE: f32 = 20.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with a different alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

/// Fixed colors used to draw levels.
pub mod palette {
    use super::Color;

    /// Background behind every empty cell.
    pub const SKY: Color = Color::from_rgb_u8(0x34, 0xa6, 0xfb);
    /// Static wall cells.
    pub const WALL: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);
    /// Static and moving lava.
    pub const LAVA: Color = Color::from_rgb_u8(0xff, 0x64, 0x64);
    /// Coins.
    pub const COIN: Color = Color::from_rgb_u8(0xf1, 0xe5, 0x59);
    /// The player while alive.
    pub const PLAYER: Color = Color::from_rgb_u8(0x40, 0x40, 0x40);
    /// The player after touching lava.
    pub const PLAYER_LOST: Color = Color::from_rgb_u8(0xe0, 0x30, 0x30);
    /// Text and overlays drawn above the level.
    pub const BANNER: Color = Color::from_rgb_u8(0x10, 0x10, 0x10);
}

/// Color of a background cell, or `None` when the sky shows through.
#[must_use]
pub const fn cell_color(cell: CellKind) -> Option<Color> {
    match cell {
        CellKind::Empty => None,
        CellKind::Wall => Some(palette::WALL),
        CellKind::Lava => Some(palette::LAVA),
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Left arrow held.
    pub left: bool,
    /// Right arrow held.
    pub right: bool,
    /// Up arrow held.
    pub up: bool,
    /// Pause key pressed on this frame.
    pub pause_toggle: bool,
}

impl FrameInput {
    /// Movement keys as understood by the simulation.
    #[must_use]
    pub const fn input_state(&self) -> InputState {
        InputState {
            left: self.left,
            right: self.right,
            up: self.up,
        }
    }
}

/// Immutable snapshot of an actor placed within the scene, in cell units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorPresentation {
    /// Identifier the level assigned to the actor.
    pub id: ActorId,
    /// Variant of the actor.
    pub kind: ActorKind,
    /// Top-left corner.
    pub pos: Vec2,
    /// Extent.
    pub size: Vec2,
}

impl ActorPresentation {
    /// Captures the presentation of a simulated actor.
    #[must_use]
    pub fn from_actor(actor: &Actor) -> Self {
        Self {
            id: actor.id(),
            kind: actor.kind(),
            pos: to_vec2(actor.pos()),
            size: to_vec2(actor.size()),
        }
    }

    /// Centre of the actor's box.
    #[must_use]
    pub fn centre(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Fill color for the actor given the level outcome so far.
    #[must_use]
    pub fn color(&self, status: Option<LevelStatus>) -> Color {
        match self.kind {
            ActorKind::Player if status == Some(LevelStatus::Lost) => palette::PLAYER_LOST,
            ActorKind::Player => palette::PLAYER,
            ActorKind::Lava => palette::LAVA,
            ActorKind::Coin => palette::COIN,
        }
    }
}

fn to_vec2(vector: Vector) -> Vec2 {
    Vec2::new(vector.x(), vector.y())
}

/// Visible window onto the level, expressed in cell units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Leftmost visible column.
    pub left: f32,
    /// Topmost visible row.
    pub top: f32,
    /// Visible width in cells.
    pub width: f32,
    /// Visible height in cells.
    pub height: f32,
    /// Screen pixels per cell.
    pub scale: f32,
}

impl Viewport {
    /// Creates a viewport covering `pixel_width` by `pixel_height` screen pixels.
    pub fn new(pixel_width: f32, pixel_height: f32, scale: f32) -> Result<Self, RenderingError> {
        if scale.is_nan() || scale <= 0.0 {
            return Err(RenderingError::InvalidScale { scale });
        }
        let covers_pixels = pixel_width > 0.0 && pixel_height > 0.0;
        if !covers_pixels {
            return Err(RenderingError::EmptyViewport {
                width: pixel_width,
                height: pixel_height,
            });
        }

        Ok(Self {
            left: 0.0,
            top: 0.0,
            width: pixel_width / scale,
            height: pixel_height / scale,
            scale,
        })
    }

    /// Size of the viewport in screen pixels.
    #[must_use]
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * self.scale
    }

    /// Converts a level position into screen pixels.
    #[must_use]
    pub fn to_screen(&self, pos: Vec2) -> Vec2 {
        (pos - Vec2::new(self.left, self.top)) * self.scale
    }

    /// Scrolls so `focus` stays a third of the view away from every edge.
    ///
    /// The view never scrolls past the level bounds.
    pub fn follow(&mut self, focus: Vec2, columns: usize, rows: usize) {
        self.left = scroll_axis(self.left, self.width, focus.x, columns as f32);
        self.top = scroll_axis(self.top, self.height, focus.y, rows as f32);
    }
}

fn scroll_axis(start: f32, extent: f32, focus: f32, bound: f32) -> f32 {
    let margin = extent / 3.0;
    let scrolled = if focus < start + margin {
        focus - margin
    } else if focus > start + extent - margin {
        focus + margin - extent
    } else {
        start
    };
    scrolled.min(bound - extent).max(0.0)
}

/// Scene description combining the background grid and the live actors.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Number of grid columns.
    pub columns: usize,
    /// Number of grid rows.
    pub rows: usize,
    /// Row-major background cells.
    pub cells: Vec<CellKind>,
    /// Actors in draw order.
    pub actors: Vec<ActorPresentation>,
    /// Outcome of the level, if decided.
    pub status: Option<LevelStatus>,
    /// Optional text drawn over the level.
    pub banner: Option<String>,
    /// Portion of the level currently on screen.
    pub viewport: Viewport,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        columns: usize,
        rows: usize,
        cells: Vec<CellKind>,
        actors: Vec<ActorPresentation>,
        viewport: Viewport,
    ) -> Self {
        Self {
            columns,
            rows,
            cells,
            actors,
            status: None,
            banner: None,
            viewport,
        }
    }

    /// Background cell at the provided column and row.
    #[must_use]
    pub fn cell(&self, column: usize, row: usize) -> Option<CellKind> {
        if column >= self.columns {
            return None;
        }
        self.cells.get(row * self.columns + column).copied()
    }

    /// The player's presentation, if present.
    #[must_use]
    pub fn player(&self) -> Option<&ActorPresentation> {
        self.actors
            .iter()
            .find(|actor| actor.kind == ActorKind::Player)
    }

    /// Scrolls the viewport to keep the player in view.
    pub fn follow_player(&mut self) {
        if let Some(focus) = self.player().map(ActorPresentation::centre) {
            self.viewport.follow(focus, self.columns, self.rows);
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Lava Runner scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and may mutate the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq)]
pub enum RenderingError {
    /// Scale must be positive to map cells onto pixels.
    #[error("scale must be positive (received {scale})")]
    InvalidScale {
        /// Provided scale that failed validation.
        scale: f32,
    },
    /// The viewport must cover at least one pixel in each direction.
    #[error("viewport must not be empty (received {width}x{height})")]
    EmptyViewport {
        /// Requested pixel width.
        width: f32,
        /// Requested pixel height.
        height: f32,
    },
}
