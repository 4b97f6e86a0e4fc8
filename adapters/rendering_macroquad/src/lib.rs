#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Lava Runner.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, so the adapter depends on macroquad without its default
//! `audio` feature.

use anyhow::Result;
use glam::Vec2;
use lava_runner_core::LevelStatus;
use lava_runner_rendering::{
    cell_color, palette, Color, FrameInput, Presentation, RenderingBackend, Scene, Viewport,
};
use macroquad::input::{is_key_down, is_key_pressed, KeyCode};
use std::{ops::Range, time::Duration};

const BANNER_FONT_SIZE: f32 = 32.0;

struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `P` pauses or resumes the simulation.
    pause_toggle: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            pause_toggle: is_key_pressed(KeyCode::P),
        }
    }
}

fn gather_frame_input(keyboard: &KeyboardShortcuts) -> FrameInput {
    FrameInput {
        left: is_key_down(KeyCode::Left),
        right: is_key_down(KeyCode::Right),
        up: is_key_down(KeyCode::Up),
        pause_toggle: keyboard.pause_toggle,
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a frame and returns the average rate once a second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let window_size = scene.viewport.pixel_size();
        let mut config = macroquad::window::Conf {
            window_title,
            window_width: window_size.x.round() as i32,
            window_height: window_size.y.round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                update_scene(frame_dt, gather_frame_input(&keyboard), &mut scene);

                macroquad::window::clear_background(background);
                draw_background(&scene);
                draw_actors(&scene);
                if let Some(banner) = &scene.banner {
                    draw_banner(banner, &scene.viewport);
                }

                if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                    if show_fps {
                        println!("FPS: {per_second:.2}");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Columns and rows of the grid that intersect the viewport.
fn visible_cells(viewport: &Viewport, columns: usize, rows: usize) -> (Range<usize>, Range<usize>) {
    let span = |start: f32, extent: f32, bound: usize| {
        let first = start.floor().max(0.0) as usize;
        let last = ((start + extent).ceil().max(0.0) as usize).min(bound);
        first.min(last)..last
    };
    (
        span(viewport.left, viewport.width, columns),
        span(viewport.top, viewport.height, rows),
    )
}

fn draw_background(scene: &Scene) {
    let viewport = &scene.viewport;
    let (columns, rows) = visible_cells(viewport, scene.columns, scene.rows);
    for row in rows {
        for column in columns.clone() {
            let Some(color) = scene.cell(column, row).and_then(cell_color) else {
                continue;
            };
            let corner = viewport.to_screen(Vec2::new(column as f32, row as f32));
            macroquad::shapes::draw_rectangle(
                corner.x,
                corner.y,
                viewport.scale,
                viewport.scale,
                to_macroquad_color(color),
            );
        }
    }
}

fn draw_actors(scene: &Scene) {
    let viewport = &scene.viewport;
    for actor in &scene.actors {
        let corner = viewport.to_screen(actor.pos);
        let extent = actor.size * viewport.scale;
        macroquad::shapes::draw_rectangle(
            corner.x,
            corner.y,
            extent.x,
            extent.y,
            to_macroquad_color(actor.color(scene.status)),
        );
    }

    if scene.status == Some(LevelStatus::Lost) {
        let size = viewport.pixel_size();
        macroquad::shapes::draw_rectangle(
            0.0,
            0.0,
            size.x,
            size.y,
            to_macroquad_color(palette::LAVA.with_alpha(0.2)),
        );
    }
}

fn draw_banner(text: &str, viewport: &Viewport) {
    let size = viewport.pixel_size();
    let dimensions = macroquad::text::measure_text(text, None, BANNER_FONT_SIZE as u16, 1.0);
    let x = ((size.x - dimensions.width) * 0.5).max(0.0);
    let y = size.y * 0.5;
    macroquad::shapes::draw_rectangle(
        0.0,
        y - BANNER_FONT_SIZE,
        size.x,
        BANNER_FONT_SIZE * 1.5,
        to_macroquad_color(palette::WALL.with_alpha(0.7)),
    );
    let _ = macroquad::text::draw_text(
        text,
        x,
        y,
        BANNER_FONT_SIZE,
        to_macroquad_color(palette::BANNER),
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lava_runner_rendering::DEFAULT_SCALE;

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        let frame = Duration::from_millis(250);

        assert_eq!(counter.record_frame(frame), None);
        assert_eq!(counter.record_frame(frame), None);
        assert_eq!(counter.record_frame(frame), None);
        assert_eq!(counter.record_frame(frame), Some(4.0));
        assert_eq!(counter.record_frame(frame), None);
    }

    #[test]
    fn visible_cells_cover_partially_scrolled_cells() {
        let mut viewport = Viewport::new(200.0, 100.0, DEFAULT_SCALE).expect("valid viewport");
        viewport.left = 2.5;
        viewport.top = 1.0;

        let (columns, rows) = visible_cells(&viewport, 40, 20);

        assert_eq!(columns, 2..13);
        assert_eq!(rows, 1..6);
    }

    #[test]
    fn visible_cells_stop_at_the_grid_edge() {
        let viewport = Viewport::new(600.0, 450.0, DEFAULT_SCALE).expect("valid viewport");

        let (columns, rows) = visible_cells(&viewport, 8, 4);

        assert_eq!(columns, 0..8);
        assert_eq!(rows, 0..4);
    }
}
