//! Camera state and the pan/pinch gesture machine.
//!
//! Screen space is canvas-local pixels: `screen = world * zoom + pan`.
//! Every zoom path goes through [`Viewport::anchored`], which solves for the
//! pan that keeps a chosen world point under a chosen screen point, so the
//! focal point survives clamping too.

use eframe::egui::{Pos2, Vec2};

use crate::config::CameraConfig;

/// Touches closer than this are treated as this far apart, so a pinch that
/// starts with both fingers on one spot cannot divide by zero.
const MIN_PINCH_DISTANCE: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub pan: Vec2,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn world_to_screen(&self, world: Pos2) -> Pos2 {
        (world.to_vec2() * self.zoom + self.pan).to_pos2()
    }

    pub fn screen_to_world(&self, screen: Pos2) -> Pos2 {
        ((screen.to_vec2() - self.pan) / self.zoom).to_pos2()
    }

    /// Viewport at `zoom` (clamped) with `world` sitting under `screen`.
    pub fn anchored(screen: Pos2, world: Pos2, zoom: f32, camera: &CameraConfig) -> Self {
        let zoom = camera.clamp_zoom(zoom);
        Self {
            pan: screen.to_vec2() - world.to_vec2() * zoom,
            zoom,
        }
    }

    pub fn zoom_at(&self, focal: Pos2, factor: f32, camera: &CameraConfig) -> Self {
        let world = self.screen_to_world(focal);
        Self::anchored(focal, world, self.zoom * factor, camera)
    }

    /// One wheel step at `focal`. Positive `scroll` zooms in.
    pub fn wheel(&self, focal: Pos2, scroll: f32, camera: &CameraConfig) -> Self {
        if scroll.abs() <= f32::EPSILON {
            return *self;
        }

        let factor = if scroll > 0.0 {
            camera.wheel_zoom_step
        } else {
            camera.wheel_zoom_step.recip()
        };
        self.zoom_at(focal, factor, camera)
    }

    /// Same zoom, panned so `world` lands in the middle of `canvas`.
    pub fn centered_on(&self, world: Pos2, canvas: Vec2) -> Self {
        Self {
            pan: canvas / 2.0 - world.to_vec2() * self.zoom,
            zoom: self.zoom,
        }
    }

    pub fn reset(world: Pos2, canvas: Vec2, camera: &CameraConfig) -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: camera.clamp_zoom(1.0),
        }
        .centered_on(world, canvas)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pinch {
    pub distance: f32,
    pub zoom: f32,
    pub world_point: Pos2,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Panning {
        anchor: Vec2,
    },
    Pinching(Pinch),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
}

fn midpoint(a: Pos2, b: Pos2) -> Pos2 {
    a + (b - a) * 0.5
}

impl Gesture {
    pub fn begin_pan(viewport: &Viewport, pointer: Pos2) -> Self {
        Self::Panning {
            anchor: pointer.to_vec2() - viewport.pan,
        }
    }

    pub fn begin_pinch(viewport: &Viewport, a: Pos2, b: Pos2) -> Self {
        Self::Pinching(Pinch {
            distance: a.distance(b).max(MIN_PINCH_DISTANCE),
            zoom: viewport.zoom,
            world_point: viewport.screen_to_world(midpoint(a, b)),
        })
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Viewport after the pointer moved to `pointer`; unchanged unless
    /// panning.
    pub fn pan_to(&self, viewport: &Viewport, pointer: Pos2) -> Viewport {
        match self {
            Self::Panning { anchor } => Viewport {
                pan: pointer.to_vec2() - *anchor,
                zoom: viewport.zoom,
            },
            _ => *viewport,
        }
    }

    pub fn pinch_to(
        &self,
        viewport: &Viewport,
        a: Pos2,
        b: Pos2,
        camera: &CameraConfig,
    ) -> Viewport {
        match self {
            Self::Pinching(pinch) => {
                let ratio = a.distance(b).max(MIN_PINCH_DISTANCE) / pinch.distance;
                Viewport::anchored(midpoint(a, b), pinch.world_point, pinch.zoom * ratio, camera)
            }
            _ => *viewport,
        }
    }

    /// Touch transition. `touches` is the full set of points still down
    /// after the event. Anything other than one or two fingers, or a lifted
    /// finger, lands in `Idle`.
    pub fn on_touch(
        self,
        viewport: &Viewport,
        phase: TouchPhase,
        touches: &[Pos2],
        camera: &CameraConfig,
    ) -> (Self, Viewport) {
        match (phase, touches, self) {
            (_, [], _) => (Self::Idle, *viewport),
            (_, touches, _) if touches.len() > 2 => (Self::Idle, *viewport),
            (TouchPhase::End, _, _) => (Self::Idle, *viewport),
            (TouchPhase::Start, [point], _) => (Self::begin_pan(viewport, *point), *viewport),
            (TouchPhase::Start, [a, b], _) => (Self::begin_pinch(viewport, *a, *b), *viewport),
            (TouchPhase::Move, [point], Self::Panning { .. }) => {
                (self, self.pan_to(viewport, *point))
            }
            (TouchPhase::Move, [a, b], Self::Pinching(_)) => {
                (self, self.pinch_to(viewport, *a, *b, camera))
            }
            _ => (self, *viewport),
        }
    }
}
