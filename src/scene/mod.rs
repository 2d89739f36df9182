//! Scenes with compile-time known variants
//!
//! The active scene lives in a [`SceneSlot`] so switching never allocates.
//! Each scene implements [`Scene`].

mod blackout;
mod rainbow;
mod solid;

use embassy_time::Instant;

pub use blackout::BlackoutScene;
pub use rainbow::RainbowScene;
pub use solid::SolidScene;

use crate::color::{BLACK, Rgb, parse_hex};

const SCENE_NAME_RAINBOW: &str = "rainbow";
const SCENE_NAME_SOLID: &str = "solid";
const SCENE_NAME_BLACKOUT: &str = "blackout";

/// An animation that owns one frame of the strip per tick.
pub trait Scene {
    /// Prepare the buffer before the first frame
    fn setup(&mut self, leds: &mut [Rgb]) {
        leds.fill(BLACK);
    }

    /// Write the frame for `now`. Must stay linear in `leds.len()`.
    fn advance(&mut self, now: Instant, leds: &mut [Rgb]);

    /// Release the buffer before another scene takes over
    fn teardown(&mut self, _leds: &mut [Rgb]) {}
}

/// Scenes that can be requested remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneId {
    Rainbow,
    Solid(Rgb),
    Blackout,
}

impl SceneId {
    pub fn to_slot(self) -> SceneSlot {
        match self {
            Self::Rainbow => SceneSlot::Rainbow(RainbowScene::default()),
            Self::Solid(color) => SceneSlot::Solid(SolidScene::new(color)),
            Self::Blackout => SceneSlot::Blackout(BlackoutScene),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rainbow => SCENE_NAME_RAINBOW,
            Self::Solid(_) => SCENE_NAME_SOLID,
            Self::Blackout => SCENE_NAME_BLACKOUT,
        }
    }

    /// Parse a scene request.
    ///
    /// Accepts `rainbow`, `blackout`, `off`, `solid #RRGGBB` and a bare
    /// `#RRGGBB`.
    pub fn parse_from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        match s {
            SCENE_NAME_RAINBOW => return Some(Self::Rainbow),
            SCENE_NAME_BLACKOUT | "off" => return Some(Self::Blackout),
            _ => {}
        }
        let color = match s.strip_prefix(SCENE_NAME_SOLID) {
            Some(rest) => rest.trim_start(),
            None => s,
        };
        parse_hex(color).map(Self::Solid)
    }
}

/// Scene slot - enum containing every available scene
#[derive(Debug, Clone)]
pub enum SceneSlot {
    Rainbow(RainbowScene),
    Solid(SolidScene),
    Blackout(BlackoutScene),
}

impl Default for SceneSlot {
    fn default() -> Self {
        Self::Rainbow(RainbowScene::default())
    }
}

impl SceneSlot {
    pub fn id(&self) -> SceneId {
        match self {
            Self::Rainbow(_) => SceneId::Rainbow,
            Self::Solid(scene) => SceneId::Solid(scene.color()),
            Self::Blackout(_) => SceneId::Blackout,
        }
    }

    pub fn setup(&mut self, leds: &mut [Rgb]) {
        match self {
            Self::Rainbow(scene) => scene.setup(leds),
            Self::Solid(scene) => scene.setup(leds),
            Self::Blackout(scene) => scene.setup(leds),
        }
    }

    pub fn advance(&mut self, now: Instant, leds: &mut [Rgb]) {
        match self {
            Self::Rainbow(scene) => scene.advance(now, leds),
            Self::Solid(scene) => scene.advance(now, leds),
            Self::Blackout(scene) => scene.advance(now, leds),
        }
    }

    pub fn teardown(&mut self, leds: &mut [Rgb]) {
        match self {
            Self::Rainbow(scene) => scene.teardown(leds),
            Self::Solid(scene) => scene.teardown(leds),
            Self::Blackout(scene) => scene.teardown(leds),
        }
    }
}
