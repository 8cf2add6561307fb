//! Valley and river height shaping.
//!
//! Ground elevation is built from a base terrain height plus a squared
//! valley depth, carved by a Gaussian valley profile around river lines and
//! a semicircular channel inside them. The same function serves chunk
//! lattices and single-point queries.

use serde::{Deserialize, Serialize};

/// River elevation meaning "no river in this column"
pub const RIVER_NONE: f32 = -31000.0;

/// Final ruggedness term used when shaping heights
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeightVariant {
    /// Closed form: inter-valley fill scaled by slope, skipped on cliffs,
    /// plus a small sine ripple.
    #[default]
    Closed,
    /// Search integer elevations against the 3D inter-valley fill field.
    Iterative { max_steps: u32 },
}

/// Per-column noise samples feeding the shaper
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ValleyInputs {
    pub terrain_height: f32,
    pub rivers: f32,
    pub valley_depth: f32,
    pub valley_profile: f32,
    pub inter_valley_slope: f32,
    pub inter_valley_fill: f32,
    pub cliffs: f32,
    pub corr: f32,
}

/// Shaped column
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValleyShape {
    /// Ground surface elevation
    pub ground: f32,
    /// River surface elevation, or [`RIVER_NONE`]
    pub river: f32,
    /// Height attributable to valley walls above the river base
    pub valley: f32,
}

impl ValleyShape {
    pub fn has_river(&self) -> bool {
        self.river != RIVER_NONE
    }
}

/// Height shaping parameters of one world
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValleyShaper {
    /// Half-width of river channels in river-noise units
    pub river_size: f32,
    pub river_depth: f32,
    pub water_level: f32,
    pub variant: HeightVariant,
}

impl Default for ValleyShaper {
    fn default() -> Self {
        Self {
            river_size: 0.05,
            river_depth: 5.0,
            water_level: 1.0,
            variant: HeightVariant::Closed,
        }
    }
}

impl ValleyShaper {
    /// Depth of the channel floor below the river surface, given the signed
    /// distance from the river (negative inside).
    #[inline]
    pub fn channel_depth(&self, river_distance: f32) -> f32 {
        let t = river_distance / self.river_size + 1.0;
        self.river_depth * (1.0 - t * t).max(0.0).sqrt() + 1.0
    }

    /// Shape one column.
    ///
    /// `fill_at(y)` samples the 3D inter-valley fill field at this column and
    /// is only called by [`HeightVariant::Iterative`].
    pub fn shape(&self, inputs: &ValleyInputs, fill_at: impl Fn(i32) -> f32) -> ValleyShape {
        let (mut ground, mut river, valley, slope) = self.base_shape(inputs);

        match self.variant {
            HeightVariant::Closed => {
                let delta = inputs.inter_valley_fill * slope;
                if inputs.cliffs < 0.2 {
                    ground += delta;
                }
                ground += (delta / 2.0).min(3.0) * inputs.corr.sin();
            }
            HeightVariant::Iterative { max_steps } => {
                let found = search_fill(ground, slope, max_steps, fill_at) as f32;
                if river != RIVER_NONE {
                    river += found - ground;
                }
                ground = found;
            }
        }

        // Rivers never sit below the surface they run in
        if river != RIVER_NONE && (river as i32) < (ground as i32) {
            river = RIVER_NONE;
        }

        ValleyShape { ground, river, valley }
    }

    /// Ground, river, valley amplitude and slope before the ruggedness term.
    fn base_shape(&self, inputs: &ValleyInputs) -> (f32, f32, f32, f32) {
        let valley_d = inputs.valley_depth * inputs.valley_depth;
        let base = inputs.terrain_height + valley_d;
        let river_distance = inputs.rivers.abs() - self.river_size;

        let ratio = if inputs.valley_profile != 0.0 {
            river_distance / inputs.valley_profile
        } else if river_distance == 0.0 {
            0.0
        } else {
            f32::INFINITY
        };
        let valley = valley_d * (1.0 - (-(ratio * ratio)).exp());

        let mut ground = base + valley;
        let mut slope = valley * inputs.inter_valley_slope;
        let mut river = RIVER_NONE;

        if river_distance < 0.0 {
            let depth = self.channel_depth(river_distance);
            river = base;
            ground = (ground - depth).max(self.water_level - 2.0).min(ground);
            slope = 0.0;
        }

        (ground, river, valley, slope)
    }
}

/// Highest cell at or near `ground` where `fill(y) * slope >= y - ground`.
fn search_fill(ground: f32, slope: f32, max_steps: u32, fill_at: impl Fn(i32) -> f32) -> i32 {
    let solid = |y: i32| fill_at(y) * slope >= y as f32 - ground;

    let mut y = ground.floor() as i32;
    if solid(y) {
        for _ in 0..max_steps {
            if !solid(y + 1) {
                break;
            }
            y += 1;
        }
    } else {
        for _ in 0..max_steps {
            y -= 1;
            if solid(y) {
                break;
            }
        }
    }
    y
}
