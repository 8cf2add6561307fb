//! Heat and humidity derivation.
//!
//! Raw heat and humidity come from noise fields. They are blended with small
//! scale perturbation, shifted by the world's temperature and humidity
//! settings, then corrected for altitude and nearby water.

use serde::{Deserialize, Serialize};

/// How the temperature setting acts on heat
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureMode {
    /// `heat += temperature - 50`
    #[default]
    Additive,
    /// `heat *= temperature / 50`
    Multiplicative,
}

/// How heat falls off above ground level zero
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChillCurve {
    /// Heat halves every `altitude_chill` cells
    #[default]
    Halving,
    /// Heat drops by 20 every `altitude_chill` cells
    Linear,
}

/// Climate settings of one world
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Climate {
    pub temperature: f32,
    pub humidity: f32,
    pub altitude_chill: f32,
    pub water_level: f32,
    pub temperature_mode: TemperatureMode,
    pub chill_curve: ChillCurve,
}

impl Default for Climate {
    fn default() -> Self {
        Self {
            temperature: 50.0,
            humidity: 50.0,
            altitude_chill: 90.0,
            water_level: 1.0,
            temperature_mode: TemperatureMode::default(),
            chill_curve: ChillCurve::default(),
        }
    }
}

impl Climate {
    /// Blend raw heat with its perturbation and apply the temperature setting.
    #[inline]
    pub fn blend_heat(&self, heat: f32, heat_blend: f32) -> f32 {
        let heat = heat + heat_blend;
        match self.temperature_mode {
            TemperatureMode::Additive => heat + (self.temperature - 50.0),
            TemperatureMode::Multiplicative => heat * (self.temperature / 50.0),
        }
    }

    /// Blend raw humidity with its perturbation.
    #[inline]
    pub fn blend_humidity(&self, humidity: f32, humidity_blend: f32) -> f32 {
        humidity + humidity_blend
    }

    /// Apply the humidity setting, then raise humidity near sea level and
    /// in river valleys. Never lowers the adjusted base value.
    pub fn humidity_by_terrain(&self, humidity: f32, ground: f32, valley: f32) -> f32 {
        let mut humidity = humidity + (self.humidity - 50.0);
        if ground > self.water_level {
            let sea = 0.5f32.powf(((ground - self.water_level) / 6.0).max(0.0)) / 2.0;
            let river = 0.5f32.powf((valley / 3.0).max(0.0));
            let water = sea + (1.0 - sea) * river;
            humidity = humidity.max(65.0 * water);
        }
        humidity
    }

    /// Cool heat with elevation. Only applies above ground level zero.
    pub fn heat_by_altitude(&self, heat: f32, ground: f32) -> f32 {
        if ground <= 0.0 || self.altitude_chill <= 0.0 {
            return heat;
        }
        match self.chill_curve {
            ChillCurve::Halving => heat * 0.5f32.powf(ground / self.altitude_chill),
            ChillCurve::Linear => heat - ground * 20.0 / self.altitude_chill,
        }
    }
}
