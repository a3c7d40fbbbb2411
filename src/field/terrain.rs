//! Procedural terrain density backed by fractal noise.

use std::fmt;

use glam::DVec3;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use super::DensityField;

/// Rolling terrain with overhangs, built from 3-D fractal Brownian motion.
///
/// Density is `base_height - y + amplitude * fbm(p * frequency)`, so the
/// surface hovers around `base_height` and noise carves caves and ledges
/// where it dominates the height term.
pub struct NoiseTerrain {
    fbm: Fbm<Perlin>,
    base_height: f64,
    amplitude: f64,
    frequency: f64,
}

impl NoiseTerrain {
    /// Number of noise octaves summed per sample.
    pub const OCTAVES: usize = 5;

    /// Creates a terrain for `seed` with a surface around `base_height`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldwalk::field::{DensityField, NoiseTerrain};
    /// use glam::DVec3;
    /// let terrain = NoiseTerrain::new(7, 0.0, 8.0, 1.0 / 64.0);
    /// assert!(terrain.density(DVec3::new(0.0, -100.0, 0.0)) > 0.0);
    /// assert!(terrain.density(DVec3::new(0.0, 100.0, 0.0)) < 0.0);
    /// ```
    #[must_use]
    pub fn new(seed: u32, base_height: f64, amplitude: f64, frequency: f64) -> Self {
        Self {
            fbm: Fbm::<Perlin>::new(seed).set_octaves(Self::OCTAVES),
            base_height,
            amplitude,
            frequency,
        }
    }

    /// Elevation the surface oscillates around.
    #[must_use]
    pub const fn base_height(&self) -> f64 {
        self.base_height
    }
}

impl fmt::Debug for NoiseTerrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseTerrain")
            .field("base_height", &self.base_height)
            .field("amplitude", &self.amplitude)
            .field("frequency", &self.frequency)
            .finish_non_exhaustive()
    }
}

impl DensityField for NoiseTerrain {
    fn density(&self, position: DVec3) -> f64 {
        let scaled = position * self.frequency;
        let noise = self.fbm.get([scaled.x, scaled.y, scaled.z]);
        self.base_height - position.y + self.amplitude * noise
    }
}
