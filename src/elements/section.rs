//! Section properties for frame members

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};

/// Elastic modulus of structural steel in Pa
pub const STEEL_E: f64 = 200e9;

/// Elastic section properties of a prismatic member.
///
/// The solver only needs bending about the out-of-plane axis, so a single
/// second moment of area is carried.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Modulus of elasticity in Pa
    pub e: f64,
    /// Second moment of area about the out-of-plane axis in m⁴
    pub i: f64,
    /// Cross-sectional area in m²
    pub a: f64,
}

impl Section {
    /// Create a section from raw properties
    pub fn new(e: f64, i: f64, a: f64) -> Self {
        Self { e, i, a }
    }

    /// Create a solid rectangular section bending about its depth
    pub fn rectangular(e: f64, width: f64, depth: f64) -> Self {
        Self {
            e,
            i: width * depth.powi(3) / 12.0,
            a: width * depth,
        }
    }

    /// Create a wide flange (I-beam) section bending about its strong axis
    ///
    /// # Arguments
    /// * `depth` - Total depth of section
    /// * `flange_width` - Width of flange
    /// * `flange_thickness` - Thickness of flange
    /// * `web_thickness` - Thickness of web
    pub fn wide_flange(
        e: f64,
        depth: f64,
        flange_width: f64,
        flange_thickness: f64,
        web_thickness: f64,
    ) -> Self {
        let bf = flange_width;
        let tf = flange_thickness;
        let tw = web_thickness;
        let hw = depth - 2.0 * tf;

        Self {
            e,
            i: (bf * depth.powi(3) - (bf - tw) * hw.powi(3)) / 12.0,
            a: 2.0 * bf * tf + hw * tw,
        }
    }

    /// Flexural rigidity EI
    pub fn ei(&self) -> f64 {
        self.e * self.i
    }

    /// Reject properties that would make the stiffness meaningless
    pub fn validate(&self, member: &str) -> FrameResult<()> {
        for (name, value) in [("E", self.e), ("I", self.i), ("A", self.a)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(FrameError::InvalidInput(format!(
                    "member '{}' has non-positive {} ({})",
                    member, name, value
                )));
            }
        }
        Ok(())
    }
}

impl Default for Section {
    fn default() -> Self {
        // 200mm x 200mm steel
        Self::rectangular(STEEL_E, 0.2, 0.2)
    }
}
