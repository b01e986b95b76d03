// sp-core/src/units.rs

use uom::si::f64::{MassDensity as UomMassDensity, Pressure as UomPressure, Velocity as UomVelocity};

// Public canonical unit types (SI, f64)
pub type Density = UomMassDensity;
pub type Pressure = UomPressure;
pub type Velocity = UomVelocity;

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

/// Sea-level reference atmosphere used to dimensionalize pressure coefficients.
///
/// These are physical constants of the trained models, not tunable parameters.
pub mod constants {
    use super::*;
    use uom::si::pressure::pascal;

    /// Ratio of specific heats for air.
    pub const GAMMA_AIR: f64 = 1.4;
    /// Specific gas constant for air [J/(kg·K)].
    pub const R_AIR: f64 = 287.0;
    /// Sea-level static temperature [K].
    pub const T0_SEA_LEVEL_K: f64 = 288.15;
    /// Sea-level density [kg/m³].
    pub const RHO0_SEA_LEVEL: f64 = 1.225;

    /// Speed of sound at sea level, `a₀ = sqrt(γ·R·T₀)`, as a raw value [m/s].
    #[inline]
    pub fn speed_of_sound_mps() -> f64 {
        (GAMMA_AIR * R_AIR * T0_SEA_LEVEL_K).sqrt()
    }

    #[inline]
    pub fn speed_of_sound() -> Velocity {
        mps(speed_of_sound_mps())
    }

    #[inline]
    pub fn sea_level_density() -> Density {
        kg_per_m3(RHO0_SEA_LEVEL)
    }

    /// Reference dynamic pressure `q_inf = ρ₀·a₀²`.
    ///
    /// The speed of sound is evaluated first and squared afterwards so the
    /// rounding matches the reference outputs the models were validated on.
    #[inline]
    pub fn dynamic_pressure() -> Pressure {
        let a = speed_of_sound();
        sea_level_density() * (a * a)
    }

    /// [`dynamic_pressure`] in Pa.
    #[inline]
    pub fn dynamic_pressure_pa() -> f64 {
        dynamic_pressure().get::<pascal>()
    }
}
