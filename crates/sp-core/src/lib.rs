//! sp-core: shared foundation for the surface pressure pipeline.
//!
//! Contains:
//! - units (uom SI types, sea-level atmosphere constants, q_inf)
//! - numeric (finiteness checks and float helpers)
//! - timing (stage timers reported through tracing)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod timing;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use timing::Timer;
pub use units::*;
