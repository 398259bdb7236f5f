//! # Structural Equations
//!
//! Closed-form mechanics shared by the solvers and the orchestrator.
//!
//! ## Modules
//!
//! - [`beam`] - Simply-supported uniform-load demand (moment, shear, deflection)
//! - [`section`] - Rectangular concrete section properties (gross and cracked)
//!
//! ## Sign Conventions
//!
//! - **Loads**: Positive downward (gravity direction)
//! - **Moment**: Positive causes tension on bottom fiber (sagging)
//! - **Deflection**: Positive downward

pub mod beam;
pub mod section;

pub use beam::{uniform_load_deflection_from_moment, uniform_load_max_moment, uniform_load_max_shear};
pub use section::{
    cracked_inertia, cracked_neutral_axis_ratio, cracking_moment, effective_depth, gross_inertia,
    section_modulus, HALF_BAR_ESTIMATE_MM,
};
