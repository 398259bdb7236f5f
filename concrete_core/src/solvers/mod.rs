//! # Section Solvers
//!
//! Pure ultimate- and service-state checks of a rectangular reinforced
//! concrete section. Each solver takes a plain input struct in boundary
//! units (m, kN, kN·m, cm²) and a parameter struct of code coefficients, and
//! knows nothing about which design code produced those coefficients.
//!
//! - [`flexure`] - reduced-moment method, required tension steel
//! - [`shear`] - concrete resistance and truss-analogy stirrups
//! - [`deflection`] - effective-inertia deflection plus span/depth ratio
//!
//! Internally every solver works in N, mm and MPa.

pub mod deflection;
pub mod flexure;
pub mod shear;

pub use deflection::{
    DeflectionInput, DeflectionLimit, DeflectionParams, DeflectionResult, InertiaRule,
    SpanDepthCheck, SpanDepthRule,
};
pub use flexure::{FlexureInput, FlexureParams, FlexureResult, MaximumSteel, MinimumSteel};
pub use shear::{
    ConcreteShear, ShearInput, ShearParams, ShearResult, SpacingRule, StrutLimit,
};
