//! # concrete_core - Multi-standard Concrete Calculation Engine
//!
//! `concrete_core` verifies precast and cast-in-place concrete elements
//! (beams, slabs, planks, joist-and-block floors) under Eurocode 2, ACI 318
//! or BAEL 91 and produces the reinforcement they need. All inputs and
//! outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **Code-agnostic**: Solvers are driven by coefficients from a [`codes::DesignCode`]
//! - **Failures are data**: A section that does not work is a result with `ok = false`;
//!   only configuration problems and malformed input are errors
//! - **Units**: metres, kN and kN·m at the boundary; N, mm and MPa inside
//!
//! ## Quick Start
//!
//! ```rust
//! use concrete_core::calculations::{run_calculation, ProductType};
//! use concrete_core::calculations::element::{CalculationParameters, Geometry};
//! use concrete_core::loads::LoadSet;
//!
//! // 6 m beam, 30 x 60 cm, g = 12 kN/m, q = 8 kN/m
//! let params = CalculationParameters::new(
//!     Geometry::new(6.0, 0.3, 0.6),
//!     LoadSet::per_length(12.0, 8.0),
//! );
//! let output = run_calculation(ProductType::Beam, &params, "EC2", None).unwrap();
//! assert!(output.ok());
//!
//! let json = serde_json::to_string_pretty(&output).unwrap();
//! assert!(json.contains("\"verdict\""));
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Element calculations, joist selection, calculation records
//! - [`codes`] - Design code strategies and the registry
//! - [`solvers`] - Flexure, shear and deflection checks
//! - [`reinforcement`] - Bar and stirrup selection
//! - [`loads`] - Load sets and combinations
//! - [`materials`] - Concrete and steel grade catalogs, bar table
//! - [`equations`] - Beam and section formulas
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - JSON files with atomic saves

pub mod calculations;
pub mod codes;
pub mod equations;
pub mod errors;
pub mod file_io;
pub mod loads;
pub mod materials;
pub mod reinforcement;
pub mod solvers;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{run_calculation, CalculationOutput, CalculationRecord, CalculationStatus, ProductType};
pub use codes::{CodeId, DesignCode};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_parameters, load_span_table, save_json};
