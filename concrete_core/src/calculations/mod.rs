//! # Structural Calculations
//!
//! Every calculation takes a [`ProductType`] and a
//! [`CalculationParameters`] bundle (JSON-serializable) and returns a
//! serializable result:
//!
//! - [`element`] - beams, slabs and planks designed from first principles
//! - [`joist_floor`] - joist-and-block floors picked from a span table
//!
//! [`run_calculation`] dispatches on the product; [`CalculationRecord`] wraps
//! a calculation with its lifecycle (Draft → Computing → Completed | Error).
//!
//! ## Example
//!
//! ```rust
//! use concrete_core::calculations::{CalculationRecord, CalculationStatus, ProductType};
//! use concrete_core::calculations::element::{CalculationParameters, Geometry};
//! use concrete_core::loads::LoadSet;
//!
//! let params = CalculationParameters::new(
//!     Geometry::new(6.0, 0.3, 0.6),
//!     LoadSet::per_length(12.0, 8.0),
//! );
//! let mut record = CalculationRecord::new("B1", ProductType::Beam, "EC2", params);
//! assert_eq!(record.status, CalculationStatus::Draft);
//!
//! record.run(None);
//! assert_eq!(record.status, CalculationStatus::Completed);
//! assert!(record.output.is_some());
//! ```

pub mod element;
pub mod joist_floor;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::codes::registry;
use crate::errors::{CalcError, CalcResult};
use crate::loads::LoadBasis;

// Re-export commonly used types
pub use element::{CalculationParameters, ElementResult};
pub use joist_floor::{select_joist, JoistRequest, JoistSelection, SelectionPolicy, SpanTable, SpanTableRow};

/// Precast product families handled by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    PrestressedJoist,
    PrecastPlank,
    HollowCoreSlab,
    Beam,
    SolidSlab,
    /// Prefabricated joists with filler blocks, sized from a span table
    JoistBlockFloor,
}

impl ProductType {
    pub const ALL: [ProductType; 6] = [
        ProductType::PrestressedJoist,
        ProductType::PrecastPlank,
        ProductType::HollowCoreSlab,
        ProductType::Beam,
        ProductType::SolidSlab,
        ProductType::JoistBlockFloor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::PrestressedJoist => "prestressed_joist",
            ProductType::PrecastPlank => "precast_plank",
            ProductType::HollowCoreSlab => "hollow_core_slab",
            ProductType::Beam => "beam",
            ProductType::SolidSlab => "solid_slab",
            ProductType::JoistBlockFloor => "joist_block_floor",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProductType::PrestressedJoist => "Prestressed joist",
            ProductType::PrecastPlank => "Precast plank",
            ProductType::HollowCoreSlab => "Hollow-core slab",
            ProductType::Beam => "Beam",
            ProductType::SolidSlab => "Solid slab",
            ProductType::JoistBlockFloor => "Joist-and-block floor",
        }
    }

    /// Smallest bottom bar allowed (mm)
    pub fn min_bottom_bar_mm(&self) -> u32 {
        match self {
            ProductType::Beam => 10,
            _ => 8,
        }
    }

    /// Sized from a manufacturer table rather than computed
    pub fn uses_span_table(&self) -> bool {
        matches!(self, ProductType::JoistBlockFloor)
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Result of either calculation path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalculationOutput {
    Element(ElementResult),
    JoistFloor(JoistSelection),
}

impl CalculationOutput {
    /// Overall verdict of the calculation
    pub fn ok(&self) -> bool {
        match self {
            CalculationOutput::Element(result) => result.summary.ok,
            CalculationOutput::JoistFloor(selection) => selection.verification_ok,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CalculationOutput::Element(result) => &result.summary.message,
            CalculationOutput::JoistFloor(selection) => &selection.message,
        }
    }
}

/// Run one calculation.
///
/// The code is resolved first, so an unknown code or grade fails before any
/// computation, whatever the product. Joist floors need `span_table` and
/// surface loads.
pub fn run_calculation(
    product: ProductType,
    params: &CalculationParameters,
    code: &str,
    span_table: Option<&SpanTable>,
) -> CalcResult<CalculationOutput> {
    let strategy = registry::design_code_from_str(
        code,
        params.materials.concrete.as_deref(),
        params.materials.steel.as_deref(),
    )?;

    if !product.uses_span_table() {
        return element::calculate(product, params, strategy.as_ref()).map(CalculationOutput::Element);
    }

    let table = span_table.ok_or_else(|| CalcError::missing_field("span_table"))?;
    if params.loads.basis != LoadBasis::PerArea {
        return Err(CalcError::invalid_input(
            "loads.basis",
            "per_length",
            "Joist floor loads must be given per area (kN/m²)",
        ));
    }
    let request = JoistRequest {
        span_m: params.geometry.span_m,
        permanent_kn_m2: params.loads.permanent,
        live_kn_m2: params.loads.live,
        spacing_cm: params.geometry.spacing_cm,
        block_height_cm: params.geometry.block_height_cm,
        policy: params.conditions.policy,
    };
    select_joist(&request, table).map(CalculationOutput::JoistFloor)
}

// ============================================================================
// Calculation record
// ============================================================================

/// Lifecycle of a [`CalculationRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationStatus {
    /// Parameters set, not yet run
    #[default]
    Draft,
    Computing,
    /// Ran to completion; the verdict itself may be negative
    Completed,
    /// Configuration or input problem, nothing computed
    Error,
}

/// A named calculation with its inputs, outcome and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub id: Uuid,
    pub name: String,
    pub product: ProductType,
    /// Code identifier as given (any registry alias)
    pub code: String,
    pub parameters: CalculationParameters,
    pub status: CalculationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<CalculationOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<CalcError>,
    pub created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed: Option<DateTime<Utc>>,
}

impl CalculationRecord {
    pub fn new(
        name: impl Into<String>,
        product: ProductType,
        code: impl Into<String>,
        parameters: CalculationParameters,
    ) -> Self {
        CalculationRecord {
            id: Uuid::new_v4(),
            name: name.into(),
            product,
            code: code.into(),
            parameters,
            status: CalculationStatus::Draft,
            output: None,
            error: None,
            created: Utc::now(),
            computed: None,
        }
    }

    /// Run the calculation, replacing any previous outcome.
    ///
    /// A failing verification still ends in `Completed`; only errors from
    /// [`run_calculation`] end in `Error`.
    pub fn run(&mut self, span_table: Option<&SpanTable>) -> CalculationStatus {
        self.status = CalculationStatus::Computing;
        self.output = None;
        self.error = None;
        log::debug!("{} '{}' computing ({}, {})", self.id, self.name, self.product, self.code);

        match run_calculation(self.product, &self.parameters, &self.code, span_table) {
            Ok(output) => {
                log::info!(
                    "'{}' completed: {}",
                    self.name,
                    if output.ok() { "OK" } else { "not compliant" }
                );
                self.output = Some(output);
                self.status = CalculationStatus::Completed;
            }
            Err(err) => {
                log::warn!("'{}' failed [{}]: {}", self.name, err.error_code(), err);
                self.error = Some(err);
                self.status = CalculationStatus::Error;
            }
        }
        self.computed = Some(Utc::now());
        self.status
    }

    /// Completed with every check passing
    pub fn is_ok(&self) -> bool {
        self.status == CalculationStatus::Completed && self.output.as_ref().is_some_and(|o| o.ok())
    }
}
