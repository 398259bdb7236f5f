//! # Design Code Registry
//!
//! Resolves a [`CodeId`] or a free-text alias to a configured strategy.
//!
//! Aliases are matched after uppercasing and stripping spaces, `-` and `_`,
//! so `"en 1992-1-1"`, `"Eurocode_2"` and `"ec2"` all resolve to EC2.
//! BS 8110 and CSA A23.3 are recognized but have no strategy yet; asking for
//! them is a configuration error, as is any unrecognized identifier.
//!
//! ## Example
//!
//! ```rust
//! use concrete_core::codes::registry;
//! use concrete_core::codes::CodeId;
//!
//! let id = registry::resolve("Eurocode-2").unwrap();
//! assert_eq!(id, CodeId::Ec2);
//!
//! let code = registry::design_code(CodeId::Bael91, Some("B25"), None).unwrap();
//! assert_eq!(code.materials().concrete.name, "B25");
//! assert_eq!(code.materials().steel.name, "HA500");
//!
//! let err = registry::resolve("SIA262").unwrap_err();
//! assert!(err.is_configuration());
//! ```

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::codes::{Aci318, Bael91, CodeCoefficients, CodeId, DesignCode, Eurocode2};
use crate::errors::{CalcError, CalcResult};

/// Normalized alias -> code
static ALIASES: Lazy<HashMap<&'static str, CodeId>> = Lazy::new(|| {
    HashMap::from([
        ("EC2", CodeId::Ec2),
        ("EUROCODE2", CodeId::Ec2),
        ("EUROCODE", CodeId::Ec2),
        ("EN199211", CodeId::Ec2),
        ("ACI318", CodeId::Aci318),
        ("ACI", CodeId::Aci318),
        ("BAEL91", CodeId::Bael91),
        ("BAEL", CodeId::Bael91),
        ("BAEL99", CodeId::Bael91),
        ("BS8110", CodeId::Bs8110),
        ("BS", CodeId::Bs8110),
        ("CSAA23", CodeId::CsaA23),
        ("CSA", CodeId::CsaA23),
    ])
});

/// Identifiers listed in "unknown code" messages
const ACCEPTED_CODES: &str = "EC2, ACI318, BAEL91, BS8110, CSA_A23";

/// Comma-separated list of implemented codes
pub fn supported_codes() -> String {
    CodeId::IMPLEMENTED
        .iter()
        .map(CodeId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn normalize(code: &str) -> String {
    code.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .to_uppercase()
}

/// Resolve a free-text identifier to a known code.
///
/// Known-but-unimplemented codes resolve successfully; [`design_code`]
/// rejects them.
pub fn resolve(code: &str) -> CalcResult<CodeId> {
    ALIASES.get(normalize(code).as_str()).copied().ok_or_else(|| {
        log::debug!("design code '{}' not in alias table", code);
        CalcError::unknown_design_code(code, ACCEPTED_CODES)
    })
}

/// Default (concrete, steel) grade names of a code
pub fn default_materials(id: CodeId) -> (&'static str, &'static str) {
    match id {
        CodeId::Ec2 => ("C30/37", "S500"),
        CodeId::Aci318 => ("C28", "Grade60"),
        CodeId::Bael91 => ("B30", "HA500"),
        CodeId::Bs8110 => ("C30", "Grade500"),
        CodeId::CsaA23 => ("C30", "400W"),
    }
}

/// Build a strategy for `id`, with the code's default grades unless named.
pub fn design_code(
    id: CodeId,
    concrete: Option<&str>,
    steel: Option<&str>,
) -> CalcResult<Box<dyn DesignCode>> {
    let (default_concrete, default_steel) = default_materials(id);
    let concrete = concrete.unwrap_or(default_concrete);
    let steel = steel.unwrap_or(default_steel);

    let code: Box<dyn DesignCode> = match id {
        CodeId::Ec2 => Box::new(Eurocode2::new(concrete, steel)?),
        CodeId::Aci318 => Box::new(Aci318::new(concrete, steel)?),
        CodeId::Bael91 => Box::new(Bael91::new(concrete, steel)?),
        CodeId::Bs8110 | CodeId::CsaA23 => {
            return Err(CalcError::unsupported_design_code(id.as_str(), supported_codes()));
        }
    };
    log::debug!("configured {} with {} / {}", id, concrete, steel);
    Ok(code)
}

/// [`resolve`] then [`design_code`]
pub fn design_code_from_str(
    code: &str,
    concrete: Option<&str>,
    steel: Option<&str>,
) -> CalcResult<Box<dyn DesignCode>> {
    design_code(resolve(code)?, concrete, steel)
}

/// One entry of [`list_codes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeInfo {
    pub code: CodeId,
    pub display_name: String,
    pub region: String,
    pub implemented: bool,
    /// Empty for unimplemented codes
    #[serde(default)]
    pub concrete_grades: Vec<String>,
    #[serde(default)]
    pub steel_grades: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coefficients: Option<CodeCoefficients>,
}

/// Every known code, with grades and coefficients for the implemented ones
pub fn list_codes() -> Vec<CodeInfo> {
    CodeId::ALL
        .iter()
        .map(|&id| {
            let mut info = CodeInfo {
                code: id,
                display_name: id.display_name().to_string(),
                region: id.region().to_string(),
                implemented: id.is_implemented(),
                concrete_grades: Vec::new(),
                steel_grades: Vec::new(),
                coefficients: None,
            };
            if let Ok(code) = design_code(id, None, None) {
                info.concrete_grades = code.concrete_grades().into_iter().map(String::from).collect();
                info.steel_grades = code.steel_grades().into_iter().map(String::from).collect();
                info.coefficients = Some(code.coefficients());
            }
            info
        })
        .collect()
}

/// Flexure outcome of one code in [`compare_codes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeComparison {
    pub code: CodeId,
    pub concrete: String,
    pub steel: String,
    pub steel_area_cm2: f64,
    pub moment_capacity_knm: f64,
    pub ok: bool,
    /// Set when the calculation itself was rejected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Run the same flexure check under every implemented code with its
/// default grades.
pub fn compare_codes(moment_knm: f64, width_m: f64, height_m: f64, cover_m: f64) -> Vec<CodeComparison> {
    CodeId::IMPLEMENTED
        .iter()
        .map(|&id| {
            let (concrete, steel) = default_materials(id);
            let mut row = CodeComparison {
                code: id,
                concrete: concrete.to_string(),
                steel: steel.to_string(),
                steel_area_cm2: 0.0,
                moment_capacity_knm: 0.0,
                ok: false,
                error: None,
            };
            match design_code(id, None, None)
                .and_then(|code| code.compute_flexure(moment_knm, width_m, height_m, cover_m))
            {
                Ok(result) => {
                    row.steel_area_cm2 = result.steel_area_cm2;
                    row.moment_capacity_knm = result.moment_capacity_knm;
                    row.ok = result.ok;
                }
                Err(err) => {
                    log::warn!("{} flexure rejected: {}", id, err);
                    row.error = Some(err.to_string());
                }
            }
            row
        })
        .collect()
}
