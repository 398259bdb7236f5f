//! Reinforcing Steel Grades
//!
//! Yield/ultimate strengths of the reinforcing steels known to each code.
//!
//! ## Data Source
//!
//! - Eurocode 2: EN 1992-1-1 Annex C (B500 family, ductility classes B and C)
//! - ACI 318: ASTM A615 grades 40/60/75/80, converted to MPa
//! - BAEL 91: FeE smooth/high-bond steels (HA = haute adhérence)

use serde::Serialize;

/// Mechanical properties of a reinforcing steel grade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SteelGrade {
    /// Catalog key (e.g. "S500", "Grade60", "HA500")
    pub name: &'static str,
    /// Human-readable label for reports
    pub label: &'static str,
    /// Characteristic yield strength fy / fe (MPa)
    pub fy_mpa: f64,
    /// Ultimate tensile strength (MPa)
    pub fu_mpa: f64,
    /// Elastic modulus Es (GPa)
    pub es_gpa: f64,
    /// Characteristic ultimate strain (‰)
    pub epsilon_uk_permille: f64,
}

const fn grade(
    name: &'static str,
    label: &'static str,
    fy_mpa: f64,
    fu_mpa: f64,
    es_gpa: f64,
    epsilon_uk_permille: f64,
) -> SteelGrade {
    SteelGrade {
        name,
        label,
        fy_mpa,
        fu_mpa,
        es_gpa,
        epsilon_uk_permille,
    }
}

pub static EUROCODE2_STEEL: &[SteelGrade] = &[
    grade("S400", "S400", 400.0, 440.0, 200.0, 25.0),
    grade("S500", "S500", 500.0, 550.0, 200.0, 25.0),
    grade("S500B", "S500B", 500.0, 540.0, 200.0, 50.0),
    grade("S500C", "S500C", 500.0, 575.0, 200.0, 75.0),
];

pub static ACI318_STEEL: &[SteelGrade] = &[
    grade("Grade40", "Grade 40 (40 ksi)", 276.0, 414.0, 200.0, 12.0),
    grade("Grade60", "Grade 60 (60 ksi)", 414.0, 620.0, 200.0, 12.0),
    grade("Grade75", "Grade 75 (75 ksi)", 517.0, 690.0, 200.0, 10.0),
    grade("Grade80", "Grade 80 (80 ksi)", 552.0, 689.0, 200.0, 10.0),
];

pub static BAEL91_STEEL: &[SteelGrade] = &[
    grade("FeE400", "FeE400", 400.0, 480.0, 200.0, 10.0),
    grade("FeE500", "FeE500", 500.0, 550.0, 200.0, 10.0),
    grade("HA400", "HA400 (high bond)", 400.0, 480.0, 200.0, 10.0),
    grade("HA500", "HA500 (high bond)", 500.0, 550.0, 200.0, 10.0),
];

impl SteelGrade {
    /// Elastic modulus in MPa
    pub fn es_mpa(&self) -> f64 {
        self.es_gpa * 1000.0
    }
}

impl std::fmt::Display for SteelGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}
