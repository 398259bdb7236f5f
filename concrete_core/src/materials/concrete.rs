//! Concrete Grades
//!
//! Mechanical properties of the concrete classes known to each design code.
//! Values are characteristic/mean properties at 28 days.
//!
//! - Eurocode 2: EN 1992-1-1 Table 3.1 (C20/25 .. C50/60)
//! - ACI 318: specified compressive strength f'c, labelled by the nearest psi class
//! - BAEL 91: fc28 classes B20 .. B50

use serde::Serialize;

/// Mechanical properties of a concrete grade.
///
/// Catalog entries are `'static` and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConcreteGrade {
    /// Catalog key (e.g. "C30/37", "C28", "B30")
    pub name: &'static str,
    /// Human-readable label for reports
    pub label: &'static str,
    /// Characteristic cylinder strength fck / f'c / fc28 (MPa)
    pub fck_mpa: f64,
    /// Mean compressive strength fcm (MPa)
    pub fcm_mpa: f64,
    /// Mean tensile strength fctm (MPa)
    pub fctm_mpa: f64,
    /// 5% fractile tensile strength fctk,0.05 (MPa)
    pub fctk_005_mpa: f64,
    /// Secant elastic modulus Ecm (GPa)
    pub ecm_gpa: f64,
    /// Ultimate compressive strain (‰)
    pub epsilon_cu_permille: f64,
}

const fn grade(
    name: &'static str,
    label: &'static str,
    fck_mpa: f64,
    fcm_mpa: f64,
    fctm_mpa: f64,
    fctk_005_mpa: f64,
    ecm_gpa: f64,
    epsilon_cu_permille: f64,
) -> ConcreteGrade {
    ConcreteGrade {
        name,
        label,
        fck_mpa,
        fcm_mpa,
        fctm_mpa,
        fctk_005_mpa,
        ecm_gpa,
        epsilon_cu_permille,
    }
}

/// EN 1992-1-1 Table 3.1
pub static EUROCODE2_CONCRETE: &[ConcreteGrade] = &[
    grade("C20/25", "C20/25", 20.0, 28.0, 2.2, 1.5, 30.0, 3.5),
    grade("C25/30", "C25/30", 25.0, 33.0, 2.6, 1.8, 31.0, 3.5),
    grade("C30/37", "C30/37", 30.0, 38.0, 2.9, 2.0, 33.0, 3.5),
    grade("C35/45", "C35/45", 35.0, 43.0, 3.2, 2.2, 34.0, 3.5),
    grade("C40/50", "C40/50", 40.0, 48.0, 3.5, 2.5, 35.0, 3.5),
    grade("C45/55", "C45/55", 45.0, 53.0, 3.8, 2.7, 36.0, 3.5),
    grade("C50/60", "C50/60", 50.0, 58.0, 4.1, 2.9, 37.0, 3.5),
];

/// ACI 318 f'c classes (SI values)
pub static ACI318_CONCRETE: &[ConcreteGrade] = &[
    grade("C20", "C20 (3000 psi)", 20.0, 26.0, 2.2, 1.5, 21.5, 3.0),
    grade("C25", "C25 (3500 psi)", 25.0, 32.0, 2.5, 1.7, 23.5, 3.0),
    grade("C28", "C28 (4000 psi)", 28.0, 35.0, 2.7, 1.9, 25.0, 3.0),
    grade("C30", "C30 (4500 psi)", 30.0, 37.0, 2.9, 2.0, 26.0, 3.0),
    grade("C35", "C35 (5000 psi)", 35.0, 42.0, 3.1, 2.2, 28.0, 3.0),
    grade("C40", "C40 (6000 psi)", 40.0, 47.0, 3.4, 2.4, 30.0, 3.0),
    grade("C45", "C45 (6500 psi)", 45.0, 52.0, 3.6, 2.5, 32.0, 3.0),
];

/// BAEL 91 fc28 classes
pub static BAEL91_CONCRETE: &[ConcreteGrade] = &[
    grade("B20", "B20", 20.0, 27.0, 1.8, 1.3, 29.0, 3.5),
    grade("B25", "B25", 25.0, 32.0, 2.1, 1.5, 32.0, 3.5),
    grade("B30", "B30", 30.0, 38.0, 2.4, 1.7, 35.0, 3.5),
    grade("B35", "B35", 35.0, 43.0, 2.7, 1.9, 37.0, 3.5),
    grade("B40", "B40", 40.0, 48.0, 3.0, 2.1, 39.0, 3.5),
    grade("B45", "B45", 45.0, 53.0, 3.3, 2.3, 41.0, 3.5),
    grade("B50", "B50", 50.0, 58.0, 3.5, 2.5, 43.0, 3.5),
];

impl ConcreteGrade {
    /// Mean elastic modulus in MPa
    pub fn ecm_mpa(&self) -> f64 {
        self.ecm_gpa * 1000.0
    }
}

impl std::fmt::Display for ConcreteGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogs_sorted_by_strength() {
        for catalog in [EUROCODE2_CONCRETE, ACI318_CONCRETE, BAEL91_CONCRETE] {
            assert_eq!(catalog.len(), 7);
            assert!(catalog.windows(2).all(|w| w[0].fck_mpa < w[1].fck_mpa));
        }
    }

    #[test]
    fn test_ecm_in_mpa() {
        let c30 = EUROCODE2_CONCRETE.iter().find(|g| g.name == "C30/37").unwrap();
        assert_eq!(c30.ecm_mpa(), 33_000.0);
        assert_eq!(c30.to_string(), "C30/37");
    }
}
