//! # Unit Types
//!
//! Type-safe wrappers for the SI units used by the engine. These are plain
//! f64 newtypes that serialize as bare numbers.
//!
//! ## Internal Unit System
//!
//! Every solver works in **newtons, millimetres and megapascals**
//! (1 MPa = 1 N/mm²). Callers speak metres, kilonewtons and kN·m; the
//! conversions below are applied once, at the boundary of each solver:
//!
//! - Length: metres (m) in, millimetres (mm) inside
//! - Force: kilonewtons (kN) in, newtons (N) inside
//! - Moment: kN·m in, N·mm inside
//! - Steel area: cm² reported, mm² inside
//! - Surface load: kN/m² in, kg/m² for manufacturer span tables
//!
//! ## Example
//!
//! ```rust
//! use concrete_core::units::{Meters, Millimeters, KnM, NMm};
//!
//! let span = Meters(5.2);
//! let span_mm: Millimeters = span.into();
//! assert!((span_mm.0 - 5200.0).abs() < 1e-9);
//!
//! let moment: NMm = KnM(25.0).into();
//! assert_eq!(moment.0, 25.0e6);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

// ============================================================================
// Force Units
// ============================================================================

/// Force in newtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

/// Force in kilonewtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtons(pub f64);

impl From<KiloNewtons> for Newtons {
    fn from(kn: KiloNewtons) -> Self {
        Newtons(kn.0 * 1000.0)
    }
}

impl From<Newtons> for KiloNewtons {
    fn from(n: Newtons) -> Self {
        KiloNewtons(n.0 / 1000.0)
    }
}

// ============================================================================
// Moment Units
// ============================================================================

/// Moment in kilonewton-metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnM(pub f64);

/// Moment in newton-millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NMm(pub f64);

impl From<KnM> for NMm {
    fn from(knm: KnM) -> Self {
        NMm(knm.0 * 1.0e6)
    }
}

impl From<NMm> for KnM {
    fn from(nmm: NMm) -> Self {
        KnM(nmm.0 / 1.0e6)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Area in square centimetres (steel areas in reports)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqCm(pub f64);

/// Area in square millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqMm(pub f64);

impl From<SqCm> for SqMm {
    fn from(cm2: SqCm) -> Self {
        SqMm(cm2.0 * 100.0)
    }
}

impl From<SqMm> for SqCm {
    fn from(mm2: SqMm) -> Self {
        SqCm(mm2.0 / 100.0)
    }
}

// ============================================================================
// Surface Load Units
// ============================================================================

/// Surface load in kilonewtons per square metre
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnPerM2(pub f64);

/// Surface load in kilograms per square metre, as printed in span tables.
///
/// Manufacturers treat 1 kN/m² as 100 kg/m² (1 daN ≈ 1 kg).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KgPerM2(pub f64);

impl From<KnPerM2> for KgPerM2 {
    fn from(kn: KnPerM2) -> Self {
        KgPerM2(kn.0 * 100.0)
    }
}

impl From<KgPerM2> for KnPerM2 {
    fn from(kg: KgPerM2) -> Self {
        KnPerM2(kg.0 / 100.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Millimeters);
impl_arithmetic!(Newtons);
impl_arithmetic!(KiloNewtons);
impl_arithmetic!(KnM);
impl_arithmetic!(NMm);
impl_arithmetic!(SqCm);
impl_arithmetic!(SqMm);
impl_arithmetic!(KnPerM2);
impl_arithmetic!(KgPerM2);

/// Convert metres to millimetres (raw f64 helper for solver internals)
pub(crate) fn mm(m: f64) -> f64 {
    Millimeters::from(Meters(m)).0
}

/// Convert square millimetres to square centimetres (raw f64 helper)
pub(crate) fn cm2(mm2: f64) -> f64 {
    SqCm::from(SqMm(mm2)).0
}

/// Convert square centimetres to square millimetres (raw f64 helper)
pub(crate) fn mm2(cm2: f64) -> f64 {
    SqMm::from(SqCm(cm2)).0
}
