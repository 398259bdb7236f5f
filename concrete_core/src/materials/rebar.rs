//! Standard Reinforcing Bars
//!
//! Nominal cross-sectional areas of the bar diameters stocked for precast
//! production. Areas are π·Ø²/4 rounded to 0.1 mm².

/// Bar diameters (mm) with their nominal area (mm²), ascending.
pub static BAR_AREAS_MM2: &[(u32, f64)] = &[
    (6, 28.3),
    (8, 50.3),
    (10, 78.5),
    (12, 113.1),
    (14, 153.9),
    (16, 201.1),
    (20, 314.2),
    (25, 490.9),
    (32, 804.2),
];

/// Density of reinforcing steel (kg/m³)
pub const STEEL_DENSITY_KG_M3: f64 = 7850.0;

/// Nominal area of one bar, or `None` for a non-standard diameter
pub fn bar_area_mm2(diameter_mm: u32) -> Option<f64> {
    BAR_AREAS_MM2
        .iter()
        .find(|(d, _)| *d == diameter_mm)
        .map(|(_, area)| *area)
}

/// Standard diameters within `[min, max]`, ascending
pub fn diameters_in_range(min_mm: u32, max_mm: u32) -> impl Iterator<Item = (u32, f64)> {
    BAR_AREAS_MM2
        .iter()
        .copied()
        .filter(move |(d, _)| *d >= min_mm && *d <= max_mm)
}

/// Linear mass of a steel area (kg/m)
pub fn linear_mass_kg_m(area_mm2: f64) -> f64 {
    area_mm2 * 1.0e-6 * STEEL_DENSITY_KG_M3
}
