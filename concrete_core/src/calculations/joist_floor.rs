//! # Joist-and-Block Floor Selection
//!
//! Picks a prefabricated joist from a manufacturer's span table instead of
//! designing a section. Each table row is one joist/block/spacing
//! combination with its maximum span per load column (kg/m²).
//!
//! ## Algorithm
//!
//! 1. `g + q` (kN/m², unfactored) is converted at 1 kN/m² = 100 kg/m² and
//!    rounded **up** to the next load column present in the table. A load
//!    above the largest column selects nothing.
//! 2. Each row, after the optional spacing/block filters, gives its span at
//!    that column; missing columns are interpolated linearly between the
//!    bracketing ones, and clamped to the end columns outside the row's range.
//! 3. Rows whose span covers the requested span are candidates, ranked by the
//!    [`SelectionPolicy`].
//! 4. The best candidate is returned with up to three alternatives.
//!
//! Clamping at the table boundaries is an inherited, conservative policy,
//! not a verified engineering rule.
//!
//! ## Example
//!
//! ```rust
//! use concrete_core::calculations::joist_floor::{select_joist, JoistRequest, SpanTable};
//!
//! let table = SpanTable::from_json_str(r#"[
//!     {"reference": "BP113", "block_height_cm": 16, "spacing_cm": 60,
//!      "spans_m": {"450": 5.7, "550": 5.4, "650": 5.1}}
//! ]"#).unwrap();
//!
//! let selection = select_joist(&JoistRequest::new(5.2, 3.0, 2.5), &table).unwrap();
//! assert!(selection.verification_ok);
//! let joist = selection.joist.unwrap();
//! assert_eq!(joist.reference, "BP113");
//! assert!((joist.utilization_pct - 96.3).abs() < 0.1);
//! ```

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ensure_non_negative, CalcError, CalcResult};
use crate::units::{KgPerM2, KnPerM2};

/// Longest span the selector accepts (m)
pub const MAX_SPAN_M: f64 = 12.0;

/// Topping thickness when a row does not give one (cm)
pub const DEFAULT_TOPPING_CM: f64 = 5.0;

/// Alternatives returned besides the selected joist
pub const MAX_ALTERNATIVES: usize = 3;

/// Joist height (cm) by filler block height (cm)
const JOIST_HEIGHT_CM: &[(u32, f64)] = &[(12, 11.0), (16, 13.0), (20, 15.0), (25, 18.0)];
const DEFAULT_JOIST_HEIGHT_CM: f64 = 13.0;

fn default_topping() -> f64 {
    DEFAULT_TOPPING_CM
}

// ============================================================================
// Span table
// ============================================================================

/// One joist/block/spacing combination of a manufacturer span table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanTableRow {
    /// Joist reference, e.g. "BP113"
    pub reference: String,
    /// Filler block (hourdis) height (cm)
    pub block_height_cm: u32,
    /// Joist spacing, centre to centre (cm)
    pub spacing_cm: u32,
    /// Cast topping thickness (cm)
    #[serde(default = "default_topping")]
    pub topping_cm: f64,
    /// Load column (kg/m²) -> maximum span (m)
    pub spans_m: BTreeMap<u32, f64>,
}

impl SpanTableRow {
    /// Maximum span at a load (kg/m²): exact column, else linear
    /// interpolation, clamped to the first/last column outside the range.
    pub fn span_at(&self, load_kg_m2: f64) -> Option<f64> {
        let (&first_load, &first_span) = self.spans_m.iter().next()?;
        let (&last_load, &last_span) = self.spans_m.iter().next_back()?;

        if load_kg_m2 <= first_load as f64 {
            return Some(first_span);
        }
        if load_kg_m2 >= last_load as f64 {
            return Some(last_span);
        }

        let mut below = (first_load as f64, first_span);
        for (&load, &span) in &self.spans_m {
            let load = load as f64;
            if load == load_kg_m2 {
                return Some(span);
            }
            if load > load_kg_m2 {
                let (l1, s1) = below;
                return Some(s1 + (load_kg_m2 - l1) / (load - l1) * (span - s1));
            }
            below = (load, span);
        }
        Some(last_span)
    }

    /// Height of the joist itself (cm)
    pub fn joist_height_cm(&self) -> f64 {
        JOIST_HEIGHT_CM
            .iter()
            .find(|(block, _)| *block == self.block_height_cm)
            .map_or(DEFAULT_JOIST_HEIGHT_CM, |(_, h)| *h)
    }

    /// max(joist, block) + topping (cm)
    pub fn total_height_cm(&self) -> f64 {
        self.joist_height_cm().max(self.block_height_cm as f64) + self.topping_cm
    }

    fn validate(&self, index: usize) -> CalcResult<()> {
        let field = |name: &str| format!("rows[{}].{}", index, name);
        if self.reference.trim().is_empty() {
            return Err(CalcError::missing_field(field("reference")));
        }
        if self.spans_m.is_empty() {
            return Err(CalcError::invalid_input(
                field("spans_m"),
                "empty",
                "Row must list at least one load column",
            ));
        }
        for (load, span) in &self.spans_m {
            if !span.is_finite() || *span <= 0.0 {
                return Err(CalcError::invalid_input(
                    field(&format!("spans_m.{}", load)),
                    span.to_string(),
                    "Span must be a positive finite number",
                ));
            }
        }
        if !self.topping_cm.is_finite() || self.topping_cm < 0.0 {
            return Err(CalcError::invalid_input(
                field("topping_cm"),
                self.topping_cm.to_string(),
                "Topping thickness must be zero or positive",
            ));
        }
        Ok(())
    }
}

/// A manufacturer span table: an ordered list of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpanTable {
    pub rows: Vec<SpanTableRow>,
}

impl SpanTable {
    /// Build from rows, validating each one.
    pub fn new(rows: Vec<SpanTableRow>) -> CalcResult<Self> {
        let table = SpanTable { rows };
        table.validate()?;
        Ok(table)
    }

    /// Parse a JSON array of rows.
    pub fn from_json_str(json: &str) -> CalcResult<Self> {
        let table: SpanTable = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> CalcResult<()> {
        self.rows
            .iter()
            .enumerate()
            .try_for_each(|(i, row)| row.validate(i))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every load column used by at least one row, ascending
    pub fn load_columns(&self) -> BTreeSet<u32> {
        self.rows
            .iter()
            .flat_map(|row| row.spans_m.keys().copied())
            .collect()
    }

    /// Smallest column not below `load_kg_m2`
    pub fn design_column(&self, load_kg_m2: f64) -> Option<u32> {
        self.load_columns()
            .into_iter()
            .find(|column| *column as f64 >= load_kg_m2)
    }
}

// ============================================================================
// Request
// ============================================================================

/// How candidates are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Highest utilization, then lowest floor
    #[default]
    Economical,
    /// Lowest floor, then highest utilization
    MinimalHeight,
    /// Largest span margin, then lowest floor
    MaximalReserve,
}

impl SelectionPolicy {
    pub const ALL: [SelectionPolicy; 3] = [
        SelectionPolicy::Economical,
        SelectionPolicy::MinimalHeight,
        SelectionPolicy::MaximalReserve,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionPolicy::Economical => "economical",
            SelectionPolicy::MinimalHeight => "minimal_height",
            SelectionPolicy::MaximalReserve => "maximal_reserve",
        }
    }

    fn compare(&self, a: &JoistCandidate, b: &JoistCandidate) -> Ordering {
        match self {
            SelectionPolicy::Economical => b
                .utilization_pct
                .total_cmp(&a.utilization_pct)
                .then(a.total_height_cm.total_cmp(&b.total_height_cm)),
            SelectionPolicy::MinimalHeight => a
                .total_height_cm
                .total_cmp(&b.total_height_cm)
                .then(b.utilization_pct.total_cmp(&a.utilization_pct)),
            SelectionPolicy::MaximalReserve => b
                .reserve_m
                .total_cmp(&a.reserve_m)
                .then(a.total_height_cm.total_cmp(&b.total_height_cm)),
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the floor must carry and optional layout constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoistRequest {
    pub span_m: f64,
    /// Permanent load g (kN/m²)
    pub permanent_kn_m2: f64,
    /// Live load q (kN/m²)
    pub live_kn_m2: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing_cm: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_height_cm: Option<u32>,
    #[serde(default)]
    pub policy: SelectionPolicy,
}

impl JoistRequest {
    pub fn new(span_m: f64, permanent_kn_m2: f64, live_kn_m2: f64) -> Self {
        JoistRequest {
            span_m,
            permanent_kn_m2,
            live_kn_m2,
            spacing_cm: None,
            block_height_cm: None,
            policy: SelectionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn validate(&self) -> CalcResult<()> {
        if !self.span_m.is_finite() {
            return Err(CalcError::invalid_input(
                "span_m",
                self.span_m.to_string(),
                "Span must be a finite number",
            ));
        }
        ensure_non_negative("permanent_kn_m2", self.permanent_kn_m2)?;
        ensure_non_negative("live_kn_m2", self.live_kn_m2)?;
        Ok(())
    }

    fn accepts(&self, row: &SpanTableRow) -> bool {
        self.spacing_cm.map_or(true, |s| s == row.spacing_cm)
            && self.block_height_cm.map_or(true, |h| h == row.block_height_cm)
    }
}

// ============================================================================
// Result
// ============================================================================

/// A table row that covers the requested span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoistCandidate {
    pub reference: String,
    pub block_height_cm: u32,
    pub spacing_cm: u32,
    pub topping_cm: f64,
    /// Span allowed at the design load column (m)
    pub allowable_span_m: f64,
    /// requested / allowable (%)
    pub utilization_pct: f64,
    /// allowable − requested (m)
    pub reserve_m: f64,
    pub total_height_cm: f64,
}

/// Loads as used by the selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JoistLoads {
    pub permanent_kn_m2: f64,
    pub live_kn_m2: f64,
    /// g + q converted to the table unit
    pub total_kg_m2: f64,
    /// Table column used, if any covers the load
    pub design_column_kg_m2: Option<u32>,
}

/// Outcome of a span-table selection. A failed selection is data, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoistSelection {
    pub verification_ok: bool,
    pub message: String,
    pub requested_span_m: f64,
    pub policy: SelectionPolicy,
    pub loads: JoistLoads,
    pub joist: Option<JoistCandidate>,
    pub alternatives: Vec<JoistCandidate>,
    /// Rows that qualified, including the selected one
    pub candidate_count: usize,
}

impl JoistSelection {
    fn failed(request: &JoistRequest, loads: JoistLoads, message: String) -> Self {
        log::warn!("joist selection failed: {}", message);
        JoistSelection {
            verification_ok: false,
            message,
            requested_span_m: request.span_m,
            policy: request.policy,
            loads,
            joist: None,
            alternatives: Vec::new(),
            candidate_count: 0,
        }
    }
}

/// Select a joist from a span table.
///
/// Errors only on malformed requests (non-finite span, negative loads).
/// Out-of-range spans, loads beyond the table and tables with no fitting row
/// all return a selection with `verification_ok = false`.
pub fn select_joist(request: &JoistRequest, table: &SpanTable) -> CalcResult<JoistSelection> {
    request.validate()?;

    let total_kg = KgPerM2::from(KnPerM2(request.permanent_kn_m2 + request.live_kn_m2)).value();
    let mut loads = JoistLoads {
        permanent_kn_m2: request.permanent_kn_m2,
        live_kn_m2: request.live_kn_m2,
        total_kg_m2: total_kg,
        design_column_kg_m2: None,
    };

    if request.span_m <= 0.0 || request.span_m > MAX_SPAN_M {
        return Ok(JoistSelection::failed(
            request,
            loads,
            format!("Invalid span {} m: must be above 0 and at most {} m", request.span_m, MAX_SPAN_M),
        ));
    }
    if table.is_empty() {
        return Ok(JoistSelection::failed(request, loads, "Span table is empty".to_string()));
    }

    // Guard against 5.5 * 100 landing a hair above the 550 column
    let column = match table.design_column(total_kg - 1e-9) {
        Some(column) => column,
        None => {
            let largest = table.load_columns().into_iter().next_back().unwrap_or(0);
            return Ok(JoistSelection::failed(
                request,
                loads,
                format!(
                    "Load {:.0} kg/m² exceeds the largest table column ({} kg/m²)",
                    total_kg, largest
                ),
            ));
        }
    };
    loads.design_column_kg_m2 = Some(column);
    log::debug!("g + q = {:.0} kg/m², using the {} kg/m² column", total_kg, column);

    let mut candidates: Vec<JoistCandidate> = table
        .rows
        .iter()
        .filter(|row| request.accepts(row))
        .filter_map(|row| {
            let allowable = row.span_at(column as f64)?;
            (allowable >= request.span_m).then(|| JoistCandidate {
                reference: row.reference.clone(),
                block_height_cm: row.block_height_cm,
                spacing_cm: row.spacing_cm,
                topping_cm: row.topping_cm,
                allowable_span_m: allowable,
                utilization_pct: request.span_m / allowable * 100.0,
                reserve_m: allowable - request.span_m,
                total_height_cm: row.total_height_cm(),
            })
        })
        .collect();

    if candidates.is_empty() {
        return Ok(JoistSelection::failed(
            request,
            loads,
            format!(
                "No joist fits span {} m at {} kg/m²",
                request.span_m, column
            ),
        ));
    }

    candidates.sort_by(|a, b| request.policy.compare(a, b));
    let candidate_count = candidates.len();
    let mut ranked = candidates.into_iter();
    let best = ranked.next();
    let alternatives: Vec<JoistCandidate> = ranked.take(MAX_ALTERNATIVES).collect();

    let message = best.as_ref().map_or_else(String::new, |joist| {
        format!(
            "Joist {} + {} cm blocks at {} cm spacing, {:.0}% utilized",
            joist.reference, joist.block_height_cm, joist.spacing_cm, joist.utilization_pct
        )
    });
    log::info!("{} ({} candidates, {} policy)", message, candidate_count, request.policy);

    Ok(JoistSelection {
        verification_ok: true,
        message,
        requested_span_m: request.span_m,
        policy: request.policy,
        loads,
        joist: best,
        alternatives,
        candidate_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn row(reference: &str, block: u32, spacing: u32, spans: &[(u32, f64)]) -> SpanTableRow {
        SpanTableRow {
            reference: reference.to_string(),
            block_height_cm: block,
            spacing_cm: spacing,
            topping_cm: DEFAULT_TOPPING_CM,
            spans_m: spans.iter().copied().collect(),
        }
    }

    fn catalog() -> SpanTable {
        SpanTable::new(vec![
            row("BP113", 16, 60, &[(450, 5.7), (550, 5.4), (650, 5.1)]),
            row("BP114", 20, 60, &[(450, 6.4), (550, 6.1), (650, 5.8)]),
            row("BP112", 12, 60, &[(450, 4.9), (550, 4.6), (650, 4.3)]),
            row("BP113", 16, 50, &[(450, 6.0), (550, 5.7), (650, 5.4)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_economical_selects_tightest_fit() {
        let selection = select_joist(&JoistRequest::new(5.2, 3.0, 2.5), &catalog()).unwrap();
        assert!(selection.verification_ok);
        assert_eq!(selection.loads.design_column_kg_m2, Some(550));
        let joist = selection.joist.unwrap();
        assert_eq!(joist.reference, "BP113");
        assert_eq!(joist.spacing_cm, 60);
        assert_relative_eq!(joist.utilization_pct, 5.2 / 5.4 * 100.0, max_relative = 1e-12);
        assert_eq!(selection.candidate_count, 3);
        assert_eq!(selection.alternatives.len(), 2);
    }

    #[test]
    fn test_minimal_height_policy() {
        let request = JoistRequest::new(4.0, 3.0, 2.5).with_policy(SelectionPolicy::MinimalHeight);
        let selection = select_joist(&request, &catalog()).unwrap();
        // BP112 on 12 cm blocks: max(11, 12) + 5 = 17 cm
        let joist = selection.joist.unwrap();
        assert_eq!(joist.reference, "BP112");
        assert_eq!(joist.total_height_cm, 17.0);
    }

    #[test]
    fn test_maximal_reserve_policy() {
        let request = JoistRequest::new(4.0, 3.0, 2.5).with_policy(SelectionPolicy::MaximalReserve);
        let selection = select_joist(&request, &catalog()).unwrap();
        let joist = selection.joist.unwrap();
        assert_eq!(joist.reference, "BP114");
        assert_relative_eq!(joist.reserve_m, 2.1, max_relative = 1e-9);
    }

    #[test]
    fn test_alternatives_capped_at_three() {
        let mut rows = catalog().rows;
        rows.push(row("BP115", 25, 60, &[(550, 7.0)]));
        rows.push(row("BP116", 25, 70, &[(550, 7.5)]));
        let selection = select_joist(&JoistRequest::new(3.0, 3.0, 2.5), &SpanTable::new(rows).unwrap()).unwrap();
        assert_eq!(selection.candidate_count, 6);
        assert_eq!(selection.alternatives.len(), MAX_ALTERNATIVES);
    }

    #[test]
    fn test_filters() {
        let mut request = JoistRequest::new(5.2, 3.0, 2.5);
        request.spacing_cm = Some(50);
        let selection = select_joist(&request, &catalog()).unwrap();
        assert_eq!(selection.candidate_count, 1);
        assert_eq!(selection.joist.unwrap().spacing_cm, 50);

        request.spacing_cm = None;
        request.block_height_cm = Some(25);
        let none = select_joist(&request, &catalog()).unwrap();
        assert!(!none.verification_ok);
    }

    #[test]
    fn test_no_candidate_is_failed_result() {
        let table = SpanTable::new(vec![
            row("A", 16, 60, &[(450, 5.8), (550, 5.5)]),
            row("B", 20, 60, &[(450, 5.6), (550, 5.2)]),
        ])
        .unwrap();
        let selection = select_joist(&JoistRequest::new(6.0, 2.0, 1.5), &table).unwrap();
        assert!(!selection.verification_ok);
        assert_eq!(selection.candidate_count, 0);
        assert!(selection.joist.is_none());
        assert!(selection.message.contains("6 m"));
    }

    #[test]
    fn test_load_rounds_up_to_next_column() {
        // 4.6 kN/m² = 460 kg/m² -> 550 column, never 450
        let selection = select_joist(&JoistRequest::new(5.0, 2.6, 2.0), &catalog()).unwrap();
        assert_eq!(selection.loads.design_column_kg_m2, Some(550));
    }

    #[test]
    fn test_load_above_table_fails() {
        let selection = select_joist(&JoistRequest::new(4.0, 5.0, 2.5), &catalog()).unwrap();
        assert!(!selection.verification_ok);
        assert!(selection.loads.design_column_kg_m2.is_none());
        assert!(selection.message.contains("650"));
    }

    #[test]
    fn test_span_out_of_range() {
        for span in [0.0, -1.0, 12.5] {
            let selection = select_joist(&JoistRequest::new(span, 3.0, 2.5), &catalog()).unwrap();
            assert!(!selection.verification_ok);
        }
        assert!(select_joist(&JoistRequest::new(f64::NAN, 3.0, 2.5), &catalog()).is_err());
    }

    #[test]
    fn test_empty_table() {
        let selection = select_joist(&JoistRequest::new(4.0, 3.0, 2.5), &SpanTable::default()).unwrap();
        assert!(!selection.verification_ok);
        assert!(selection.message.contains("empty"));
    }

    #[test]
    fn test_interpolation_and_clamping() {
        let r = row("BP113", 16, 60, &[(450, 5.7), (650, 5.1)]);
        assert_relative_eq!(r.span_at(550.0).unwrap(), 5.4, max_relative = 1e-12);
        assert_eq!(r.span_at(300.0), Some(5.7));
        assert_eq!(r.span_at(800.0), Some(5.1));
        assert_eq!(r.span_at(650.0), Some(5.1));
    }

    #[test]
    fn test_interpolation_is_monotonic() {
        let r = row("BP113", 16, 60, &[(250, 6.6), (350, 6.2), (450, 5.7), (550, 5.4), (650, 5.1)]);
        let mut previous = f64::INFINITY;
        for load in (250..=650).step_by(10) {
            let span = r.span_at(load as f64).unwrap();
            assert!(span <= previous, "load {}", load);
            previous = span;
        }
    }

    #[test]
    fn test_row_from_other_column_set_is_interpolated() {
        // Row without the 550 column still competes at 550
        let table = SpanTable::new(vec![
            row("A", 16, 60, &[(550, 5.4)]),
            row("B", 16, 60, &[(500, 5.6), (600, 5.2)]),
        ])
        .unwrap();
        let selection = select_joist(&JoistRequest::new(5.3, 3.0, 2.5), &table).unwrap();
        assert_eq!(selection.candidate_count, 2);
        let b = selection.alternatives.iter().chain(selection.joist.iter()).find(|c| c.reference == "B").unwrap();
        assert_relative_eq!(b.allowable_span_m, 5.4, max_relative = 1e-12);
    }

    #[test]
    fn test_total_height() {
        assert_eq!(row("X", 16, 60, &[(450, 5.0)]).total_height_cm(), 21.0);
        assert_eq!(row("X", 25, 60, &[(450, 5.0)]).total_height_cm(), 30.0);
        // Unknown block height uses the default joist height
        assert_eq!(row("X", 8, 60, &[(450, 5.0)]).total_height_cm(), 18.0);
    }

    #[test]
    fn test_table_json_and_validation() {
        let table = SpanTable::from_json_str(
            r#"[{"reference": "BP113", "block_height_cm": 16, "spacing_cm": 60, "spans_m": {"550": 5.4}}]"#,
        )
        .unwrap();
        assert_eq!(table.rows[0].topping_cm, DEFAULT_TOPPING_CM);
        assert_eq!(table.rows[0].spans_m.get(&550), Some(&5.4));

        let blank = SpanTable::from_json_str(
            r#"[{"reference": " ", "block_height_cm": 16, "spacing_cm": 60, "spans_m": {"550": 5.4}}]"#,
        )
        .unwrap_err();
        assert_eq!(blank.error_code(), "MISSING_FIELD");

        let negative = SpanTable::from_json_str(
            r#"[{"reference": "BP113", "block_height_cm": 16, "spacing_cm": 60, "spans_m": {"550": -5.4}}]"#,
        )
        .unwrap_err();
        assert_eq!(negative.error_code(), "INVALID_INPUT");

        let malformed = SpanTable::from_json_str("{").unwrap_err();
        assert_eq!(malformed.error_code(), "SERIALIZATION_ERROR");
    }
}
