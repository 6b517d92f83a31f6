//! Status whitelist and date range filtering.

use crate::date::bound_date_part;
use crate::diagnostics::{Diagnostics, Warning};
use crate::record::Record;
use serde::Serialize;

/// Counters accumulated across both filters in one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterStats {
    pub rejected_by_date: usize,
    pub rejected_by_status: usize,
    /// Earliest resolved date before date filtering.
    pub iso_min: Option<String>,
    /// Latest resolved date before date filtering.
    pub iso_max: Option<String>,
}

/// Keeps records whose trimmed status is whitelisted.
#[derive(Debug, Clone, Copy)]
pub struct StatusFilter<'a> {
    field: &'a str,
    allowed: &'a [&'a str],
}

impl<'a> StatusFilter<'a> {
    pub fn new(field: &'a str, allowed: &'a [&'a str]) -> Self {
        Self { field, allowed }
    }

    /// Split off rejected records, returning the kept ones and the rejected count.
    ///
    /// A record without the status field is rejected.
    pub fn filter(&self, records: Vec<Record>) -> (Vec<Record>, usize) {
        let before = records.len();
        let kept: Vec<Record> = records
            .into_iter()
            .filter(|record| match record.get(self.field) {
                Some(value) => {
                    let status = value.as_text();
                    self.allowed.contains(&status.trim())
                }
                None => false,
            })
            .collect();
        let rejected = before - kept.len();

        tracing::info!(
            "Status filter on {} kept {} of {} records",
            self.field,
            kept.len(),
            before
        );
        (kept, rejected)
    }
}

/// Bounds a date field to an inclusive ISO range.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateRangeFilter {
    from: Option<String>,
    to: Option<String>,
}

impl DateRangeFilter {
    /// Build a filter from caller-supplied bounds.
    ///
    /// A time component is dropped from each bound. A bound that is not
    /// `yyyy-mm-dd` is ignored and reported.
    pub fn new(from: Option<&str>, to: Option<&str>, diagnostics: &mut Diagnostics) -> Self {
        Self {
            from: validate_bound("from", from, diagnostics),
            to: validate_bound("to", to, diagnostics),
        }
    }

    /// The lower bound as applied.
    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    /// The upper bound as applied.
    pub fn to(&self) -> Option<&str> {
        self.to.as_deref()
    }

    /// Whether any bound is in effect.
    pub fn is_active(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// Whether a date key passes the bounds.
    pub fn accepts(&self, iso_key: Option<&str>) -> bool {
        if !self.is_active() {
            return true;
        }
        let Some(key) = iso_key else {
            return false;
        };
        self.from.as_deref().is_none_or(|from| key >= from)
            && self.to.as_deref().is_none_or(|to| key <= to)
    }

    /// Filter `records` on `field`, recording min/max and rejections in `stats`.
    ///
    /// Min and max cover every resolved date before filtering. Records with
    /// an unresolved date are dropped only when a bound is active.
    pub fn filter(&self, records: Vec<Record>, field: &str, stats: &mut FilterStats) -> Vec<Record> {
        for key in records
            .iter()
            .filter_map(|r| r.date(field).and_then(|d| d.iso_key.as_deref()))
        {
            if stats.iso_min.as_deref().is_none_or(|min| key < min) {
                stats.iso_min = Some(key.to_string());
            }
            if stats.iso_max.as_deref().is_none_or(|max| key > max) {
                stats.iso_max = Some(key.to_string());
            }
        }

        if !self.is_active() {
            return records;
        }

        let before = records.len();
        let kept: Vec<Record> = records
            .into_iter()
            .filter(|r| self.accepts(r.date(field).and_then(|d| d.iso_key.as_deref())))
            .collect();
        stats.rejected_by_date += before - kept.len();

        tracing::info!(
            "Date filter [{} .. {}] kept {} of {} records",
            self.from.as_deref().unwrap_or("*"),
            self.to.as_deref().unwrap_or("*"),
            kept.len(),
            before
        );
        kept
    }
}

fn validate_bound(name: &str, bound: Option<&str>, diagnostics: &mut Diagnostics) -> Option<String> {
    let raw = bound?.trim();
    if raw.is_empty() {
        return None;
    }
    match bound_date_part(raw) {
        Some(date) => Some(date.to_string()),
        None => {
            diagnostics.push(Warning::InvalidDateBound {
                bound: name.to_string(),
                value: raw.to_string(),
            });
            None
        }
    }
}
