//! Composite-key grouping with unit-of-measure buckets.

use crate::date::DatePair;
use crate::diagnostics::{Diagnostics, Warning};
use crate::quantity::try_parse_integer;
use crate::record::Record;
use indexmap::IndexMap;
use serde::Serialize;
use wmsreport_sheet::CellValue;

/// Output bucket selected by a group's unit of measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UomBucket {
    Units,
    Boxes,
    Pallets,
}

impl UomBucket {
    /// Map a UOM code; unknown codes count as units.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "CJ" => UomBucket::Boxes,
            "PL" => UomBucket::Pallets,
            _ => UomBucket::Units,
        }
    }
}

/// One output row: every record sharing a composite key.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: String,
    /// First member; pass-through fields are read from it.
    pub first: Record,
    pub bucket: UomBucket,
    pub units: i64,
    pub boxes: i64,
    pub pallets: i64,
    /// Most recent resolved member date, or the first member's raw date.
    pub date: Option<DatePair>,
    pub member_count: usize,
}

impl Group {
    /// Sum across all three buckets.
    pub fn total_quantity(&self) -> i64 {
        self.units
            .saturating_add(self.boxes)
            .saturating_add(self.pallets)
    }

    /// Quantity in one bucket.
    pub fn bucket_total(&self, bucket: UomBucket) -> i64 {
        match bucket {
            UomBucket::Units => self.units,
            UomBucket::Boxes => self.boxes,
            UomBucket::Pallets => self.pallets,
        }
    }
}

/// Field names the aggregator reads from each record.
#[derive(Debug, Clone, Copy)]
pub struct GroupAggregator<'a> {
    pub key_fields: (&'a str, &'a str),
    pub quantity: Option<&'a str>,
    pub uom: Option<&'a str>,
    pub date: Option<&'a str>,
}

impl GroupAggregator<'_> {
    /// Composite key of a record: `key0 + "_" + key1`.
    pub fn composite_key(&self, record: &Record) -> String {
        format!(
            "{}_{}",
            record.text(self.key_fields.0),
            record.text(self.key_fields.1)
        )
    }

    /// Group records in first-seen key order.
    pub fn aggregate(&self, records: Vec<Record>, diagnostics: &mut Diagnostics) -> Vec<Group> {
        let input = records.len();
        let mut groups: IndexMap<String, Group> = IndexMap::new();

        for record in records {
            let quantity = self.quantity_of(&record, diagnostics);
            let member_date = self.date.and_then(|field| record.date(field)).cloned();
            let key = self.composite_key(&record);

            let group = groups.entry(key).or_insert_with_key(|key| {
                let bucket = self
                    .uom
                    .map(|field| UomBucket::from_code(&record.text(field)))
                    .unwrap_or(UomBucket::Units);
                Group {
                    key: key.clone(),
                    first: record.clone(),
                    bucket,
                    units: 0,
                    boxes: 0,
                    pallets: 0,
                    date: member_date.clone(),
                    member_count: 0,
                }
            });

            // Quantities saturate at the i64 bounds
            let total = match group.bucket {
                UomBucket::Units => &mut group.units,
                UomBucket::Boxes => &mut group.boxes,
                UomBucket::Pallets => &mut group.pallets,
            };
            *total = total.saturating_add(quantity);
            group.member_count += 1;

            if let Some(candidate) = member_date.filter(DatePair::is_resolved) {
                let newer = match group.date.as_ref().and_then(|d| d.iso_key.as_deref()) {
                    Some(current) => candidate.iso_key.as_deref() > Some(current),
                    None => true,
                };
                if newer {
                    group.date = Some(candidate);
                }
            }
        }

        tracing::info!("Grouped {} records into {} groups", input, groups.len());
        groups.into_values().collect()
    }

    fn quantity_of(&self, record: &Record, diagnostics: &mut Diagnostics) -> i64 {
        let Some(field) = self.quantity else {
            return 0;
        };
        let raw = record.cell(field).unwrap_or(&CellValue::Null);
        match try_parse_integer(raw) {
            Ok(quantity) => quantity,
            Err(err) => {
                diagnostics.push(Warning::QuantityParseFailure {
                    row: record.row,
                    value: err.0,
                });
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;
    use chrono::NaiveDate;

    const AGGREGATOR: GroupAggregator<'static> = GroupAggregator {
        key_fields: ("KEY", "SKU"),
        quantity: Some("QTY"),
        uom: Some("UOM"),
        date: Some("DATE"),
    };

    fn record(row: usize, key: &str, sku: &str, qty: &str, uom: &str, date: DatePair) -> Record {
        Record::new(row)
            .with_field("KEY", FieldValue::Cell(key.into()))
            .with_field("SKU", FieldValue::Cell(sku.into()))
            .with_field("QTY", FieldValue::Cell(qty.into()))
            .with_field("UOM", FieldValue::Cell(uom.into()))
            .with_field("DATE", FieldValue::Date(date))
    }

    fn day(d: u32) -> DatePair {
        DatePair::resolved(NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
    }

    #[test]
    fn test_uom_bucket_codes() {
        assert_eq!(UomBucket::from_code("UN"), UomBucket::Units);
        assert_eq!(UomBucket::from_code(" cj "), UomBucket::Boxes);
        assert_eq!(UomBucket::from_code("PL"), UomBucket::Pallets);
        assert_eq!(UomBucket::from_code("KG"), UomBucket::Units);
        assert_eq!(UomBucket::from_code(""), UomBucket::Units);
    }

    #[test]
    fn test_groups_in_first_seen_order() {
        let records = vec![
            record(2, "R2", "A", "1", "UN", day(1)),
            record(3, "R1", "A", "2", "UN", day(1)),
            record(4, "R2", "A", "3", "UN", day(1)),
            record(5, "R1", "B", "4", "UN", day(1)),
        ];
        let groups = AGGREGATOR.aggregate(records, &mut Diagnostics::new());
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["R2_A", "R1_A", "R1_B"]);
        assert_eq!(groups[0].units, 4);
        assert_eq!(groups[0].member_count, 2);
        assert_eq!(groups[0].first.row, 2);
    }

    #[test]
    fn test_first_member_uom_selects_bucket() {
        let records = vec![
            record(2, "R1", "A", "144,00000", "cj", day(1)),
            record(3, "R1", "A", "6,5", "UN", day(1)),
        ];
        let groups = AGGREGATOR.aggregate(records, &mut Diagnostics::new());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].bucket, UomBucket::Boxes);
        assert_eq!((groups[0].units, groups[0].boxes, groups[0].pallets), (0, 150, 0));
    }

    #[test]
    fn test_bucket_sum_matches_member_quantities() {
        let quantities = ["10,0", "1.234,5", "n/a", "7", ""];
        let records: Vec<Record> = quantities
            .iter()
            .enumerate()
            .map(|(i, q)| record(i + 2, "R1", if i % 2 == 0 { "A" } else { "B" }, q, "PL", day(1)))
            .collect();
        let expected: i64 = records
            .iter()
            .map(|r| crate::quantity::parse_integer(r.cell("QTY").unwrap()))
            .sum();

        let mut diagnostics = Diagnostics::new();
        let groups = AGGREGATOR.aggregate(records, &mut diagnostics);
        let actual: i64 = groups.iter().map(Group::total_quantity).sum();

        assert_eq!(actual, expected);
        assert_eq!(actual, 10 + 1234 + 7);
        assert_eq!(diagnostics.quantity_failures(), 1);
    }

    #[test]
    fn test_huge_quantities_saturate() {
        let huge = |row: usize| {
            record(row, "P1", "A", "", "UN", day(1))
                .with_field("QTY", FieldValue::Cell(CellValue::Float(1e19)))
        };
        let groups = AGGREGATOR.aggregate(vec![huge(2), huge(3)], &mut Diagnostics::new());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].units, i64::MAX);
        assert_eq!(groups[0].total_quantity(), i64::MAX);
    }

    #[test]
    fn test_most_recent_date_wins() {
        let records = vec![
            record(2, "R1", "A", "1", "UN", DatePair::unresolved("pending")),
            record(3, "R1", "A", "1", "UN", day(5)),
            record(4, "R1", "A", "1", "UN", day(20)),
            record(5, "R1", "A", "1", "UN", day(9)),
        ];
        let groups = AGGREGATOR.aggregate(records, &mut Diagnostics::new());
        assert_eq!(groups[0].date, Some(day(20)));
    }

    #[test]
    fn test_unresolved_group_date_falls_back_to_first_member() {
        let records = vec![
            record(2, "R1", "A", "1", "UN", DatePair::unresolved("pending")),
            record(3, "R1", "A", "1", "UN", DatePair::unresolved("later")),
        ];
        let groups = AGGREGATOR.aggregate(records, &mut Diagnostics::new());
        assert_eq!(groups[0].date, Some(DatePair::unresolved("pending")));
    }

    #[test]
    fn test_without_quantity_or_uom() {
        let aggregator = GroupAggregator {
            key_fields: ("KEY", "SKU"),
            quantity: None,
            uom: None,
            date: None,
        };
        let records = vec![record(2, "P1", "BOX", "9", "PL", day(1))];
        let groups = aggregator.aggregate(records, &mut Diagnostics::new());
        assert_eq!(groups[0].bucket, UomBucket::Units);
        assert_eq!(groups[0].total_quantity(), 0);
        assert_eq!(groups[0].date, None);
    }
}
