//! Report variants and their static configurations.

use crate::aggregate::UomBucket;
use crate::error::ReportError;
use crate::record::{ColumnSpec, ValueKind};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use ValueKind::{Date as D, Float as F, String as S};

/// The supported warehouse reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Reception,
    Dispatch,
    Packaging,
    Storage,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::Reception,
        ReportKind::Dispatch,
        ReportKind::Packaging,
        ReportKind::Storage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Reception => "reception",
            ReportKind::Dispatch => "dispatch",
            ReportKind::Packaging => "packaging",
            ReportKind::Storage => "storage",
        }
    }

    /// The static configuration for this report.
    pub fn config(self) -> &'static ReportConfig {
        match self {
            ReportKind::Reception => &RECEPTION,
            ReportKind::Dispatch => &DISPATCH,
            ReportKind::Packaging => &PACKAGING,
            ReportKind::Storage => &STORAGE,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| ReportError::UnknownReport(s.to_string()))
    }
}

/// Status whitelist applied to one field.
#[derive(Debug, Clone, Copy)]
pub struct StatusRule {
    pub field: &'static str,
    pub allowed: &'static [&'static str],
}

/// Where an output column takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSource {
    /// A field of the group's first member.
    Field(&'static str),
    /// The group's display date.
    Date,
    /// One quantity bucket.
    Bucket(UomBucket),
}

/// One column of the output table.
#[derive(Debug, Clone, Copy)]
pub struct OutputColumn {
    pub header: &'static str,
    pub source: ColumnSource,
}

const fn field(header: &'static str) -> OutputColumn {
    OutputColumn {
        header,
        source: ColumnSource::Field(header),
    }
}

const fn bucket(header: &'static str, bucket: UomBucket) -> OutputColumn {
    OutputColumn {
        header,
        source: ColumnSource::Bucket(bucket),
    }
}

const fn date(header: &'static str) -> OutputColumn {
    OutputColumn {
        header,
        source: ColumnSource::Date,
    }
}

/// Everything that distinguishes one report from another.
#[derive(Debug)]
pub struct ReportConfig {
    pub kind: ReportKind,
    pub schema: &'static [ColumnSpec],
    /// Grouping key; the first is the primary key.
    pub key_fields: (&'static str, &'static str),
    pub status: Option<StatusRule>,
    pub date_field: Option<&'static str>,
    pub quantity_field: Option<&'static str>,
    pub uom_field: Option<&'static str>,
    pub output: &'static [OutputColumn],
    /// Label for the primary key in messages, e.g. "receipts".
    pub primary_label: &'static str,
    /// Whether results include every row by default.
    pub full_rows_by_default: bool,
}

impl ReportConfig {
    /// Output headers in order.
    pub fn headers(&self) -> Vec<String> {
        self.output.iter().map(|c| c.header.to_string()).collect()
    }

    /// Key field names as a slice.
    pub fn key_field_list(&self) -> [&'static str; 2] {
        [self.key_fields.0, self.key_fields.1]
    }
}

pub static RECEPTION: ReportConfig = ReportConfig {
    kind: ReportKind::Reception,
    schema: &[
        ColumnSpec::new("RECEIPTKEY", "C", S),
        ColumnSpec::new("SKU", "D", S),
        ColumnSpec::new("STORERKEY", "E", S),
        ColumnSpec::new("QTYRECEIVED", "H", F),
        ColumnSpec::new("UOM", "I", S),
        ColumnSpec::new("STATUS", "O", S),
        ColumnSpec::new("DATERECEIVED", "AH", D),
        ColumnSpec::new("EXTERNRECEIPTKEY", "AN", S),
    ],
    key_fields: ("RECEIPTKEY", "SKU"),
    status: Some(StatusRule {
        field: "STATUS",
        allowed: &["11", "15"],
    }),
    date_field: Some("DATERECEIVED"),
    quantity_field: Some("QTYRECEIVED"),
    uom_field: Some("UOM"),
    output: &[
        field("RECEIPTKEY"),
        field("SKU"),
        field("STORERKEY"),
        bucket("UNIDADES", UomBucket::Units),
        bucket("CAJAS", UomBucket::Boxes),
        bucket("PALLETS", UomBucket::Pallets),
        field("STATUS"),
        date("DATERECEIVED"),
        field("EXTERNRECEIPTKEY"),
    ],
    primary_label: "receipts",
    full_rows_by_default: false,
};

pub static DISPATCH: ReportConfig = ReportConfig {
    kind: ReportKind::Dispatch,
    schema: &[
        ColumnSpec::new("ORDERKEY", "C", S),
        ColumnSpec::new("SKU", "D", S),
        ColumnSpec::new("STORERKEY", "E", S),
        ColumnSpec::new("EXTERNORDERKEY", "F", S),
        ColumnSpec::new("TYPE", "G", S),
        ColumnSpec::new("UOM", "I", S),
        ColumnSpec::new("SHIPPEDQTY", "O", F),
        ColumnSpec::new("STATUS", "P", S),
        ColumnSpec::new("ADDDATE", "CN", D),
    ],
    key_fields: ("ORDERKEY", "SKU"),
    status: Some(StatusRule {
        field: "STATUS",
        allowed: &["55", "92", "95"],
    }),
    date_field: Some("ADDDATE"),
    quantity_field: Some("SHIPPEDQTY"),
    uom_field: Some("UOM"),
    output: &[
        field("ORDERKEY"),
        field("SKU"),
        field("STORERKEY"),
        field("EXTERNORDERKEY"),
        bucket("UNIDADES", UomBucket::Units),
        bucket("CAJAS", UomBucket::Boxes),
        bucket("PALLETS", UomBucket::Pallets),
        field("STATUS"),
        date("ADDDATE"),
        field("TYPE"),
    ],
    primary_label: "orders",
    full_rows_by_default: true,
};

pub static PACKAGING: ReportConfig = ReportConfig {
    kind: ReportKind::Packaging,
    schema: &[
        ColumnSpec::new("ID_PAQUETE", "A", S),
        ColumnSpec::new("TIPO", "B", S),
        ColumnSpec::new("PESO", "C", F),
        ColumnSpec::new("VOLUMEN", "D", F),
        ColumnSpec::new("DIMENSIONES", "E", S),
        ColumnSpec::new("ESTADO", "F", S),
    ],
    key_fields: ("ID_PAQUETE", "TIPO"),
    status: None,
    date_field: None,
    quantity_field: None,
    uom_field: None,
    output: &[
        field("ID_PAQUETE"),
        field("TIPO"),
        field("PESO"),
        field("VOLUMEN"),
        field("DIMENSIONES"),
        field("ESTADO"),
    ],
    primary_label: "packages",
    full_rows_by_default: false,
};

pub static STORAGE: ReportConfig = ReportConfig {
    kind: ReportKind::Storage,
    schema: &[
        ColumnSpec::new("CODIGO", "A", S),
        ColumnSpec::new("PRODUCTO", "B", S),
        ColumnSpec::new("UBICACION", "C", S),
        ColumnSpec::new("STOCK", "D", F),
        ColumnSpec::new("STOCK_MIN", "E", F),
        ColumnSpec::new("STOCK_MAX", "F", F),
        ColumnSpec::new("VALOR", "G", F),
    ],
    key_fields: ("CODIGO", "UBICACION"),
    status: None,
    date_field: None,
    quantity_field: Some("STOCK"),
    uom_field: None,
    output: &[
        field("CODIGO"),
        field("PRODUCTO"),
        field("UBICACION"),
        bucket("STOCK", UomBucket::Units),
        field("STOCK_MIN"),
        field("STOCK_MAX"),
        field("VALOR"),
    ],
    primary_label: "products",
    full_rows_by_default: false,
};
