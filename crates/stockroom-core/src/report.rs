//! # Report Aggregation
//!
//! Read-side filtering, grouping, and summary computation over already-loaded
//! snapshots of the three collections. Everything here is a pure function:
//! the caller supplies the snapshots and the current local time, and nothing
//! is ever mutated.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Report Pipeline                               │
//! │                                                                     │
//! │  products ─┐                                                        │
//! │  people   ─┼─► ReportFilter ─► InventoryReport                      │
//! │  logs     ─┘      │                 │                               │
//! │                   │                 ├── filtered logs (desc)        │
//! │   period ∈ {all,  │                 ├── count / quantity sum        │
//! │   last-N, range}  │                 ├── low-stock / out-of-stock    │
//! │   + product id    │                 └── whole-inventory valuation   │
//! │   + person id     │                                                 │
//! │   (AND-composed)  └─► ReportExport (summary + Date/Product/SKU/     │
//! │                       Quantity/Recipient Person/Person Contact)     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Date Semantics
//! All windows are evaluated in local wall-clock terms and are inclusive:
//! - last N days  = [today − N at 00:00:00, today 23:59:59]
//! - explicit range = [start 00:00:00, end 23:59:59]
//! - a range with only a start bound extends to the end of the current day

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{OutputLog, Person, Product};
use crate::{LOW_STOCK_THRESHOLD, MISSING_CONTACT_PLACEHOLDER, MISSING_RECORD_PLACEHOLDER};

/// Column order of the report export detail table. Fixed contract consumed by
/// the external formatter.
pub const EXPORT_COLUMNS: [&str; 6] = [
    "Date",
    "Product",
    "SKU",
    "Quantity",
    "Recipient Person",
    "Person Contact",
];

// =============================================================================
// Filter
// =============================================================================

/// Date window selection for a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// No date restriction.
    All,
    /// The last N days up to and including today.
    LastDays(i64),
    /// Explicit calendar range. `end = None` extends to the current day.
    Range {
        start: NaiveDate,
        end: Option<NaiveDate>,
    },
}

impl Default for Period {
    fn default() -> Self {
        Period::All
    }
}

/// Report filter. Fields compose with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportFilter {
    /// Date window over log timestamps.
    pub period: Period,
    /// Restrict to outputs of a single product.
    pub product_id: Option<String>,
    /// Restrict to outputs handed to a single person.
    pub person_id: Option<String>,
}

impl ReportFilter {
    /// A filter matching every log.
    pub fn all() -> Self {
        ReportFilter::default()
    }

    /// Restricts the date window to the last `days` days.
    pub fn last_days(mut self, days: i64) -> Self {
        self.period = Period::LastDays(days);
        self
    }

    /// Restricts the date window to an explicit range.
    pub fn range(mut self, start: NaiveDate, end: Option<NaiveDate>) -> Self {
        self.period = Period::Range { start, end };
        self
    }

    /// Restricts to a single product.
    pub fn for_product(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    /// Restricts to a single person.
    pub fn for_person(mut self, person_id: impl Into<String>) -> Self {
        self.person_id = Some(person_id.into());
        self
    }

    fn matches(&self, log: &OutputLog, window: &Option<(NaiveDateTime, NaiveDateTime)>) -> bool {
        if let Some((start, end_exclusive)) = window {
            let ts = log.timestamp.with_timezone(&Local).naive_local();
            if ts < *start || ts >= *end_exclusive {
                return false;
            }
        }
        if let Some(product_id) = &self.product_id {
            if &log.product_id != product_id {
                return false;
            }
        }
        if let Some(person_id) = &self.person_id {
            if &log.person_id != person_id {
                return false;
            }
        }
        true
    }
}

/// Resolves the period to a half-open local window `[start, end_exclusive)`.
///
/// Inclusive "end 23:59:59" is realized as "before the next day's midnight",
/// which also admits sub-second timestamps inside the final second.
fn resolve_window(period: &Period, today: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start_of = |d: NaiveDate| d.and_time(NaiveTime::MIN);
    let after_end_of = |d: NaiveDate| (d + Duration::days(1)).and_time(NaiveTime::MIN);

    match period {
        Period::All => None,
        Period::LastDays(days) => {
            Some((start_of(today - Duration::days(*days)), after_end_of(today)))
        }
        Period::Range { start, end } => {
            Some((start_of(*start), after_end_of(end.unwrap_or(today))))
        }
    }
}

// =============================================================================
// Report
// =============================================================================

/// A product flagged for replenishment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockItem {
    pub product: Product,
    /// Set when quantity is at or below half the low-stock threshold.
    pub critical: bool,
}

/// The aggregated report over a snapshot of the three collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryReport {
    /// Logs matching the filter, most recent first.
    pub logs: Vec<OutputLog>,
    /// Number of filtered logs.
    pub output_count: usize,
    /// Sum of quantities over the filtered logs.
    pub output_quantity: i64,
    /// Products with `0 < quantity < LOW_STOCK_THRESHOLD`, ascending by
    /// quantity.
    pub low_stock: Vec<LowStockItem>,
    /// Products with zero stock.
    pub out_of_stock: Vec<Product>,
    /// Whole-inventory valuation: Σ quantity × price over ALL products.
    /// Deliberately unfiltered - this is an inventory metric, not a
    /// report-window one.
    pub inventory_value: Money,
}

impl InventoryReport {
    /// Builds the report. `now` is the caller's local clock; passing it in
    /// keeps this function deterministic and testable.
    pub fn build(
        products: &[Product],
        logs: &[OutputLog],
        filter: &ReportFilter,
        now: DateTime<Local>,
    ) -> Self {
        let window = resolve_window(&filter.period, now.date_naive());

        let mut filtered: Vec<OutputLog> = logs
            .iter()
            .filter(|log| filter.matches(log, &window))
            .cloned()
            .collect();
        filtered.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let output_count = filtered.len();
        let output_quantity = filtered.iter().map(|log| log.quantity).sum();

        let mut low_stock: Vec<LowStockItem> = products
            .iter()
            .filter(|p| p.quantity > 0 && p.quantity < LOW_STOCK_THRESHOLD)
            .map(|p| LowStockItem {
                critical: p.quantity <= LOW_STOCK_THRESHOLD / 2,
                product: p.clone(),
            })
            .collect();
        low_stock.sort_by_key(|item| item.product.quantity);

        let out_of_stock: Vec<Product> = products
            .iter()
            .filter(|p| p.quantity == 0)
            .cloned()
            .collect();

        let inventory_value = products.iter().map(Product::stock_value).sum();

        InventoryReport {
            logs: filtered,
            output_count,
            output_quantity,
            low_stock,
            out_of_stock,
            inventory_value,
        }
    }
}

// =============================================================================
// Export
// =============================================================================

/// Summary block of a report export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Human-readable period description.
    pub period: String,
    /// Name of the filtered product, or "All".
    pub product_filter: String,
    /// Name of the filtered person, or "All".
    pub person_filter: String,
    /// Number of logs in the export.
    pub output_count: usize,
    /// Sum of quantities over the exported logs.
    pub output_quantity: i64,
}

/// One detail row, matching [`EXPORT_COLUMNS`] one field per column.
///
/// Product and Recipient Person come from the log's name snapshots; SKU and
/// Contact are looked up from the current records at export time and fall back
/// to a placeholder when the referenced record no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub date: String,
    pub product: String,
    pub sku: String,
    pub quantity: i64,
    pub person: String,
    pub contact: String,
}

/// A report export: summary block plus the detail table. CSV text rendering
/// is the consumer's job; this type fixes the structure and column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportExport {
    pub summary: ReportSummary,
    pub rows: Vec<ExportRow>,
}

impl ReportExport {
    /// Builds the export for the given filter. Rows correspond one-to-one
    /// with the filtered logs, most recent first.
    pub fn build(
        products: &[Product],
        people: &[Person],
        logs: &[OutputLog],
        filter: &ReportFilter,
        now: DateTime<Local>,
    ) -> Self {
        let report = InventoryReport::build(products, logs, filter, now);

        let find_product = |id: &str| products.iter().find(|p| p.id == id);
        let find_person = |id: &str| people.iter().find(|p| p.id == id);

        let rows = report
            .logs
            .iter()
            .map(|log| ExportRow {
                date: log
                    .timestamp
                    .with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string(),
                product: log.product_name.clone(),
                sku: find_product(&log.product_id)
                    .map(|p| p.sku.clone())
                    .unwrap_or_else(|| MISSING_RECORD_PLACEHOLDER.to_string()),
                quantity: log.quantity,
                person: log.person_name.clone(),
                contact: find_person(&log.person_id)
                    .and_then(|p| p.contact_info.clone())
                    .unwrap_or_else(|| MISSING_CONTACT_PLACEHOLDER.to_string()),
            })
            .collect();

        let product_filter = match &filter.product_id {
            Some(id) => find_product(id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| MISSING_RECORD_PLACEHOLDER.to_string()),
            None => "All".to_string(),
        };
        let person_filter = match &filter.person_id {
            Some(id) => find_person(id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| MISSING_RECORD_PLACEHOLDER.to_string()),
            None => "All".to_string(),
        };

        ReportExport {
            summary: ReportSummary {
                period: describe_period(&filter.period),
                product_filter,
                person_filter,
                output_count: report.output_count,
                output_quantity: report.output_quantity,
            },
            rows,
        }
    }
}

fn describe_period(period: &Period) -> String {
    match period {
        Period::All => "all time".to_string(),
        Period::LastDays(days) => format!("last {days} days"),
        Period::Range {
            start,
            end: Some(end),
        } => format!("{start} to {end}"),
        Period::Range { start, end: None } => format!("from {start}"),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).unwrap()
    }

    fn local_ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn product(id: &str, sku: &str, name: &str, quantity: i64, price_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            sku: sku.to_string(),
            name: name.to_string(),
            description: String::new(),
            quantity,
            price_cents,
            image_ref: None,
        }
    }

    fn person(id: &str, name: &str, contact: Option<&str>) -> Person {
        Person {
            id: id.to_string(),
            name: name.to_string(),
            contact_info: contact.map(str::to_string),
        }
    }

    fn log(id: &str, product_id: &str, person_id: &str, quantity: i64, ts: DateTime<Utc>) -> OutputLog {
        OutputLog {
            id: id.to_string(),
            product_id: product_id.to_string(),
            product_name: format!("name-of-{product_id}"),
            person_id: person_id.to_string(),
            person_name: format!("name-of-{person_id}"),
            quantity,
            timestamp: ts,
        }
    }

    #[test]
    fn test_last_days_window_is_inclusive() {
        let logs = vec![
            // Exactly at the window start: day (today - 7) at 00:00:00.
            log("a", "p1", "x1", 1, local_ts(2026, 8, 13, 0, 0, 0)),
            // Late today.
            log("b", "p1", "x1", 2, local_ts(2026, 8, 20, 23, 59, 59)),
            // One second before the window opens.
            log("c", "p1", "x1", 4, local_ts(2026, 8, 12, 23, 59, 59)),
        ];

        let filter = ReportFilter::all().last_days(7);
        let report = InventoryReport::build(&[], &logs, &filter, now());

        let ids: Vec<&str> = report.logs.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(report.output_count, 2);
        assert_eq!(report.output_quantity, 3);
    }

    #[test]
    fn test_explicit_range_inclusive_and_start_only() {
        let logs = vec![
            log("a", "p1", "x1", 1, local_ts(2026, 8, 1, 0, 0, 0)),
            log("b", "p1", "x1", 1, local_ts(2026, 8, 5, 23, 59, 59)),
            log("c", "p1", "x1", 1, local_ts(2026, 8, 6, 0, 0, 0)),
        ];

        let range = ReportFilter::all().range(
            NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            Some(NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()),
        );
        let report = InventoryReport::build(&[], &logs, &range, now());
        let ids: Vec<&str> = report.logs.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        // Start-only range runs through the end of the current day.
        let open = ReportFilter::all().range(NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(), None);
        let report = InventoryReport::build(&[], &logs, &open, now());
        let ids: Vec<&str> = report.logs.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["c"]);
    }

    #[test]
    fn test_filters_compose_with_and() {
        let ts = local_ts(2026, 8, 19, 10, 0, 0);
        let logs = vec![
            log("a", "p1", "x1", 1, ts),
            log("b", "p1", "x2", 1, ts),
            log("c", "p2", "x1", 1, ts),
        ];

        let filter = ReportFilter::all().for_product("p1").for_person("x1");
        let report = InventoryReport::build(&[], &logs, &filter, now());
        assert_eq!(report.logs.len(), 1);
        assert_eq!(report.logs[0].id, "a");
    }

    #[test]
    fn test_logs_sorted_most_recent_first() {
        let logs = vec![
            log("old", "p1", "x1", 1, local_ts(2026, 8, 10, 9, 0, 0)),
            log("new", "p1", "x1", 1, local_ts(2026, 8, 19, 9, 0, 0)),
            log("mid", "p1", "x1", 1, local_ts(2026, 8, 15, 9, 0, 0)),
        ];
        let report = InventoryReport::build(&[], &logs, &ReportFilter::all(), now());
        let ids: Vec<&str> = report.logs.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_non_overlapping_windows_partition_all_time() {
        // Logs spread over a month, same product/person filter throughout.
        let logs: Vec<OutputLog> = (1..=20)
            .map(|d| {
                log(
                    &format!("l{d}"),
                    "p1",
                    "x1",
                    1,
                    local_ts(2026, 8, d, 12, 0, 0),
                )
            })
            .collect();

        let base = ReportFilter::all().for_product("p1");
        let split = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();

        let first = base.clone().range(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(), Some(split));
        let second = base
            .clone()
            .range(split + Duration::days(1), Some(NaiveDate::from_ymd_opt(2026, 8, 20).unwrap()));

        let all = InventoryReport::build(&[], &logs, &base, now());
        let a = InventoryReport::build(&[], &logs, &first, now());
        let b = InventoryReport::build(&[], &logs, &second, now());

        let mut union: Vec<String> = a
            .logs
            .iter()
            .chain(b.logs.iter())
            .map(|l| l.id.clone())
            .collect();
        union.sort();
        union.dedup();

        let mut expected: Vec<String> = all.logs.iter().map(|l| l.id.clone()).collect();
        expected.sort();

        assert_eq!(union, expected);
        assert_eq!(a.logs.len() + b.logs.len(), all.logs.len());
    }

    #[test]
    fn test_low_stock_and_out_of_stock_boundaries() {
        let products = vec![
            product("p0", "S0", "Empty", 0, 100),
            product("p2", "S2", "Critical", 2, 100),
            product("p3", "S3", "Low", 3, 100),
            product("p4", "S4", "Low4", 4, 100),
            product("p5", "S5", "AtThreshold", 5, 100),
            product("p9", "S9", "Plenty", 9, 100),
        ];

        let report = InventoryReport::build(&products, &[], &ReportFilter::all(), now());

        let low: Vec<(&str, bool)> = report
            .low_stock
            .iter()
            .map(|i| (i.product.id.as_str(), i.critical))
            .collect();
        // Ascending by quantity; q=0 and q>=5 never appear.
        assert_eq!(low, vec![("p2", true), ("p3", false), ("p4", false)]);

        let out: Vec<&str> = report.out_of_stock.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(out, vec!["p0"]);
    }

    #[test]
    fn test_inventory_value_ignores_report_filters() {
        let products = vec![
            product("p1", "S1", "A", 10, 250), // 25.00
            product("p2", "S2", "B", 3, 1000), // 30.00
        ];
        let filter = ReportFilter::all().for_product("p1").last_days(1);
        let report = InventoryReport::build(&products, &[], &filter, now());
        assert_eq!(report.inventory_value, Money::from_cents(5500));
    }

    #[test]
    fn test_export_rows_and_placeholders() {
        let products = vec![product("p1", "A1", "Widget", 7, 250)];
        let people = vec![
            person("x1", "Ana", Some("ana@example.com")),
            person("x2", "Bea", None),
        ];
        let ts = local_ts(2026, 8, 19, 10, 30, 0);
        let logs = vec![
            log("a", "p1", "x1", 3, ts),
            // References records that no longer exist.
            log("b", "gone-product", "gone-person", 2, ts),
            // Person exists but has no contact info.
            log("c", "p1", "x2", 1, ts),
        ];

        let export = ReportExport::build(&products, &people, &logs, &ReportFilter::all(), now());

        assert_eq!(export.rows.len(), 3);
        let by_product: Vec<(&str, &str, &str)> = export
            .rows
            .iter()
            .map(|r| (r.product.as_str(), r.sku.as_str(), r.contact.as_str()))
            .collect();
        assert!(by_product.contains(&("name-of-p1", "A1", "ana@example.com")));
        assert!(by_product.contains(&("name-of-gone-product", "N/A", "-")));
        assert!(by_product.contains(&("name-of-p1", "A1", "-")));

        assert_eq!(export.summary.output_count, 3);
        assert_eq!(export.summary.output_quantity, 6);
        assert_eq!(export.summary.period, "all time");
        assert_eq!(export.summary.product_filter, "All");
    }

    #[test]
    fn test_export_filter_labels() {
        let products = vec![product("p1", "A1", "Widget", 7, 250)];
        let people = vec![person("x1", "Ana", None)];
        let filter = ReportFilter::all().for_product("p1").for_person("x1");

        let export = ReportExport::build(&products, &people, &[], &filter, now());
        assert_eq!(export.summary.product_filter, "Widget");
        assert_eq!(export.summary.person_filter, "Ana");

        // A filter pointing at a vanished record renders the placeholder.
        let filter = ReportFilter::all().for_product("gone");
        let export = ReportExport::build(&products, &people, &[], &filter, now());
        assert_eq!(export.summary.product_filter, "N/A");
    }

    #[test]
    fn test_export_column_contract() {
        assert_eq!(
            EXPORT_COLUMNS,
            [
                "Date",
                "Product",
                "SKU",
                "Quantity",
                "Recipient Person",
                "Person Contact"
            ]
        );
    }
}
