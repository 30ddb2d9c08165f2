//! Summary cards and the manhole table shown under the charts.

use serde_json::Value;

use crate::core::format::{format_fixed, format_metric, NOT_AVAILABLE};
use crate::t;

use super::data::{self, ReportData};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoCard {
    pub title: String,
    pub value: String,
}

impl InfoCard {
    fn new(title: String, value: String) -> Self {
        Self { title, value }
    }
}

/// Headline figures. Single-robot reports add the robot's total operating time.
/// Missing metrics show "N/A".
pub fn summary_cards(report: &ReportData) -> Vec<InfoCard> {
    let mut cards = vec![
        InfoCard::new(
            t!("card-total-operations"),
            format_metric(report.metric(data::KEY_TOTAL_OPERATIONS)),
        ),
        InfoCard::new(
            t!("card-avg-operation-time"),
            with_unit(
                format_fixed(report.metric(data::KEY_AVG_OPERATION_TIME), 2),
                "min",
            ),
        ),
        InfoCard::new(
            t!("card-avg-waste"),
            with_unit(format_metric(report.metric(data::KEY_AVG_WASTE)), "kg"),
        ),
        InfoCard::new(
            t!("card-efficiency"),
            format_metric(report.metric(data::KEY_EFFICIENCY)),
        ),
    ];

    if report.is_single_unit() {
        cards.push(InfoCard::new(
            t!("card-total-operation-time"),
            with_unit(
                format_metric(report.metric(data::KEY_TOTAL_OPERATION_TIME)),
                "min",
            ),
        ));
    }
    cards
}

/// Last and next operation for a single robot; empty for fleet reports.
pub fn timeline_cards(report: &ReportData) -> Vec<InfoCard> {
    if !report.is_single_unit() {
        return Vec::new();
    }

    let since = report.metric(data::KEY_DAYS_SINCE_LAST);
    let until = report.metric(data::KEY_DAYS_UNTIL_NEXT);
    let days = if since.is_none() && until.is_none() {
        NOT_AVAILABLE.to_string()
    } else {
        format!("{} / {}", format_metric(since), format_metric(until))
    };

    vec![
        InfoCard::new(
            t!("card-last-operation-date"),
            format_metric(report.metric(data::KEY_LAST_OPERATION_DATE)),
        ),
        InfoCard::new(
            t!("card-next-operation-date"),
            format_metric(report.metric(data::KEY_NEXT_OPERATION_DATE)),
        ),
        InfoCard::new(t!("card-days-since-until"), days),
    ]
}

fn with_unit(value: String, unit: &str) -> String {
    if value == NOT_AVAILABLE {
        value
    } else {
        format!("{value} {unit}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub caption: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// The busiest manholes. Fleet reports add the robots that serviced each one.
pub fn manholes_table(report: &ReportData) -> Option<ReportTable> {
    let manholes = report.top_manholes()?;
    if manholes.is_empty() {
        return None;
    }
    let fleet = !report.is_single_unit();

    let mut columns = vec![
        t!("column-manhole-id"),
        t!("column-avg-operation-time"),
        t!("column-waste-collected"),
    ];
    if fleet {
        columns.push(t!("column-robot-ids"));
    }

    let rows = manholes
        .iter()
        .map(|row| {
            let mut cells = vec![
                cell(&row.manhole_id),
                cell(&row.avg_operation_time),
                cell(&row.waste_collected),
            ];
            if fleet {
                cells.push(robot_list(&row.robot_ids));
            }
            cells
        })
        .collect();

    Some(ReportTable {
        caption: t!("table-top-manholes"),
        columns,
        rows,
    })
}

fn cell(value: &Value) -> String {
    format_metric(Some(value))
}

fn robot_list(ids: &[Value]) -> String {
    if ids.is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    ids.iter().map(cell).collect::<Vec<_>>().join(", ")
}
