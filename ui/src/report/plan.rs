//! Which charts a report gets, derived from the data it carries.

use crate::charts::{ChartKind, ChartOptions, ChartRequest};

use super::data::ReportData;

const BLOCKAGE_COLORS: [&str; 3] = ["#ef4444", "#fbbf24", "#22c55e"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChartName {
    BlockageLevels,
    OperationTime,
    Waste,
    TopPerformers,
}

impl ChartName {
    pub fn key(self) -> &'static str {
        match self {
            Self::BlockageLevels => "operations-by-blockage-level",
            Self::OperationTime => "operation-time-comparison",
            Self::Waste => "waste-comparison",
            Self::TopPerformers => "top-performers",
        }
    }

    /// Element id of the canvas this chart draws on.
    pub fn surface_id(self) -> String {
        format!("chart-{}", self.key())
    }

    pub fn title(self) -> String {
        match self {
            Self::BlockageLevels => crate::t!("chart-blockage-levels"),
            Self::OperationTime => crate::t!("chart-operation-time"),
            Self::Waste => crate::t!("chart-waste"),
            Self::TopPerformers => crate::t!("chart-top-performers"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedChart {
    pub name: ChartName,
    pub request: ChartRequest,
}

/// Charts for `report`, in display order.
///
/// - blockage breakdown present: pie of operations per level
/// - single robot with comparison data: operation time and waste bars
/// - fleet report with a ranking: top five robots by efficiency
pub fn plan_charts(report: &ReportData) -> Vec<PlannedChart> {
    let mut planned = Vec::new();

    if let Some(levels) = report.blockage_levels() {
        let (labels, values): (Vec<String>, Vec<f64>) = levels.into_iter().unzip();
        planned.push(PlannedChart {
            name: ChartName::BlockageLevels,
            request: ChartRequest {
                kind: ChartKind::Pie,
                colors: palette(&BLOCKAGE_COLORS, labels.len()),
                labels,
                values,
                options: ChartOptions {
                    show_legend: true,
                    ..ChartOptions::default()
                },
            },
        });
    }

    if report.is_single_unit() {
        if let Some(comparison) = report.performance_comparison() {
            let labels = vec![crate::t!("series-robot"), crate::t!("series-all-robots")];
            planned.push(comparison_chart(
                ChartName::OperationTime,
                labels.clone(),
                [comparison.robot_avg_operation_time, comparison.fleet_avg_operation_time],
                crate::t!("axis-minutes"),
            ));
            planned.push(comparison_chart(
                ChartName::Waste,
                labels,
                [comparison.robot_avg_waste, comparison.fleet_avg_waste],
                crate::t!("axis-kilograms"),
            ));
        }
    } else if let Some(mut robots) = report.top_robots() {
        robots.truncate(5);
        planned.push(PlannedChart {
            name: ChartName::TopPerformers,
            request: ChartRequest {
                kind: ChartKind::Bar,
                labels: robots.iter().map(|robot| robot.robot_id.clone()).collect(),
                values: robots.iter().map(|robot| robot.efficiency).collect(),
                options: ChartOptions {
                    begin_at_zero: true,
                    value_axis_label: Some(crate::t!("axis-efficiency")),
                    ..ChartOptions::default()
                },
                colors: Vec::new(),
            },
        });
    }

    planned
}

fn comparison_chart(
    name: ChartName,
    labels: Vec<String>,
    values: [f64; 2],
    axis: String,
) -> PlannedChart {
    PlannedChart {
        name,
        request: ChartRequest {
            kind: ChartKind::Bar,
            labels,
            values: values.to_vec(),
            options: ChartOptions {
                begin_at_zero: true,
                value_axis_label: Some(axis),
                ..ChartOptions::default()
            },
            colors: Vec::new(),
        },
    }
}

fn palette(colors: &[&str], count: usize) -> Vec<String> {
    colors
        .iter()
        .cycle()
        .take(count)
        .map(|color| color.to_string())
        .collect()
}
