//! Report payload supplied by the host application.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const KEY_TOTAL_OPERATIONS: &str = "Total Operations";
pub const KEY_AVG_OPERATION_TIME: &str = "Average Operation Time (min)";
pub const KEY_AVG_WASTE: &str = "Average Waste Collected (kg)";
pub const KEY_EFFICIENCY: &str = "Efficiency Ratio (waste/min)";
pub const KEY_TOTAL_OPERATION_TIME: &str = "Total Operation Time (min)";
pub const KEY_LAST_OPERATION_DATE: &str = "Last Operation Date";
pub const KEY_NEXT_OPERATION_DATE: &str = "Next Operation Date";
pub const KEY_DAYS_SINCE_LAST: &str = "Days Since Last Operation";
pub const KEY_DAYS_UNTIL_NEXT: &str = "Days Until Next Operation";
pub const KEY_BLOCKAGE_LEVELS: &str = "Operations by Blockage Level";
pub const KEY_PERFORMANCE: &str = "Performance Comparison vs All Robots";
pub const KEY_TOP_ROBOTS: &str = "Top 5 Performing Robots";
pub const KEY_TOP_MANHOLES: &str = "Top 5 Manholes Handled";

const INDIVIDUAL_TAG: &str = "robot_individual";

/// Whether the report covers one robot or the whole fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnalysisType {
    Individual,
    /// Any other tag; the original string is kept for round-tripping.
    Aggregate(String),
}

impl From<String> for AnalysisType {
    fn from(tag: String) -> Self {
        if tag == INDIVIDUAL_TAG {
            Self::Individual
        } else {
            Self::Aggregate(tag)
        }
    }
}

impl From<AnalysisType> for String {
    fn from(kind: AnalysisType) -> Self {
        match kind {
            AnalysisType::Individual => INDIVIDUAL_TAG.to_string(),
            AnalysisType::Aggregate(tag) => tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    pub analysis_type: AnalysisType,
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// One robot's averages next to the whole fleet's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceComparison {
    #[serde(rename = "Robot Avg Operation Time")]
    pub robot_avg_operation_time: f64,
    #[serde(rename = "All Robots Avg Operation Time")]
    pub fleet_avg_operation_time: f64,
    #[serde(rename = "Robot Avg Waste")]
    pub robot_avg_waste: f64,
    #[serde(rename = "All Robots Avg Waste")]
    pub fleet_avg_waste: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRobot {
    #[serde(rename = "Robot ID", deserialize_with = "id_text")]
    pub robot_id: String,
    #[serde(rename = "Efficiency (waste/min)")]
    pub efficiency: f64,
}

/// A row of the manhole table. Cells stay raw so they render like card values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManholeRow {
    #[serde(rename = "Manhole ID", default)]
    pub manhole_id: Value,
    #[serde(rename = "Avg Operation Time (min)", default)]
    pub avg_operation_time: Value,
    #[serde(rename = "Waste Collected (kg)", default)]
    pub waste_collected: Value,
    #[serde(rename = "Robot IDs", default)]
    pub robot_ids: Vec<Value>,
}

impl ReportData {
    pub fn is_single_unit(&self) -> bool {
        self.analysis_type == AnalysisType::Individual
    }

    /// Raw metric by display name; `null` counts as absent.
    pub fn metric(&self, key: &str) -> Option<&Value> {
        self.data.get(key).filter(|value| !value.is_null())
    }

    /// Blockage level -> operation count, in payload order. Non-numeric counts are skipped.
    pub fn blockage_levels(&self) -> Option<Vec<(String, f64)>> {
        let levels = self.metric(KEY_BLOCKAGE_LEVELS)?.as_object()?;
        Some(
            levels
                .iter()
                .filter_map(|(level, count)| count.as_f64().map(|count| (level.clone(), count)))
                .collect(),
        )
    }

    pub fn performance_comparison(&self) -> Option<PerformanceComparison> {
        decode(self.metric(KEY_PERFORMANCE)?)
    }

    pub fn top_robots(&self) -> Option<Vec<RankedRobot>> {
        decode(self.metric(KEY_TOP_ROBOTS)?)
    }

    pub fn top_manholes(&self) -> Option<Vec<ManholeRow>> {
        decode(self.metric(KEY_TOP_MANHOLES)?)
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: &Value) -> Option<T> {
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            tracing::warn!(error = %err, "ignoring malformed report section");
            None
        }
    }
}

// Robot IDs arrive as strings or bare numbers depending on the fleet.
fn id_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(de::Error::custom(format!("robot id must be text, got {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn analysis_tag_round_trips() {
        let single: ReportData =
            serde_json::from_value(json!({ "analysis_type": "robot_individual", "data": {} }))
                .unwrap();
        assert!(single.is_single_unit());

        let fleet: ReportData =
            serde_json::from_value(json!({ "analysis_type": "fleet_overview" })).unwrap();
        assert_eq!(fleet.analysis_type, AnalysisType::Aggregate("fleet_overview".into()));
        assert_eq!(serde_json::to_value(&fleet).unwrap()["analysis_type"], "fleet_overview");
    }

    #[test]
    fn blockage_levels_keep_payload_order() {
        let report: ReportData = serde_json::from_value(json!({
            "analysis_type": "robot_individual",
            "data": { "Operations by Blockage Level": { "Low": 10, "Medium": 20, "High": 12 } }
        }))
        .unwrap();
        let levels = report.blockage_levels().unwrap();
        let names: Vec<&str> = levels.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["Low", "Medium", "High"]);
    }

    #[test]
    fn comparison_reads_robot_and_fleet_averages() {
        let report: ReportData = serde_json::from_value(json!({
            "analysis_type": "robot_individual",
            "data": { "Performance Comparison vs All Robots": {
                "Robot Avg Operation Time": 12.5,
                "All Robots Avg Operation Time": 14.0,
                "Robot Avg Waste": 3.1,
                "All Robots Avg Waste": 2.6
            }}
        }))
        .unwrap();
        let comparison = report.performance_comparison().unwrap();
        assert_eq!(comparison.robot_avg_operation_time, 12.5);
        assert_eq!(comparison.fleet_avg_operation_time, 14.0);
        assert_eq!(comparison.robot_avg_waste, 3.1);
        assert_eq!(comparison.fleet_avg_waste, 2.6);
    }

    #[test]
    fn top_robots_accept_text_or_numeric_ids() {
        let report: ReportData = serde_json::from_value(json!({
            "analysis_type": "aggregate",
            "data": { "Top 5 Performing Robots": [
                { "Robot ID": "R1", "Efficiency (waste/min)": 2.0 },
                { "Robot ID": 7, "Efficiency (waste/min)": 1.5 }
            ]}
        }))
        .unwrap();
        let robots = report.top_robots().unwrap();
        assert_eq!(robots[0].robot_id, "R1");
        assert_eq!(robots[1].robot_id, "7");
        assert_eq!(robots[1].efficiency, 1.5);
    }

    #[test]
    fn manhole_rows_tolerate_missing_cells() {
        let report: ReportData = serde_json::from_value(json!({
            "analysis_type": "aggregate",
            "data": { "Top 5 Manholes Handled": [
                { "Manhole ID": "MH-12", "Robot IDs": ["R1", "R2"] }
            ]}
        }))
        .unwrap();
        let rows = report.top_manholes().unwrap();
        assert_eq!(rows[0].manhole_id, json!("MH-12"));
        assert!(rows[0].avg_operation_time.is_null());
        assert_eq!(rows[0].robot_ids.len(), 2);
    }

    #[test]
    fn malformed_sections_are_treated_as_absent() {
        let report: ReportData = serde_json::from_value(json!({
            "analysis_type": "aggregate",
            "data": {
                "Top 5 Performing Robots": "soon",
                "Performance Comparison vs All Robots": null,
                "Top 5 Manholes Handled": { "MH-1": 3 }
            }
        }))
        .unwrap();
        assert!(report.top_robots().is_none());
        assert!(report.performance_comparison().is_none());
        assert!(report.top_manholes().is_none());
    }
}
