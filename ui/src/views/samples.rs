//! Sample payloads for the demo page.

use serde_json::{json, Value};

use crate::report::ReportData;

pub fn individual() -> Option<ReportData> {
    decode(json!({
        "analysis_type": "robot_individual",
        "data": {
            "Total Operations": 42,
            "Average Operation Time (min)": 41.6,
            "Average Waste Collected (kg)": 3.2,
            "Efficiency Ratio (waste/min)": 0.08,
            "Total Operation Time (min)": 1747,
            "Last Operation Date": "2024-05-16",
            "Next Operation Date": "2024-05-23",
            "Days Since Last Operation": 3,
            "Days Until Next Operation": 4,
            "Operations by Blockage Level": { "Low": 10, "Medium": 20, "High": 12 },
            "Performance Comparison vs All Robots": {
                "Robot Avg Operation Time": 41.6,
                "All Robots Avg Operation Time": 47.2,
                "Robot Avg Waste": 3.2,
                "All Robots Avg Waste": 2.7
            },
            "Top 5 Manholes Handled": [
                { "Manhole ID": "MH-104", "Avg Operation Time (min)": 52.4, "Waste Collected (kg)": 18.6 },
                { "Manhole ID": "MH-033", "Avg Operation Time (min)": 38.1, "Waste Collected (kg)": 12.9 },
                { "Manhole ID": "MH-219", "Avg Operation Time (min)": 44.0, "Waste Collected (kg)": 9.75 }
            ]
        }
    }))
}

pub fn fleet() -> Option<ReportData> {
    decode(json!({
        "analysis_type": "aggregate",
        "data": {
            "Total Operations": 1264,
            "Average Operation Time (min)": 47.2,
            "Average Waste Collected (kg)": 2.7,
            "Efficiency Ratio (waste/min)": 0.06,
            "Operations by Blockage Level": { "Low": 402, "Medium": 611, "High": 251 },
            "Top 5 Performing Robots": [
                { "Robot ID": "RB-07", "Efficiency (waste/min)": 0.094 },
                { "Robot ID": "RB-12", "Efficiency (waste/min)": 0.091 },
                { "Robot ID": "RB-03", "Efficiency (waste/min)": 0.088 },
                { "Robot ID": "RB-15", "Efficiency (waste/min)": 0.081 },
                { "Robot ID": "RB-01", "Efficiency (waste/min)": 0.079 }
            ],
            "Top 5 Manholes Handled": [
                { "Manhole ID": "MH-104", "Avg Operation Time (min)": 49.8,
                  "Waste Collected (kg)": 214.3, "Robot IDs": ["RB-07", "RB-12"] },
                { "Manhole ID": "MH-033", "Avg Operation Time (min)": 41.2,
                  "Waste Collected (kg)": 176.0, "Robot IDs": ["RB-03"] },
                { "Manhole ID": "MH-219", "Avg Operation Time (min)": 45.5,
                  "Waste Collected (kg)": 150.9, "Robot IDs": ["RB-15", "RB-01", "RB-07"] }
            ]
        }
    }))
}

fn decode(value: Value) -> Option<ReportData> {
    match serde_json::from_value(value) {
        Ok(report) => Some(report),
        Err(err) => {
            tracing::error!(error = %err, "sample report is malformed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{manholes_table, plan_charts, summary_cards, timeline_cards};

    #[test]
    fn samples_decode_and_plan_charts() {
        let single = individual().unwrap();
        assert!(single.is_single_unit());
        assert_eq!(plan_charts(&single).len(), 3);
        assert!(summary_cards(&single).iter().all(|card| card.value != "N/A"));
        assert_eq!(timeline_cards(&single)[2].value, "3 / 4");
        assert_eq!(manholes_table(&single).unwrap().columns.len(), 3);

        let fleet = fleet().unwrap();
        assert!(!fleet.is_single_unit());
        assert_eq!(plan_charts(&fleet).len(), 2);
        assert_eq!(manholes_table(&fleet).unwrap().rows[0][3], "RB-07, RB-12");
    }
}
