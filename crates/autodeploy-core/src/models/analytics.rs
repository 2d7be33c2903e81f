use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase", default)]
pub struct Analytics {
    pub total_deployments: u64,
    pub active_deployments: u64,
    pub failed_deployments: u64,
    pub global_traffic: Option<u64>,
    /// Average response time in milliseconds
    pub average_latency: Option<f64>,
    pub deployment_status: Option<Vec<StatusCount>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct StatusCount {
    pub name: String,
    pub count: u64,
}

impl Analytics {
    pub fn traffic_display(&self) -> String {
        match self.global_traffic {
            Some(visits) => format!("{} visits", visits),
            None => "N/A".to_string(),
        }
    }

    pub fn latency_display(&self) -> String {
        match self.average_latency {
            Some(ms) => format!("{:.0} ms", ms),
            None => "N/A".to_string(),
        }
    }

    /// Status buckets with at least one deployment
    pub fn active_statuses(&self) -> impl Iterator<Item = &StatusCount> {
        self.deployment_status
            .iter()
            .flatten()
            .filter(|s| s.count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let analytics: Analytics = serde_json::from_str("{}").unwrap();
        assert_eq!(analytics.total_deployments, 0);
        assert_eq!(analytics.traffic_display(), "N/A");
        assert_eq!(analytics.latency_display(), "N/A");
        assert_eq!(analytics.active_statuses().count(), 0);
    }

    #[test]
    fn test_parse_full_summary() {
        let json = r#"{
            "totalDeployments": 12,
            "activeDeployments": 3,
            "failedDeployments": 1,
            "globalTraffic": 5400,
            "averageLatency": 87.4,
            "deploymentStatus": [{"name": "Running", "count": 3}, {"name": "Queued", "count": 0}]
        }"#;
        let analytics: Analytics = serde_json::from_str(json).unwrap();
        assert_eq!(analytics.total_deployments, 12);
        assert_eq!(analytics.traffic_display(), "5400 visits");
        assert_eq!(analytics.latency_display(), "87 ms");

        let active: Vec<_> = analytics.active_statuses().map(|s| s.name.as_str()).collect();
        assert_eq!(active, vec!["Running"]);
    }
}
