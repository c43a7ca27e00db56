use serde::{Deserialize, Serialize};

/// Aggregate payload behind `GET /api/dashboard/summary`.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardSummary {
    pub request_info: RequestInfo,
    pub kpis: Kpis,
    pub charts: Charts,
    pub activity_feeds: ActivityFeeds,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestInfo {
    pub period: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Kpis {
    pub emails_analyzed: KpiValue,
    pub phishing_detected: KpiValue,
    pub suspicious_detected: KpiValue,
    pub threat_rate: KpiValue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KpiValue {
    pub value: f64,
    /// Variation vs. the previous period (0.05 = +5%).
    #[serde(default)]
    pub trend: f64,
    #[serde(default)]
    pub trend_direction: TrendDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    #[default]
    Neutral,
}

impl KpiValue {
    /// "▲ 5.0%" / "▼ 2.1%", empty when the trend is neutral.
    pub fn trend_label(&self) -> String {
        let arrow = match self.trend_direction {
            TrendDirection::Up => "▲",
            TrendDirection::Down => "▼",
            TrendDirection::Neutral => return String::new(),
        };
        format!("{arrow} {:.1}%", self.trend.abs() * 100.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Charts {
    pub daily_volume: DailyVolumeChart,
    pub status_distribution: DistributionChart,
    #[serde(default)]
    pub phishing_categories: Option<DistributionChart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyVolumeChart {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    pub name: String,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DistributionChart {
    pub labels: Vec<String>,
    pub data: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityFeeds {
    #[serde(default)]
    pub latest_threats: Vec<ThreatItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThreatItem {
    pub id: String,
    pub status: String,
    pub risk_score: i64,
    pub subject: String,
    pub sender_address: String,
    #[serde(default)]
    pub received_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_label_directions() {
        let up = KpiValue {
            value: 120.0,
            trend: 0.05,
            trend_direction: TrendDirection::Up,
        };
        assert_eq!(up.trend_label(), "▲ 5.0%");

        let flat = KpiValue {
            value: 3.0,
            trend: 0.0,
            trend_direction: TrendDirection::Neutral,
        };
        assert!(flat.trend_label().is_empty());
    }
}
