//! Projection of the loss history into chart-ready series.

use chrono::{DateTime, Utc};
use il_tracker_domain::entities::LossSample;
use serde::Serialize;

/// Axis a series is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartAxis {
    /// Percentage axis.
    Percentage,
    /// USD value axis.
    Value,
}

/// One plotted line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    /// Legend label.
    pub label: &'static str,
    /// Axis.
    pub axis: ChartAxis,
    /// One value per sample.
    pub data: Vec<f64>,
}

/// Three series over the sample timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    /// Sample times.
    pub timestamps: Vec<DateTime<Utc>>,
    /// Time-of-day labels for the x axis.
    pub labels: Vec<String>,
    /// Impermanent loss in percent.
    pub impermanent_loss_pct: ChartSeries,
    /// LP value in USD.
    pub lp_value: ChartSeries,
    /// HODL value in USD.
    pub hold_value: ChartSeries,
}

impl ChartData {
    /// Maps each sample to one point of each series, preserving order.
    pub fn project(samples: &[LossSample]) -> Self {
        Self {
            timestamps: samples.iter().map(LossSample::timestamp).collect(),
            labels: samples
                .iter()
                .map(|s| s.timestamp().format("%H:%M:%S").to_string())
                .collect(),
            impermanent_loss_pct: ChartSeries {
                label: "Impermanent Loss (%)",
                axis: ChartAxis::Percentage,
                data: samples.iter().map(|s| s.impermanent_loss() * 100.0).collect(),
            },
            lp_value: ChartSeries {
                label: "LP Value (USD)",
                axis: ChartAxis::Value,
                data: samples.iter().map(LossSample::lp_value).collect(),
            },
            hold_value: ChartSeries {
                label: "HODL Value (USD)",
                axis: ChartAxis::Value,
                data: samples.iter().map(LossSample::hold_value).collect(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn series(&self) -> [&ChartSeries; 3] {
        [&self.impermanent_loss_pct, &self.lp_value, &self.hold_value]
    }
}
