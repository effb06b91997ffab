//! Outbound chart rendering for price history.
//!
//! The per-vendor series bundle becomes a Chart.js line-chart config and
//! goes to a QuickChart-compatible endpoint; the image payload comes back
//! opaque. Rendering itself is entirely the collaborator's business.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::error::{SeekerError, SeekerResult};

/// Seam for the chart-rendering collaborator.
#[async_trait]
pub trait ChartRenderer: Send + Sync {
    /// Render a per-vendor time series bundle into an image payload.
    async fn render(
        &self,
        series: &HashMap<String, Vec<(NaiveDate, f64)>>,
    ) -> SeekerResult<Vec<u8>>;
}

/// QuickChart-backed renderer.
pub struct QuickChartRenderer {
    client: reqwest::Client,
    endpoint: String,
}

impl QuickChartRenderer {
    pub fn new(endpoint: &str, timeout: Duration) -> SeekerResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

/// Build the Chart.js config for a series bundle.
///
/// Datasets are emitted in vendor-name order so the same bundle always
/// produces the same config.
pub fn build_chart_config(series: &HashMap<String, Vec<(NaiveDate, f64)>>) -> Value {
    let mut vendors: Vec<&String> = series.keys().collect();
    vendors.sort();

    let datasets: Vec<Value> = vendors
        .into_iter()
        .map(|vendor| {
            let data: Vec<Value> = series[vendor]
                .iter()
                .map(|(date, price)| {
                    json!({ "x": date.format("%Y-%m-%d").to_string(), "y": price })
                })
                .collect();
            json!({ "label": vendor, "fill": false, "data": data })
        })
        .collect();

    json!({
        "type": "line",
        "data": { "datasets": datasets },
        "options": {
            "title": { "display": true, "text": "Price history" },
            "scales": {
                "xAxes": [{
                    "type": "time",
                    "ticks": { "source": "data" },
                    "time": {
                        "parser": "YYYY-MM-DD",
                        "displayFormats": { "day": "DD-MM-YYYY" }
                    }
                }]
            }
        }
    })
}

#[async_trait]
impl ChartRenderer for QuickChartRenderer {
    async fn render(
        &self,
        series: &HashMap<String, Vec<(NaiveDate, f64)>>,
    ) -> SeekerResult<Vec<u8>> {
        let config = build_chart_config(series);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("c", config.to_string())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SeekerError::SourceUnavailable(format!(
                "chart endpoint returned {}",
                response.status()
            )));
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}
