// src/api/predictions.rs
// Performance predictions computed by the backend

use super::pipeline::ApiClient;
use crate::error::{Result, TrackerError};
use serde::{Deserialize, Serialize};
use std::fmt;

const BASE: &str = "/api/prediction";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(rename = "predictionId", default)]
    pub prediction_id: Option<i64>,
    #[serde(rename = "siswaId")]
    pub student_id: i64,
    #[serde(rename = "semesterSiswa", default)]
    pub semester: Option<String>,
    #[serde(rename = "namaSiswa", default)]
    pub student_name: Option<String>,
    #[serde(rename = "nilaiAkhir", default)]
    pub final_score: Option<f64>,
    #[serde(rename = "jumlahKetidakhadiran", default)]
    pub absences: Option<i64>,
    #[serde(rename = "persentaseTugas", default)]
    pub assignment_percentage: Option<i64>,
    #[serde(rename = "statusPrediksi", default)]
    pub status: Option<String>,
}

impl Prediction {
    pub fn trend(&self) -> Trend {
        Trend::from_status(self.status.as_deref())
    }
}

/// Direction of a prediction status string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trend {
    Increase,
    Stable,
    Decrease,
    Unknown,
}

impl Trend {
    pub const ALL: [Trend; 4] = [Trend::Increase, Trend::Stable, Trend::Decrease, Trend::Unknown];

    pub fn from_status(status: Option<&str>) -> Self {
        match status.map(str::trim) {
            Some("Significant Increase Performance") => Trend::Increase,
            Some("Stable Performance") => Trend::Stable,
            Some("Significant Decrease Performance") => Trend::Decrease,
            _ => Trend::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Trend::Increase => "significant increase",
            Trend::Stable => "stable",
            Trend::Decrease => "significant decrease",
            Trend::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Count and whole-number share of each trend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendSummary {
    pub total: usize,
    pub buckets: Vec<(Trend, usize, u32)>,
}

pub fn summarize<'a, I>(statuses: I) -> TrendSummary
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts = [0usize; 4];
    let mut total = 0;
    for status in statuses {
        let idx = Trend::ALL
            .iter()
            .position(|t| *t == Trend::from_status(status))
            .unwrap_or(3);
        counts[idx] += 1;
        total += 1;
    }

    let buckets = Trend::ALL
        .iter()
        .zip(counts)
        .map(|(trend, count)| {
            let pct = if total == 0 {
                0
            } else {
                ((count as f64 / total as f64) * 100.0).round() as u32
            };
            (*trend, count, pct)
        })
        .collect();
    TrendSummary { total, buckets }
}

/// Run predictions for every student with submitted scores
pub async fn batch(api: &ApiClient) -> Result<Vec<Prediction>> {
    Ok(api
        .get(&format!("{}/batch", BASE))
        .await?
        .data
        .unwrap_or_default())
}

pub async fn list(api: &ApiClient, sort_by: Option<&str>) -> Result<Vec<Prediction>> {
    let path = format!("{}/viewall", BASE);
    let response = match sort_by.filter(|s| !s.trim().is_empty()) {
        Some(field) => api.get_with_query(&path, &[("sortBy", field)]).await?,
        None => api.get(&path).await?,
    };
    Ok(response.data.unwrap_or_default())
}

pub async fn for_student(api: &ApiClient, student_id: i64) -> Result<Prediction> {
    if student_id <= 0 {
        return Err(TrackerError::validation("student id", "must be positive"));
    }
    api.get(&format!("{}/{}", BASE, student_id))
        .await?
        .into_data()
}
