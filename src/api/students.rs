// src/api/students.rs
// Student performance records: listing, score input, CSV bulk upload

use super::pipeline::ApiClient;
use crate::error::{Result, TrackerError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

const BASE: &str = "/api/student-performance";

pub const MIN_SCORE: i64 = 0;
pub const MAX_SCORE: i64 = 100;

/// Largest CSV the backend accepts
pub const MAX_CSV_BYTES: u64 = 10 * 1024 * 1024;

/// Subjects every score sheet carries, in form order
pub const SUBJECTS: &[&str] = &[
    "Pendidikan Agama",
    "Pendidikan Pancasila",
    "Bahasa Inggris",
    "Bahasa Mandarin",
    "Matematika (Umum)",
    "Biologi",
    "Fisika",
    "Kimia",
    "Geografi",
    "Sejarah",
    "Sosiologi",
    "Ekonomi",
    "Kimia Lanjutan",
    "Fisika Lanjutan",
    "Biologi Lanjutan",
    "Pendidikan Jasmani, Olahraga, dan Kesehatan",
    "Informatika",
    "Seni Musik",
    "Bahasa Indonesia",
];

pub type SubjectScores = BTreeMap<String, i64>;

/// One student's performance for a semester, as the backend returns it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "siswaId")]
    pub student_id: i64,
    #[serde(rename = "namaSiswa", default)]
    pub student_name: Option<String>,
    #[serde(rename = "nilaiUjianPerMapel", default)]
    pub exam_scores: SubjectScores,
    #[serde(rename = "nilaiTugasPerMapel", default)]
    pub task_scores: SubjectScores,
    #[serde(rename = "nilaiKuisPerMapel", default)]
    pub quiz_scores: SubjectScores,
    #[serde(rename = "jumlahKetidakhadiran", default)]
    pub absences: Option<i64>,
    #[serde(rename = "persentaseTugas", default)]
    pub assignment_percentage: Option<i64>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(rename = "nilaiAkhirRataRata", default)]
    pub final_average: Option<f64>,
    /// Prediction embedded by the backend; may lag the prediction endpoint
    #[serde(rename = "statusPrediksi", default)]
    pub prediction_status: Option<String>,
}

impl PerformanceRecord {
    pub fn display_name(&self) -> &str {
        self.student_name.as_deref().unwrap_or("-")
    }
}

/// Case-insensitive name search over a listing
pub fn search<'a>(records: &'a [PerformanceRecord], term: &str) -> Vec<&'a PerformanceRecord> {
    let needle = term.trim().to_lowercase();
    records
        .iter()
        .filter(|r| {
            r.student_name
                .as_deref()
                .unwrap_or_default()
                .to_lowercase()
                .contains(&needle)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreKind {
    Exam,
    Task,
    Quiz,
}

/// Score input for one student and semester.
///
/// Every subject starts at zero; scores outside 0-100 are clamped on entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSheet {
    #[serde(rename = "siswaId")]
    student_id: i64,
    #[serde(rename = "nilaiUjianPerMapel")]
    exam: SubjectScores,
    #[serde(rename = "nilaiTugasPerMapel")]
    task: SubjectScores,
    #[serde(rename = "nilaiKuisPerMapel")]
    quiz: SubjectScores,
    #[serde(rename = "jumlahKetidakhadiran")]
    absences: i64,
    #[serde(rename = "persentaseTugas")]
    assignment_percentage: i64,
    semester: String,
}

fn zeroed() -> SubjectScores {
    SUBJECTS.iter().map(|s| (s.to_string(), 0)).collect()
}

pub fn clamp_score(score: i64) -> i64 {
    score.clamp(MIN_SCORE, MAX_SCORE)
}

impl ScoreSheet {
    pub fn new(student_id: i64, semester: impl Into<String>) -> Self {
        Self {
            student_id,
            exam: zeroed(),
            task: zeroed(),
            quiz: zeroed(),
            absences: 0,
            assignment_percentage: 0,
            semester: semester.into(),
        }
    }

    /// Prefill from an existing record for editing
    pub fn from_record(record: &PerformanceRecord) -> Self {
        let mut sheet = Self::new(record.student_id, record.semester.clone().unwrap_or_default());
        sheet.absences = record.absences.unwrap_or_default();
        sheet.assignment_percentage = record.assignment_percentage.unwrap_or_default();
        for (kind, scores) in [
            (ScoreKind::Exam, &record.exam_scores),
            (ScoreKind::Task, &record.task_scores),
            (ScoreKind::Quiz, &record.quiz_scores),
        ] {
            for (subject, score) in scores {
                // subjects the form does not know are dropped
                let _ = sheet.set(subject, kind, *score);
            }
        }
        sheet
    }

    pub fn student_id(&self) -> i64 {
        self.student_id
    }

    pub fn semester(&self) -> &str {
        &self.semester
    }

    pub fn with_absences(mut self, absences: i64) -> Self {
        self.absences = absences;
        self
    }

    pub fn with_assignment_percentage(mut self, percentage: i64) -> Self {
        self.assignment_percentage = percentage;
        self
    }

    pub fn with_semester(mut self, semester: impl Into<String>) -> Self {
        self.semester = semester.into();
        self
    }

    /// Record a score, clamped to 0-100; unknown subjects are rejected
    pub fn set(&mut self, subject: &str, kind: ScoreKind, score: i64) -> Result<()> {
        let Some(name) = SUBJECTS.iter().find(|s| s.eq_ignore_ascii_case(subject.trim())) else {
            return Err(TrackerError::validation(
                "subject",
                format!("unknown subject '{}'", subject),
            ));
        };
        let table = match kind {
            ScoreKind::Exam => &mut self.exam,
            ScoreKind::Task => &mut self.task,
            ScoreKind::Quiz => &mut self.quiz,
        };
        table.insert(name.to_string(), clamp_score(score));
        Ok(())
    }

    pub fn score(&self, subject: &str, kind: ScoreKind) -> Option<i64> {
        let table = match kind {
            ScoreKind::Exam => &self.exam,
            ScoreKind::Task => &self.task,
            ScoreKind::Quiz => &self.quiz,
        };
        table.get(subject).copied()
    }

    pub fn validate(&self) -> Result<()> {
        if self.student_id <= 0 {
            return Err(TrackerError::validation("student id", "must be positive"));
        }
        if self.semester.trim().is_empty() {
            return Err(TrackerError::validation("semester", "must not be blank"));
        }
        if self.absences < 0 {
            return Err(TrackerError::validation("absences", "must not be negative"));
        }
        if !(0..=100).contains(&self.assignment_percentage) {
            return Err(TrackerError::validation(
                "assignment percentage",
                "must be between 0 and 100",
            ));
        }
        Ok(())
    }
}

fn check_csv(path: &Path) -> Result<u64> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(TrackerError::validation("file", "must be a .csv file"));
    }

    let meta = std::fs::metadata(path).map_err(|e| {
        TrackerError::validation("file", format!("{}: {}", path.display(), e))
    })?;
    if !meta.is_file() {
        return Err(TrackerError::validation("file", "not a regular file"));
    }
    if meta.len() == 0 {
        return Err(TrackerError::validation("file", "is empty"));
    }
    if meta.len() > MAX_CSV_BYTES {
        return Err(TrackerError::validation("file", "larger than 10MB"));
    }
    Ok(meta.len())
}

pub async fn list(api: &ApiClient, sort_by: Option<&str>) -> Result<Vec<PerformanceRecord>> {
    let path = format!("{}/viewall", BASE);
    let response = match sort_by.filter(|s| !s.trim().is_empty()) {
        Some(field) => api.get_with_query(&path, &[("sortBy", field)]).await?,
        None => api.get(&path).await?,
    };
    Ok(response.data.unwrap_or_default())
}

pub async fn detail(api: &ApiClient, student_id: i64) -> Result<PerformanceRecord> {
    api.get(&format!("{}/detail/{}", BASE, student_id))
        .await?
        .into_data()
}

pub async fn create(api: &ApiClient, sheet: &ScoreSheet) -> Result<PerformanceRecord> {
    sheet.validate()?;
    let record: PerformanceRecord = api
        .post(&format!("{}/create", BASE), sheet)
        .await?
        .into_data()?;
    info!(student_id = sheet.student_id, semester = %sheet.semester, "Scores saved");
    Ok(record)
}

pub async fn update(api: &ApiClient, sheet: &ScoreSheet) -> Result<PerformanceRecord> {
    sheet.validate()?;
    let record: PerformanceRecord = api
        .put(&format!("{}/{}/update", BASE, sheet.student_id), sheet)
        .await?
        .into_data()?;
    info!(student_id = sheet.student_id, "Scores updated");
    Ok(record)
}

pub async fn delete(api: &ApiClient, student_id: i64) -> Result<String> {
    let message = api
        .delete::<serde_json::Value>(&format!("{}/delete/{}", BASE, student_id))
        .await?
        .into_message("Performance record deleted")?;
    info!(student_id, "Performance record deleted");
    Ok(message)
}

/// Upload a CSV of score sheets as multipart field `file`
pub async fn upload_csv(api: &ApiClient, path: &Path) -> Result<Vec<PerformanceRecord>> {
    let size = check_csv(path)?;
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.csv")
        .to_string();
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    debug!(file = %file_name, size, mime = %mime, "Uploading CSV");

    let part = reqwest::multipart::Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime.as_ref())?;
    let form = reqwest::multipart::Form::new().part("file", part);

    let records: Vec<PerformanceRecord> = api
        .post_multipart(&format!("{}/upload-csv", BASE), form)
        .await?
        .data
        .unwrap_or_default();
    info!(imported = records.len(), "CSV uploaded");
    Ok(records)
}
