// src/cli/predictions.rs
// Prediction commands

use super::{AppContext, PredictionAction};
use crate::api::predictions::{self, Prediction, TrendSummary, summarize};
use crate::error::Result;

pub async fn run(ctx: &AppContext, action: PredictionAction) -> Result<()> {
    if !ctx.enter_route("performance").await {
        return Ok(());
    }
    match action {
        PredictionAction::Batch => {
            let results = predictions::batch(&ctx.api).await?;
            println!("Predicted {} student(s).", results.len());
            print_table(&results);
        }
        PredictionAction::List { sort_by, summary } => {
            let results = predictions::list(&ctx.api, sort_by.as_deref()).await?;
            if summary {
                print_summary(&summarize(results.iter().map(|p| p.status.as_deref())));
            } else {
                print_table(&results);
            }
        }
        PredictionAction::Show { student_id } => {
            let prediction = predictions::for_student(&ctx.api, student_id).await?;
            print_table(std::slice::from_ref(&prediction));
        }
    }
    Ok(())
}

fn print_table(results: &[Prediction]) {
    if results.is_empty() {
        println!("No predictions.");
        return;
    }
    println!(
        "{:<8} {:<28} {:<10} {:>6} {:>8}  {}",
        "ID", "Name", "Semester", "Final", "Absent", "Trend"
    );
    for p in results {
        println!(
            "{:<8} {:<28} {:<10} {:>6} {:>8}  {}",
            p.student_id,
            p.student_name.as_deref().unwrap_or("-"),
            p.semester.as_deref().unwrap_or("-"),
            p.final_score
                .map(|s| format!("{:.0}", s))
                .unwrap_or_else(|| "-".to_string()),
            p.absences
                .map(|a| a.to_string())
                .unwrap_or_else(|| "-".to_string()),
            p.trend(),
        );
    }
}

pub(crate) fn print_summary(summary: &TrendSummary) {
    println!("{} student(s)", summary.total);
    for (trend, count, pct) in &summary.buckets {
        println!("  {:<22} {:>4}  {:>3}%", trend.label(), count, pct);
    }
}
