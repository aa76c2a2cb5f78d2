// src/cli/students.rs
// Student performance commands

use super::account::prompt_error;
use super::{AppContext, ScoreArgs, StudentAction};
use crate::api::students::{self, PerformanceRecord, ScoreKind, ScoreSheet, SUBJECTS};
use crate::error::{Result, TrackerError};
use dialoguer::Confirm;

pub async fn run(ctx: &AppContext, action: StudentAction) -> Result<()> {
    match action {
        StudentAction::List { sort_by, search } => {
            if !ctx.enter_route("students").await {
                return Ok(());
            }
            let records = students::list(&ctx.api, sort_by.as_deref()).await?;
            let shown = match search.as_deref() {
                Some(term) => students::search(&records, term),
                None => records.iter().collect(),
            };
            print_table(&shown);
        }
        StudentAction::Show { student_id } => {
            if !ctx.enter_route("students").await {
                return Ok(());
            }
            let record = students::detail(&ctx.api, student_id).await?;
            print_detail(&record);
        }
        StudentAction::Add(args) => {
            if !ctx.enter_route("input-scores").await {
                return Ok(());
            }
            let sheet = sheet_from_args(
                ScoreSheet::new(args.student_id, args.semester.clone().unwrap_or_default()),
                &args,
            )?;
            let record = students::create(&ctx.api, &sheet).await?;
            println!("Saved scores for student {}", record.student_id);
        }
        StudentAction::Edit(args) => {
            if !ctx.enter_route("input-scores").await {
                return Ok(());
            }
            let current = students::detail(&ctx.api, args.student_id).await?;
            let sheet = sheet_from_args(ScoreSheet::from_record(&current), &args)?;
            let record = students::update(&ctx.api, &sheet).await?;
            println!("Updated scores for student {}", record.student_id);
        }
        StudentAction::Delete { student_id, yes } => {
            if !ctx.enter_route("input-scores").await {
                return Ok(());
            }
            if !yes
                && !Confirm::new()
                    .with_prompt(format!("Delete performance record of student {}?", student_id))
                    .default(false)
                    .interact()
                    .map_err(prompt_error)?
            {
                println!("Cancelled.");
                return Ok(());
            }
            let message = students::delete(&ctx.api, student_id).await?;
            println!("{}", message);
        }
        StudentAction::Upload { file } => {
            if !ctx.enter_route("input-scores").await {
                return Ok(());
            }
            let imported = students::upload_csv(&ctx.api, &file).await?;
            println!("Imported {} record(s) from {}", imported.len(), file.display());
        }
    }
    Ok(())
}

/// Apply command-line values on top of `sheet`
fn sheet_from_args(mut sheet: ScoreSheet, args: &ScoreArgs) -> Result<ScoreSheet> {
    if let Some(semester) = &args.semester {
        sheet = sheet.with_semester(semester.clone());
    }
    if let Some(absences) = args.absences {
        sheet = sheet.with_absences(absences);
    }
    if let Some(pct) = args.assignment_pct {
        sheet = sheet.with_assignment_percentage(pct);
    }
    for raw in &args.scores {
        let (subject, values) = parse_score_arg(raw)?;
        for (kind, value) in [ScoreKind::Exam, ScoreKind::Task, ScoreKind::Quiz]
            .into_iter()
            .zip(values)
        {
            sheet.set(&subject, kind, value)?;
        }
    }
    Ok(sheet)
}

/// Parse "Subject=exam[,task[,quiz]]".
///
/// Subject names may contain commas, so the split is on the last '='.
fn parse_score_arg(raw: &str) -> Result<(String, Vec<i64>)> {
    let Some((subject, values)) = raw.rsplit_once('=') else {
        return Err(TrackerError::validation(
            "score",
            format!("expected Subject=exam,task,quiz, got '{}'", raw),
        ));
    };
    let values = values
        .split(',')
        .map(|v| {
            v.trim().parse::<i64>().map_err(|_| {
                TrackerError::validation("score", format!("'{}' is not a number", v.trim()))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    if values.is_empty() || values.len() > 3 {
        return Err(TrackerError::validation("score", "give one to three values"));
    }
    Ok((subject.trim().to_string(), values))
}

fn print_table(records: &[&PerformanceRecord]) {
    if records.is_empty() {
        println!("No performance records.");
        return;
    }
    println!(
        "{:<8} {:<28} {:<10} {:>8}  {}",
        "ID", "Name", "Semester", "Average", "Prediction"
    );
    for r in records {
        println!(
            "{:<8} {:<28} {:<10} {:>8}  {}",
            r.student_id,
            r.display_name(),
            r.semester.as_deref().unwrap_or("-"),
            r.final_average
                .map(|a| format!("{:.1}", a))
                .unwrap_or_else(|| "-".to_string()),
            r.prediction_status.as_deref().unwrap_or("-"),
        );
    }
}

fn print_detail(r: &PerformanceRecord) {
    println!("Student:     {} ({})", r.display_name(), r.student_id);
    println!("Semester:    {}", r.semester.as_deref().unwrap_or("-"));
    if let Some(absences) = r.absences {
        println!("Absences:    {}", absences);
    }
    if let Some(pct) = r.assignment_percentage {
        println!("Assignments: {}%", pct);
    }
    if let Some(avg) = r.final_average {
        println!("Average:     {:.1}", avg);
    }
    println!("Prediction:  {}", r.prediction_status.as_deref().unwrap_or("-"));
    println!();
    println!("{:<46} {:>5} {:>5} {:>5}", "Subject", "Exam", "Task", "Quiz");
    let cell = |map: &students::SubjectScores, subject: &str| {
        map.get(subject)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    for subject in SUBJECTS {
        println!(
            "{:<46} {:>5} {:>5} {:>5}",
            subject,
            cell(&r.exam_scores, subject),
            cell(&r.task_scores, subject),
            cell(&r.quiz_scores, subject),
        );
    }
}
