// src/cli/dashboard.rs
// Role-switched landing view: prediction overview for teachers, performance
// summary for students and parents

use super::AppContext;
use super::predictions::print_summary;
use crate::api::predictions::{self, summarize};
use crate::api::students;
use crate::auth::Role;
use crate::error::Result;

pub fn title(role: Role) -> &'static str {
    match role {
        Role::Teacher => "Teacher dashboard",
        Role::Parent => "Parent dashboard",
        Role::Student => "Student dashboard",
    }
}

pub async fn run(ctx: &AppContext) -> Result<()> {
    if !ctx.enter_route("dashboard").await {
        return Ok(());
    }
    let Some(identity) = ctx.session.identity() else {
        return Ok(());
    };

    println!("{} ({})", title(identity.role), identity.username);
    match identity.role {
        Role::Teacher => {
            let results = predictions::batch(&ctx.api).await?;
            println!("Students with predictions: {}", results.len());
            print_summary(&summarize(results.iter().map(|p| p.status.as_deref())));
        }
        Role::Parent | Role::Student => {
            let records = students::list(&ctx.api, None).await?;
            print_summary(&summarize(
                records.iter().map(|r| r.prediction_status.as_deref()),
            ));
        }
    }
    Ok(())
}
