// src/cli/notifications.rs
// Notification command

use super::{AppContext, print_redirect};
use crate::api::notifications::{self, newest_first, unread_count};
use crate::auth::Role;
use crate::error::Result;
use crate::routes::{Access, Decision, guard};

pub async fn run(ctx: &AppContext, all: bool, unread: bool) -> Result<()> {
    if !ctx.enter_route("notifications").await {
        return Ok(());
    }

    let mut list = if all {
        // the full feed is staff-only
        if let Decision::Redirect(view) = guard(&ctx.session.state(), Access::Role(Role::Teacher)) {
            print_redirect(view);
            return Ok(());
        }
        notifications::all(&ctx.api).await?
    } else {
        notifications::mine(&ctx.api).await?
    };

    newest_first(&mut list);
    println!("{} notification(s), {} unread", list.len(), unread_count(&list));
    for n in list.iter().filter(|n| !unread || !n.is_read) {
        let marker = if n.is_read { " " } else { "*" };
        let when = n
            .created_at
            .as_ref()
            .map(|t| t.to_string())
            .unwrap_or_default();
        println!(
            "{} [{}] {} {}",
            marker,
            n.kind.as_deref().unwrap_or("INFO"),
            n.title.as_deref().unwrap_or("(no title)"),
            when
        );
        if let Some(message) = &n.message {
            println!("    {}", message);
        }
    }
    Ok(())
}
