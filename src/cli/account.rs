// src/cli/account.rs
// Session commands: login, logout, whoami, token, menu, check

use super::{AppContext, print_redirect};
use crate::error::{Result, TrackerError};
use crate::routes::{Decision, View, guard_path, menu_for};
use dialoguer::{Input, Password};

pub async fn login(ctx: &AppContext, user: Option<String>, password: Option<String>) -> Result<()> {
    ctx.session.initialize();

    let identifier = match user {
        Some(user) => user,
        None => Input::<String>::new()
            .with_prompt("Email or username")
            .interact_text()
            .map_err(prompt_error)?,
    };
    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(prompt_error)?,
    };

    if identifier.trim().is_empty() || password.is_empty() {
        return Err(TrackerError::validation(
            "credentials",
            "email/username and password are required",
        ));
    }

    let identity = ctx.session.try_login(identifier.trim(), &password).await?;
    println!("Logged in as {}", identity);
    Ok(())
}

pub fn logout(ctx: &AppContext) {
    ctx.session.logout();
    println!("Logged out.");
}

pub async fn whoami(ctx: &AppContext) {
    ctx.session.initialize();
    match ctx.session.wait_resolved().await.identity() {
        Some(identity) => println!("{}", identity),
        None => println!("Not logged in."),
    }
}

pub fn token(ctx: &AppContext) {
    match ctx.session.current_token() {
        Some(token) => println!("{}", token),
        None => println!("No stored credential."),
    }
}

pub async fn menu(ctx: &AppContext) {
    if !ctx.enter("/dashboard").await {
        return;
    }
    let Some(identity) = ctx.session.identity() else {
        return;
    };
    println!("Menu for {} ({}):", identity.username, identity.role);
    for route in menu_for(identity.role) {
        println!("  {:<22} {}", route.label, route.path);
    }
}

/// Print the guard's decision for a path without visiting it
pub async fn check(ctx: &AppContext, path: &str) {
    ctx.session.initialize();
    let state = ctx.session.wait_resolved().await;
    match guard_path(&state, path) {
        Decision::Render => println!("{}: allowed", path),
        Decision::Loading => println!("{}: loading", path),
        Decision::Redirect(View::Login) => println!("{}: redirect to {} (log in first)", path, View::Login),
        Decision::Redirect(view) => {
            print!("{}: redirect to {} - ", path, view);
            print_redirect(view);
        }
    }
}

pub(crate) fn prompt_error(e: dialoguer::Error) -> TrackerError {
    TrackerError::Io(std::io::Error::other(e.to_string()))
}
