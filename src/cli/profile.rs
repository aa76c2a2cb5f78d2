// src/cli/profile.rs
// Profile commands

use super::account::prompt_error;
use super::{AppContext, ProfileAction};
use crate::api::profile::{self, PasswordChange, Profile, ProfileUpdate};
use crate::error::Result;
use dialoguer::Password;

pub async fn run(ctx: &AppContext, action: ProfileAction) -> Result<()> {
    match action {
        ProfileAction::Show => {
            if !ctx.enter_route("profile").await {
                return Ok(());
            }
            let profile = profile::fetch(&ctx.api).await?;
            print_profile(&profile);
        }
        ProfileAction::Edit {
            name,
            username,
            email,
            phone,
        } => {
            if !ctx.enter_route("profile-edit").await {
                return Ok(());
            }
            let current = profile::fetch(&ctx.api).await?;
            let mut changes = ProfileUpdate::from_profile(&current);
            if let Some(name) = name {
                changes.name = name;
            }
            if let Some(username) = username {
                changes.username = username;
            }
            if let Some(email) = email {
                changes.email = email;
            }
            if let Some(phone) = phone {
                changes.phone = phone;
            }
            let message = profile::update(&ctx.api, &changes).await?;
            println!("{}", message);
        }
        ProfileAction::Password => {
            if !ctx.enter_route("change-password").await {
                return Ok(());
            }
            let old_password = Password::new()
                .with_prompt("Current password")
                .interact()
                .map_err(prompt_error)?;
            let new_password = Password::new()
                .with_prompt("New password")
                .interact()
                .map_err(prompt_error)?;
            let confirmation = Password::new()
                .with_prompt("Confirm new password")
                .interact()
                .map_err(prompt_error)?;
            let change = PasswordChange {
                old_password,
                new_password,
                confirmation,
            };
            let message = profile::change_password(&ctx.api, &change).await?;
            println!("{}", message);
        }
    }
    Ok(())
}

fn print_profile(profile: &Profile) {
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    println!("Name:     {}", or_dash(&profile.name));
    println!("Username: {}", profile.username);
    println!("Email:    {}", or_dash(&profile.email));
    println!("Phone:    {}", or_dash(&profile.phone));
    if let Some(role) = profile.role {
        println!("Role:     {}", role);
    }
    if let Some(created) = &profile.created_at {
        println!("Joined:   {}", created);
    }
}
