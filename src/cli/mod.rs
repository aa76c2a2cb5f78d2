// src/cli/mod.rs
// Command-line front end: one command per view, each behind the route guard

use crate::api::{ApiClient, NavigationLog};
use crate::auth::{FileTokenStore, MemoryTokenStore, SessionManager, TokenStore};
use crate::config::{Overrides, TrackerConfig};
use crate::http::create_shared_client;
use crate::routes::{Decision, View, guard_path, table};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub mod account;
pub mod dashboard;
pub mod notifications;
pub mod predictions;
pub mod profile;
pub mod students;

/// How long a command waits for the session to resolve before giving up
const RESOLVE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "student-tracker")]
#[command(about = "Student performance tracker client")]
#[command(version)]
pub struct Cli {
    /// Backend base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Where the credential is kept between runs
    #[arg(long, global = true)]
    pub token_file: Option<PathBuf>,

    /// Keep the credential in memory only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_url: self.base_url.clone(),
            token_file: self.token_file.clone(),
            ephemeral: self.ephemeral,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the credential
    Login {
        /// Email or username (prompted when omitted)
        #[arg(short, long)]
        user: Option<String>,

        /// Password (prompted when omitted)
        #[arg(long, env = "STUDENT_TRACKER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Drop the stored credential
    Logout,

    /// Show who is logged in
    Whoami,

    /// Print the raw stored credential
    Token,

    /// Show the views available to the current role
    Menu,

    /// Overview for the logged-in role
    Dashboard,

    /// Evaluate the route guard for a path
    Check {
        #[arg(index = 1)]
        path: String,
    },

    /// View or edit your profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Student performance records
    Students {
        #[command(subcommand)]
        action: StudentAction,
    },

    /// Performance predictions
    Predictions {
        #[command(subcommand)]
        action: PredictionAction,
    },

    /// Your notifications
    Notifications {
        /// Every user's notifications (teachers)
        #[arg(long)]
        all: bool,

        /// Only unread ones
        #[arg(long)]
        unread: bool,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show your profile
    Show,
    /// Edit profile fields; omitted fields keep their value
    Edit {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Change your password (prompted)
    Password,
}

#[derive(Subcommand)]
pub enum StudentAction {
    /// List performance records
    List {
        /// Backend sort field
        #[arg(long)]
        sort_by: Option<String>,
        /// Filter by student name
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one student's record
    Show {
        #[arg(index = 1)]
        student_id: i64,
    },
    /// Enter scores for a student
    Add(ScoreArgs),
    /// Change an existing record; unspecified values are kept
    Edit(ScoreArgs),
    /// Delete a student's record
    Delete {
        #[arg(index = 1)]
        student_id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Bulk upload score sheets from CSV
    Upload {
        #[arg(index = 1)]
        file: PathBuf,
    },
}

#[derive(clap::Args)]
pub struct ScoreArgs {
    /// Student id
    #[arg(index = 1)]
    pub student_id: i64,

    #[arg(long)]
    pub semester: Option<String>,

    #[arg(long)]
    pub absences: Option<i64>,

    /// Share of assignments submitted, 0-100
    #[arg(long)]
    pub assignment_pct: Option<i64>,

    /// Scores as "Subject=exam,task,quiz"; repeatable
    #[arg(long = "score")]
    pub scores: Vec<String>,
}

#[derive(Subcommand)]
pub enum PredictionAction {
    /// Run predictions for every student
    Batch,
    /// List stored predictions
    List {
        #[arg(long)]
        sort_by: Option<String>,
        /// Only print the trend breakdown
        #[arg(long)]
        summary: bool,
    },
    /// Predict one student
    Show {
        #[arg(index = 1)]
        student_id: i64,
    },
}

/// Everything a command needs, wired once per process
pub struct AppContext {
    pub config: TrackerConfig,
    pub session: Arc<SessionManager>,
    pub api: ApiClient,
    pub navigation: Arc<NavigationLog>,
}

impl AppContext {
    pub fn new(config: TrackerConfig) -> Self {
        let http = create_shared_client(config.timeout);
        let store: Arc<dyn TokenStore> = if config.ephemeral {
            Arc::new(MemoryTokenStore::new())
        } else {
            Arc::new(FileTokenStore::new(config.token_file.clone()))
        };
        let session = Arc::new(SessionManager::new(
            store,
            http.clone(),
            config.api_url.clone(),
        ));
        let navigation = Arc::new(NavigationLog::new());
        let api = ApiClient::new(
            http,
            config.api_url.clone(),
            session.clone(),
            navigation.clone(),
        );
        Self {
            config,
            session,
            api,
            navigation,
        }
    }

    /// Resolve the session and run the guard for `path`.
    ///
    /// Prints why access was refused and returns false in that case.
    pub async fn enter(&self, path: &str) -> bool {
        self.session.initialize();
        let state = match tokio::time::timeout(RESOLVE_TIMEOUT, self.session.wait_resolved()).await {
            Ok(state) => state,
            Err(_) => self.session.state(),
        };

        match guard_path(&state, path) {
            Decision::Render => true,
            Decision::Loading => {
                println!("Loading...");
                false
            }
            Decision::Redirect(view) => {
                print_redirect(view);
                false
            }
        }
    }

    /// Same as `enter`, by route id
    pub async fn enter_route(&self, id: &str) -> bool {
        match table::find_by_id(id) {
            Some(route) => self.enter(route.path).await,
            None => {
                print_redirect(View::NotFound);
                false
            }
        }
    }

    /// Tell the user when a request forced them back to login
    pub fn report_forced_navigation(&self) {
        if self.navigation.last() == Some(View::Login) {
            eprintln!("Your session has expired. Please log in again.");
        }
    }
}

pub fn print_redirect(view: View) {
    match view {
        View::Login => println!("Please log in first (student-tracker login)."),
        View::Unauthorized => println!("You are not authorized to view this page."),
        View::NotFound => println!("Page not found."),
    }
}

/// Dispatch a parsed command
pub async fn run(ctx: &AppContext, command: Commands) -> crate::Result<()> {
    let result = match command {
        Commands::Login { user, password } => account::login(ctx, user, password).await,
        Commands::Logout => {
            account::logout(ctx);
            Ok(())
        }
        Commands::Whoami => {
            account::whoami(ctx).await;
            Ok(())
        }
        Commands::Token => {
            account::token(ctx);
            Ok(())
        }
        Commands::Menu => {
            account::menu(ctx).await;
            Ok(())
        }
        Commands::Dashboard => dashboard::run(ctx).await,
        Commands::Check { path } => {
            account::check(ctx, &path).await;
            Ok(())
        }
        Commands::Profile { action } => profile::run(ctx, action).await,
        Commands::Students { action } => students::run(ctx, action).await,
        Commands::Predictions { action } => predictions::run(ctx, action).await,
        Commands::Notifications { all, unread } => notifications::run(ctx, all, unread).await,
    };
    ctx.report_forced_navigation();
    result
}
