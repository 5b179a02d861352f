//! # Habitual
//!
//! A calendar-based habit and task tracker for the terminal. Habitual combines a fast CLI for quick entry with a TUI (Terminal User Interface) for working through a day interactively.
//!
//! ## Features
//!
//! *   **Daily task lists**: every calendar day carries its own ordered task list and an optional note.
//! *   **Templates**: reusable lists of task titles ("Morning": Stretch, Meditate) that can seed any day. A day you have edited by hand is protected from template application unless you force it.
//! *   **Themes**: five built-in palettes plus user-defined themes (HSL color slots); the active theme styles the TUI.
//! *   **Users**: lightweight local identities. Each user (and the guest) has fully independent tasks, themes and active theme; templates are shared.
//! *   **Data Persistence**: all state lives in one JSON file in the standard XDG data directory.
//!
//! ## Installation
//!
//! ```bash
//! cargo install --path .
//! ```
//!
//! ## Usage
//!
//! ### Interactive Mode (TUI)
//!
//! Run without arguments to launch the interactive UI:
//!
//! ```bash
//! habitual
//! # or explicitly
//! habitual ui
//! ```
//!
//! #### TUI Key Bindings
//!
//! **Global**
//! *   `q`: Quit
//! *   `Left` / `Right`: Previous / next day
//! *   `v`: Switch between Day and Templates view
//! *   `t`: Cycle through themes
//!
//! **Day View**
//! *   `a`: Add task
//! *   `Space`: Toggle completion
//! *   `e`: Edit title
//! *   `d`: Delete task
//! *   `n`: Edit the day's note
//!
//! **Templates View**
//! *   `Enter`: Apply selected template to the current day
//! *   `F`: Force-apply (overwrites a customized day)
//!
//! ### Command Line Interface (CLI)
//!
//! ```bash
//! # Tasks (dates default to today)
//! habitual add "Run 5k" --date 2025-01-10
//! habitual list --date 2025-01-10
//! habitual toggle 1
//! habitual note "Slept badly, take it easy"
//!
//! # Templates
//! habitual template add Morning Stretch Meditate Journal
//! habitual template apply Morning --date 2025-01-10
//! habitual template apply Morning --force   # overwrite a customized day
//!
//! # Themes
//! habitual theme list
//! habitual theme set default_dark
//! habitual theme add Dusk --color "background=270 20% 12%" --color "foreground=270 10% 90%"
//!
//! # Users
//! habitual user login you@example.com
//! habitual user logout
//! ```
//!
//! ## Data Storage
//!
//! State is saved in your local data directory:
//! *   Linux: `~/.local/share/habitual/state.json`
//! *   macOS: `~/Library/Application Support/habitual/state.json`
//! *   Windows: `%APPDATA%\habitual\state.json`
//!
//! You can override this by setting the `HABITUAL_DB` environment variable.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;

use habitual::commands::*;
use habitual::tui::run_tui;

#[derive(Parser)]
#[command(name = "habitual")]
#[command(about = "Calendar habit and task tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task to a day
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        /// Day in YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List a day's tasks and note
    List {
        /// Day in YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Toggle a task's completion
    Toggle {
        /// Task position as shown by `list` (1-based)
        index: usize,
        /// Day in YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Edit a task's title
    Edit {
        /// Task position as shown by `list` (1-based)
        index: usize,
        /// New title
        #[arg(short, long)]
        title: String,
        /// Day in YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Remove a task
    Remove {
        /// Task position as shown by `list` (1-based)
        index: usize,
        /// Day in YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Set a day's note
    Note {
        /// Note text
        text: String,
        /// Day in YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Manage task templates
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },
    /// Manage themes
    Theme {
        #[command(subcommand)]
        command: ThemeCommands,
    },
    /// Manage the current user
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Reset the database (delete all data)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui,
}

#[derive(Subcommand)]
enum TemplateCommands {
    /// Add a new template
    Add {
        /// Template name
        name: String,
        /// Task titles, in order
        titles: Vec<String>,
    },
    /// List templates
    List,
    /// Edit a template
    Edit {
        /// Template id or name
        reference: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// Replacement task titles, in order
        #[arg(short, long = "task")]
        titles: Option<Vec<String>>,
    },
    /// Remove a template
    Remove {
        /// Template id or name
        reference: String,
    },
    /// Apply a template to a day
    Apply {
        /// Template id or name
        reference: String,
        /// Day in YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Overwrite the day even if it has custom tasks
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum ThemeCommands {
    /// List predefined and custom themes
    List,
    /// Set the active theme
    Set {
        /// Theme id or name
        reference: String,
    },
    /// Add a custom theme
    Add {
        /// Theme name
        name: String,
        /// Color slot override, e.g. "background=240 10% 3.9%" (repeatable)
        #[arg(short, long = "color")]
        colors: Vec<String>,
    },
    /// Remove a custom theme
    Remove {
        /// Theme id or name
        reference: String,
    },
    /// Show the resolved active color set
    Show,
}

#[derive(Subcommand)]
enum UserCommands {
    /// Log in with an email (local label, no real authentication)
    Login {
        /// Email address
        email: String,
    },
    /// Log out and return to the guest partition
    Logout,
    /// Show the current user
    Whoami,
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Add { title, date }) => cmd_add(title, date, false),
        Some(Commands::List { date }) => cmd_list(date),
        Some(Commands::Toggle { index, date }) => cmd_toggle(index, date, false),
        Some(Commands::Edit { index, title, date }) => cmd_edit(index, title, date, false),
        Some(Commands::Remove { index, date }) => cmd_remove(index, date, false),
        Some(Commands::Note { text, date }) => cmd_note(text, date, false),
        Some(Commands::Template { command }) => match command {
            TemplateCommands::Add { name, titles } => cmd_template_add(name, titles, false),
            TemplateCommands::List => cmd_template_list(),
            TemplateCommands::Edit { reference, name, titles } => {
                cmd_template_edit(reference, name, titles, false)
            }
            TemplateCommands::Remove { reference } => cmd_template_remove(reference, false),
            TemplateCommands::Apply { reference, date, force } => {
                cmd_template_apply(reference, date, force, false)
            }
        },
        Some(Commands::Theme { command }) => match command {
            ThemeCommands::List => cmd_theme_list(),
            ThemeCommands::Set { reference } => cmd_theme_set(reference, false),
            ThemeCommands::Add { name, colors } => cmd_theme_add(name, colors, false),
            ThemeCommands::Remove { reference } => cmd_theme_remove(reference, false),
            ThemeCommands::Show => cmd_theme_show(),
        },
        Some(Commands::User { command }) => match command {
            UserCommands::Login { email } => cmd_login(email, false),
            UserCommands::Logout => cmd_logout(false),
            UserCommands::Whoami => cmd_whoami(),
        },
        Some(Commands::Reset { force }) => cmd_reset(force),
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    return;
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "habitual", &mut io::stdout());
        }
        Some(Commands::Ui) | None => {
            if let Err(e) = run_tui() {
                eprintln!("Error running TUI: {}", e);
            }
        }
    }
}
