//! Profile inspection commands.

use anyhow::Result;
use clap::Subcommand;
use sqlgate_config::{ConnectionProfile, ProcessEnv, ProfileKind, ProfileRegistry};

use super::output::print_table;

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    /// List every resolved profile
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Include the real password instead of a mask
        #[arg(long)]
        reveal: bool,
    },
    /// Show a single resolved profile
    Show {
        /// Profile name: primary, write, or read
        kind: ProfileKind,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Include the real password instead of a mask
        #[arg(long)]
        reveal: bool,
    },
}

impl ProfileAction {
    pub fn wants_json(&self) -> bool {
        match self {
            ProfileAction::List { json, .. } | ProfileAction::Show { json, .. } => *json,
        }
    }
}

pub fn run(action: ProfileAction) -> Result<()> {
    let registry = ProfileRegistry::from_env(&ProcessEnv, sqlgate_db::driver_capabilities());

    match action {
        ProfileAction::List { json, reveal } => {
            let profiles: Vec<ConnectionProfile> = registry
                .iter()
                .map(|profile| for_display(profile, reveal))
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&profiles)?);
            } else {
                let rows = profiles
                    .iter()
                    .map(|profile| {
                        vec![
                            profile.kind.to_string(),
                            if profile.kind == registry.default_kind() {
                                "yes".to_string()
                            } else {
                                String::new()
                            },
                            profile.endpoint(),
                            profile.database.clone(),
                            profile.username.clone(),
                            options_summary(profile),
                        ]
                    })
                    .collect();
                print_table(
                    &["Profile", "Default", "Endpoint", "Database", "Username", "Options"],
                    rows,
                );
            }
        }
        ProfileAction::Show { kind, json, reveal } => {
            let profile = for_display(registry.get(kind), reveal);

            if json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                println!("Profile:    {}", profile.kind);
                println!("Endpoint:   {}", profile.endpoint());
                println!("Database:   {}", profile.database);
                println!("Username:   {}", profile.username);
                println!("Password:   {}", profile.password);
                println!("Charset:    {}", profile.charset);
                println!("Collation:  {}", profile.collation);
                if let Some(socket) = &profile.socket {
                    println!("Socket:     {}", socket);
                }
                for (key, value) in &profile.options {
                    println!("Option:     {} = {}", key, value);
                }
            }
        }
    }

    Ok(())
}

fn for_display(profile: &ConnectionProfile, reveal: bool) -> ConnectionProfile {
    if reveal {
        profile.clone()
    } else {
        profile.redacted()
    }
}

fn options_summary(profile: &ConnectionProfile) -> String {
    if profile.options.is_empty() {
        "-".to_string()
    } else {
        profile
            .options
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
