// ABOUTME: Administrative CLI for provisioning users, reference data, and access tokens
// ABOUTME: Talks to the database directly and mints tokens with the shared JWT secret
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

//! Administration utility for the Pantry server.
//!
//! Usage:
//! ```bash
//! # Create an admin account
//! cargo run --bin pantry-admin -- create-user --email chef@example.com --username chef \
//!     --first-name Anna --last-name Chef --admin
//!
//! # Mint a bearer token for an account (uses JWT_SECRET)
//! cargo run --bin pantry-admin -- issue-token --email chef@example.com
//!
//! # Seed reference data
//! cargo run --bin pantry-admin -- create-tag --name Breakfast --slug breakfast --color "#E26C2D"
//! cargo run --bin pantry-admin -- create-ingredient --name flour --unit g
//!
//! # Print a fresh random secret for JWT_SECRET
//! cargo run --bin pantry-admin -- generate-secret
//! ```

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use pantry_server::{
    auth::{generate_jwt_secret, AuthManager},
    config::{DatabaseUrl, ServerConfig},
    database::Database,
    models::{NewIngredient, NewTag, NewUser},
};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "pantry-admin",
    about = "Pantry server administration",
    long_about = "Provision users, tags, and ingredients, and mint bearer tokens for the Pantry API."
)]
struct AdminArgs {
    #[command(subcommand)]
    command: AdminCommand,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Subcommand)]
enum AdminCommand {
    /// Create a user account
    CreateUser {
        /// Email address
        #[arg(long)]
        email: String,
        /// Login name
        #[arg(long)]
        username: String,
        /// Given name
        #[arg(long)]
        first_name: String,
        /// Family name
        #[arg(long)]
        last_name: String,
        /// Grant admin rights
        #[arg(long)]
        admin: bool,
    },
    /// Mint a bearer token for an existing user
    IssueToken {
        /// Email of the account
        #[arg(long)]
        email: String,
    },
    /// Create a tag
    CreateTag {
        /// Display name
        #[arg(long)]
        name: String,
        /// URL-safe identifier
        #[arg(long)]
        slug: String,
        /// Hex color such as #E26C2D
        #[arg(long)]
        color: String,
    },
    /// Create an ingredient
    CreateIngredient {
        /// Ingredient name
        #[arg(long)]
        name: String,
        /// Measurement unit
        #[arg(long)]
        unit: String,
    },
    /// Print a random hex-encoded secret suitable for `JWT_SECRET`
    GenerateSecret,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = AdminArgs::parse();

    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(level))
        .with_target(false)
        .init();

    if matches!(args.command, AdminCommand::GenerateSecret) {
        println!("{}", hex::encode(generate_jwt_secret()?));
        return Ok(());
    }

    let mut config = ServerConfig::from_env()?;
    if let Some(url) = args.database_url.as_deref() {
        config.database.url = DatabaseUrl::parse_url(url)?;
    }
    let database = Database::new(&config.database.url, config.database.max_connections).await?;

    match args.command {
        AdminCommand::CreateUser {
            email,
            username,
            first_name,
            last_name,
            admin,
        } => {
            let user = database
                .users()
                .create(&NewUser {
                    email,
                    username,
                    first_name,
                    last_name,
                    is_admin: admin,
                })
                .await?;
            info!("Created user {} ({})", user.username, user.id);
            println!("{}", user.id);
        }
        AdminCommand::IssueToken { email } => {
            let secret = config
                .auth
                .jwt_secret
                .as_deref()
                .ok_or_else(|| anyhow!("JWT_SECRET must be set to issue tokens the server accepts"))?;
            let user = database
                .users()
                .get_by_email(&email)
                .await?
                .ok_or_else(|| anyhow!("No user with email {email}"))?;
            let manager = AuthManager::new(secret.as_bytes(), config.auth.jwt_expiry_hours);
            println!("{}", manager.generate_token(&user)?);
        }
        AdminCommand::CreateTag { name, slug, color } => {
            let tag = database.tags().create(&NewTag { name, slug, color }).await?;
            info!("Created tag {} ({})", tag.slug, tag.id);
            println!("{}", tag.id);
        }
        AdminCommand::CreateIngredient { name, unit } => {
            let ingredient = database
                .ingredients()
                .create(&NewIngredient {
                    name,
                    measurement_unit: unit,
                })
                .await?;
            info!(
                "Created ingredient {} ({}) {}",
                ingredient.name, ingredient.measurement_unit, ingredient.id
            );
            println!("{}", ingredient.id);
        }
        AdminCommand::GenerateSecret => {}
    }

    Ok(())
}
