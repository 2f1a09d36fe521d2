// ABOUTME: Registered user model
// ABOUTME: Users author recipes, follow other authors, and own favorites and carts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Recipe Platform

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Login email (unique, stored lowercase)
    pub email: String,
    /// Public handle (unique)
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Admins may modify any recipe
    pub is_admin: bool,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Data required to register a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Login email
    pub email: String,
    /// Public handle
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Grant admin rights
    #[serde(default)]
    pub is_admin: bool,
}
