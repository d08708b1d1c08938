// Copyright 2026 Allot Contributors
// SPDX-License-Identifier: Apache-2.0

//! In-memory user and PAN registry.
//!
//! Process-lifetime only: data is lost on restart. The store is a
//! `RwLock`-guarded map so bulk checks can read concurrently while
//! registrations serialize writes.

use crate::registrar::{is_valid_pan, normalize_pan};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A PAN card attached to a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanCard {
    /// Normalized (uppercase) PAN.
    pub pan_number: String,
    /// Card holder's name, possibly empty.
    pub holder_name: String,
    pub added_at: DateTime<Utc>,
}

/// A registered user and their PAN cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub pan_cards: Vec<PanCard>,
    pub created_at: DateTime<Utc>,
}

/// Errors from registry operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("user not found")]
    UserNotFound,
    #[error("invalid PAN format: {0}")]
    InvalidPan(String),
}

/// The in-memory user store. Cheap to clone; clones share the same map.
#[derive(Clone, Default)]
pub struct UserRegistry {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user. Idempotent on email: a second registration with a
    /// known email returns the existing user. The boolean is `true` when a
    /// new user was created.
    pub async fn register(&self, name: &str, email: &str, phone: &str) -> (User, bool) {
        let mut users = self.users.write().await;

        if let Some(existing) = users.values().find(|u| u.email == email) {
            return (existing.clone(), false);
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            pan_cards: Vec::new(),
            created_at: Utc::now(),
        };
        users.insert(user.id.clone(), user.clone());
        (user, true)
    }

    /// Attach a PAN card to a user. The PAN is normalized to uppercase and
    /// validated; adding an already-present PAN is a no-op that returns the
    /// unchanged user. The boolean is `true` when the card was added.
    pub async fn add_pan(
        &self,
        user_id: &str,
        pan_number: &str,
        holder_name: &str,
    ) -> Result<(User, bool), RegistryError> {
        let pan = normalize_pan(pan_number);
        if !is_valid_pan(&pan) {
            return Err(RegistryError::InvalidPan(pan));
        }

        let mut users = self.users.write().await;
        let user = users.get_mut(user_id).ok_or(RegistryError::UserNotFound)?;

        if user.pan_cards.iter().any(|c| c.pan_number == pan) {
            return Ok((user.clone(), false));
        }

        user.pan_cards.push(PanCard {
            pan_number: pan,
            holder_name: holder_name.to_string(),
            added_at: Utc::now(),
        });
        Ok((user.clone(), true))
    }

    /// Fetch a user by id.
    pub async fn get(&self, user_id: &str) -> Option<User> {
        self.users.read().await.get(user_id).cloned()
    }
}
