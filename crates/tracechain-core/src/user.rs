//! Registered supply-chain participants.

use serde::{Deserialize, Serialize};

use crate::types::Role;

/// A participant in the supply chain.
///
/// The id and role are fixed at registration. Users are never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub company: String,
    pub location: String,
    pub active: bool,
}

impl User {
    /// A newly registered, active participant.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        company: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role,
            company: company.into(),
            location: location.into(),
            active: true,
        }
    }

    pub fn is_manufacturer(&self) -> bool {
        self.role == Role::Manufacturer
    }
}

/// Registration details for a new participant.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub company: String,
    pub location: String,
}

impl NewUser {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<Role>,
        company: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role: role.into(),
            company: company.into(),
            location: location.into(),
        }
    }

    /// The active user record this registration produces.
    pub fn into_user(self) -> User {
        User::new(self.id, self.name, self.email, self.role, self.company, self.location)
    }
}
