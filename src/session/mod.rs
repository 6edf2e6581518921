//! Simulated login and role-based navigation.
//!
//! There is no backend: [`DemoAuthenticator`] keeps three demo profiles in
//! memory. It gates which screens a session may open and nothing more.

use crate::core::{BoardError, Result};
use crate::screens::Screen;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Administrator,
    Manager,
    Employee,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Administrator, Role::Manager, Role::Employee];

    /// Screens shown in this role's sidebar, in display order.
    pub fn navigation(self) -> &'static [Screen] {
        match self {
            Self::Administrator => &Screen::ALL,
            Self::Manager => &[
                Screen::Dashboard,
                Screen::Tasks,
                Screen::Reports,
                Screen::Directory,
                Screen::Tickets,
                Screen::Settings,
            ],
            Self::Employee => &[
                Screen::Dashboard,
                Screen::Tasks,
                Screen::Directory,
                Screen::Tickets,
                Screen::Settings,
            ],
        }
    }

    pub fn can_access(self, screen: Screen) -> bool {
        self.navigation().contains(&screen)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Administrator => "administrator",
            Self::Manager => "manager",
            Self::Employee => "employee",
        };
        f.write_str(label)
    }
}

impl FromStr for Role {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "administrator" | "admin" => Ok(Self::Administrator),
            "manager" => Ok(Self::Manager),
            "employee" => Ok(Self::Employee),
            other => Err(BoardError::validation("role", format!("unknown role '{}'", other))),
        }
    }
}

/// Authenticated user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub display_name: String,
    pub role: Role,
}

/// Credential check used by [`AppSession::login`].
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, username: &str, password: &str) -> Result<User>;
}

struct Account {
    user: User,
    password_hash: String,
}

/// In-memory demo accounts with bcrypt-hashed passwords.
pub struct DemoAuthenticator {
    accounts: HashMap<String, Account>,
}

impl DemoAuthenticator {
    /// Lowest cost bcrypt accepts; these hashes only guard a demo.
    const HASH_COST: u32 = 4;

    /// The three demo profiles: `admin`, `manager` and `employee`, each with
    /// password `<username>123`.
    pub fn new() -> Result<Self> {
        let mut auth = Self::empty();
        auth.add_account("admin", "Alex Admin", Role::Administrator, "admin123")?;
        auth.add_account("manager", "Morgan Manager", Role::Manager, "manager123")?;
        auth.add_account("employee", "Eli Employee", Role::Employee, "employee123")?;
        Ok(auth)
    }

    pub fn empty() -> Self {
        Self {
            accounts: HashMap::new(),
        }
    }

    pub fn add_account(&mut self, username: &str, display_name: &str, role: Role, password: &str) -> Result<()> {
        if username.trim().is_empty() {
            return Err(BoardError::validation("username", "is required"));
        }
        if self.accounts.contains_key(username) {
            return Err(BoardError::duplicate("username", username));
        }
        let password_hash = bcrypt::hash(password, Self::HASH_COST)
            .map_err(|e| BoardError::Config(format!("failed to hash password: {}", e)))?;
        self.accounts.insert(
            username.to_string(),
            Account {
                user: User {
                    username: username.to_string(),
                    display_name: display_name.to_string(),
                    role,
                },
                password_hash,
            },
        );
        Ok(())
    }

    pub fn usernames(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.accounts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[async_trait]
impl Authenticator for DemoAuthenticator {
    async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let account = self
            .accounts
            .get(username)
            .ok_or_else(|| BoardError::Unauthorized("Invalid username or password".into()))?;

        if !bcrypt::verify(password, &account.password_hash).unwrap_or(false) {
            return Err(BoardError::Unauthorized("Invalid username or password".into()));
        }

        Ok(account.user.clone())
    }
}

/// A logged-in user and the navigation their role grants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSession {
    id: Uuid,
    user: User,
    started_at: DateTime<Utc>,
}

impl AppSession {
    pub async fn login<A>(authenticator: &A, username: &str, password: &str) -> Result<Self>
    where
        A: Authenticator + ?Sized,
    {
        match authenticator.authenticate(username, password).await {
            Ok(user) => {
                let session = Self {
                    id: Uuid::new_v4(),
                    user,
                    started_at: Utc::now(),
                };
                info!("User '{}' logged in as {} (session {})", username, session.role(), session.id);
                Ok(session)
            }
            Err(e) => {
                warn!("Login failed for '{}'", username);
                Err(e)
            }
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn navigation(&self) -> &'static [Screen] {
        self.role().navigation()
    }

    pub fn can_access(&self, screen: Screen) -> bool {
        self.role().can_access(screen)
    }

    pub fn require_screen(&self, screen: Screen) -> Result<()> {
        if self.can_access(screen) {
            Ok(())
        } else {
            Err(BoardError::Unauthorized(format!(
                "{} cannot open the {} screen",
                self.role(),
                screen
            )))
        }
    }

    pub fn logout(self) {
        info!("User '{}' logged out (session {})", self.user.username, self.id);
    }
}
