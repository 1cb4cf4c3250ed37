use anyhow::Result;
use chrono::Utc;

use crate::db::{Database, USER_KEY};
use crate::models::{Role, User};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0} must not be empty")]
    MissingField(&'static str),
}

/// Demo accounts accepted by `login`.
pub fn demo_users() -> Vec<User> {
    vec![
        User {
            id: "1".to_string(),
            email: "recruiter@company.com".to_string(),
            first_name: "Sarah".to_string(),
            last_name: "Johnson".to_string(),
            role: Role::Recruiter,
            avatar: None,
        },
        User {
            id: "2".to_string(),
            email: "candidate@email.com".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            role: Role::Candidate,
            avatar: None,
        },
    ]
}

pub struct Registration<'r> {
    pub email: &'r str,
    pub first_name: &'r str,
    pub last_name: &'r str,
    pub role: Role,
}

/// Mock session persisted in the local cache. Passwords are not checked.
pub struct Session<'db> {
    db: &'db Database,
    user: Option<User>,
}

impl<'db> Session<'db> {
    pub fn load(db: &'db Database) -> Self {
        let user = db.get_or_default::<Option<User>>(USER_KEY);
        Self { db, user }
    }

    pub fn current(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn login(&mut self, email: &str) -> Result<&User> {
        let email = email.trim();
        let user = demo_users()
            .into_iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .ok_or(AuthError::InvalidCredentials)?;
        self.db.set_json(USER_KEY, &user)?;
        tracing::info!(user_id = %user.id, role = %user.role, "logged in");
        Ok(&*self.user.insert(user))
    }

    pub fn register(&mut self, registration: Registration<'_>) -> Result<&User> {
        for (field, value) in [
            ("email", registration.email),
            ("first name", registration.first_name),
            ("last name", registration.last_name),
        ] {
            if value.trim().is_empty() {
                return Err(AuthError::MissingField(field).into());
            }
        }
        let user = User {
            id: Utc::now().timestamp_millis().to_string(),
            email: registration.email.trim().to_string(),
            first_name: registration.first_name.trim().to_string(),
            last_name: registration.last_name.trim().to_string(),
            role: registration.role,
            avatar: None,
        };
        self.db.set_json(USER_KEY, &user)?;
        Ok(&*self.user.insert(user))
    }

    pub fn logout(&mut self) -> Result<()> {
        self.user = None;
        self.db.remove(USER_KEY)
    }
}
