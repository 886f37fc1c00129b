use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

/// Contact details for a user.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl UserProfile {
    /// Display name, falling back to the local part of the email address.
    pub fn greeting_name(&self) -> &str {
        match self.display_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}

/// Input model for creating or updating a profile
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileInput {
    pub id: Option<String>,
    pub email: String,
    pub display_name: Option<String>,
}

impl UserProfileInput {
    pub fn validate(&self) -> Result<()> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingField("email".to_string()).into());
        }
        let valid = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !email.contains(char::is_whitespace)
            }
            None => false,
        };
        if !valid {
            return Err(ValidationError::InvalidInput(format!(
                "Invalid email address: {}",
                email
            ))
            .into());
        }
        if let Some(id) = &self.id {
            if id.trim().is_empty() {
                return Err(ValidationError::InvalidInput("User id cannot be blank".to_string()).into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(email: &str) -> UserProfileInput {
        UserProfileInput {
            id: None,
            email: email.to_string(),
            display_name: None,
        }
    }

    #[test]
    fn test_email_validation() {
        assert!(input("alice@example.com").validate().is_ok());
        assert!(input("").validate().is_err());
        assert!(input("alice").validate().is_err());
        assert!(input("@example.com").validate().is_err());
        assert!(input("alice@localhost").validate().is_err());
        assert!(input("al ice@example.com").validate().is_err());
    }

    #[test]
    fn test_greeting_name_falls_back_to_email() {
        let now = chrono::Utc::now().naive_utc();
        let mut profile = UserProfile {
            id: "u1".to_string(),
            email: "alice@example.com".to_string(),
            display_name: None,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(profile.greeting_name(), "alice");
        profile.display_name = Some("Alice L".to_string());
        assert_eq!(profile.greeting_name(), "Alice L");
        profile.display_name = Some("  ".to_string());
        assert_eq!(profile.greeting_name(), "alice");
    }
}
