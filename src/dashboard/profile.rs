//! User profile shown on the profile tab.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Display-only account details.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Mobile-money number.
    pub phone: String,
    /// Avatar URL.
    pub avatar: String,
    /// Account creation date.
    pub join_date: NaiveDate,
}

impl UserProfile {
    /// Two-letter initials for the avatar fallback.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "Awa Diallo".to_string(),
            email: "awa.diallo@example.com".to_string(),
            phone: "+221 77 123 45 67".to_string(),
            avatar: "https://i.pravatar.cc/150?u=awa".to_string(),
            join_date: NaiveDate::from_ymd_opt(2023, 3, 14).unwrap_or_default(),
        }
    }
}
