//! User account models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AdminError;

/// Roles assignable from the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "user")]
    User,
    #[serde(rename = "traffic warden")]
    TrafficWarden,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Admin, UserRole::User, UserRole::TrafficWarden];

    /// Returns the role as the backend spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
            UserRole::TrafficWarden => "traffic warden",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "admin" => Ok(UserRole::Admin),
            "user" => Ok(UserRole::User),
            "traffic warden" => Ok(UserRole::TrafficWarden),
            _ => Err(AdminError::InvalidRole(s.to_string())),
        }
    }
}

/// A user account as listed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_telephone: Option<String>,
    /// Kept as text so unknown roles still list.
    #[serde(default)]
    pub role: String,
}

/// Body of `PATCH /users/{uid}/admin/update`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserUpdatePayload {
    pub name: String,
    pub no_telephone: String,
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("User".parse::<UserRole>().unwrap(), UserRole::User);
        assert_eq!(
            "traffic-warden".parse::<UserRole>().unwrap(),
            UserRole::TrafficWarden
        );
        assert_eq!(
            "traffic warden".parse::<UserRole>().unwrap(),
            UserRole::TrafficWarden
        );
        assert!(matches!(
            "superuser".parse::<UserRole>(),
            Err(AdminError::InvalidRole(_))
        ));
    }

    #[test]
    fn test_role_serializes_with_space() {
        let payload = UserUpdatePayload {
            name: "Aminah".to_string(),
            no_telephone: "012-3456789".to_string(),
            role: UserRole::TrafficWarden,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["role"], "traffic warden");
        assert_eq!(json["no_telephone"], "012-3456789");
    }

    #[test]
    fn test_user_deserializes_minimal_record() {
        let user: User =
            serde_json::from_str(r#"{"_id":"1","name":"A","role":"admin"}"#).unwrap();
        assert_eq!(user.id, "1");
        assert!(user.email.is_none());
        assert_eq!(user.role, "admin");
    }
}
