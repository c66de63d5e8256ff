use serde::{Deserialize, Serialize};
use std::fmt;

/// Marketplace side a user signed up for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Builder,
    Sponsor,
}

impl UserRole {
    pub const ALL: [UserRole; 2] = [UserRole::Builder, UserRole::Sponsor];

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            UserRole::Builder => "builder",
            UserRole::Sponsor => "sponsor",
        }
    }

    /// Lenient decode for backend values; unknown codes yield `None`
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "builder" => Some(UserRole::Builder),
            "sponsor" => Some(UserRole::Sponsor),
            other => {
                tracing::warn!(role = other, "Unknown user role code");
                None
            }
        }
    }

    #[inline]
    pub const fn is_sponsor(&self) -> bool {
        matches!(self, UserRole::Sponsor)
    }

    #[inline]
    pub const fn is_builder(&self) -> bool {
        matches!(self, UserRole::Builder)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_code() {
        assert_eq!(UserRole::from_code("builder"), Some(UserRole::Builder));
        assert_eq!(UserRole::from_code("Sponsor "), Some(UserRole::Sponsor));
        assert_eq!(UserRole::from_code("admin"), None);
    }

    #[test]
    fn test_user_role_display_and_serde() {
        assert_eq!(UserRole::Builder.to_string(), "builder");
        assert_eq!(
            serde_json::to_string(&UserRole::Sponsor).unwrap(),
            "\"sponsor\""
        );
        let role: UserRole = serde_json::from_str("\"builder\"").unwrap();
        assert!(role.is_builder());
        assert!(!role.is_sponsor());
    }
}
