//! Signed-in user identity and roles

use serde::{Deserialize, Serialize};

/// Role of a back-office user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including user management
    Admin,
    /// Catalogue and order management
    Staff,
    /// Storefront customer, not allowed in the back office
    #[default]
    Customer,
    /// Any role this client does not know about
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Returns true if this role may sign in to the back office.
    #[must_use]
    pub const fn can_access_back_office(self) -> bool {
        matches!(self, Self::Admin | Self::Staff)
    }

    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Customer => "customer",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user a session belongs to, as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    /// Backend identifier
    #[serde(alias = "_id")]
    pub id: String,
    /// Login e-mail
    pub email: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Role used for gating
    #[serde(default)]
    pub role: Role,
}

impl UserIdentity {
    /// Creates an identity.
    #[must_use]
    pub fn new(id: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: None,
            role,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the display name, or the e-mail when no name is set.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_role_gating() {
        assert!(Role::Admin.can_access_back_office());
        assert!(Role::Staff.can_access_back_office());
        assert!(!Role::Customer.can_access_back_office());
        assert!(!Role::Unknown.can_access_back_office());
    }

    #[test]
    fn test_identity_from_backend_json() {
        let user: UserIdentity = serde_json::from_str(
            r#"{"_id":"65f1","email":"ana@maison.test","name":"Ana","role":"admin"}"#,
        )
        .unwrap();
        assert_eq!(user.id, "65f1");
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.display_name(), "Ana");
    }

    #[test]
    fn test_unknown_role_is_tolerated() {
        let user: UserIdentity =
            serde_json::from_str(r#"{"id":"1","email":"x@y.test","role":"auditor"}"#).unwrap();
        assert_eq!(user.role, Role::Unknown);
        assert_eq!(user.display_name(), "x@y.test");
    }
}
