//! Back-office resource collections exposed by the REST API

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DomainError, DomainResult};

/// A REST collection managed from the back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    /// Catalogue products
    Products,
    /// Product variants (size, concentration)
    Variants,
    /// Perfume houses
    Brands,
    /// Catalogue categories
    Categories,
    /// Customer orders
    Orders,
    /// Promotional offers
    Offers,
    /// Notifications sent to users
    Notifications,
    /// Customer and staff accounts
    Users,
}

impl Resource {
    /// Every resource, in menu order.
    pub const ALL: [Self; 8] = [
        Self::Products,
        Self::Variants,
        Self::Brands,
        Self::Categories,
        Self::Orders,
        Self::Offers,
        Self::Notifications,
        Self::Users,
    ];

    /// Returns the collection name used in URLs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Variants => "variants",
            Self::Brands => "brands",
            Self::Categories => "categories",
            Self::Orders => "orders",
            Self::Offers => "offers",
            Self::Notifications => "notifications",
            Self::Users => "users",
        }
    }

    /// Returns the collection path, e.g. `/products`.
    #[must_use]
    pub fn collection_path(self) -> String {
        format!("/{}", self.as_str())
    }

    /// Returns the path of a single item, e.g. `/products/42`.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is empty or contains a path separator.
    pub fn item_path(self, id: &str) -> DomainResult<String> {
        let id = id.trim();
        if id.is_empty() || id.contains('/') || id.contains('?') {
            return Err(DomainError::InvalidIdentifier(id.to_string()));
        }
        Ok(format!("/{}/{id}", self.as_str()))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == lower)
            .ok_or_else(|| DomainError::UnknownResource(s.to_string()))
    }
}
