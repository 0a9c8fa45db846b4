use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which of the two user categories a session belongs to.
///
/// Determines every kind-specific endpoint and is the value persisted under
/// [`crate::storage::USER_TYPE_KEY`].
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Customer,
    Mechanic,
}

impl AccountKind {
    /// Value written to durable storage and used in auth endpoint paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Customer => "customer",
            AccountKind::Mechanic => "mechanic",
        }
    }

    /// Plural resource segment (`customers` / `mechanics`).
    pub fn resource(&self) -> &'static str {
        match self {
            AccountKind::Customer => "customers",
            AccountKind::Mechanic => "mechanics",
        }
    }

    pub fn login_path(&self) -> String {
        format!("/auth/login/{}", self.as_str())
    }

    pub fn register_path(&self) -> String {
        format!("/auth/register/{}", self.as_str())
    }

    /// The "whoami" endpoint used to rehydrate a session.
    pub fn me_path(&self) -> String {
        format!("/{}/me", self.resource())
    }

    pub fn profile_path(&self) -> String {
        format!("{}/profile", self.resource())
    }

    pub fn profile_image_path(&self) -> String {
        match self {
            AccountKind::Customer => "customers/profile-photo".to_string(),
            AccountKind::Mechanic => "mechanics/profile-logo".to_string(),
        }
    }

    /// Multipart field name the server expects for the profile image.
    pub fn profile_image_field(&self) -> &'static str {
        match self {
            AccountKind::Customer => "profilePhoto",
            AccountKind::Mechanic => "logo",
        }
    }

    pub fn reviews_path(&self) -> String {
        format!("/{}/reviews", self.resource())
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAccountKind(pub String);

impl fmt::Display for UnknownAccountKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown account kind: {:?}", self.0)
    }
}

impl std::error::Error for UnknownAccountKind {}

impl FromStr for AccountKind {
    type Err = UnknownAccountKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "customer" => Ok(AccountKind::Customer),
            "mechanic" => Ok(AccountKind::Mechanic),
            other => Err(UnknownAccountKind(other.to_string())),
        }
    }
}
