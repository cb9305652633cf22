// Shared data types and small helpers used across crates.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod validate;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid id: {0}")]
    InvalidId(String),
}

/// Records per fetched page. Shared by the client pagination math and the
/// server's default `_limit`.
pub const PAGE_SIZE: u32 = 10;

/// Picture URL stamped onto client-synthesized records.
pub const DEFAULT_PICTURE_URL: &str = "https://picsum.photos/200";

pub mod ids {
    // Strongly typed IDs to avoid mixing namespaces at compile time.
    use super::{Error, Result};
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use std::str::FromStr;
    use uuid::Uuid;

    macro_rules! id_type {
        ($name:ident) => {
            #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
            pub struct $name(Uuid);

            impl $name {
                // Generate a new random ID for this namespace.
                pub fn new() -> Self {
                    Self(Uuid::new_v4())
                }

                // Wrap an existing UUID when decoding from storage.
                pub fn from_uuid(uuid: Uuid) -> Self {
                    Self(uuid)
                }

                // Expose the underlying UUID for interoperability.
                pub fn as_uuid(&self) -> Uuid {
                    self.0
                }
            }

            impl Default for $name {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl FromStr for $name {
                type Err = Error;

                fn from_str(input: &str) -> Result<Self> {
                    // Preserve the original input for clearer error messages.
                    let uuid =
                        Uuid::parse_str(input).map_err(|_| Error::InvalidId(input.into()))?;
                    Ok(Self(uuid))
                }
            }
        };
    }

    id_type!(UserId);
}

/// One user profile, as listed and stored.
///
/// Everything past `about` is denormalized display data stamped at creation
/// time and never user-editable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: ids::UserId,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub balance: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub about: String,
    pub greeting: String,
    pub picture: String,
    pub registered: DateTime<Utc>,
}

/// The user-editable subset submitted through the add-row form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDraft {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub balance: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub about: String,
}

impl Record {
    /// Synthesize a full record from a draft, filling identifier, timestamps
    /// and cosmetic defaults client-side.
    pub fn from_draft(draft: &RecordDraft) -> Self {
        Self {
            id: ids::UserId::new(),
            name: draft.name.clone(),
            age: draft.age,
            gender: draft.gender.clone(),
            balance: draft.balance.clone(),
            company: draft.company.clone(),
            phone: draft.phone.clone(),
            email: draft.email.clone(),
            about: draft.about.clone(),
            greeting: format!("Hello, {}!", draft.name),
            picture: DEFAULT_PICTURE_URL.to_string(),
            registered: Utc::now(),
        }
    }
}
