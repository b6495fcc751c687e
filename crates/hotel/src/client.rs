use serde::{Deserialize, Serialize};

use innkeep_core::{ClientId, DomainError, DomainResult, Entity};

/// Guest data as typed at the front desk, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDetails {
    pub first_name: String,
    pub last_name: String,
    /// National identity document; the natural key of a guest.
    pub document: String,
    pub phone: String,
}

impl ClientDetails {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        document: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            document: document.into(),
            phone: phone.into(),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.document.trim().is_empty() {
            return Err(DomainError::validation("client document cannot be empty"));
        }
        Ok(())
    }
}

/// A registered hotel guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    id: ClientId,
    first_name: String,
    last_name: String,
    document: String,
    phone: String,
}

impl Client {
    pub fn new(id: ClientId, details: ClientDetails) -> Self {
        Self {
            id,
            first_name: details.first_name,
            last_name: details.last_name,
            document: details.document,
            phone: details.phone,
        }
    }

    pub fn id_typed(&self) -> &ClientId {
        &self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    pub fn details(&self) -> ClientDetails {
        ClientDetails {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            document: self.document.clone(),
            phone: self.phone.clone(),
        }
    }
}

impl Entity for Client {
    type Id = ClientId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Display for Client {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.document.is_empty() {
            f.write_str(&self.full_name())
        } else {
            write!(f, "{} ({})", self.full_name(), self.document)
        }
    }
}
