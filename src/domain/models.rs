use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub user_id: String,
    pub display_name: String,
    pub picture_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IdentityPhase {
    Unresolved,
    RedirectPending { login_url: String },
    Resolved(Identity),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CargoCategory {
    #[serde(rename = "General Cargo")]
    GeneralCargo,
    Perishables,
    Electronics,
    Furniture,
    Textiles,
    Machinery,
    Others,
}

impl CargoCategory {
    pub const ALL: [CargoCategory; 7] = [
        CargoCategory::GeneralCargo,
        CargoCategory::Perishables,
        CargoCategory::Electronics,
        CargoCategory::Furniture,
        CargoCategory::Textiles,
        CargoCategory::Machinery,
        CargoCategory::Others,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CargoCategory::GeneralCargo => "General Cargo",
            CargoCategory::Perishables => "Perishables",
            CargoCategory::Electronics => "Electronics",
            CargoCategory::Furniture => "Furniture",
            CargoCategory::Textiles => "Textiles",
            CargoCategory::Machinery => "Machinery",
            CargoCategory::Others => "Others",
        }
    }

    pub fn next(&self) -> CargoCategory {
        let index = Self::ALL.iter().position(|c| c == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> CargoCategory {
        let index = Self::ALL.iter().position(|c| c == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl Default for CargoCategory {
    fn default() -> Self {
        CargoCategory::ALL[0]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Customer,
    Agent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    pub user_id: String,
    pub display_name: String,
    pub role: UserRole,
}

impl UserRecord {
    pub fn customer(identity: &Identity) -> Self {
        Self {
            user_id: identity.user_id.clone(),
            display_name: identity.display_name.clone(),
            role: UserRole::Customer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionPayload {
    pub customer_id: String,
    pub pickup_loc: String,
    pub dropoff_loc: String,
    pub weight: String,
    pub cargo_type: CargoCategory,
    pub photo_url: String,
    pub status: RequestStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub pickup: String,
    pub dropoff: String,
    pub cargo_category: CargoCategory,
    pub weight: String,
    pub photo_name: String,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            pickup: String::new(),
            dropoff: String::new(),
            cargo_category: CargoCategory::default(),
            weight: String::new(),
            photo_name: String::new(),
        }
    }
}

impl Draft {
    /// Keeps only the file name of the selected photo, never its path or bytes.
    pub fn set_photo_path(&mut self, path: &str) {
        self.photo_name = Path::new(path.trim())
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
    }

    pub fn required_complete(&self) -> bool {
        !self.pickup.trim().is_empty()
            && !self.dropoff.trim().is_empty()
            && !self.weight.trim().is_empty()
    }

    pub fn to_submission_payload(&self, identity: &Identity) -> Option<SubmissionPayload> {
        if !self.required_complete() {
            return None;
        }

        Some(SubmissionPayload {
            customer_id: identity.user_id.clone(),
            pickup_loc: self.pickup.clone(),
            dropoff_loc: self.dropoff.clone(),
            weight: self.weight.clone(),
            cargo_type: self.cargo_category,
            photo_url: self.photo_name.clone(),
            status: RequestStatus::Open,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Idle,
    Pending,
    Succeeded,
    Failed(String),
}
