use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionType {
    /// Grants made directly on the object.
    #[default]
    Explicit,
    /// Grants the principal receives through group membership or dependencies.
    Inherited,
}

impl PermissionType {
    pub fn api_value(&self) -> &'static str {
        match self {
            PermissionType::Explicit => "DEFINED",
            PermissionType::Inherited => "EFFECTIVE",
        }
    }
}

impl std::fmt::Display for PermissionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.api_value())
    }
}

/// One permission grant of an object to a user or a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharingAccess {
    pub object_guid: String,
    pub permission_type: String,
    pub share_mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_to_user_guid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_to_group_guid: Option<String>,
}

impl SharingAccess {
    pub fn principal_guid(&self) -> &str {
        self.shared_to_user_guid
            .as_deref()
            .or(self.shared_to_group_guid.as_deref())
            .unwrap_or_default()
    }

    pub fn is_user_grant(&self) -> bool {
        self.shared_to_user_guid.is_some()
    }
}

/// A single entry of the `permissions` mapping in a security response.
#[derive(Debug, Clone, Deserialize)]
pub struct PermissionEntry {
    #[serde(rename = "shareMode")]
    pub share_mode: String,

    #[serde(rename = "topLevelObjectId")]
    pub top_level_object_id: String,
}
