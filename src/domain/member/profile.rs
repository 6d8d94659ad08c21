//! Display identity of a member.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MemberId, ValidationError};

/// Maximum display name length, in characters.
pub const MAX_DISPLAY_NAME_LENGTH: usize = 64;

/// Name rendered for members the directory does not know.
pub const UNKNOWN_MEMBER_NAME: &str = "Unknown";

/// A member's id and the name other players see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProfile {
    pub id: MemberId,
    pub name: String,
}

impl MemberProfile {
    /// Creates a profile, trimming and validating the display name.
    pub fn new(id: MemberId, name: impl AsRef<str>) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            name: validate_display_name(name.as_ref())?,
        })
    }
}

/// Trims a display name and checks it is 1..=64 characters.
pub fn validate_display_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field("name"));
    }
    let length = trimmed.chars().count();
    if length > MAX_DISPLAY_NAME_LENGTH {
        return Err(ValidationError::too_long(
            "name",
            MAX_DISPLAY_NAME_LENGTH,
            length,
        ));
    }
    Ok(trimmed.to_string())
}
