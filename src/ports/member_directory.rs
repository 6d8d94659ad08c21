//! Member directory port.
//!
//! Resolves member ids to display names for rendering.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MemberId};
use crate::domain::member::MemberProfile;

/// Read access to member display names.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Look up profiles for a batch of ids.
    ///
    /// Unknown ids are left out of the result, never an error.
    async fn get_many(&self, ids: &[MemberId]) -> Result<Vec<MemberProfile>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_directory_is_object_safe() {
        fn _accepts_dyn(_directory: &dyn MemberDirectory) {}
    }
}
