//! Member module - display identities shown at the table.
//!
//! Members are owned by the directory; sessions only store member ids and
//! look names up when rendering state.

mod events;
mod profile;

pub use events::{MemberUpdated, MEMBER_UPDATED};
pub use profile::{
    validate_display_name, MemberProfile, MAX_DISPLAY_NAME_LENGTH, UNKNOWN_MEMBER_NAME,
};
