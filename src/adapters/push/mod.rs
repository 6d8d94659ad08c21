//! Push delivery adapters.

mod player_channels;

pub use player_channels::PlayerChannels;
