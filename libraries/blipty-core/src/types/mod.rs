mod channel;
mod event;
mod favorite;
mod playback_state;
mod playlist;

pub use channel::{Category, Channel, ChannelId, NewChannel};
pub use event::{PlayerErrorInfo, PlayerEvent, PLAYER_EVENT_CHANNEL};
pub use favorite::{Favorite, NewFavorite};
pub use playback_state::{PlaybackStatus, PlayerState, StreamInfo, StreamQuality};
pub use playlist::{Playlist, PlaylistId};
