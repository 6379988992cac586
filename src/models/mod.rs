pub mod favorite;
pub mod playlist;
pub mod track;

pub use favorite::{FavoriteRecord, FavoriteToggle, NewFavorite, StoredGenres};
pub use playlist::{CreatePlaylistRequest, Playlist};
pub use track::{
    BrowseCategory, CandidateTrack, JamendoResponse, JamendoTrack, TrackOrder, TrackQuery,
    TrackSummary,
};
