use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, types::Json, FromRow, PgPool};
use uuid::Uuid;

use crate::{
    db::store::{FavoritesStore, PlaylistStore},
    error::AppResult,
    models::{FavoriteRecord, NewFavorite, Playlist, StoredGenres, TrackSummary},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the embedded schema migrations
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[derive(Debug, FromRow)]
struct FavoriteRow {
    id: String,
    user_id: String,
    track_id: String,
    track_name: String,
    track_artist: String,
    track_url: String,
    album_image: Option<String>,
    duration: i32,
    genres: Json<StoredGenres>,
    created_at: DateTime<Utc>,
}

impl From<FavoriteRow> for FavoriteRecord {
    fn from(row: FavoriteRow) -> Self {
        FavoriteRecord {
            id: row.id,
            user_id: row.user_id,
            track_id: row.track_id,
            track_name: row.track_name,
            track_artist: row.track_artist,
            track_url: row.track_url,
            album_image: row.album_image,
            duration: u32::try_from(row.duration).unwrap_or(0),
            genres: row.genres.0,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct PlaylistRow {
    id: String,
    user_id: String,
    name: String,
    tracks: Json<Vec<TrackSummary>>,
    created_at: DateTime<Utc>,
}

impl From<PlaylistRow> for Playlist {
    fn from(row: PlaylistRow) -> Self {
        Playlist {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            tracks: row.tracks.0,
            created_at: row.created_at,
        }
    }
}

/// Favorites and playlists backed by PostgreSQL
///
/// Genre tags live in a JSONB column so legacy wrapped shapes survive untouched.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FavoritesStore for PgStore {
    async fn favorites_by_user(&self, user_id: &str) -> AppResult<Vec<FavoriteRecord>> {
        let rows = sqlx::query_as::<_, FavoriteRow>(
            r#"
            SELECT id, user_id, track_id, track_name, track_artist, track_url,
                   album_image, duration, genres, created_at
            FROM favorites
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FavoriteRecord::from).collect())
    }

    async fn favorites_by_user_and_track(
        &self,
        user_id: &str,
        track_id: &str,
    ) -> AppResult<Vec<FavoriteRecord>> {
        let rows = sqlx::query_as::<_, FavoriteRow>(
            r#"
            SELECT id, user_id, track_id, track_name, track_artist, track_url,
                   album_image, duration, genres, created_at
            FROM favorites
            WHERE user_id = $1 AND track_id = $2
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .bind(track_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FavoriteRecord::from).collect())
    }

    async fn add_favorite(&self, favorite: NewFavorite) -> AppResult<FavoriteRecord> {
        let id = Uuid::new_v4().to_string();
        let duration = i32::try_from(favorite.duration).unwrap_or(i32::MAX);

        let row = sqlx::query_as::<_, FavoriteRow>(
            r#"
            INSERT INTO favorites
                (id, user_id, track_id, track_name, track_artist, track_url,
                 album_image, duration, genres)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, user_id, track_id, track_name, track_artist, track_url,
                      album_image, duration, genres, created_at
            "#,
        )
        .bind(&id)
        .bind(&favorite.user_id)
        .bind(&favorite.track_id)
        .bind(&favorite.track_name)
        .bind(&favorite.track_artist)
        .bind(&favorite.track_url)
        .bind(&favorite.album_image)
        .bind(duration)
        .bind(Json(&favorite.genres))
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(
            record_id = %id,
            user_id = %favorite.user_id,
            track_id = %favorite.track_id,
            "Favorite inserted"
        );

        Ok(row.into())
    }

    async fn delete_favorite(&self, record_id: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM favorites WHERE id = $1")
            .bind(record_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl PlaylistStore for PgStore {
    async fn create_playlist(&self, user_id: &str, name: &str) -> AppResult<Playlist> {
        let id = Uuid::new_v4().to_string();

        let row = sqlx::query_as::<_, PlaylistRow>(
            r#"
            INSERT INTO playlists (id, user_id, name, tracks)
            VALUES ($1, $2, $3, '[]'::jsonb)
            RETURNING id, user_id, name, tracks, created_at
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn playlists_by_user(&self, user_id: &str) -> AppResult<Vec<Playlist>> {
        let rows = sqlx::query_as::<_, PlaylistRow>(
            r#"
            SELECT id, user_id, name, tracks, created_at
            FROM playlists
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Playlist::from).collect())
    }

    async fn get_playlist(&self, playlist_id: &str) -> AppResult<Option<Playlist>> {
        let row = sqlx::query_as::<_, PlaylistRow>(
            "SELECT id, user_id, name, tracks, created_at FROM playlists WHERE id = $1",
        )
        .bind(playlist_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Playlist::from))
    }

    async fn add_playlist_track(
        &self,
        playlist_id: &str,
        track: &TrackSummary,
    ) -> AppResult<Option<Playlist>> {
        // The row lock taken by UPDATE serializes concurrent edits of one playlist
        let row = sqlx::query_as::<_, PlaylistRow>(
            r#"
            UPDATE playlists
            SET tracks = CASE
                WHEN tracks @> $3 THEN tracks
                ELSE tracks || $2
            END
            WHERE id = $1
            RETURNING id, user_id, name, tracks, created_at
            "#,
        )
        .bind(playlist_id)
        .bind(Json(std::slice::from_ref(track)))
        .bind(Json(serde_json::json!([{ "id": track.id }])))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Playlist::from))
    }

    async fn remove_playlist_track(
        &self,
        playlist_id: &str,
        track_id: &str,
    ) -> AppResult<Option<Playlist>> {
        let row = sqlx::query_as::<_, PlaylistRow>(
            r#"
            UPDATE playlists
            SET tracks = COALESCE(
                (
                    SELECT jsonb_agg(entry ORDER BY position)
                    FROM jsonb_array_elements(tracks) WITH ORDINALITY AS t(entry, position)
                    WHERE entry->>'id' <> $2
                ),
                '[]'::jsonb
            )
            WHERE id = $1
            RETURNING id, user_id, name, tracks, created_at
            "#,
        )
        .bind(playlist_id)
        .bind(track_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Playlist::from))
    }

    async fn delete_playlist(&self, playlist_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM playlists WHERE id = $1")
            .bind(playlist_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
