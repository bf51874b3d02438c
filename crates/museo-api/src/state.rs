//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor.
//!
//! ## Architecture
//!
//! `AppState` holds the three catalog stores (expositions, exhibits, users),
//! the optional Postgres pool for write-through persistence, and the
//! application configuration. Reads and writes go through the in-memory
//! stores; when a pool is present, writes are mirrored to Postgres and the
//! stores are hydrated from it on startup.
//!
//! The default storage exposition — the fallback placement for orphaned
//! exhibits — is owned here: [`AppState::default_storage`] is an idempotent
//! get-or-create, so the record can never be permanently absent.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use museo_core::FloorPosition;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// All operations are synchronous (the RwLock is `parking_lot`, not
/// `tokio::sync`) because the lock is never held across `.await` points.
/// `parking_lot::RwLock` is non-poisonable — a panicking writer does not
/// permanently corrupt the store.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    /// Retrieve a record by ID.
    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// List all records.
    pub fn list(&self) -> Vec<T> {
        self.data.read().values().cloned().collect()
    }

    /// Return the first record matching the predicate.
    pub fn find(&self, mut pred: impl FnMut(&T) -> bool) -> Option<T> {
        self.data.read().values().find(|v| pred(v)).cloned()
    }

    /// Update a record in place. Returns the updated record, or `None` if not found.
    pub fn update(&self, id: &Uuid, f: impl FnOnce(&mut T)) -> Option<T> {
        let mut guard = self.data.write();
        if let Some(entry) = guard.get_mut(id) {
            f(entry);
            Some(entry.clone())
        } else {
            None
        }
    }

    /// Apply a mutation to every record, returning the IDs of those changed.
    ///
    /// The closure returns `true` when it mutated the record. Runs under a
    /// single write lock so concurrent readers never observe a half-applied
    /// sweep.
    pub fn update_all(&self, mut f: impl FnMut(&Uuid, &mut T) -> bool) -> Vec<Uuid> {
        let mut guard = self.data.write();
        let mut changed = Vec::new();
        for (id, entry) in guard.iter_mut() {
            if f(id, entry) {
                changed.push(*id);
            }
        }
        changed
    }

    /// Remove a record by ID.
    pub fn remove(&self, id: &Uuid) -> Option<T> {
        self.data.write().remove(id)
    }

    /// Check if a record exists.
    pub fn contains(&self, id: &Uuid) -> bool {
        self.data.read().contains_key(id)
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Record Types -------------------------------------------------------------

/// Exposition record: a named grouping of exhibits tied to a floor position.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExpositionRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Placement within the museum. See [`museo_core::FloorPosition`].
    #[schema(value_type = String)]
    pub position: FloorPosition,
    /// Under restoration. Implies `open == false` on every stored record.
    pub on_restoration: bool,
    /// Open to visitors. Closed expositions are visible only to admins.
    pub open: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Exhibit record: an individual item placed in exactly one exposition.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExhibitRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Optional reference to an externally hosted image.
    pub image_url: Option<String>,
    /// The exposition this exhibit belongs to. Never dangling: deleting the
    /// exposition re-parents its exhibits to the default storage exposition.
    pub placement: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User record backing the profile surface.
///
/// Account lifecycle (registration, passwords, sessions) belongs to the
/// identity collaborator; this record carries only the profile fields and
/// the group memberships used for the admin check.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Group memberships. Only membership of `"admin"` is meaningful here.
    pub groups: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Whether this user belongs to the admin group.
    pub fn is_admin(&self) -> bool {
        self.groups.iter().any(|g| g == "admin")
    }
}

// -- Default Storage Exposition -----------------------------------------------

/// Well-known title of the default storage exposition.
pub const STORAGE_TITLE: &str = "Museum storage reserve";

const STORAGE_DESCRIPTION: &str = "The museum's storage reserve. Exhibits whose \
exposition is removed are moved here so they are never left without a \
placement. This exposition is maintained by the system and cannot be deleted.";

// -- Application State --------------------------------------------------------

/// Application configuration.
///
/// Custom `Debug` redacts the `auth_token` to prevent credential leakage in logs.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Static bearer token secret. If `None`, authentication is disabled
    /// (development mode) and every request runs as an admin.
    pub auth_token: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
        }
    }
}

/// Shared application state accessible to all route handlers.
///
/// Clone-friendly via `Arc` internals in each `Store`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub expositions: Store<ExpositionRecord>,
    pub exhibits: Store<ExhibitRecord>,
    pub users: Store<UserRecord>,

    /// Cached ID of the default storage exposition. Revalidated on every
    /// access — a stale ID (record removed, or mutated away from the
    /// well-known identity) triggers adoption or recreation, keeping
    /// get-or-create idempotent.
    storage_id: Arc<RwLock<Option<Uuid>>>,

    /// PostgreSQL connection pool for durable persistence. When `Some`,
    /// writes are mirrored to Postgres; when `None`, in-memory-only mode.
    pub db_pool: Option<PgPool>,

    pub config: AppConfig,
}

impl AppState {
    /// Create a new application state with default configuration and no database.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    /// Create a new application state with the given configuration and optional pool.
    pub fn with_config(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        Self {
            expositions: Store::new(),
            exhibits: Store::new(),
            users: Store::new(),
            storage_id: Arc::new(RwLock::new(None)),
            db_pool,
            config,
        }
    }

    /// Get or create the default storage exposition in the in-memory store.
    ///
    /// Returns the record and whether it was created by this call. Callers on
    /// write paths must persist a freshly created record; prefer
    /// [`AppState::ensure_default_storage`] which does both.
    pub fn default_storage(&self) -> (ExpositionRecord, bool) {
        let mut cached = self.storage_id.write();

        // Fast path: cached ID still resolves to the well-known identity.
        // A record that was removed or no longer carries the storage
        // position and title is not trusted as a re-parent target.
        if let Some(id) = *cached {
            if let Some(record) = self.expositions.get(&id) {
                if record.position == FloorPosition::Storage && record.title == STORAGE_TITLE {
                    return (record, false);
                }
            }
        }

        // Adopt an existing record (e.g. loaded from the database).
        if let Some(record) = self
            .expositions
            .find(|e| e.position == FloorPosition::Storage && e.title == STORAGE_TITLE)
        {
            *cached = Some(record.id);
            return (record, false);
        }

        let now = Utc::now();
        let record = ExpositionRecord {
            id: Uuid::new_v4(),
            title: STORAGE_TITLE.to_string(),
            description: STORAGE_DESCRIPTION.to_string(),
            position: FloorPosition::Storage,
            on_restoration: false,
            open: false,
            created_at: now,
            updated_at: now,
        };
        self.expositions.insert(record.id, record.clone());
        *cached = Some(record.id);
        tracing::info!(exposition_id = %record.id, "created default storage exposition");
        (record, true)
    }

    /// Get or create the default storage exposition, persisting a freshly
    /// created record to the database when a pool is configured.
    pub async fn ensure_default_storage(&self) -> Result<ExpositionRecord, sqlx::Error> {
        let (record, created) = self.default_storage();
        if created {
            if let Some(pool) = &self.db_pool {
                crate::db::expositions::insert(pool, &record).await?;
            }
        }
        Ok(record)
    }

    /// Whether the given record is the default storage exposition.
    pub fn is_default_storage(&self, record: &ExpositionRecord) -> bool {
        record.position == FloorPosition::Storage && record.title == STORAGE_TITLE
    }

    /// Hydrate in-memory stores from the database.
    ///
    /// Called once on startup when a database pool is available, so that read
    /// operations stay fast and synchronous afterwards.
    pub async fn hydrate_from_db(&self) -> Result<(), String> {
        let pool = match &self.db_pool {
            Some(pool) => pool,
            None => return Ok(()),
        };

        let expositions = crate::db::expositions::load_all(pool)
            .await
            .map_err(|e| format!("failed to load expositions: {e}"))?;
        let exposition_count = expositions.len();
        for record in expositions {
            self.expositions.insert(record.id, record);
        }

        let exhibits = crate::db::exhibits::load_all(pool)
            .await
            .map_err(|e| format!("failed to load exhibits: {e}"))?;
        let exhibit_count = exhibits.len();
        for record in exhibits {
            self.exhibits.insert(record.id, record);
        }

        let users = crate::db::users::load_all(pool)
            .await
            .map_err(|e| format!("failed to load users: {e}"))?;
        let user_count = users.len();
        for record in users {
            self.users.insert(record.id, record);
        }

        tracing::info!(
            expositions = exposition_count,
            exhibits = exhibit_count,
            users = user_count,
            "hydrated in-memory stores from database"
        );
        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exposition(position: FloorPosition, title: &str) -> ExpositionRecord {
        let now = Utc::now();
        ExpositionRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: "d".to_string(),
            position,
            on_restoration: false,
            open: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn store_insert_get_remove() {
        let store: Store<i32> = Store::new();
        let id = Uuid::new_v4();
        assert!(store.insert(id, 1).is_none());
        assert_eq!(store.get(&id), Some(1));
        assert_eq!(store.insert(id, 2), Some(1));
        assert_eq!(store.remove(&id), Some(2));
        assert!(store.is_empty());
    }

    #[test]
    fn store_update_all_reports_changed_ids() {
        let store: Store<i32> = Store::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.insert(a, 1);
        store.insert(b, 2);
        let changed = store.update_all(|_, v| {
            if *v == 1 {
                *v = 10;
                true
            } else {
                false
            }
        });
        assert_eq!(changed, vec![a]);
        assert_eq!(store.get(&a), Some(10));
        assert_eq!(store.get(&b), Some(2));
    }

    #[test]
    fn default_storage_is_created_once() {
        let state = AppState::new();
        let (first, created) = state.default_storage();
        assert!(created);
        assert_eq!(first.position, FloorPosition::Storage);
        assert_eq!(first.title, STORAGE_TITLE);
        assert!(!first.open);

        let (second, created_again) = state.default_storage();
        assert!(!created_again);
        assert_eq!(first.id, second.id);
        assert_eq!(state.expositions.len(), 1);
    }

    #[test]
    fn default_storage_is_recreated_when_missing() {
        let state = AppState::new();
        let (first, _) = state.default_storage();
        state.expositions.remove(&first.id);

        let (second, created) = state.default_storage();
        assert!(created);
        assert_ne!(first.id, second.id);
        assert!(state.expositions.contains(&second.id));
    }

    #[test]
    fn default_storage_distrusts_a_mutated_cached_record() {
        let state = AppState::new();
        let (first, _) = state.default_storage();
        state.expositions.update(&first.id, |e| {
            e.title = "Renamed hall".to_string();
            e.position = FloorPosition::Floor1;
        });

        // The cached ID now points at a record that lost the storage
        // identity; a fresh well-known record must be created instead.
        let (second, created) = state.default_storage();
        assert!(created);
        assert_ne!(first.id, second.id);
        assert_eq!(second.title, STORAGE_TITLE);
        assert_eq!(second.position, FloorPosition::Storage);
    }

    #[test]
    fn default_storage_adopts_hydrated_record() {
        let state = AppState::new();
        let hydrated = ExpositionRecord {
            open: false,
            ..exposition(FloorPosition::Storage, STORAGE_TITLE)
        };
        state.expositions.insert(hydrated.id, hydrated.clone());

        let (found, created) = state.default_storage();
        assert!(!created);
        assert_eq!(found.id, hydrated.id);
    }

    #[test]
    fn is_default_storage_matches_only_the_wellknown_record() {
        let state = AppState::new();
        let (storage, _) = state.default_storage();
        assert!(state.is_default_storage(&storage));

        let other_storage = exposition(FloorPosition::Storage, "Annex storage");
        assert!(!state.is_default_storage(&other_storage));

        let floor = exposition(FloorPosition::Floor1, STORAGE_TITLE);
        assert!(!state.is_default_storage(&floor));
    }

    #[test]
    fn user_admin_flag_follows_group_membership() {
        let now = Utc::now();
        let mut user = UserRecord {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: "alice@museum.example".to_string(),
            groups: vec!["staff".to_string()],
            created_at: now,
            updated_at: now,
        };
        assert!(!user.is_admin());
        user.groups.push("admin".to_string());
        assert!(user.is_admin());
    }

    #[test]
    fn app_config_debug_redacts_token() {
        let config = AppConfig {
            port: 8080,
            auth_token: Some("super-secret".to_string()),
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("REDACTED"));
    }
}
