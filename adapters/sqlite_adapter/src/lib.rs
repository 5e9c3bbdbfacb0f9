use rusqlite::{params, Connection, OptionalExtension, Row};
use stardate_core::domain::{PostDateRecord, PostId};
use stardate_core::error::Error;
use stardate_core::ports::{PostRepository, Result, TermStore};
use stardate_core::utils::slugify;
use tracing::debug;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS posts (
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL DEFAULT '',
        post_date TEXT
    );
    CREATE TABLE IF NOT EXISTS terms (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        slug TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS term_relationships (
        post_id INTEGER NOT NULL,
        term_id INTEGER NOT NULL,
        PRIMARY KEY (post_id, term_id)
    );
"#;

fn storage_error(e: rusqlite::Error) -> Error {
    Error::Storage(e.to_string())
}

/// SQLite implementation of the PostRepository and TermStore traits
#[derive(Debug, Clone)]
pub struct SqlitePostStore {
    db_path: String,
}

impl SqlitePostStore {
    /// Creates a new SqlitePostStore with the given database path
    pub fn new(db_path: String) -> Self {
        Self { db_path }
    }

    fn connect(&self) -> Result<Connection> {
        debug!(db_path = %self.db_path, "opening content database");
        Connection::open(&self.db_path).map_err(storage_error)
    }

    /// Creates the posts and term tables if they do not exist yet
    pub fn init_schema(&self) -> Result<()> {
        self.connect()?.execute_batch(SCHEMA).map_err(storage_error)
    }

    /// Adds a post, `None` leaving it without a date
    pub fn insert_post(&self, title: &str, post_date: Option<&str>) -> Result<PostId> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO posts (title, post_date) VALUES (?1, ?2)",
            params![title, post_date],
        )
        .map_err(storage_error)?;
        Ok(conn.last_insert_rowid())
    }

    fn map_post(row: &Row) -> rusqlite::Result<PostDateRecord> {
        Ok(PostDateRecord {
            id: row.get(0)?,
            date: row.get(1)?,
        })
    }
}

impl PostRepository for SqlitePostStore {
    fn fetch_current_posts(&self) -> Result<Vec<PostDateRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT id, COALESCE(post_date, '') FROM posts ORDER BY id ASC")
            .map_err(storage_error)?;

        let records = stmt
            .query_map([], Self::map_post)
            .map_err(storage_error)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(storage_error)?;

        Ok(records)
    }

    fn fetch_post(&self, id: PostId) -> Result<Option<PostDateRecord>> {
        self.connect()?
            .query_row(
                "SELECT id, COALESCE(post_date, '') FROM posts WHERE id = ?1",
                params![id],
                Self::map_post,
            )
            .optional()
            .map_err(storage_error)
    }
}

impl TermStore for SqlitePostStore {
    fn attach_term(&self, post_id: PostId, term: &str) -> Result<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction().map_err(storage_error)?;

        let exists: Option<i64> = tx
            .query_row("SELECT id FROM posts WHERE id = ?1", params![post_id], |row| {
                row.get(0)
            })
            .optional()
            .map_err(storage_error)?;
        if exists.is_none() {
            return Err(Error::PostNotFound(post_id));
        }

        tx.execute(
            "INSERT OR IGNORE INTO terms (name, slug) VALUES (?1, ?2)",
            params![term, slugify(term)],
        )
        .map_err(storage_error)?;
        let term_id: i64 = tx
            .query_row("SELECT id FROM terms WHERE name = ?1", params![term], |row| {
                row.get(0)
            })
            .map_err(storage_error)?;

        // A post carries exactly one stardate
        tx.execute(
            "DELETE FROM term_relationships WHERE post_id = ?1",
            params![post_id],
        )
        .map_err(storage_error)?;
        tx.execute(
            "INSERT INTO term_relationships (post_id, term_id) VALUES (?1, ?2)",
            params![post_id, term_id],
        )
        .map_err(storage_error)?;

        tx.commit().map_err(storage_error)
    }

    fn post_terms(&self, post_id: PostId) -> Result<Vec<String>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(
                r#"
                SELECT t.name
                FROM term_relationships r
                JOIN terms t ON t.id = r.term_id
                WHERE r.post_id = ?1
                ORDER BY t.id
                "#,
            )
            .map_err(storage_error)?;

        let names = stmt
            .query_map(params![post_id], |row| row.get(0))
            .map_err(storage_error)?
            .collect::<rusqlite::Result<Vec<String>>>()
            .map_err(storage_error)?;

        Ok(names)
    }

    fn remove_terms(&self, post_id: PostId) -> Result<()> {
        self.connect()?
            .execute(
                "DELETE FROM term_relationships WHERE post_id = ?1",
                params![post_id],
            )
            .map_err(storage_error)?;
        Ok(())
    }

    fn delete_all_terms(&self) -> Result<usize> {
        let mut conn = self.connect()?;
        let tx = conn.transaction().map_err(storage_error)?;
        tx.execute("DELETE FROM term_relationships", [])
            .map_err(storage_error)?;
        let deleted = tx.execute("DELETE FROM terms", []).map_err(storage_error)?;
        tx.commit().map_err(storage_error)?;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stardate_core::application::StardateServiceImpl;
    use stardate_core::domain::{StardateConfig, StardateStyle};
    use tempfile::TempDir;

    fn stored_slug(store: &SqlitePostStore, post_id: PostId) -> Option<String> {
        store
            .connect()
            .unwrap()
            .query_row(
                r#"
                SELECT t.slug
                FROM term_relationships r
                JOIN terms t ON t.id = r.term_id
                WHERE r.post_id = ?1
                "#,
                params![post_id],
                |row| row.get(0),
            )
            .optional()
            .unwrap()
    }

    fn store() -> (TempDir, SqlitePostStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.db");
        let store = SqlitePostStore::new(path.to_string_lossy().into_owned());
        store.init_schema().unwrap();
        (dir, store)
    }

    #[test]
    fn test_init_schema_is_idempotent() {
        let (_dir, store) = store();
        store.init_schema().unwrap();
    }

    #[test]
    fn test_fetch_current_posts_in_id_order() {
        let (_dir, store) = store();
        let a = store.insert_post("First", Some("1999-06-15 08:00:00")).unwrap();
        let b = store.insert_post("Draft", None).unwrap();

        let posts = store.fetch_current_posts().unwrap();
        assert_eq!(
            posts,
            vec![
                PostDateRecord::new(a, "1999-06-15 08:00:00"),
                PostDateRecord::new(b, ""),
            ]
        );
    }

    #[test]
    fn test_fetch_post_missing() {
        let (_dir, store) = store();
        assert_eq!(store.fetch_post(7).unwrap(), None);
    }

    #[test]
    fn test_attach_term_replaces_previous() {
        let (_dir, store) = store();
        let id = store.insert_post("Log", Some("2023-02-24")).unwrap();

        store.attach_term(id, "Stardate 12302.24").unwrap();
        store.attach_term(id, "Stardate 2023.055").unwrap();

        assert_eq!(store.post_terms(id).unwrap(), vec!["Stardate 2023.055".to_string()]);
        assert_eq!(stored_slug(&store, id), Some("stardate-2023-055".to_string()));
    }

    #[test]
    fn test_attach_term_shares_terms_between_posts() {
        let (_dir, store) = store();
        let a = store.insert_post("A", Some("2023-02-24")).unwrap();
        let b = store.insert_post("B", Some("2023-02-24")).unwrap();

        store.attach_term(a, "Stardate 12302.24").unwrap();
        store.attach_term(b, "Stardate 12302.24").unwrap();

        assert_eq!(store.delete_all_terms().unwrap(), 1);
        assert!(store.post_terms(a).unwrap().is_empty());
    }

    #[test]
    fn test_attach_term_unknown_post() {
        let (_dir, store) = store();
        assert!(matches!(
            store.attach_term(42, "Stardate 9906.15"),
            Err(Error::PostNotFound(42))
        ));
    }

    #[test]
    fn test_remove_terms() {
        let (_dir, store) = store();
        let id = store.insert_post("Log", Some("2023-02-24")).unwrap();
        store.attach_term(id, "Stardate 12302.24").unwrap();

        store.remove_terms(id).unwrap();
        assert!(store.post_terms(id).unwrap().is_empty());
        assert_eq!(stored_slug(&store, id), None);
    }

    #[test]
    fn test_missing_schema_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.db");
        let store = SqlitePostStore::new(path.to_string_lossy().into_owned());
        assert!(matches!(store.fetch_current_posts(), Err(Error::Storage(_))));
    }

    #[test]
    fn test_service_sweep_against_sqlite() {
        let (_dir, store) = store();
        let a = store
            .insert_post("Encounter at Farpoint", Some("1987-09-28 20:00:00"))
            .unwrap();
        let _draft = store.insert_post("Draft", None).unwrap();
        let c = store.insert_post("Into Darkness", Some("2013-05-16")).unwrap();

        let service = StardateServiceImpl::new(
            Box::new(store.clone()),
            Box::new(store.clone()),
            StardateConfig {
                prefix: "Stardate".to_string(),
                style: StardateStyle::Classic,
            },
        );

        let outcome = service.associate_all_posts().unwrap();
        assert_eq!(outcome.succeeded, vec![a, c]);
        assert!(outcome.failed.is_empty());
        assert_eq!(store.post_terms(a).unwrap(), vec!["Stardate 8709.28".to_string()]);
        assert_eq!(
            service.stardate_for_post(c).unwrap(),
            Some("Stardate 11305.16".to_string())
        );
        assert_eq!(service.slug_for_post(c).unwrap(), "stardate-11305-16");
        assert_eq!(stored_slug(&store, c), Some(service.slug_for_post(c).unwrap()));

        let cleared = service.clear_all().unwrap();
        assert_eq!(cleared.posts_cleared, 3);
        assert_eq!(cleared.terms_deleted, 2);
        assert!(store.post_terms(a).unwrap().is_empty());
    }
}
