//! Small device metadata kept in the `meta` key/value table.

use rusqlite::params;
use uuid::Uuid;

use crate::database::Database;
use crate::error::Result;

const KEY_DEVICE_USER_ID: &str = "device_user_id";
const KEY_INSTALL_PROMPT_SEEN: &str = "install_prompt_seen";

impl Database {
    fn meta_get(&self, key: &str) -> Result<Option<String>> {
        self.conn()
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other.into()),
            })
    }

    fn meta_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// The stable anonymous user id for this device.
    ///
    /// Generated once (UUID v4) on first call and persisted; every later
    /// call returns the same value.
    pub fn device_user_id(&self) -> Result<String> {
        if let Some(id) = self.meta_get(KEY_DEVICE_USER_ID)? {
            return Ok(id);
        }

        let id = Uuid::new_v4().to_string();
        self.meta_set(KEY_DEVICE_USER_ID, &id)?;
        tracing::info!(user_id = %id, "provisioned device user id");
        Ok(id)
    }

    /// Whether the one-time install prompt has already been shown.
    pub fn install_prompt_seen(&self) -> Result<bool> {
        Ok(self.meta_get(KEY_INSTALL_PROMPT_SEEN)?.as_deref() == Some("true"))
    }

    /// Record that the install prompt was shown.
    pub fn mark_install_prompt_seen(&self) -> Result<()> {
        self.meta_set(KEY_INSTALL_PROMPT_SEEN, "true")
    }
}
