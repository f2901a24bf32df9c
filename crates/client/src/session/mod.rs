//! Content session: the client, editor mode, and live-edit channel one page uses.
//!
//! [`ContentSession`] loads sections with caller defaults layered underneath,
//! and hands out [`SectionView`]s that keep one section's data current and
//! apply edits relayed from the dashboard.

pub mod merge;

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use buildll_core::{ConfigError, Error};

use crate::content::BuildllClient;
use crate::live::{EditChannel, EditEvent, EditSubscription};

pub use merge::{merge_defaults, overlay};

/// Per-page content context.
#[derive(Debug, Clone)]
pub struct ContentSession {
    client: BuildllClient,
    channel: EditChannel,
    editor_mode: bool,
    editor_token: Option<String>,
}

impl ContentSession {
    /// Create a read-only session over `client`, listening on `channel`.
    pub fn new(client: BuildllClient, channel: EditChannel) -> Self {
        Self { client, channel, editor_mode: false, editor_token: None }
    }

    /// Enable editor mode. `token` authorizes edits relayed from the dashboard.
    pub fn with_editor(mut self, token: Option<String>) -> Self {
        self.editor_mode = true;
        self.editor_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn client(&self) -> &BuildllClient {
        &self.client
    }

    pub fn channel(&self) -> &EditChannel {
        &self.channel
    }

    pub fn editor_mode(&self) -> bool {
        self.editor_mode
    }

    /// Load one section merged over `defaults`.
    pub async fn load(&self, section_id: &str, defaults: &Value) -> Result<Value, Error> {
        let fetched = self.client.get_content(section_id).await?;
        Ok(merge_defaults(defaults, fetched.as_ref()))
    }

    /// Load several sections, each merged over its entry in `defaults`.
    ///
    /// An empty id list returns `defaults` without touching the network.
    pub async fn load_batch<S: AsRef<str>>(
        &self, section_ids: &[S], defaults: &Map<String, Value>,
    ) -> Result<Map<String, Value>, Error> {
        if section_ids.is_empty() {
            return Ok(defaults.clone());
        }

        let batch = self.client.get_batch_content(section_ids).await?;
        let ids: BTreeSet<&str> = section_ids.iter().map(|id| id.as_ref()).collect();

        Ok(ids
            .into_iter()
            .map(|id| {
                let default = defaults.get(id).unwrap_or(&Value::Null);
                let fetched = batch.get(id).and_then(Option::as_ref);
                (id.to_string(), merge_defaults(default, fetched))
            })
            .collect())
    }

    /// Open a view of one section. It starts at `defaults` until loaded.
    ///
    /// The view subscribes to the edit channel now and unsubscribes when dropped.
    pub fn section(&self, section_id: impl Into<String>, defaults: Value) -> SectionView {
        SectionView {
            session: self.clone(),
            section_id: section_id.into(),
            data: defaults.clone(),
            defaults,
            subscription: self.channel.subscribe(),
        }
    }
}

/// One section's current data within a session.
#[derive(Debug)]
pub struct SectionView {
    session: ContentSession,
    section_id: String,
    defaults: Value,
    data: Value,
    subscription: EditSubscription,
}

impl SectionView {
    pub fn section_id(&self) -> &str {
        &self.section_id
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Fetch the section and merge it over the defaults.
    ///
    /// On failure the current data is kept.
    pub async fn reload(&mut self) -> Result<&Value, Error> {
        self.data = self.session.load(&self.section_id, &self.defaults).await?;
        Ok(&self.data)
    }

    /// Write `patch` and merge it into the local data on success.
    ///
    /// Outside editor mode an explicit `write_token` is required. In editor
    /// mode the session's token is used when none is given.
    pub async fn update(&mut self, patch: Value, write_token: Option<&str>) -> Result<&Value, Error> {
        if !self.session.editor_mode && write_token.is_none() {
            return Err(Error::EditorDisabled);
        }
        let token = write_token.or(self.session.editor_token.as_deref()).ok_or_else(|| ConfigError::Missing {
            field: "write_token".into(),
            hint: "editor mode needs a write token to save edits".into(),
        })?;

        self.session.client.update_content(&self.section_id, patch.clone(), token).await?;
        self.data = overlay(&self.data, &patch);
        Ok(&self.data)
    }

    /// Wait for the next dashboard edit to this section and save it.
    ///
    /// Returns `None` once the edit channel is closed.
    pub async fn next_edit(&mut self) -> Option<Result<&Value, Error>> {
        let EditEvent::SaveElement { content, .. } = self.subscription.recv_for(&self.section_id).await?;
        tracing::debug!(section_id = %self.section_id, "applying dashboard edit");
        Some(self.update(content, None).await)
    }
}
