use anyhow::Context as _;
use tracing::{debug, warn};
use uuid::Uuid;

use hxbit_core::{ProgressEvent, ValidationError};
use hxbit_database::Database;
use hxbit_service::{ServiceClient, Session, SessionStore};
use hxbit_utils::time::now_unix_secs;

use crate::notice::Toast;

pub type Error = anyhow::Error;

/// Shared handles every command runs against.
#[derive(Clone, Debug)]
pub struct Data {
    pub db: Database,
    pub service: ServiceClient,
    pub session: SessionStore,
}

/// Everything a command produced, handed back to the front end.
#[derive(Debug, Default)]
pub struct Reply {
    pub lines: Vec<String>,
    pub toasts: Vec<Toast>,
    pub events: Vec<ProgressEvent>,
}

pub struct Context<'a> {
    data: &'a Data,
    reply: Reply,
}

impl<'a> Context<'a> {
    pub fn new(data: &'a Data) -> Self {
        Self {
            data,
            reply: Reply::default(),
        }
    }

    pub fn data(&self) -> &'a Data {
        self.data
    }

    pub fn db(&self) -> &'a Database {
        &self.data.db
    }

    pub fn say(&mut self, line: impl Into<String>) {
        self.reply.lines.push(line.into());
    }

    pub fn toast(&mut self, toast: Toast) {
        self.reply.toasts.push(toast);
    }

    pub fn emit(&mut self, events: impl IntoIterator<Item = ProgressEvent>) {
        self.reply.events.extend(events);
    }

    pub fn into_reply(self) -> Reply {
        self.reply
    }

    /// The signed-in session, refreshed first when its access token has expired.
    pub async fn session(&self) -> Result<Session, Error> {
        let store = &self.data.session;
        let Some(session) = store.current() else {
            return Err(ValidationError::NotSignedIn.into());
        };

        if !session.is_expired(now_unix_secs()) {
            return Ok(session);
        }

        debug!(user_id = %session.user_id(), "access token expired; refreshing");
        match self
            .data
            .service
            .refresh_session(&session.refresh_token)
            .await
        {
            Ok(refreshed) => {
                store.set_session(refreshed.clone());
                Ok(refreshed)
            }
            Err(err) => {
                warn!(?err, user_id = %session.user_id(), "session refresh failed; signing out");
                store.clear();
                Err(ValidationError::NotSignedIn.into())
            }
        }
    }

    pub async fn user_id(&self) -> Result<Uuid, Error> {
        Ok(self.session().await?.user_id())
    }

    /// Resolve a username to a user id, or say so and return `None`.
    pub async fn lookup_user(&mut self, username: &str) -> Result<Option<Uuid>, Error> {
        let account = hxbit_database::impls::accounts::find_account_by_username(self.db(), username)
            .await
            .context("username lookup failed")?;

        match account {
            Some(account) => Ok(Some(account.user_id)),
            None => {
                self.say(format!("No user named `{username}`."));
                Ok(None)
            }
        }
    }
}
