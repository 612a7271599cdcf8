use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tracing::debug;
use uuid::Uuid;

use crate::client::Session;

/// Auth state changes delivered to subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(Session),
    TokenRefreshed(Session),
    SignedOut,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&AuthEvent) + Send + Sync>;

#[derive(Default)]
struct Inner {
    initialized: bool,
    session: Option<Session>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

/// Single source of truth for the signed-in session.
///
/// Listeners run after the internal lock is released, so they may call back
/// into the store.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<Inner>>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("SessionStore")
            .field("initialized", &inner.initialized)
            .field("user_id", &inner.session.as_ref().map(Session::user_id))
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide store.
    pub fn global() -> &'static SessionStore {
        static STORE: OnceLock<SessionStore> = OnceLock::new();
        STORE.get_or_init(SessionStore::new)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed the store with a restored session (or none). Emits `SignedIn` when one is given.
    pub fn init(&self, session: Option<Session>) {
        {
            let mut inner = self.lock();
            inner.initialized = true;
        }
        debug!(restored = session.is_some(), "session store initialized");
        if let Some(session) = session {
            self.set_session(session);
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().initialized
    }

    /// Drop the session and every subscription. Subscribers see a final `SignedOut`.
    pub fn teardown(&self) {
        let had_session = self.lock().session.is_some();
        if had_session {
            self.clear();
        }

        let mut inner = self.lock();
        inner.listeners.clear();
        inner.initialized = false;
        debug!("session store torn down");
    }

    pub fn current(&self) -> Option<Session> {
        self.lock().session.clone()
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.lock().session.as_ref().map(Session::user_id)
    }

    /// Store `session`. Same user as before is a refresh, anything else a sign-in.
    pub fn set_session(&self, session: Session) {
        let (event, listeners) = {
            let mut inner = self.lock();
            let same_user = inner
                .session
                .as_ref()
                .is_some_and(|current| current.user_id() == session.user_id());
            inner.session = Some(session.clone());

            let event = if same_user {
                AuthEvent::TokenRefreshed(session)
            } else {
                AuthEvent::SignedIn(session)
            };
            (event, snapshot(&inner))
        };

        notify(&listeners, &event);
    }

    /// Forget the session. Returns `false` (and emits nothing) when nobody was signed in.
    pub fn clear(&self) -> bool {
        let listeners = {
            let mut inner = self.lock();
            if inner.session.take().is_none() {
                return false;
            }
            snapshot(&inner)
        };

        notify(&listeners, &AuthEvent::SignedOut);
        true
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&AuthEvent) + Send + Sync + 'static,
    {
        let mut inner = self.lock();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.lock();
        let before = inner.listeners.len();
        inner.listeners.retain(|(existing, _)| *existing != id);
        inner.listeners.len() != before
    }
}

fn snapshot(inner: &Inner) -> Vec<Listener> {
    inner
        .listeners
        .iter()
        .map(|(_, listener)| Arc::clone(listener))
        .collect()
}

fn notify(listeners: &[Listener], event: &AuthEvent) {
    for listener in listeners {
        listener(event);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use uuid::Uuid;

    use super::{AuthEvent, SessionStore};
    use crate::client::{AuthUser, Session};

    fn session(user_id: Uuid, token: &str) -> Session {
        Session {
            access_token: token.to_owned(),
            refresh_token: format!("{token}-refresh"),
            expires_at: 10,
            user: AuthUser {
                id: user_id,
                email: None,
            },
        }
    }

    fn recorder(store: &SessionStore) -> (super::SubscriptionId, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = store.subscribe(move |event| {
            let label = match event {
                AuthEvent::SignedIn(s) => format!("in:{}", s.access_token),
                AuthEvent::TokenRefreshed(s) => format!("refresh:{}", s.access_token),
                AuthEvent::SignedOut => "out".to_owned(),
            };
            sink.lock().unwrap().push(label);
        });
        (id, seen)
    }

    #[test]
    fn subscribers_see_sign_in_refresh_and_sign_out() {
        let store = SessionStore::new();
        let (_, seen) = recorder(&store);
        let user = Uuid::new_v4();

        store.init(None);
        assert!(store.is_initialized());
        assert_eq!(store.user_id(), None);

        store.set_session(session(user, "a"));
        store.set_session(session(user, "b"));
        assert_eq!(store.user_id(), Some(user));
        assert!(store.clear());
        assert!(!store.clear());

        assert_eq!(*seen.lock().unwrap(), vec!["in:a", "refresh:b", "out"]);
    }

    #[test]
    fn unsubscribed_listeners_stop_receiving() {
        let store = SessionStore::new();
        let (id, seen) = recorder(&store);

        store.set_session(session(Uuid::new_v4(), "a"));
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.clear();

        assert_eq!(*seen.lock().unwrap(), vec!["in:a"]);
    }

    #[test]
    fn teardown_signs_out_and_drops_listeners() {
        let store = SessionStore::new();
        let (_, seen) = recorder(&store);

        store.init(Some(session(Uuid::new_v4(), "restored")));
        store.teardown();
        assert!(!store.is_initialized());
        assert_eq!(store.current(), None);

        store.set_session(session(Uuid::new_v4(), "later"));
        assert_eq!(*seen.lock().unwrap(), vec!["in:restored", "out"]);
    }

    #[test]
    fn switching_users_is_a_new_sign_in() {
        let store = SessionStore::new();
        let (_, seen) = recorder(&store);

        store.set_session(session(Uuid::new_v4(), "a"));
        store.set_session(session(Uuid::new_v4(), "b"));
        assert_eq!(*seen.lock().unwrap(), vec!["in:a", "in:b"]);
    }

    #[test]
    fn listeners_may_read_the_store() {
        let store = SessionStore::new();
        let observed = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&observed);
        let handle = store.clone();
        store.subscribe(move |_| {
            *sink.lock().unwrap() = handle.user_id();
        });

        let user = Uuid::new_v4();
        store.set_session(session(user, "a"));
        assert_eq!(*observed.lock().unwrap(), Some(user));
    }
}
