//! Session store.
//!
//! The bearer token is persisted in `localStorage`; everything else lives in
//! memory for the lifetime of the tab. Views never touch storage directly:
//! they receive a [`SessionContext`] and go through it.

use std::cell::RefCell;
use std::rc::Rc;

use yew::Callback;

use crate::config::TOKEN_STORAGE_KEY;
use crate::models::UserProfile;

pub trait TokenStorage {
    fn load(&self) -> Option<String>;
    fn store(&self, token: &str);
    fn clear(&self);
}

/// `window.localStorage` under [`TOKEN_STORAGE_KEY`].
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl TokenStorage for BrowserStorage {
    fn load(&self) -> Option<String> {
        Self::storage()?
            .get_item(TOKEN_STORAGE_KEY)
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())
    }

    fn store(&self, token: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(TOKEN_STORAGE_KEY, token).is_err() {
                log::warn!("could not persist access token");
            }
        }
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            if storage.remove_item(TOKEN_STORAGE_KEY).is_err() {
                log::warn!("could not clear access token");
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: Option<UserProfile>,
}

/// Shared handle to the one active session of this browser profile.
#[derive(Clone)]
pub struct SessionContext {
    state: Rc<RefCell<Option<Session>>>,
    storage: Rc<dyn TokenStorage>,
    on_expired: Callback<()>,
}

impl PartialEq for SessionContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl SessionContext {
    /// Picks up a token left in storage by an earlier visit. The profile is
    /// fetched separately.
    pub fn restore(storage: Rc<dyn TokenStorage>, on_expired: Callback<()>) -> Self {
        let session = storage.load().map(|token| Session { token, user: None });
        Self {
            state: Rc::new(RefCell::new(session)),
            storage,
            on_expired,
        }
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().as_ref().map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state.borrow().as_ref().and_then(|s| s.user.clone())
    }

    pub fn is_active(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Starts a session from a freshly issued token, replacing any other.
    pub fn begin(&self, token: String) {
        self.storage.store(&token);
        *self.state.borrow_mut() = Some(Session { token, user: None });
    }

    pub fn set_user(&self, user: UserProfile) {
        if let Some(session) = self.state.borrow_mut().as_mut() {
            session.user = Some(user);
        }
    }

    /// Drops the session without signalling navigation, e.g. when a login
    /// attempt fails half-way.
    pub fn discard(&self) {
        self.storage.clear();
        *self.state.borrow_mut() = None;
    }

    /// The single teardown path: clears storage and in-memory state, then
    /// tells the app shell to show the login view.
    pub fn invalidate(&self) {
        let was_active = self.state.borrow_mut().take().is_some();
        self.storage.clear();
        if was_active {
            log::info!("session ended");
        }
        self.on_expired.emit(());
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    pub(crate) struct MemoryStorage {
        pub(crate) token: RefCell<Option<String>>,
    }

    impl TokenStorage for MemoryStorage {
        fn load(&self) -> Option<String> {
            self.token.borrow().clone()
        }

        fn store(&self, token: &str) {
            *self.token.borrow_mut() = Some(token.to_string());
        }

        fn clear(&self) {
            *self.token.borrow_mut() = None;
        }
    }

    pub(crate) fn session_with(
        token: Option<&str>,
    ) -> (SessionContext, Rc<MemoryStorage>, Rc<Cell<u32>>) {
        let storage = Rc::new(MemoryStorage::default());
        if let Some(token) = token {
            storage.store(token);
        }
        let expired = Rc::new(Cell::new(0));
        let on_expired = {
            let expired = expired.clone();
            Callback::from(move |_| expired.set(expired.get() + 1))
        };
        let session = SessionContext::restore(storage.clone(), on_expired);
        (session, storage, expired)
    }

    fn profile() -> UserProfile {
        UserProfile {
            id: "u-1".to_string(),
            email: "treasurer@example.com".to_string(),
            user_metadata: None,
        }
    }

    #[test]
    fn restores_token_from_storage() {
        let (session, _, _) = session_with(Some("abc"));
        assert!(session.is_active());
        assert_eq!(session.token().as_deref(), Some("abc"));
        assert_eq!(session.user(), None);

        let (session, _, _) = session_with(None);
        assert!(!session.is_active());
    }

    #[test]
    fn begin_persists_and_set_user_attaches_profile() {
        let (session, storage, _) = session_with(None);
        session.begin("fresh".to_string());
        assert_eq!(storage.token.borrow().as_deref(), Some("fresh"));

        session.set_user(profile());
        assert_eq!(session.user().map(|u| u.email), Some("treasurer@example.com".to_string()));
    }

    #[test]
    fn invalidate_clears_storage_and_signals() {
        let (session, storage, expired) = session_with(Some("abc"));
        session.set_user(profile());
        session.invalidate();

        assert!(!session.is_active());
        assert_eq!(session.token(), None);
        assert_eq!(*storage.token.borrow(), None);
        assert_eq!(expired.get(), 1);
    }

    #[test]
    fn discard_does_not_signal() {
        let (session, storage, expired) = session_with(Some("abc"));
        session.discard();
        assert_eq!(*storage.token.borrow(), None);
        assert_eq!(expired.get(), 0);
    }

    #[test]
    fn clones_share_state() {
        let (session, _, _) = session_with(None);
        let other = session.clone();
        other.begin("t".to_string());
        assert_eq!(session.token().as_deref(), Some("t"));
        assert!(session == other);
    }
}
