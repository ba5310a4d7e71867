//! Viewer identity, read from client-side session storage at page load.
//!
//! The catalog page is lenient: without a token and username the viewer is
//! anonymous and the page stays readable. The order page is strict: it needs
//! a user id and sends the viewer to the login route otherwise.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use tracing::warn;

use crate::{Result, StorefrontError};

pub const TOKEN_KEY: &str = "token";
pub const USERNAME_KEY: &str = "username";
pub const ROLE_KEY: &str = "role";
pub const USER_ID_KEY: &str = "userId";
/// Key written by older login pages.
pub const LEGACY_USER_ID_KEY: &str = "USER_ID";

/// Key/value storage holding the session. Identity is only ever read, except
/// that the strict resolver clears the credentials it found to be broken.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn remove(&self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemorySessionStore { entries: Mutex<HashMap<String, String>> }

impl MemorySessionStore {
    pub fn new() -> Self { Self::default() }
    pub fn with(self, key: &str, value: &str) -> Self { self.insert(key, value); self }
    pub fn insert(&self, key: &str, value: &str) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).insert(key.to_string(), value.to_string());
    }
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).contains_key(key)
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).get(key).cloned()
    }
    fn remove(&self, key: &str) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).remove(key);
    }
}

/// Session carried in a `Cookie` request header. Removals are recorded so the
/// response can expire them.
#[derive(Debug, Default)]
pub struct CookieSessionStore { cookies: HashMap<String, String>, removed: Mutex<Vec<String>> }

impl CookieSessionStore {
    pub fn from_header(header: &str) -> Self {
        let cookies = header
            .split(';')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| (k.trim().to_string(), percent_decoded(v.trim().trim_matches('"'))))
            .filter(|(k, _)| !k.is_empty())
            .collect();
        Self { cookies, removed: Mutex::new(Vec::new()) }
    }
    pub fn take_removed(&self) -> Vec<String> {
        std::mem::take(&mut *self.removed.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

/// Login pages may write values URL-encoded. Undecodable values are kept as sent.
fn percent_decoded(raw: &str) -> String {
    urlencoding::decode(raw).map(|v| v.into_owned()).unwrap_or_else(|_| raw.to_string())
}

impl SessionStore for CookieSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        let removed = self.removed.lock().unwrap_or_else(|e| e.into_inner());
        if removed.iter().any(|k| k == key) { return None; }
        self.cookies.get(key).cloned()
    }
    fn remove(&self, key: &str) {
        self.removed.lock().unwrap_or_else(|e| e.into_inner()).push(key.to_string());
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Role { Owner, User, Other(String) }

impl Role {
    /// Case-insensitive. Already-prefixed `ROLE_*` values are taken as they are,
    /// anything mentioning owner/admin is an owner, anything mentioning user is
    /// a standard user, and unknown values pass through uppercased.
    pub fn normalize(raw: Option<&str>) -> Option<Role> {
        let upper = raw.map(str::trim).filter(|r| !r.is_empty())?.to_uppercase();
        let role = if upper.starts_with("ROLE_") {
            match upper.as_str() { "ROLE_OWNER" => Role::Owner, "ROLE_USER" => Role::User, _ => Role::Other(upper) }
        } else if upper.contains("OWNER") || upper.contains("ADMIN") {
            Role::Owner
        } else if upper.contains("USER") {
            Role::User
        } else {
            Role::Other(upper)
        };
        Some(role)
    }

    pub fn as_str(&self) -> &str {
        match self { Role::Owner => "ROLE_OWNER", Role::User => "ROLE_USER", Role::Other(r) => r }
    }

    pub fn display_name(&self) -> &str {
        match self { Role::Owner => "owner", Role::User => "standard user", Role::Other(r) => r }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Value sent in the identity header of user-scoped requests.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self { Self(value.into()) }
    /// The catalog page only accepts numeric ids.
    pub fn parse_numeric(raw: &str) -> Option<Self> {
        raw.trim().parse::<i64>().ok().map(|n| Self(n.to_string()))
    }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// Who is looking at the page. `role == None` is an anonymous viewer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Viewer { pub role: Option<Role>, pub user_id: Option<UserId> }

impl Viewer {
    pub fn anonymous() -> Self { Self::default() }
    pub fn owner(user_id: Option<UserId>) -> Self { Self { role: Some(Role::Owner), user_id } }
    pub fn user(user_id: Option<UserId>) -> Self { Self { role: Some(Role::User), user_id } }
    pub fn is_authenticated(&self) -> bool { self.role.is_some() }
    pub fn has_role(&self, role: &Role) -> bool { self.role.as_ref() == Some(role) }
}

fn present(store: &dyn SessionStore, key: &str) -> Option<String> {
    store.get(key).filter(|v| !v.trim().is_empty())
}

/// Lenient resolution for the catalog page.
///
/// A signed-in session without a role is treated as a standard user. A user id
/// that is missing or not numeric is left unset rather than guessed; user-scoped
/// actions then refuse to run.
pub fn resolve_viewer(store: &dyn SessionStore) -> Viewer {
    if present(store, TOKEN_KEY).is_none() || present(store, USERNAME_KEY).is_none() {
        return Viewer::anonymous();
    }
    let role = Role::normalize(store.get(ROLE_KEY).as_deref()).unwrap_or(Role::User);
    let user_id = present(store, USER_ID_KEY).and_then(|raw| {
        let parsed = UserId::parse_numeric(&raw);
        if parsed.is_none() { warn!(raw = %raw, "ignoring non-numeric user id in session"); }
        parsed
    });
    Viewer { role: Some(role), user_id }
}

/// Strict resolution for pages that cannot be shown anonymously.
///
/// The user id is looked up in `persistent` under the current key, then the
/// legacy key, then in `per_tab` under the legacy key. When none is found the
/// token and username are cleared so the next login starts clean.
pub fn resolve_required_user(persistent: &dyn SessionStore, per_tab: &dyn SessionStore) -> Result<UserId> {
    if present(persistent, TOKEN_KEY).is_none() || present(persistent, USERNAME_KEY).is_none() {
        return Err(StorefrontError::LoginRequired);
    }
    let found = present(persistent, USER_ID_KEY)
        .or_else(|| present(persistent, LEGACY_USER_ID_KEY))
        .or_else(|| present(per_tab, LEGACY_USER_ID_KEY));
    match found {
        Some(raw) => Ok(UserId::new(raw.trim())),
        None => {
            warn!("session has credentials but no user id; clearing");
            persistent.remove(TOKEN_KEY);
            persistent.remove(USERNAME_KEY);
            Err(StorefrontError::MissingUserId)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_in() -> MemorySessionStore {
        MemorySessionStore::new().with(TOKEN_KEY, "t").with(USERNAME_KEY, "kim")
    }

    #[test]
    fn test_role_normalization() {
        assert_eq!(Role::normalize(Some("owner")), Some(Role::Owner));
        assert_eq!(Role::normalize(Some("Admin")), Some(Role::Owner));
        assert_eq!(Role::normalize(Some("user")), Some(Role::User));
        assert_eq!(Role::normalize(Some("ROLE_USER")), Some(Role::User));
        assert_eq!(Role::normalize(Some("role_owner")), Some(Role::Owner));
        assert_eq!(Role::normalize(Some("ROLE_ADMIN")), Some(Role::Other("ROLE_ADMIN".into())));
        assert_eq!(Role::normalize(Some("guest")), Some(Role::Other("GUEST".into())));
        assert_eq!(Role::normalize(Some("")), None);
        assert_eq!(Role::normalize(None), None);
    }

    #[test]
    fn test_anonymous_without_token_or_username() {
        let store = MemorySessionStore::new().with(TOKEN_KEY, "t").with(ROLE_KEY, "owner");
        assert_eq!(resolve_viewer(&store), Viewer::anonymous());
        let store = MemorySessionStore::new().with(USERNAME_KEY, "kim");
        assert!(!resolve_viewer(&store).is_authenticated());
    }

    #[test]
    fn test_signed_in_viewer() {
        let store = signed_in().with(ROLE_KEY, "owner").with(USER_ID_KEY, "42");
        assert_eq!(resolve_viewer(&store), Viewer::owner(Some(UserId::new("42"))));
        let store = signed_in();
        assert_eq!(resolve_viewer(&store), Viewer::user(None));
    }

    #[test]
    fn test_no_user_id_fallback() {
        let store = signed_in().with(ROLE_KEY, "user").with(USER_ID_KEY, "abc");
        assert_eq!(resolve_viewer(&store).user_id, None);
    }

    #[test]
    fn test_required_user_chain() {
        let tab = MemorySessionStore::new().with(LEGACY_USER_ID_KEY, "7");
        let store = signed_in();
        assert_eq!(resolve_required_user(&store, &tab).unwrap(), UserId::new("7"));
        let store = signed_in().with(LEGACY_USER_ID_KEY, "5");
        assert_eq!(resolve_required_user(&store, &tab).unwrap(), UserId::new("5"));
        let store = signed_in().with(USER_ID_KEY, "3").with(LEGACY_USER_ID_KEY, "5");
        assert_eq!(resolve_required_user(&store, &tab).unwrap(), UserId::new("3"));
    }

    #[test]
    fn test_required_user_clears_broken_session() {
        let store = signed_in();
        let tab = MemorySessionStore::new();
        assert!(matches!(resolve_required_user(&store, &tab), Err(StorefrontError::MissingUserId)));
        assert!(!store.contains(TOKEN_KEY));
        assert!(!store.contains(USERNAME_KEY));
        let empty = MemorySessionStore::new();
        assert!(matches!(resolve_required_user(&empty, &tab), Err(StorefrontError::LoginRequired)));
    }

    #[test]
    fn test_cookie_store() {
        let store = CookieSessionStore::from_header("token=abc; username=kim; role=ROLE_USER; userId=\"9\"");
        assert_eq!(resolve_viewer(&store), Viewer::user(Some(UserId::new("9"))));
        store.remove(TOKEN_KEY);
        assert_eq!(store.get(TOKEN_KEY), None);
        assert_eq!(store.take_removed(), vec![TOKEN_KEY.to_string()]);
    }

    #[test]
    fn test_cookie_values_percent_decoded() {
        let store = CookieSessionStore::from_header("token=a%2Bb; username=%EA%B9%80; role=ROLE%5FOWNER; userId=%3712");
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("a+b"));
        assert_eq!(store.get(USERNAME_KEY).as_deref(), Some("김"));
        assert_eq!(resolve_viewer(&store), Viewer::owner(Some(UserId::new("712"))));
        let broken = CookieSessionStore::from_header("username=%FF");
        assert_eq!(broken.get(USERNAME_KEY).as_deref(), Some("%FF"));
    }
}
