use crate::error::{Result, StoreError};
use crate::models::{Role, Session, User};
use crate::seed;
use crate::snapshot::{self, Snapshot};
use crate::storage::{keys, Storage};

/// Manages the user table and the single active session.
///
/// Takes its storage by reference so callers (and tests) decide where the
/// data lives; there is no ambient store.
pub struct IdentityStore<'a> {
    storage: &'a dyn Storage,
}

/// Fields a logged-in user may change about themselves. Id, email and role
/// are immutable after registration.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
}

impl<'a> IdentityStore<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// First touch seeds the user table with the bundled demo accounts.
    fn load_users(&self) -> Result<Snapshot<User>> {
        if self.storage.read(keys::USERS)?.is_none() {
            let users = seed::demo_users();
            let table = Snapshot {
                next_id: users.iter().map(|u| u.id).max().unwrap_or(0) + 1,
                items: users,
            };
            snapshot::save(self.storage, keys::USERS, &table)?;
        }
        snapshot::load(self.storage, keys::USERS)
    }

    fn write_session(&self, session: &Session) -> Result<()> {
        let raw = serde_json::to_string(session).map_err(|source| StoreError::Corrupt {
            key: keys::CURRENT_USER.to_string(),
            source,
        })?;
        self.storage.write(keys::CURRENT_USER, &raw)
    }

    /// Creates a user and logs them straight in.
    pub fn register(&self, name: &str, email: &str, password: &str, role: Role) -> Result<Session> {
        let mut table = self.load_users()?;

        // Exact, case-sensitive match on the logical unique key.
        if table.items.iter().any(|u| u.email == email) {
            return Err(StoreError::DuplicateUser);
        }

        let user = User {
            id: table.allocate_id(),
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role,
        };
        let session = Session::for_user(&user);
        table.items.push(user);
        snapshot::save(self.storage, keys::USERS, &table)?;
        self.write_session(&session)?;
        Ok(session)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<Session> {
        let table = self.load_users()?;
        let user = table
            .items
            .iter()
            .find(|u| u.email == email && u.password == password)
            .ok_or(StoreError::InvalidCredentials)?;

        let session = Session::for_user(user);
        self.write_session(&session)?;
        Ok(session)
    }

    /// Clears the session. Not an error when nobody is logged in.
    pub fn logout(&self) -> Result<()> {
        self.storage.remove(keys::CURRENT_USER)
    }

    pub fn current_session(&self) -> Result<Option<Session>> {
        self.load_users()?;
        match self.storage.read(keys::CURRENT_USER)? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StoreError::Corrupt {
                    key: keys::CURRENT_USER.to_string(),
                    source,
                }),
        }
    }

    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.current_session()?.is_some())
    }

    pub fn has_role(&self, role: Role) -> Result<bool> {
        Ok(self
            .current_session()?
            .map(|s| s.role == role)
            .unwrap_or(false))
    }

    /// Renames the logged-in user and propagates the new name into the
    /// session snapshot. Everything else on the user is immutable here.
    pub fn update_profile(&self, update: &ProfileUpdate) -> Result<Session> {
        let session = self.current_session()?.ok_or(StoreError::NoActiveSession)?;

        let mut table = self.load_users()?;
        let user = table
            .items
            .iter_mut()
            .find(|u| u.id == session.id)
            .ok_or(StoreError::UserNotFound)?;

        if let Some(name) = &update.name {
            user.name = name.clone();
        }
        let refreshed = Session {
            name: user.name.clone(),
            ..session
        };
        snapshot::save(self.storage, keys::USERS, &table)?;
        self.write_session(&refreshed)?;
        Ok(refreshed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store(storage: &MemoryStorage) -> IdentityStore<'_> {
        IdentityStore::new(storage)
    }

    #[test]
    fn first_touch_seeds_demo_accounts() {
        let storage = MemoryStorage::new();
        let auth = store(&storage);
        let session = auth.login("recruiter@demo.com", "demo123").unwrap();
        assert_eq!(session.role, Role::Recruiter);
        assert_eq!(session.name, "Jane Recruiter");
    }

    #[test]
    fn register_logs_the_user_in() {
        let storage = MemoryStorage::new();
        let auth = store(&storage);
        let session = auth
            .register("Ada", "ada@example.com", "pw", Role::Candidate)
            .unwrap();
        assert_eq!(session.id, 3); // after the two demo accounts
        assert_eq!(auth.current_session().unwrap().unwrap().email, "ada@example.com");
        assert!(auth.has_role(Role::Candidate).unwrap());
        assert!(!auth.has_role(Role::Recruiter).unwrap());
    }

    #[test]
    fn duplicate_email_is_rejected_and_table_unchanged() {
        let storage = MemoryStorage::new();
        let auth = store(&storage);
        auth.register("Ada", "ada@example.com", "pw", Role::Candidate)
            .unwrap();
        let before = auth.load_users().unwrap().items.len();
        let err = auth
            .register("Imposter", "ada@example.com", "other", Role::Recruiter)
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUser));
        assert_eq!(auth.load_users().unwrap().items.len(), before);
    }

    #[test]
    fn email_match_is_case_sensitive() {
        let storage = MemoryStorage::new();
        let auth = store(&storage);
        auth.register("Ada", "ada@example.com", "pw", Role::Candidate)
            .unwrap();
        auth.register("Other Ada", "Ada@example.com", "pw", Role::Candidate)
            .unwrap();
    }

    #[test]
    fn wrong_password_is_invalid_credentials() {
        let storage = MemoryStorage::new();
        let auth = store(&storage);
        let err = auth.login("candidate@demo.com", "nope").unwrap_err();
        assert!(matches!(err, StoreError::InvalidCredentials));
        assert!(!auth.is_authenticated().unwrap());
    }

    #[test]
    fn logout_without_session_is_fine() {
        let storage = MemoryStorage::new();
        let auth = store(&storage);
        auth.logout().unwrap();
        auth.login("candidate@demo.com", "demo123").unwrap();
        auth.logout().unwrap();
        assert_eq!(auth.current_session().unwrap(), None);
    }

    #[test]
    fn update_profile_requires_a_session() {
        let storage = MemoryStorage::new();
        let auth = store(&storage);
        let err = auth
            .update_profile(&ProfileUpdate { name: Some("X".into()) })
            .unwrap_err();
        assert!(matches!(err, StoreError::NoActiveSession));
    }

    #[test]
    fn update_profile_with_a_stale_session_is_user_not_found() {
        let storage = MemoryStorage::new();
        let auth = store(&storage);
        let session = auth.login("candidate@demo.com", "demo123").unwrap();

        // drop the user out from under the session
        let mut table = auth.load_users().unwrap();
        table.items.retain(|u| u.id != session.id);
        crate::snapshot::save(&storage, crate::storage::keys::USERS, &table).unwrap();

        let err = auth
            .update_profile(&ProfileUpdate { name: Some("X".into()) })
            .unwrap_err();
        assert!(matches!(err, StoreError::UserNotFound));
    }

    #[test]
    fn update_profile_renames_user_and_session_only() {
        let storage = MemoryStorage::new();
        let auth = store(&storage);
        auth.login("candidate@demo.com", "demo123").unwrap();
        let session = auth
            .update_profile(&ProfileUpdate { name: Some("Johnny Doe".into()) })
            .unwrap();
        assert_eq!(session.name, "Johnny Doe");
        assert_eq!(session.email, "candidate@demo.com");
        assert_eq!(session.role, Role::Candidate);

        // persisted on the user table too, password untouched
        let table = auth.load_users().unwrap();
        let user = table.items.iter().find(|u| u.id == session.id).unwrap();
        assert_eq!(user.name, "Johnny Doe");
        assert_eq!(user.password, "demo123");
    }

    #[test]
    fn session_is_a_snapshot_not_a_live_reference() {
        let storage = MemoryStorage::new();
        let auth = store(&storage);
        auth.register("Ada", "ada@example.com", "pw", Role::Candidate)
            .unwrap();

        // Mutate the table behind the session's back.
        let mut table = auth.load_users().unwrap();
        table.items.last_mut().unwrap().name = "Renamed".to_string();
        crate::snapshot::save(&storage, crate::storage::keys::USERS, &table).unwrap();

        assert_eq!(auth.current_session().unwrap().unwrap().name, "Ada");
    }
}
