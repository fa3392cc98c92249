//! User registry — accounts keyed by [`UserId`].

use indexmap::IndexMap;

use smarthub_domain::error::{DuplicateKeyError, HubError, NotFoundError};
use smarthub_domain::id::UserId;
use smarthub_domain::user::User;

/// Insertion-ordered store of registered users.
#[derive(Debug, Default)]
pub struct UserRegistry {
    users: IndexMap<UserId, User>,
}

impl UserRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::DuplicateKey`] if the id is taken, or
    /// [`HubError::Validation`] if the user breaks an invariant.
    pub fn add(&mut self, user: User) -> Result<&User, HubError> {
        user.validate()?;
        if self.users.contains_key(&user.id) {
            return Err(DuplicateKeyError {
                entity: "User",
                id: user.id.to_string(),
            }
            .into());
        }
        tracing::debug!(user_id = %user.id, role = %user.role, "user registered");
        Ok(&*self.users.entry(user.id).or_insert(user))
    }

    /// Look up a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] when no user with `id` exists.
    pub fn get(&self, id: UserId) -> Result<&User, HubError> {
        self.users.get(&id).ok_or_else(|| not_found(id))
    }

    /// Remove a user and return it.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] when no user with `id` exists.
    pub fn delete(&mut self, id: UserId) -> Result<User, HubError> {
        self.users.shift_remove(&id).ok_or_else(|| not_found(id))
    }

    /// Every user in registration order.
    pub fn list_all(&self) -> impl ExactSizeIterator<Item = &User> + Clone + '_ {
        self.users.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

fn not_found(id: UserId) -> HubError {
    NotFoundError {
        entity: "User",
        id: id.to_string(),
    }
    .into()
}
