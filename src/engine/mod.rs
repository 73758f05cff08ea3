//! This module provides the storage engines that hold the phonebook's contacts.
//! The two engines that are implemented are [`SledContactsEngine`], which persists contacts in an
//! embedded [`sled`] database, and [`MemoryContactsEngine`], which keeps them in concurrent
//! hash maps and forgets them when the process exits.
//!
//! [`sled`]: https://docs.rs/sled/latest/sled/
use crate::contact::{Contact, ContactId, NewContact};
use crate::{PhonebookError, Result};

/// A trait for the storage operations the directory service needs from a document store.
///
/// Engines are cheap to clone; every clone is a handle onto the same underlying store. Each
/// method is a single atomic operation against the store.
pub trait ContactsEngine: Clone + Send + Sync + 'static {
    /// Returns every stored contact, ordered by id (which is also creation order).
    fn list(&self) -> Result<Vec<Contact>>;

    /// Gets the contact with the given `id`
    ///
    /// Returns `None` if the given `id` does not exist.
    fn get(&self, id: ContactId) -> Result<Option<Contact>>;

    /// Returns true if some contact already uses `name`
    fn contains_name(&self, name: &str) -> Result<bool>;

    /// Stores a new contact under a freshly generated id and returns it.
    ///
    /// # Errors
    ///
    /// Returns `PhonebookError::DuplicateName` if the name is already taken.
    fn insert(&self, fields: NewContact) -> Result<Contact>;

    /// Replaces the name and number of the contact with the given `id`, keeping its id.
    ///
    /// Returns `None` if the given `id` does not exist.
    ///
    /// # Errors
    ///
    /// Returns `PhonebookError::DuplicateName` if the new name belongs to another contact.
    fn update(&self, id: ContactId, fields: NewContact) -> Result<Option<Contact>>;

    /// Removes the contact with the given `id`, returning it if it existed.
    fn remove(&self, id: ContactId) -> Result<Option<Contact>>;

    /// The number of stored contacts
    fn count(&self) -> Result<usize>;

    /// Checks `fields` the way a create request is checked and stores them.
    ///
    /// A taken name is reported before any format problem, so a duplicate is always a duplicate
    /// whatever its number looks like.
    ///
    /// # Errors
    ///
    /// Returns `PhonebookError::DuplicateName` or `PhonebookError::InvalidInput`.
    fn add(&self, fields: NewContact) -> Result<Contact> {
        if self.contains_name(&fields.name)? {
            return Err(PhonebookError::DuplicateName);
        }
        fields.validate()?;
        self.insert(fields)
    }
}

mod memory;
mod sled;

pub use self::memory::MemoryContactsEngine;
pub use self::sled::SledContactsEngine;
