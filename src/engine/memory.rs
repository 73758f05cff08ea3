use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::ContactsEngine;
use crate::contact::{Contact, ContactId, NewContact};
use crate::error::{PhonebookError, Result};

/// A [`ContactsEngine`] that keeps contacts in memory only.
///
/// Name uniqueness is enforced through the `names` map: a contact is only stored while holding
/// the vacant entry for its name. Every write holds the entry of the contact it changes, and locks
/// are always taken on `contacts` before `names`.
#[derive(Clone, Debug, Default)]
pub struct MemoryContactsEngine {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    // the last id handed out, ids start at 1
    last_id: AtomicU64,
    contacts: DashMap<ContactId, Contact>,
    names: DashMap<String, ContactId>,
}

impl MemoryContactsEngine {
    /// creates an empty engine
    pub fn new() -> Self {
        MemoryContactsEngine::default()
    }

    fn next_id(&self) -> ContactId {
        ContactId::new(self.inner.last_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl ContactsEngine for MemoryContactsEngine {
    fn list(&self) -> Result<Vec<Contact>> {
        let mut contacts: Vec<Contact> = self
            .inner
            .contacts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        contacts.sort_by_key(|contact| contact.id);
        Ok(contacts)
    }

    fn get(&self, id: ContactId) -> Result<Option<Contact>> {
        Ok(self.inner.contacts.get(&id).map(|entry| entry.value().clone()))
    }

    fn contains_name(&self, name: &str) -> Result<bool> {
        Ok(self.inner.names.contains_key(name))
    }

    fn insert(&self, fields: NewContact) -> Result<Contact> {
        let id = self.next_id();
        // ids are fresh, so this entry is always vacant
        let contact_slot = self.inner.contacts.entry(id);
        match self.inner.names.entry(fields.name.clone()) {
            Entry::Occupied(_) => Err(PhonebookError::DuplicateName),
            Entry::Vacant(name_slot) => {
                let contact = Contact::new(id, fields);
                name_slot.insert(id);
                contact_slot.or_insert(contact.clone());
                Ok(contact)
            }
        }
    }

    fn update(&self, id: ContactId, fields: NewContact) -> Result<Option<Contact>> {
        // held until the new record is written, so renames and removes of this id are serialized
        let mut current = match self.inner.contacts.get_mut(&id) {
            Some(entry) => entry,
            None => return Ok(None),
        };

        if current.name != fields.name {
            match self.inner.names.entry(fields.name.clone()) {
                Entry::Occupied(_) => return Err(PhonebookError::DuplicateName),
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
            // the names entry guard above must be released before touching another key
            self.inner.names.remove(&current.name);
        }

        let contact = Contact::new(id, fields);
        *current = contact.clone();
        Ok(Some(contact))
    }

    fn remove(&self, id: ContactId) -> Result<Option<Contact>> {
        match self.inner.contacts.entry(id) {
            Entry::Occupied(entry) => {
                self.inner.names.remove(&entry.get().name);
                Ok(Some(entry.remove()))
            }
            Entry::Vacant(_) => Ok(None),
        }
    }

    fn count(&self) -> Result<usize> {
        Ok(self.inner.contacts.len())
    }
}
