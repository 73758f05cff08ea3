use std::path::Path;

use clap::crate_version;
use sled::transaction::{
    abort, ConflictableTransactionError, ConflictableTransactionResult, TransactionError,
};
use sled::{Db, Transactional, Tree};
use tracing::{debug, info, instrument};

use super::ContactsEngine;
use crate::contact::{Contact, ContactId, NewContact};
use crate::error::{PhonebookError, Result};

// maps the big-endian bytes of a contact id to the contact, serialized as JSON
const CONTACTS_TREE: &str = "contacts";
// maps a contact name to the big-endian bytes of its id
const NAMES_TREE: &str = "names";

/// A [`ContactsEngine`] that persists contacts in an embedded sled database.
///
/// Contacts live in one tree keyed by id, so iteration order is id order. A second tree indexes
/// names, and both trees are always written in the same transaction, which is what keeps names
/// unique. Ids come from [`Db::generate_id`], so they are never reused, not even after a restart.
#[derive(Clone)]
pub struct SledContactsEngine {
    db: Db,
    contacts: Tree,
    names: Tree,
}

impl SledContactsEngine {
    /// opens (or creates) a sled database inside the directory at `path`
    #[instrument]
    pub fn open(path: &Path) -> Result<SledContactsEngine> {
        info!("opening phonebook sled engine version {}", crate_version!());
        let db = sled::open(path)?;
        SledContactsEngine::with_db(db)
    }

    /// builds an engine on top of an already opened sled database
    pub fn with_db(db: Db) -> Result<SledContactsEngine> {
        let contacts = db.open_tree(CONTACTS_TREE)?;
        let names = db.open_tree(NAMES_TREE)?;
        debug!(contacts = contacts.len(), "sled engine ready");
        Ok(SledContactsEngine {
            db,
            contacts,
            names,
        })
    }

    /// flushes all dirty data to disk, returning the number of bytes written
    pub fn flush(&self) -> Result<usize> {
        Ok(self.db.flush()?)
    }
}

impl ContactsEngine for SledContactsEngine {
    fn list(&self) -> Result<Vec<Contact>> {
        self.contacts
            .iter()
            .values()
            .map(|value| {
                let value = value?;
                Ok(serde_json::from_slice(&value)?)
            })
            .collect()
    }

    fn get(&self, id: ContactId) -> Result<Option<Contact>> {
        match self.contacts.get(id.to_be_bytes())? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    fn contains_name(&self, name: &str) -> Result<bool> {
        Ok(self.names.contains_key(name.as_bytes())?)
    }

    fn insert(&self, fields: NewContact) -> Result<Contact> {
        let id = ContactId::new(self.db.generate_id()?);
        let contact = Contact::new(id, fields);
        let key = id.to_be_bytes();
        let value = serde_json::to_vec(&contact)?;

        (&self.contacts, &self.names)
            .transaction(|(contacts, names)| {
                if names.get(contact.name.as_bytes())?.is_some() {
                    return abort(PhonebookError::DuplicateName);
                }
                contacts.insert(&key[..], value.as_slice())?;
                names.insert(contact.name.as_bytes(), &key[..])?;
                Ok(())
            })
            .map_err(from_transaction_error)?;

        debug!(id = %contact.id, "inserted contact");
        Ok(contact)
    }

    fn update(&self, id: ContactId, fields: NewContact) -> Result<Option<Contact>> {
        let key = id.to_be_bytes();
        let contact = Contact::new(id, fields);
        let value = serde_json::to_vec(&contact)?;

        (&self.contacts, &self.names)
            .transaction(|(contacts, names)| {
                let old = match contacts.get(&key[..])? {
                    Some(old) => decode(&old)?,
                    None => return Ok(None),
                };
                if old.name != contact.name {
                    if names.get(contact.name.as_bytes())?.is_some() {
                        return abort(PhonebookError::DuplicateName);
                    }
                    names.remove(old.name.as_bytes())?;
                    names.insert(contact.name.as_bytes(), &key[..])?;
                }
                contacts.insert(&key[..], value.as_slice())?;
                Ok(Some(contact.clone()))
            })
            .map_err(from_transaction_error)
    }

    fn remove(&self, id: ContactId) -> Result<Option<Contact>> {
        let key = id.to_be_bytes();

        (&self.contacts, &self.names)
            .transaction(|(contacts, names)| {
                let old = match contacts.remove(&key[..])? {
                    Some(old) => decode(&old)?,
                    None => return Ok(None),
                };
                names.remove(old.name.as_bytes())?;
                Ok(Some(old))
            })
            .map_err(from_transaction_error)
    }

    fn count(&self) -> Result<usize> {
        Ok(self.contacts.len())
    }
}

/// deserializes a stored contact inside a transaction, aborting it on corrupt data
fn decode(bytes: &[u8]) -> ConflictableTransactionResult<Contact, PhonebookError> {
    serde_json::from_slice(bytes)
        .map_err(|e| ConflictableTransactionError::Abort(PhonebookError::from(e)))
}

fn from_transaction_error(err: TransactionError<PhonebookError>) -> PhonebookError {
    match err {
        TransactionError::Abort(e) => e,
        TransactionError::Storage(e) => PhonebookError::Sled(e),
    }
}
