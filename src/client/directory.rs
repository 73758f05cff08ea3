use tracing::{debug, warn};

use super::api::ContactsApi;
use super::notice::{Notice, Notifier};
use crate::contact::{Contact, ContactId, NewContact};
use crate::error::{PhonebookError, Result};

/// Asks the user a yes/no question before a destructive change.
pub trait Confirm {
    /// returns true if the user agreed to `question`
    fn confirm(&mut self, question: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, question: &str) -> bool {
        self(question)
    }
}

/// What [`DirectoryClient::submit`] did
#[derive(Debug)]
pub enum AddOutcome {
    /// a new contact was created and appended to the mirror
    Created(Contact),
    /// the number of an existing contact was replaced
    Updated(Contact),
    /// the user did not want to overwrite the existing contact
    Declined,
    /// the service rejected the change, the mirror was reconciled
    Failed(PhonebookError),
}

/// What [`DirectoryClient::delete`] did
#[derive(Debug)]
pub enum DeleteOutcome {
    /// the contact was deleted on the server and removed from the mirror
    Deleted(Contact),
    /// the delete failed, the contact was removed from the mirror anyway
    AlreadyGone(Contact, PhonebookError),
    /// the user did not confirm
    Declined,
    /// no contact with that id is mirrored
    Unknown,
}

/// Mirrors the service's contact collection and keeps it in step with the service.
///
/// The mirror is loaded once with [`load`](DirectoryClient::load) and from then on patched after
/// every mutation. It is never authoritative: whenever the service rejects a change to a contact
/// that is gone, the contact is dropped from the mirror too.
pub struct DirectoryClient<A: ContactsApi, C: Confirm> {
    api: A,
    confirm: C,
    notifier: Notifier,
    // the mirror, in the order the service listed it
    contacts: Vec<Contact>,
    search: String,
    new_name: String,
    new_number: String,
}

impl<A: ContactsApi, C: Confirm> DirectoryClient<A, C> {
    /// creates a client with an empty mirror
    pub fn new(api: A, confirm: C) -> Self {
        DirectoryClient::with_notifier(api, confirm, Notifier::new())
    }

    /// creates a client that shows its notices on `notifier`
    pub fn with_notifier(api: A, confirm: C, notifier: Notifier) -> Self {
        DirectoryClient {
            api,
            confirm,
            notifier,
            contacts: Vec::new(),
            search: String::new(),
            new_name: String::new(),
            new_number: String::new(),
        }
    }

    /// replaces the mirror with the service's full contact list
    ///
    /// # Errors
    /// returns the error of the list request; the mirror is left untouched
    pub async fn load(&mut self) -> Result<()> {
        self.contacts = self.api.get_all().await?;
        debug!(contacts = self.contacts.len(), "mirror loaded");
        Ok(())
    }

    /// every mirrored contact
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// sets the search string used by [`visible`](DirectoryClient::visible)
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// the current search string
    pub fn search(&self) -> &str {
        &self.search
    }

    /// the mirrored contacts matching the search string
    pub fn visible(&self) -> Vec<&Contact> {
        filter_by_name(&self.contacts, &self.search)
    }

    /// sets the name input
    pub fn set_new_name(&mut self, name: impl Into<String>) {
        self.new_name = name.into();
    }

    /// sets the number input
    pub fn set_new_number(&mut self, number: impl Into<String>) {
        self.new_number = number.into();
    }

    /// the name input
    pub fn new_name(&self) -> &str {
        &self.new_name
    }

    /// the number input
    pub fn new_number(&self) -> &str {
        &self.new_number
    }

    /// the notice currently shown
    pub fn notice(&self) -> Option<Notice> {
        self.notifier.current()
    }

    /// Adds the contact described by the name and number inputs.
    ///
    /// If the mirror already holds a contact with that name the user is asked whether its number
    /// should be replaced, and on agreement that contact is updated instead of a new one being
    /// created.
    pub async fn submit(&mut self) -> AddOutcome {
        let fields = NewContact::new(self.new_name.clone(), self.new_number.clone());

        let existing = self
            .contacts
            .iter()
            .find(|contact| contact.name == fields.name)
            .cloned();

        match existing {
            Some(existing) => {
                let question = format!(
                    "{} is already in the phonebook, replace the old number with the new one?",
                    existing.name
                );
                if !self.confirm.confirm(&question) {
                    return AddOutcome::Declined;
                }
                self.replace_number(existing, fields).await
            }
            None => self.create(fields).await,
        }
    }

    async fn create(&mut self, fields: NewContact) -> AddOutcome {
        match self.api.create(&fields).await {
            Ok(created) => {
                self.contacts.push(created.clone());
                self.new_name.clear();
                self.new_number.clear();
                self.notifier.info(format!("Added {}", created.name));
                AddOutcome::Created(created)
            }
            Err(e) => {
                warn!("could not add {}: {}", fields.name, e);
                self.notifier.error(failure_message(&e));
                AddOutcome::Failed(e)
            }
        }
    }

    async fn replace_number(&mut self, existing: Contact, fields: NewContact) -> AddOutcome {
        match self.api.update(existing.id, &fields).await {
            Ok(updated) => {
                if let Some(slot) = self.contacts.iter_mut().find(|c| c.id == updated.id) {
                    *slot = updated.clone();
                }
                self.notifier
                    .info(format!("phone number of {} was updated", updated.name));
                AddOutcome::Updated(updated)
            }
            Err(e) => {
                // a rejected entry never stays in the mirror
                warn!("could not update {}: {}", existing.name, e);
                self.contacts.retain(|c| c.id != existing.id);
                self.notifier.error(already_removed(&existing));
                AddOutcome::Failed(e)
            }
        }
    }

    /// Deletes the mirrored contact with the given `id` after the user confirms.
    ///
    /// The contact leaves the mirror whatever the service answers.
    pub async fn delete(&mut self, id: ContactId) -> DeleteOutcome {
        let target = match self.contacts.iter().find(|c| c.id == id) {
            Some(contact) => contact.clone(),
            None => return DeleteOutcome::Unknown,
        };

        if !self.confirm.confirm(&format!("Delete {}?", target.name)) {
            return DeleteOutcome::Declined;
        }

        let result = self.api.delete(id).await;
        self.contacts.retain(|c| c.id != id);
        match result {
            Ok(()) => DeleteOutcome::Deleted(target),
            Err(e) => {
                warn!("delete of {} failed: {}", target.name, e);
                self.notifier.error(already_removed(&target));
                DeleteOutcome::AlreadyGone(target, e)
            }
        }
    }
}

/// Returns the contacts whose name contains `search`, ignoring case and surrounding whitespace.
/// An empty search matches every contact. Order is preserved.
pub fn filter_by_name<'a>(contacts: &'a [Contact], search: &str) -> Vec<&'a Contact> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return contacts.iter().collect();
    }
    contacts
        .iter()
        .filter(|contact| contact.name.to_lowercase().contains(&needle))
        .collect()
}

fn already_removed(contact: &Contact) -> String {
    format!(
        "Information about {} has already been removed from server",
        contact.name
    )
}

fn failure_message(err: &PhonebookError) -> String {
    match err {
        PhonebookError::Server { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(id: u64, name: &str) -> Contact {
        Contact::new(ContactId::new(id), NewContact::new(name, "12-345678"))
    }

    #[test]
    fn empty_search_returns_everything_in_order() {
        let contacts = vec![contact(1, "Ada"), contact(2, "Grace"), contact(3, "Linus")];
        let names: Vec<_> = filter_by_name(&contacts, "")
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["Ada", "Grace", "Linus"]);

        assert_eq!(filter_by_name(&contacts, "   ").len(), 3);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let contacts = vec![contact(1, "Ada"), contact(2, "ada Two"), contact(3, "Grace")];
        let names: Vec<_> = filter_by_name(&contacts, "ADA")
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["Ada", "ada Two"]);
    }

    #[test]
    fn search_is_trimmed() {
        let contacts = vec![contact(1, "Ada Lovelace"), contact(2, "Grace Hopper")];
        let found = filter_by_name(&contacts, "  hop ");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Grace Hopper");
    }
}
