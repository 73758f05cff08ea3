#![deny(missing_docs)]
//! A phonebook: a contact directory service exposing a small REST API over a document store,
//! and a directory client that mirrors the service's contacts.
//!
//! This crate provides the [`ContactsServer`] and the [`DirectoryClient`] themselves, as well as
//! a [`phonebook-server`], a [`phonebook`] and a [`phonebook-admin`] executable that can be used
//! to run and interact with them.
//!
//! ## Contacts
//! A [`Contact`] has a store assigned `id`, a `name` and a phone `number`.
//! - the `name` is at least 3 characters long and no two contacts share a name
//! - the `number` is at least 8 characters long and looks like `09-1234556` or `040-22334455`
//!   (two or three digits, a hyphen, then more digits)
//! - the `id` never changes and is never reused
//!
//! ## REST API
//! The [`ContactsServer`] serves JSON on the following routes:
//!
//! - `GET /api/persons` every contact
//! - `GET /api/persons/:id` one contact, `404` if there is no such contact
//! - `POST /api/persons` create a contact from `{name, number}`, `201` on success, `400` if the
//!   body is not a person object, the name is taken or a field has the wrong format
//! - `PUT /api/persons/:id` replace the name and number of a contact, `404` if there is none
//! - `DELETE /api/persons/:id` delete a contact, always `204`
//! - `GET /info` an HTML fragment with the number of contacts and the server time
//!
//! A malformed id is answered with `400`, an unknown route with `404`. Every error response has a
//! `{"error": "..."}` body.
//!
//! ## Storage Engines
//! Contacts are kept by a [`ContactsEngine`]. [`SledContactsEngine`] persists them in an embedded
//! [`sled`] database, [`MemoryContactsEngine`] keeps them in memory. The engine is the only place
//! state lives; the server itself holds nothing but a handle to it.
//!
//! ## Directory Client
//! [`DirectoryClient`] loads the service's contacts once and then keeps its mirror up to date
//! after every add, update and delete it performs. When the service rejects a change because
//! the contact is gone, the contact is dropped from the mirror as well, so the mirror never
//! keeps an entry the service no longer has. Each change is reported through a [`Notice`] that
//! clears itself after four seconds.
//!
//! [`sled`]: https://docs.rs/sled/latest/sled/
//! [`phonebook-server`]: ../phonebook_server/index.html
//! [`phonebook`]: ../phonebook/index.html
//! [`phonebook-admin`]: ../phonebook_admin/index.html

pub use client::{
    filter_by_name, AddOutcome, Confirm, ContactsApi, DeleteOutcome, DirectoryClient,
    HttpContactsApi, Notice, NoticeKind, Notifier,
};
pub use config::{Config, EngineKind};
pub use contact::{Contact, ContactId, ContactPayload, NewContact};
pub use engine::{ContactsEngine, MemoryContactsEngine, SledContactsEngine};
pub use error::{PhonebookError, Result};
pub use server::ContactsServer;

pub mod client;
pub mod config;
pub mod contact;
pub mod engine;
mod error;
pub mod server;
pub mod telemetry;
