//! The directory client: a local mirror of the service's contacts, kept in step with it through
//! a [`ContactsApi`], plus the notices shown after each change.

mod api;
mod directory;
mod notice;

pub use api::{ContactsApi, HttpContactsApi, DEFAULT_BASE_URL};
pub use directory::{filter_by_name, AddOutcome, Confirm, DeleteOutcome, DirectoryClient};
pub use notice::{Notice, NoticeKind, Notifier, NOTICE_DURATION};
