use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::debug;

use crate::contact::{Contact, ContactId, NewContact};
use crate::error::{PhonebookError, Result};

/// base URL of a directory service running locally with the default port
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// The calls a [`DirectoryClient`] makes against the directory service.
///
/// [`DirectoryClient`]: super::DirectoryClient
#[async_trait]
pub trait ContactsApi: Send + Sync {
    /// fetches every contact
    async fn get_all(&self) -> Result<Vec<Contact>>;

    /// creates a contact, returning it with its server assigned id
    async fn create(&self, fields: &NewContact) -> Result<Contact>;

    /// replaces the name and number of the contact with the given `id`
    async fn update(&self, id: ContactId, fields: &NewContact) -> Result<Contact>;

    /// deletes the contact with the given `id`
    async fn delete(&self, id: ContactId) -> Result<()>;
}

/// [`ContactsApi`] over HTTP, talking JSON to the `/api/persons` endpoints.
#[derive(Debug, Clone)]
pub struct HttpContactsApi {
    client: Client,
    base_url: String,
}

// body of every error response of the directory service
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpContactsApi {
    /// creates a client for the service at `base_url`, e.g. `http://localhost:3001`
    ///
    /// # Errors
    /// returns [`PhonebookError::Http`] if the HTTP client could not be built
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(HttpContactsApi {
            client: Client::builder().build()?,
            base_url,
        })
    }

    /// the base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// fetches the HTML of the service's info page
    pub async fn info(&self) -> Result<String> {
        let rsp = self.client.get(format!("{}/info", self.base_url)).send().await?;
        Ok(check(rsp).await?.text().await?)
    }

    fn persons_url(&self) -> String {
        format!("{}/api/persons", self.base_url)
    }

    fn person_url(&self, id: ContactId) -> String {
        format!("{}/api/persons/{}", self.base_url, id)
    }
}

#[async_trait]
impl ContactsApi for HttpContactsApi {
    async fn get_all(&self) -> Result<Vec<Contact>> {
        let rsp = self.client.get(self.persons_url()).send().await?;
        Ok(check(rsp).await?.json().await?)
    }

    async fn create(&self, fields: &NewContact) -> Result<Contact> {
        let rsp = self.client.post(self.persons_url()).json(fields).send().await?;
        Ok(check(rsp).await?.json().await?)
    }

    async fn update(&self, id: ContactId, fields: &NewContact) -> Result<Contact> {
        let rsp = self.client.put(self.person_url(id)).json(fields).send().await?;
        Ok(check(rsp).await?.json().await?)
    }

    async fn delete(&self, id: ContactId) -> Result<()> {
        let rsp = self.client.delete(self.person_url(id)).send().await?;
        check(rsp).await?;
        Ok(())
    }
}

/// turns a non-success response into [`PhonebookError::Server`], keeping the service's `error`
/// message when the body has one
async fn check(rsp: Response) -> Result<Response> {
    let status = rsp.status();
    if status.is_success() {
        return Ok(rsp);
    }

    let reason = status.canonical_reason().unwrap_or("request failed").to_string();
    let message = match rsp.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => reason,
    };
    debug!(status = status.as_u16(), %message, "request rejected");
    Err(PhonebookError::Server {
        status: status.as_u16(),
        message,
    })
}
