use thiserror::Error;

/// type alias for all operations on the phonebook that could fail with a [`PhonebookError`]
pub type Result<T> = std::result::Result<T, PhonebookError>;

/// The Error variants used throughout the phonebook.
///
/// The first group describes why a request was rejected by the directory service, the second
/// wraps lower level errors from the storage engines and third party crates.
#[derive(Error, Debug)]
pub enum PhonebookError {
    /// the request body was not a usable person object, or one of its fields failed validation
    #[error("{0}")]
    InvalidInput(String),

    /// another contact already uses the requested name
    #[error("name must be unique")]
    DuplicateName,

    /// no contact exists with the given id
    #[error("person with id {0} not found")]
    NotFound(String),

    /// the id does not have the shape of a store generated id
    #[error("malformatted id")]
    MalformedId(String),

    /// no route matched the request
    #[error("unknown endpoint")]
    UnknownRoute,

    /// variant for errors raised by the sled storage engine
    #[error("storage error: {0}")]
    Sled(#[from] sled::Error),

    /// variant for errors caused from file IO
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serde Error
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// the HTTP client could not complete a request
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// the directory service answered with a non-success status
    #[error("server responded {status}: {message}")]
    Server {
        /// the HTTP status code
        status: u16,
        /// the `error` text of the response body, or the status reason when there is none
        message: String,
    },

    /// a command line value could not be parsed
    #[error("{0}")]
    Parsing(String),
}

impl PhonebookError {
    /// returns true for errors that were caused by the request itself rather than by the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PhonebookError::InvalidInput(_)
                | PhonebookError::DuplicateName
                | PhonebookError::NotFound(_)
                | PhonebookError::MalformedId(_)
                | PhonebookError::UnknownRoute
        )
    }
}
