#[derive(Debug, Clone, PartialEq)]
pub enum IdentityError {
    MissingAppId,
    Init(String),
    ProfileFetch(String),
}

impl std::fmt::Display for IdentityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentityError::MissingAppId => {
                write!(f, "LIFF ID is missing or empty")
            }
            IdentityError::Init(msg) => {
                write!(f, "Identity initialization failed: {}", msg)
            }
            IdentityError::ProfileFetch(msg) => {
                write!(f, "Profile fetch failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for IdentityError {}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    MissingCredentials,
    Transport(String),
    Rejected(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::MissingCredentials => {
                write!(f, "Persistence endpoint or access key is not configured")
            }
            StoreError::Transport(msg) => write!(f, "{}", msg),
            StoreError::Rejected(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

pub type IdentityResult<T> = Result<T, IdentityError>;
pub type StoreResult<T> = Result<T, StoreError>;
