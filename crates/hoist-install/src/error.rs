use hoist_archive::ExtractError;
use hoist_fetch::FetchError;

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

impl InstallError {
    /// Whether retrying the whole installation may succeed without
    /// operator action. Only origin-side failures qualify; anything
    /// wrong with the payload or the local filesystem will recur.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Fetch(err) => err.is_transient(),
            Self::Extract(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, InstallError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_transience_passes_through() {
        let err = InstallError::from(FetchError::Server { status: 503 });
        assert!(err.is_transient());

        let err = InstallError::from(FetchError::NotFound {
            url: "https://origin.example/missing.zip".into(),
        });
        assert!(!err.is_transient());
    }

    #[test]
    fn extract_errors_are_never_transient() {
        let err = InstallError::from(ExtractError::CorruptArchive);
        assert!(!err.is_transient());
    }

    #[test]
    fn display_is_transparent() {
        let err = InstallError::from(ExtractError::CorruptArchive);
        assert_eq!(err.to_string(), ExtractError::CorruptArchive.to_string());
    }
}
