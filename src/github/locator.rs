//! Repository identifiers and credentials for the GitHub gateway.

use url::Url;

use crate::error::DigestError;

const PUBLIC_API_BASE: &str = "https://api.github.com";

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    fn new(value: &str, input: &str) -> Result<Self, DigestError> {
        validate_segment(value, input).map(Self)
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    fn new(value: &str, input: &str) -> Result<Self, DigestError> {
        let trimmed = value.strip_suffix(".git").unwrap_or(value);
        validate_segment(trimmed, input).map(Self)
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn validate_segment(value: &str, input: &str) -> Result<String, DigestError> {
    if value.is_empty() || value.contains(char::is_whitespace) {
        return Err(DigestError::InvalidRepository(input.to_owned()));
    }
    Ok(value.to_owned())
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::MissingToken`] when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, DigestError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DigestError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

/// Repository coordinates plus the API base they are served from.
///
/// # Example
///
/// ```
/// use prdigest::github::RepositoryLocator;
///
/// let locator = RepositoryLocator::parse("octo/repo").expect("valid identifier");
/// assert_eq!(locator.full_name(), "octo/repo");
/// assert_eq!(locator.api_base().as_str(), "https://api.github.com/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    api_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
}

impl RepositoryLocator {
    /// Parses `owner/repo` or a repository URL such as
    /// `https://github.com/owner/repo` or `https://ghe.example.com/owner/repo`.
    ///
    /// Public GitHub maps to `https://api.github.com`; any other host maps to
    /// its Enterprise API at `/api/v3`.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::InvalidRepository`] when the identifier has no
    /// owner or repository segment and [`DigestError::InvalidUrl`] when a URL
    /// cannot be parsed.
    pub fn parse(input: &str) -> Result<Self, DigestError> {
        let trimmed = input.trim();
        if trimmed.contains("://") {
            return Self::parse_url(trimmed);
        }

        let (owner, repository) = trimmed
            .split_once('/')
            .ok_or_else(|| DigestError::InvalidRepository(trimmed.to_owned()))?;
        if repository.contains('/') {
            return Err(DigestError::InvalidRepository(trimmed.to_owned()));
        }

        Ok(Self {
            api_base: parse_url(PUBLIC_API_BASE)?,
            owner: RepositoryOwner::new(owner, trimmed)?,
            repository: RepositoryName::new(repository, trimmed)?,
        })
    }

    fn parse_url(input: &str) -> Result<Self, DigestError> {
        let parsed = parse_url(input)?;
        let mut segments = parsed
            .path_segments()
            .ok_or_else(|| DigestError::InvalidRepository(input.to_owned()))?
            .filter(|segment| !segment.is_empty());

        let owner_segment = segments
            .next()
            .ok_or_else(|| DigestError::InvalidRepository(input.to_owned()))?;
        let repository_segment = segments
            .next()
            .ok_or_else(|| DigestError::InvalidRepository(input.to_owned()))?;

        Ok(Self {
            api_base: derive_api_base(&parsed)?,
            owner: RepositoryOwner::new(owner_segment, input)?,
            repository: RepositoryName::new(repository_segment, input)?,
        })
    }

    /// API base URL derived from the repository host.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// `owner/repo`, as used in search qualifiers.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner.as_str(), self.repository.as_str())
    }

    pub(crate) fn pulls_path(&self) -> String {
        format!("/repos/{}/pulls", self.full_name())
    }

    pub(crate) fn pull_request_path(&self, number: u64) -> String {
        format!("/repos/{}/pulls/{number}", self.full_name())
    }
}

fn parse_url(input: &str) -> Result<Url, DigestError> {
    Url::parse(input).map_err(|error| DigestError::InvalidUrl(error.to_string()))
}

fn derive_api_base(parsed: &Url) -> Result<Url, DigestError> {
    let host = parsed
        .host_str()
        .ok_or_else(|| DigestError::InvalidUrl("URL must include a host".to_owned()))?;

    if host.eq_ignore_ascii_case("github.com") || host.eq_ignore_ascii_case("www.github.com") {
        return parse_url(PUBLIC_API_BASE);
    }

    let authority = if host.contains(':') {
        format!("[{host}]")
    } else {
        host.to_owned()
    };
    let mut api_url = parse_url(&format!("{}://{authority}", parsed.scheme()))?;
    api_url
        .set_port(parsed.port())
        .map_err(|()| DigestError::InvalidUrl("invalid port".to_owned()))?;
    api_url.set_path("api/v3");
    Ok(api_url)
}
