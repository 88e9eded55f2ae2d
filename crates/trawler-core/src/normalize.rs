use url::{Host, Url};

use crate::error::ValidationError;

/// URLs longer than this are stored as their origin only, so the moderator
/// embed (1024 chars per field) and message content stay within limits.
pub const MAX_URL_LEN: usize = 1000;

const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Domains the backend uses for its own test fixtures.
const TEST_DOMAINS: &[&str] = &["phisherman-test-domain.zeppelin.gg"];
const TEST_SUFFIXES: &[&str] = &[".test.phisherman.gg"];

/// A submitted link after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLink {
    /// The URL to store, truncated to its origin when too long.
    pub url: String,
    /// Bare lowercase hostname without a leading `www.`.
    pub domain: String,
}

/// Validate a full http(s) link and extract its canonical domain.
pub fn normalize_link(raw: Option<&str>) -> Result<NormalizedLink, ValidationError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or(ValidationError::MissingInput)?;

    let url = Url::parse(raw).map_err(|_| ValidationError::InvalidUrl)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationError::InvalidUrl);
    }

    let host = match url.host() {
        Some(Host::Domain(host)) => host.to_string(),
        Some(_) => return Err(ValidationError::InvalidDomain(url.host_str().unwrap_or_default().to_string())),
        None => return Err(ValidationError::InvalidUrl),
    };

    let domain = canonical_host(&host);
    if !is_valid_domain(&domain) {
        return Err(ValidationError::InvalidDomain(domain));
    }

    let url = if raw.len() > MAX_URL_LEN {
        url.origin().ascii_serialization()
    } else {
        raw.to_string()
    };

    Ok(NormalizedLink { url, domain })
}

/// Like [`normalize_link`] but also accepts a bare domain such as
/// `example.com`.
pub fn normalize_domain(raw: &str) -> Result<String, ValidationError> {
    let raw = raw.trim();
    if raw.contains("://") {
        normalize_link(Some(raw)).map(|link| link.domain)
    } else {
        normalize_link(Some(&format!("https://{}", raw))).map(|link| link.domain)
    }
}

/// Lowercase, drop a trailing dot and any leading `www.` labels. A `www.`
/// label is only removed while a registrable name remains, so `www.com`
/// survives and the result is stable under repeated application.
fn canonical_host(host: &str) -> String {
    let mut host = host.trim_end_matches('.').to_lowercase();
    while let Some(rest) = host.strip_prefix("www.") {
        if !rest.contains('.') {
            break;
        }
        host = rest.to_string();
    }
    host
}

/// Hostname syntax: at least two labels, each 1-63 of `[a-z0-9-]` without
/// leading/trailing hyphens, and an alphabetic (or punycode) TLD.
pub fn is_valid_domain(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    });

    let tld = labels[labels.len() - 1];
    let tld_ok = tld.len() >= 2
        && (tld.starts_with("xn--") || tld.chars().all(|c| c.is_ascii_lowercase()));

    labels_ok && tld_ok
}

/// Backend test fixtures that must never be reported from production.
pub fn is_test_domain(domain: &str) -> bool {
    TEST_DOMAINS.contains(&domain) || TEST_SUFFIXES.iter().any(|suffix| domain.ends_with(suffix))
}
