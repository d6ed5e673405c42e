//! Public base URL of the storefront.

use core::fmt;

/// Storefront base URL, always ending with `/`.
///
/// The text is kept exactly as supplied plus the trailing slash. Nothing
/// checks that it is a well-formed URL; `localhost/opencart` is accepted.
///
/// ```
/// use oc_install_core::BaseUrl;
///
/// let url = BaseUrl::new("http://localhost/shop");
/// assert_eq!(url.as_str(), "http://localhost/shop/");
/// assert_eq!(url.admin(), "http://localhost/shop/admin/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseUrl(String);

impl BaseUrl {
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(normalize(raw))
    }

    /// Storefront URL.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Admin panel URL, `<base>admin/`.
    #[must_use]
    pub fn admin(&self) -> String {
        format!("{}admin/", self.0)
    }
}

/// Append a trailing `/` unless the value already ends with one.
#[must_use]
pub fn normalize(raw: &str) -> String {
    if raw.ends_with('/') {
        raw.to_owned()
    } else {
        format!("{raw}/")
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BaseUrl {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}
