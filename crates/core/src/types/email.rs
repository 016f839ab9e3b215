//! Login email address.
//!
//! The storefront's login form is an `<input type="email">`, so the browser
//! refuses anything that is not a "valid email address" in the HTML sense
//! before a request is sent. [`Email::parse`] applies the same rule to
//! addresses typed on the command line. The address is otherwise passed to
//! the backend exactly as entered; case is not folded.

use core::fmt;

use serde::Serialize;

/// Characters allowed in the local part besides ASCII alphanumerics.
const LOCAL_PUNCTUATION: &str = ".!#$%&'*+/=?^_`{|}~-";

/// Longest DNS label.
const MAX_LABEL_LEN: usize = 63;

/// Why a login email was refused.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email is required")]
    Empty,
    #[error("'{0}' is not an email address: expected exactly one '@'")]
    AtSign(String),
    #[error("'{0}' is not an email address: invalid character before '@'")]
    LocalPart(String),
    #[error("'{0}' is not an email address: invalid domain")]
    Domain(String),
}

/// An email address accepted by the login form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Check a typed address. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` naming the part of the address that is invalid.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(EmailError::Empty);
        }

        let Some((local, domain)) = input.split_once('@') else {
            return Err(EmailError::AtSign(input.to_owned()));
        };
        if domain.contains('@') {
            return Err(EmailError::AtSign(input.to_owned()));
        }
        if local.is_empty() || !local.chars().all(is_local_char) {
            return Err(EmailError::LocalPart(input.to_owned()));
        }
        if !domain.split('.').all(is_domain_label) {
            return Err(EmailError::Domain(input.to_owned()));
        }

        Ok(Self(input.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_local_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || LOCAL_PUNCTUATION.contains(c)
}

/// One dot-separated domain label: 1-63 alphanumerics or hyphens, not
/// starting or ending with a hyphen.
fn is_domain_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
