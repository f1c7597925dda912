//! Free-text postal addresses as typed by the user.

use std::fmt;

/// A postal address in the raw form it was entered and its trimmed form.
///
/// Only the normalized text is ever sent to a geocoder. Whitespace-only
/// input normalizes to the empty string and is never resolved.
///
/// # Examples
/// ```
/// use reparto_core::Address;
///
/// let address = Address::new("  Av. Rivadavia 4000 ");
/// assert_eq!(address.raw(), "  Av. Rivadavia 4000 ");
/// assert_eq!(address.normalized(), "Av. Rivadavia 4000");
/// assert!(!address.is_blank());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub struct Address {
    raw: String,
    normalized: String,
}

impl Address {
    /// Wrap raw user input, deriving the normalized form.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let normalized = raw.trim().to_owned();
        Self { raw, normalized }
    }

    /// Text exactly as entered.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Trimmed text used for lookups, labels and links.
    #[must_use]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Whether the address has no content after trimming.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.normalized.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

impl From<&str> for Address {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Address {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.raw
    }
}

/// Split a one-address-per-line block into addresses.
///
/// Lines are trimmed and blank lines dropped; input order is preserved.
///
/// # Examples
/// ```
/// use reparto_core::parse_address_lines;
///
/// let stops = parse_address_lines("Calle 1\n\n  Calle 2  \r\n");
/// let texts: Vec<_> = stops.iter().map(|a| a.normalized()).collect();
/// assert_eq!(texts, ["Calle 1", "Calle 2"]);
/// ```
#[must_use]
pub fn parse_address_lines(text: &str) -> Vec<Address> {
    text.lines()
        .map(Address::new)
        .filter(|address| !address.is_blank())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", true)]
    #[case("   \t ", true)]
    #[case(" La Plata ", false)]
    fn blankness_follows_trimmed_text(#[case] raw: &str, #[case] blank: bool) {
        assert_eq!(Address::new(raw).is_blank(), blank);
    }

    #[rstest]
    fn display_uses_normalized_text() {
        let address = Address::new("  Calle Falsa 123\t");
        assert_eq!(address.to_string(), "Calle Falsa 123");
    }

    #[rstest]
    fn parse_keeps_duplicates_in_order() {
        let stops = parse_address_lines("B\nA\nB");
        let texts: Vec<_> = stops.iter().map(Address::normalized).collect();
        assert_eq!(texts, ["B", "A", "B"]);
    }

    #[rstest]
    fn parse_of_whitespace_block_is_empty() {
        assert!(parse_address_lines(" \n\t\n").is_empty());
    }
}
