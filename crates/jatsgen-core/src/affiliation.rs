//! Affiliations and the equivalence rule used to deduplicate them.

/// An institutional affiliation.
///
/// `text` is a free-text fallback for affiliations that were never split
/// into structured parts.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Affiliation {
    pub department: Option<String>,
    pub institution: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub email: Option<String>,
    /// Research Organization Registry identifier.
    pub ror: Option<String>,
    pub text: Option<String>,
}

impl Affiliation {
    /// Create an affiliation holding only free text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// The attributes compared when deduplicating, in a fixed order.
    fn comparable(&self) -> [Option<&str>; 4] {
        [
            non_blank(&self.city),
            non_blank(&self.country),
            non_blank(&self.department),
            non_blank(&self.institution),
        ]
    }

    fn has_comparable(&self) -> bool {
        self.comparable().iter().any(Option::is_some)
    }

    /// Whether two affiliations denote the same institution.
    ///
    /// City, country, department and institution are compared pairwise and
    /// only where both sides carry a value: any such pair that differs makes
    /// the affiliations distinct. When either side has none of those
    /// attributes, the affiliations are equivalent only if neither has any
    /// and their free text matches.
    pub fn is_equivalent(&self, other: &Affiliation) -> bool {
        if !self.has_comparable() || !other.has_comparable() {
            return !self.has_comparable()
                && !other.has_comparable()
                && non_blank(&self.text) == non_blank(&other.text);
        }
        self.comparable()
            .iter()
            .zip(other.comparable())
            .all(|pair| match pair {
                (Some(a), Some(b)) => *a == b,
                _ => true,
            })
    }

    /// Whether this affiliation renders as free text only.
    pub fn is_text_only(&self) -> bool {
        self.text.is_some() && self.institution.is_none()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
