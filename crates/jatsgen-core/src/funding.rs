//! Funding awards.

use crate::Contributor;

/// A funding award with its funder and principal recipients.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct FundingAward {
    /// FundRef identifier of the funder, without the DOI prefix.
    pub institution_id: Option<String>,
    pub institution_name: Option<String>,
    pub award_ids: Vec<String>,
    pub principal_award_recipients: Vec<Contributor>,
}

impl FundingAward {
    /// Whether the award names a funder at all.
    pub fn has_funding_source(&self) -> bool {
        self.institution_id.is_some() || self.institution_name.is_some()
    }

    /// Whether a contributor with this author id is a principal recipient.
    pub fn has_recipient(&self, auth_id: &str) -> bool {
        self.principal_award_recipients
            .iter()
            .any(|recipient| recipient.auth_id.as_deref() == Some(auth_id))
    }
}
