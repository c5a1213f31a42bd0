//! Contributors and their names and roles.

use crate::Affiliation;

/// Contributor type for reviewing editors.
pub const EDITOR: &str = "editor";

/// Contributor type for authors.
pub const AUTHOR: &str = "author";

/// A person or group credited on an article.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Contributor {
    /// Contributor type ("author", "editor", ...).
    pub contrib_type: String,
    pub name: ContributorName,
    pub orcid: Option<String>,
    pub orcid_authenticated: bool,
    /// Corresponding author flag.
    pub corresp: bool,
    pub equal_contrib: bool,
    /// Numeric author id from the source system.
    pub auth_id: Option<String>,
    pub roles: Vec<Role>,
    pub affiliations: Vec<Affiliation>,
    /// Personal competing interest statements.
    pub conflict: Vec<String>,
}

/// How a contributor is named. Exactly one form applies.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ContributorName {
    Personal(PersonName),
    /// A collaboration or group author.
    Collab(String),
    #[default]
    Anonymous,
}

/// Name parts of an individual.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PersonName {
    pub surname: String,
    pub given_names: Option<String>,
    pub suffix: Option<String>,
}

/// A contributor role, optionally qualified by `specific-use`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Role {
    pub text: String,
    pub specific_use: Option<String>,
}

impl Role {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            specific_use: None,
        }
    }

    pub fn with_specific_use(mut self, specific_use: impl Into<String>) -> Self {
        self.specific_use = Some(specific_use.into());
        self
    }
}

impl Contributor {
    /// Create an individual contributor.
    pub fn person(
        contrib_type: impl Into<String>,
        surname: impl Into<String>,
        given_names: impl Into<String>,
    ) -> Self {
        Self {
            contrib_type: contrib_type.into(),
            name: ContributorName::Personal(PersonName {
                surname: surname.into(),
                given_names: Some(given_names.into()),
                suffix: None,
            }),
            ..Self::default()
        }
    }

    /// Create a collaboration contributor.
    pub fn collab(contrib_type: impl Into<String>, collab: impl Into<String>) -> Self {
        Self {
            contrib_type: contrib_type.into(),
            name: ContributorName::Collab(collab.into()),
            ..Self::default()
        }
    }

    /// Create an anonymous contributor.
    pub fn anonymous(contrib_type: impl Into<String>) -> Self {
        Self {
            contrib_type: contrib_type.into(),
            ..Self::default()
        }
    }

    /// Whether this contributor is a reviewing editor.
    pub fn is_editor(&self) -> bool {
        self.contrib_type == EDITOR
    }

    pub fn surname(&self) -> Option<&str> {
        match &self.name {
            ContributorName::Personal(name) => Some(&name.surname),
            _ => None,
        }
    }

    pub fn given_names(&self) -> Option<&str> {
        match &self.name {
            ContributorName::Personal(name) => name.given_names.as_deref(),
            _ => None,
        }
    }

    /// Name used where a single surname is expected (copyright holders).
    ///
    /// Collaborations contribute their group name, anonymous contributors
    /// an empty string.
    pub fn display_surname(&self) -> &str {
        match &self.name {
            ContributorName::Personal(name) => &name.surname,
            ContributorName::Collab(collab) => collab,
            ContributorName::Anonymous => "",
        }
    }

    /// Given names followed by surname, skipping absent parts.
    pub fn full_name(&self) -> String {
        match &self.name {
            ContributorName::Personal(name) => [name.given_names.as_deref(), Some(&name.surname)]
                .into_iter()
                .flatten()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
            ContributorName::Collab(collab) => collab.clone(),
            ContributorName::Anonymous => String::new(),
        }
    }

    /// First character of given names and surname, skipping absent parts.
    pub fn initials(&self) -> String {
        [self.given_names(), self.surname()]
            .into_iter()
            .flatten()
            .filter_map(|part| part.chars().next())
            .collect()
    }

    /// The first email found among this contributor's affiliations.
    pub fn first_email(&self) -> Option<&str> {
        self.affiliations.iter().find_map(|aff| aff.email.as_deref())
    }
}
