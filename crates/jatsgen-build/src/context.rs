//! Per-document build state.

use jatsgen_core::{Affiliation, Article};

/// Identifier counters and tables for one document build.
///
/// Correspondence and conflict ids are allocated up front in contributor
/// source order, so the contributor xrefs and the notes they point to
/// always agree. Affiliation ids are allocated on first request.
#[derive(Debug, Default)]
pub struct BuildContext {
    section_count: u32,
    dataset_count: u32,
    affiliations: Vec<Affiliation>,
    corresp_ids: Vec<Option<u32>>,
    conflict_ids: Vec<Vec<u32>>,
    default_conflict: bool,
}

/// Conflict id reserved for the document-level default statement.
pub const DEFAULT_CONFLICT_ID: u32 = 1;

impl BuildContext {
    /// Fresh state for building `article`.
    pub fn new(article: &Article) -> Self {
        let default_conflict = article.conflict_default.is_some();

        let mut corresp_count = 0;
        let corresp_ids = article
            .contributors
            .iter()
            .map(|contributor| {
                contributor.corresp.then(|| {
                    corresp_count += 1;
                    corresp_count
                })
            })
            .collect();

        let mut conflict_count = if default_conflict {
            DEFAULT_CONFLICT_ID
        } else {
            0
        };
        let conflict_ids = article
            .contributors
            .iter()
            .map(|contributor| {
                contributor
                    .conflict
                    .iter()
                    .map(|_| {
                        conflict_count += 1;
                        conflict_count
                    })
                    .collect()
            })
            .collect();

        Self {
            corresp_ids,
            conflict_ids,
            default_conflict,
            ..Self::default()
        }
    }

    /// Allocate the next section id ("s1", "s2", ...).
    pub fn next_section_id(&mut self) -> String {
        self.section_count += 1;
        format!("s{}", self.section_count)
    }

    /// Allocate the next dataset number.
    pub fn next_dataset_number(&mut self) -> u32 {
        self.dataset_count += 1;
        self.dataset_count
    }

    /// Id for an affiliation, reusing the id of the first equivalent one
    /// seen in this build.
    pub fn aff_id(&mut self, affiliation: &Affiliation) -> u32 {
        if let Some(index) = self
            .affiliations
            .iter()
            .position(|seen| seen.is_equivalent(affiliation))
        {
            return index as u32 + 1;
        }
        self.affiliations.push(affiliation.clone());
        self.affiliations.len() as u32
    }

    /// Number of affiliation ids allocated so far.
    pub fn affiliation_count(&self) -> u32 {
        self.affiliations.len() as u32
    }

    /// The affiliation first recorded under `id`.
    pub fn affiliation(&self, id: u32) -> Option<&Affiliation> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.affiliations.get(index)
    }

    /// Correspondence id of the contributor at `index`, if flagged.
    pub fn corresp_id(&self, index: usize) -> Option<u32> {
        self.corresp_ids.get(index).copied().flatten()
    }

    /// Ids of the personal conflict statements of the contributor at
    /// `index`, one per statement.
    pub fn conflict_ids(&self, index: usize) -> &[u32] {
        self.conflict_ids.get(index).map_or(&[], Vec::as_slice)
    }

    /// Conflict footnote ids the contributor at `index` refers to.
    pub fn conflict_refs(&self, index: usize) -> Vec<u32> {
        match self.conflict_ids(index) {
            [] if self.default_conflict => vec![DEFAULT_CONFLICT_ID],
            ids => ids.to_vec(),
        }
    }
}
