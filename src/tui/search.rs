//! Fuzzy filtering for the organization picker

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::types::Organization;

/// An organization with its fuzzy match score (higher is better)
#[derive(Debug, Clone)]
pub struct FilteredOrganization {
    pub organization: Organization,
    pub score: i64,
}

/// Filter organizations by name or slug.
///
/// An empty query keeps every organization in directory order. Otherwise the
/// best matches come first and equal scores keep directory order.
pub fn filter_organizations(organizations: &[Organization], query: &str) -> Vec<FilteredOrganization> {
    let query = query.trim();
    if query.is_empty() {
        return organizations
            .iter()
            .map(|org| FilteredOrganization {
                organization: org.clone(),
                score: 0,
            })
            .collect();
    }

    let matcher = SkimMatcherV2::default().smart_case();
    let mut results: Vec<FilteredOrganization> = organizations
        .iter()
        .filter_map(|org| {
            let haystack = format!("{} {}", org.name, org.slug);
            matcher
                .fuzzy_match(&haystack, query)
                .map(|score| FilteredOrganization {
                    organization: org.clone(),
                    score,
                })
        })
        .collect();

    results.sort_by(|a, b| b.score.cmp(&a.score));
    results
}
