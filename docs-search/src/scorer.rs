use crate::page::DocPage;
use crate::page::ScoredHit;
use log::debug;

/// Ranks pages that contain every query term by how early a term appears.
#[derive(Debug, Clone)]
pub struct TermOverlapScorer {
    default_limit: usize,
}

impl Default for TermOverlapScorer {
    fn default() -> Self {
        Self::new(4)
    }
}

impl TermOverlapScorer {
    pub fn new(default_limit: usize) -> Self {
        Self { default_limit }
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Every qualifying page, earliest match first. Ties keep corpus order.
    pub fn score<'a>(&self, terms: &[String], pages: &'a [DocPage]) -> Vec<ScoredHit<'a>> {
        if terms.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<ScoredHit<'a>> = pages
            .iter()
            .filter_map(|page| {
                first_match_offset(&page.search_text(), terms).map(|offset| ScoredHit {
                    page,
                    first_match_offset: offset,
                })
            })
            .collect();

        hits.sort_by_key(|hit| hit.first_match_offset);
        hits
    }

    /// Top `limit` hits (the scorer default when `None`), or `None` when
    /// nothing qualifies.
    pub fn rank<'a>(
        &self,
        terms: &[String],
        pages: &'a [DocPage],
        limit: Option<usize>,
    ) -> Option<Vec<ScoredHit<'a>>> {
        let limit = limit.unwrap_or(self.default_limit);
        let mut hits = self.score(terms, pages);
        debug!(
            "{} of {} pages contain all of {terms:?}",
            hits.len(),
            pages.len()
        );
        hits.truncate(limit);

        if hits.is_empty() { None } else { Some(hits) }
    }
}

/// Lowest character index at which any term occurs, provided all terms occur.
fn first_match_offset(text: &str, terms: &[String]) -> Option<usize> {
    let mut earliest = usize::MAX;
    for term in terms {
        earliest = earliest.min(text.find(term.as_str())?);
    }
    Some(text[..earliest].chars().count())
}
