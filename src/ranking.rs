use crate::catalog::Catalog;
use crate::matcher::Relevance;
use crate::model::QueryResult;
use crate::resolver::TitleResolver;

/// Scores every entry against `query` and keeps those with positive relevance.
///
/// Results come back in catalog order; sorting by score is up to the caller.
/// Title highlights are attached whenever the title's score is the winning one,
/// ties with the subtitle included.
pub fn rank(
    query: &str,
    catalog: &Catalog,
    resolver: &TitleResolver,
    relevance: &mut dyn Relevance,
) -> Vec<QueryResult> {
    let mut results = Vec::new();

    for (index, entry) in catalog.entries().iter().enumerate() {
        let title = resolver.resolve(query, entry, relevance);

        let title_match = relevance.score(query, title);
        let subtitle_score = relevance.score(query, &entry.subtitle).score;

        let score = title_match.score.max(subtitle_score);
        if score <= 0 {
            continue;
        }

        let highlight = (score == title_match.score).then_some(title_match.spans);
        results.push(QueryResult {
            entry: index,
            title: title.to_string(),
            score,
            highlight,
        });
    }

    log::debug!("rank: query='{}', admitted={}/{}", query, results.len(), catalog.len());
    results
}
