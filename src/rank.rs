use crate::catalog::CatalogEntry;

/// levenshtein distance between two strings, per character.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut matrix = vec![vec![0usize; a.len() + 1]; b.len() + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=a.len() {
        matrix[0][j] = j;
    }

    for i in 1..=b.len() {
        for j in 1..=a.len() {
            if b[i - 1] == a[j - 1] {
                matrix[i][j] = matrix[i - 1][j - 1];
            } else {
                matrix[i][j] = matrix[i - 1][j - 1]
                    .min(matrix[i][j - 1])
                    .min(matrix[i - 1][j])
                    + 1;
            }
        }
    }

    matrix[b.len()][a.len()]
}

fn normalize(label: &str) -> String {
    label.to_lowercase().replace(' ', "")
}

/// scores every entry against `query` and keeps the best-scoring tie set.
///
/// `query` is expected to be lowercased already. an empty query skips
/// scoring entirely and returns the full listing untouched. ties with the
/// minimum score are all returned, in their original relative order, so the
/// user can disambiguate near-identical matches.
pub fn rank(mut entries: Vec<CatalogEntry>, query: &str) -> Vec<CatalogEntry> {
    if query.is_empty() {
        return entries;
    }

    for entry in &mut entries {
        entry.score = Some(edit_distance(&normalize(&entry.label), query));
    }

    entries.sort_by_key(|entry| entry.score);

    let Some(best) = entries.first().and_then(|entry| entry.score) else {
        return entries;
    };

    entries
        .into_iter()
        .take_while(|entry| entry.score == Some(best))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(labels: &[&str]) -> Vec<CatalogEntry> {
        labels
            .iter()
            .map(|label| CatalogEntry::new(*label, format!("/{label}/")))
            .collect()
    }

    #[test]
    fn empty_query_passes_entries_through_unchanged() {
        let listing = entries(&["Lost", "List", "Last Man Standing"]);
        let ranked = rank(listing.clone(), "");
        assert_eq!(ranked, listing);
        assert!(ranked.iter().all(|entry| entry.score.is_none()));
    }

    #[test]
    fn exact_match_scores_zero() {
        let ranked = rank(entries(&["Lost"]), "lost");
        assert_eq!(ranked[0].score, Some(0));
    }

    #[test]
    fn distance_is_symmetric_after_normalization() {
        assert_eq!(edit_distance("lost", "lst"), edit_distance("lst", "lost"));
        assert_eq!(edit_distance("abc", "acb"), edit_distance("acb", "abc"));
    }

    #[test]
    fn degenerate_sides_return_the_other_length() {
        assert_eq!(edit_distance("", "query"), 5);
        assert_eq!(edit_distance("label", ""), 5);
    }

    #[test]
    fn returns_the_whole_best_tie_set() {
        let ranked = rank(entries(&["Lost", "List", "Last Man Standing", "Louie"]), "lost");
        // Lost: 0, List: 1, Louie: 3 -- a unique best keeps the set at one
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].label, "Lost");

        let ranked = rank(entries(&["Lost", "List", "Last Man Standing"]), "lst");
        let labels: Vec<&str> = ranked.iter().map(|entry| entry.label.as_str()).collect();
        assert_eq!(labels, vec!["Lost", "List"]);
        assert!(ranked.iter().all(|entry| entry.score == Some(1)));
    }

    #[test]
    fn tied_zero_scores_come_back_together_in_listing_order() {
        let ranked = rank(entries(&["Lost", "Lo st", "List", "Louie"]), "lost");
        // normalization strips spaces, so the first two both score 0
        let labels: Vec<&str> = ranked.iter().map(|entry| entry.label.as_str()).collect();
        assert_eq!(labels, vec!["Lost", "Lo st"]);
    }
}
