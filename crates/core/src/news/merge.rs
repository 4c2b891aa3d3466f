//! Cross-source merge with title deduplication.

use std::collections::HashSet;

use marketlens_market_data::NewsItem;

/// Merges two source lists into one, newest first.
///
/// Every item of `primary` is kept. An item of `secondary` is kept only if no
/// item already accepted has a case-insensitively equal title. Paraphrased
/// headlines from different outlets are not collapsed.
pub fn merge_news(primary: Vec<NewsItem>, secondary: Vec<NewsItem>) -> Vec<NewsItem> {
    let mut seen: HashSet<String> = primary.iter().map(|item| title_key(&item.title)).collect();
    let mut merged = primary;

    for item in secondary {
        if seen.insert(title_key(&item.title)) {
            merged.push(item);
        }
    }

    // Stable sort keeps source order among equal timestamps.
    merged.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    merged
}

fn title_key(title: &str) -> String {
    title.to_lowercase()
}
