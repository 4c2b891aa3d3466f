//! Text analysis over article bodies: quoted figures, read time, summaries.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::models::{ArticleMetric, MetricKind};

/// Characters of surrounding text kept on each side of a metric.
const CONTEXT_CHARS: usize = 50;
const WORDS_PER_MINUTE: usize = 200;
const SUMMARY_CHARS: usize = 300;

lazy_static! {
    static ref PERCENTAGE_REGEX: Regex = Regex::new(
        r"(?i)(increased|decreased|up|down|gained|lost|rose|fell|jumped|dropped|surged|plunged) by (\d+\.?\d*)%"
    )
    .expect("Invalid regex pattern");
    static ref PRICE_TARGET_REGEX: Regex =
        Regex::new(r"(?i)price target (?:of |to |at )\$(\d+\.?\d*)").expect("Invalid regex pattern");
    static ref MONEY_REGEX: Regex =
        Regex::new(r"(?i)\$(\d+(?:\.\d+)?)\s*(million|billion|trillion)").expect("Invalid regex pattern");
}

/// Up to [`CONTEXT_CHARS`] characters either side of `start..end`.
fn context_window(text: &str, start: usize, end: usize) -> String {
    let from = text[..start]
        .char_indices()
        .rev()
        .take(CONTEXT_CHARS)
        .last()
        .map_or(start, |(i, _)| i);
    let to = text[end..]
        .char_indices()
        .nth(CONTEXT_CHARS)
        .map_or(text.len(), |(i, _)| end + i);
    text[from..to].to_string()
}

fn scale(unit: &str) -> f64 {
    match unit.to_lowercase().as_str() {
        "trillion" => 1e12,
        "billion" => 1e9,
        _ => 1e6,
    }
}

fn metric(text: &str, caps: &Captures<'_>, kind: MetricKind, value: f64) -> Option<ArticleMetric> {
    let whole = caps.get(0)?;
    Some(ArticleMetric {
        kind,
        value,
        context: context_window(text, whole.start(), whole.end()),
        direction: None,
        unit: None,
    })
}

/// Finds percentage moves, analyst price targets and money amounts in `text`.
///
/// Results are grouped by kind, each group in order of appearance.
pub fn extract_metrics(text: &str) -> Vec<ArticleMetric> {
    let mut metrics = Vec::new();

    for caps in PERCENTAGE_REGEX.captures_iter(text) {
        let Some(value) = caps.get(2).and_then(|m| m.as_str().parse::<f64>().ok()) else {
            continue;
        };
        if let Some(mut m) = metric(text, &caps, MetricKind::PercentageChange, value) {
            m.direction = caps.get(1).map(|d| d.as_str().to_lowercase());
            metrics.push(m);
        }
    }

    for caps in PRICE_TARGET_REGEX.captures_iter(text) {
        let Some(value) = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok()) else {
            continue;
        };
        metrics.extend(metric(text, &caps, MetricKind::PriceTarget, value));
    }

    for caps in MONEY_REGEX.captures_iter(text) {
        let (Some(amount), Some(unit)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let Ok(amount) = amount.as_str().parse::<f64>() else {
            continue;
        };
        if let Some(mut m) = metric(text, &caps, MetricKind::FinancialMetric, amount * scale(unit.as_str())) {
            m.unit = Some(unit.as_str().to_lowercase());
            metrics.push(m);
        }
    }

    metrics
}

/// Minutes to read `text` at 200 words per minute, rounded up. `None` for empty text.
pub fn estimate_read_time(text: &str) -> Option<u32> {
    let words = text.split_whitespace().count();
    (words > 0).then(|| words.div_ceil(WORDS_PER_MINUTE) as u32)
}

/// Picks the best available summary: the provider snippet, else the first
/// 300 characters of the body, else a line naming the headline.
pub fn summarize(title: &str, snippet: &str, content: Option<&str>) -> String {
    if !snippet.trim().is_empty() {
        return snippet.to_string();
    }
    if let Some(content) = content.filter(|c| !c.trim().is_empty()) {
        let head: String = content.chars().take(SUMMARY_CHARS).collect();
        return format!("{}...", head);
    }
    format!("Latest news about {}", title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_change() {
        let metrics = extract_metrics("Shares of Apple rose by 4.5% after the report.");
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].kind, MetricKind::PercentageChange);
        assert_eq!(metrics[0].value, 4.5);
        assert_eq!(metrics[0].direction.as_deref(), Some("rose"));
        assert_eq!(metrics[0].context, "Shares of Apple rose by 4.5% after the report.");
    }

    #[test]
    fn test_price_target_is_case_insensitive() {
        let metrics = extract_metrics("Analysts raised the Price Target to $250 on Friday");
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].kind, MetricKind::PriceTarget);
        assert_eq!(metrics[0].value, 250.0);
    }

    #[test]
    fn test_money_amounts_are_scaled() {
        let metrics = extract_metrics("Revenue hit $90.8 billion while buybacks reached $110 Billion and $2 trillion");
        let values: Vec<f64> = metrics.iter().map(|m| m.value).collect();
        assert_eq!(values, vec![90.8e9, 110e9, 2e12]);
        assert_eq!(metrics[1].unit.as_deref(), Some("billion"));
    }

    #[test]
    fn test_context_is_bounded() {
        let padding = "x".repeat(80);
        let text = format!("{} fell by 3% {}", padding, padding);
        let metrics = extract_metrics(&text);
        assert_eq!(metrics[0].context.chars().count(), 50 + "fell by 3%".len() + 50);
    }

    #[test]
    fn test_context_handles_multibyte_text() {
        let text = "Aktien — «Apple» stiegen: up by 2% heute ✓";
        let metrics = extract_metrics(text);
        assert_eq!(metrics.len(), 1);
        assert!(metrics[0].context.contains("up by 2%"));
    }

    #[test]
    fn test_read_time() {
        assert_eq!(estimate_read_time(""), None);
        assert_eq!(estimate_read_time("one two three"), Some(1));
        assert_eq!(estimate_read_time(&"word ".repeat(401)), Some(3));
    }

    #[test]
    fn test_summary_fallbacks() {
        assert_eq!(summarize("T", "Snippet", Some("Body")), "Snippet");
        assert_eq!(summarize("T", "", Some("Body")), "Body...");
        assert_eq!(summarize("T", " ", None), "Latest news about T");
        let long = "a".repeat(400);
        assert_eq!(summarize("T", "", Some(&long)).len(), 303);
    }
}
