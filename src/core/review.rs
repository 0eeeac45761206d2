use crate::core::analyzer::PullRequestContext;
use std::collections::BTreeSet;

pub const REVIEW_SEPARATOR: &str = "\n\n---\n\n";

const LEGEND: &str = "\
### Severity Legend

| Marker | Meaning |
|--------|---------|
| 🔴 Critical | Bugs, security holes or data loss. Fix before merging. |
| 🟡 Warning | Likely problems or risky patterns. Should be addressed. |
| 🔵 Suggestion | Optional improvements to readability, idiom or performance. |
| 🟢 Praise | Things done well. |";

const DISCLAIMER: &str = "\
> 🤖 This review was generated automatically by an AI model. \
It may miss issues or flag false positives; use your own judgement before acting on it. \
Values that looked like credentials were redacted before the diff was sent for review.";

pub struct ReviewAssembler;

impl ReviewAssembler {
    pub fn assemble<S: AsRef<str>>(
        pr_context: &PullRequestContext,
        file_count: usize,
        languages: &BTreeSet<String>,
        unit_reviews: &[S],
    ) -> String {
        let mut output = String::new();

        output.push_str("# 🤖 AI Code Review\n\n");
        output.push_str(&format!("**Pull Request:** {}\n\n", pr_context.title));
        output.push_str(&format!("- Files Reviewed: {}\n", file_count));
        output.push_str(&format!("- Languages: {}\n", Self::language_list(languages)));
        output.push_str(REVIEW_SEPARATOR);

        if !unit_reviews.is_empty() {
            let body: Vec<&str> = unit_reviews.iter().map(|r| r.as_ref()).collect();
            output.push_str(&body.join(REVIEW_SEPARATOR));
            output.push_str(REVIEW_SEPARATOR);
        }

        output.push_str(LEGEND);
        output.push_str("\n\n");
        output.push_str(DISCLAIMER);
        output.push('\n');

        output
    }

    fn language_list(languages: &BTreeSet<String>) -> String {
        if languages.is_empty() {
            "Unknown".to_string()
        } else {
            languages.iter().cloned().collect::<Vec<_>>().join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn languages(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_header_reports_count_and_sorted_languages() {
        let pr = PullRequestContext::new("Add feature", None);
        let doc = ReviewAssembler::assemble(&pr, 2, &languages(&["Rust", "Python"]), &["r1", "r2"]);

        assert!(doc.contains("**Pull Request:** Add feature"));
        assert!(doc.contains("Files Reviewed: 2"));
        assert!(doc.contains("Languages: Python, Rust"));
    }

    #[test]
    fn test_no_languages_reports_unknown() {
        let pr = PullRequestContext::new("Empty", None);
        let reviews: Vec<String> = Vec::new();
        let doc = ReviewAssembler::assemble(&pr, 0, &BTreeSet::new(), &reviews);
        assert!(doc.contains("- Languages: Unknown\n"));
        assert!(doc.contains("Files Reviewed: 0"));
    }

    #[test]
    fn test_no_reviews_keeps_a_single_separator() {
        let pr = PullRequestContext::new("Empty", None);
        let reviews: Vec<String> = Vec::new();
        let doc = ReviewAssembler::assemble(&pr, 0, &BTreeSet::new(), &reviews);

        assert!(!doc.contains(&REVIEW_SEPARATOR.repeat(2)));
        assert_eq!(doc.matches(REVIEW_SEPARATOR).count(), 1);
        assert!(doc.contains("- Languages: Unknown\n\n\n---\n\n### Severity Legend"));
    }

    #[test]
    fn test_reviews_keep_submission_order_once_each() {
        let pr = PullRequestContext::new("Order", None);
        let reviews = [
            "review a.py chunk 0",
            "review a.py chunk 1",
            "review b.rs chunk 0",
            "review b.rs chunk 1",
        ];
        let doc = ReviewAssembler::assemble(&pr, 2, &languages(&["Python", "Rust"]), &reviews);

        let positions: Vec<usize> = reviews
            .iter()
            .map(|r| {
                assert_eq!(doc.matches(*r).count(), 1, "{r} should appear once");
                doc.find(*r).unwrap()
            })
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        let expected = reviews.join(REVIEW_SEPARATOR);
        assert!(doc.contains(&expected));
    }

    #[test]
    fn test_footer_has_legend_and_disclaimer() {
        let pr = PullRequestContext::new("Footer", None);
        let doc = ReviewAssembler::assemble(&pr, 1, &languages(&["Go"]), &["only"]);

        let legend = doc.find("### Severity Legend").unwrap();
        assert!(doc.find("only").unwrap() < legend);
        for marker in ["🔴 Critical", "🟡 Warning", "🔵 Suggestion", "🟢 Praise"] {
            assert!(doc[legend..].contains(marker));
        }
        assert!(doc.trim_end().ends_with("before the diff was sent for review."));
    }
}
