use crate::core::chunker::chunk_lines;
use crate::core::diff_parser::{DiffParser, FileSegment};
use crate::core::language::{classify, LanguageInfo};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestContext {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl PullRequestContext {
    pub fn new(title: impl Into<String>, body: Option<String>) -> Self {
        Self {
            title: title.into(),
            body: body.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedFile {
    pub file_name: String,
    pub language: LanguageInfo,
    pub chunks: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedDiff {
    pub pr_context: PullRequestContext,
    pub files: Vec<AnalyzedFile>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReviewUnit<'a> {
    pub file_name: &'a str,
    pub chunk_index: usize,
    pub chunk: &'a str,
    pub language: LanguageInfo,
}

impl AnalyzedDiff {
    pub fn review_units(&self) -> Vec<ReviewUnit<'_>> {
        self.files
            .iter()
            .flat_map(|file| {
                file.chunks
                    .iter()
                    .enumerate()
                    .map(move |(chunk_index, chunk)| ReviewUnit {
                        file_name: &file.file_name,
                        chunk_index,
                        chunk,
                        language: file.language,
                    })
            })
            .collect()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn languages(&self) -> BTreeSet<String> {
        self.files
            .iter()
            .filter(|f| !f.language.is_unknown())
            .map(|f| f.language.display_name.to_string())
            .collect()
    }
}

pub struct DiffAnalyzer {
    max_chunk_size: usize,
    exclude: Vec<glob::Pattern>,
}

impl DiffAnalyzer {
    pub fn new(max_chunk_size: usize) -> Self {
        Self {
            max_chunk_size,
            exclude: Vec::new(),
        }
    }

    pub fn with_exclude(mut self, exclude: Vec<glob::Pattern>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn analyze(&self, diff_content: &str, pr_context: PullRequestContext) -> AnalyzedDiff {
        info!("Analyzing diff for PR: {}", pr_context.title);

        let files: Vec<AnalyzedFile> = DiffParser::segment(diff_content)
            .into_iter()
            .filter(|segment| !self.is_excluded(segment))
            .map(|segment| self.analyze_segment(segment))
            .collect();

        info!(
            "Split diff into {} files and {} review units",
            files.len(),
            files.iter().map(|f| f.chunks.len()).sum::<usize>()
        );

        AnalyzedDiff { pr_context, files }
    }

    fn analyze_segment(&self, segment: FileSegment) -> AnalyzedFile {
        let chunks = chunk_lines(&segment.raw_lines, self.max_chunk_size);
        if chunks.is_empty() {
            debug!("{} produced no chunks", segment.file_name);
        }
        AnalyzedFile {
            language: classify(&segment.file_name),
            file_name: segment.file_name,
            chunks,
        }
    }

    fn is_excluded(&self, segment: &FileSegment) -> bool {
        let excluded = self
            .exclude
            .iter()
            .any(|pattern| pattern.matches(&segment.file_name));
        if excluded {
            info!("Skipping excluded file: {}", segment.file_name);
        }
        excluded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_FILE_DIFF: &str = "\
diff --git a/a.py b/a.py
index 1111111..2222222 100644
--- a/a.py
+++ b/a.py
@@ -1,2 +1,3 @@
 def hello():
-    print(\"Hello\")
+    print(\"Hello, world\")
+    return True
diff --git a/b.rs b/b.rs
index 3333333..4444444 100644
--- a/b.rs
+++ b/b.rs
@@ -1,3 +1,3 @@
 fn main() {
-    let x = 1;
+    let x: u32 = 1;
 }
";

    #[test]
    fn test_two_files_one_chunk_each() {
        let analyzed = DiffAnalyzer::new(4000)
            .analyze(TWO_FILE_DIFF, PullRequestContext::new("Add feature", None));

        assert_eq!(analyzed.pr_context.title, "Add feature");
        assert_eq!(analyzed.pr_context.body, "");
        assert_eq!(analyzed.file_count(), 2);
        assert_eq!(analyzed.files[0].file_name, "a.py");
        assert_eq!(analyzed.files[1].file_name, "b.rs");
        assert_eq!(analyzed.files[0].chunks.len(), 1);
        assert_eq!(analyzed.files[1].chunks.len(), 1);
        assert_eq!(analyzed.files[0].language.display_name, "Python");
        assert_eq!(analyzed.files[1].language.display_name, "Rust");
        assert!(analyzed.files[0].chunks[0].contains("def hello():"));

        let languages: Vec<_> = analyzed.languages().into_iter().collect();
        assert_eq!(languages, vec!["Python", "Rust"]);
    }

    #[test]
    fn test_review_units_follow_file_then_chunk_order() {
        let analyzed = DiffAnalyzer::new(60)
            .analyze(TWO_FILE_DIFF, PullRequestContext::new("Split", None));

        let units = analyzed.review_units();
        let expected: usize = analyzed.files.iter().map(|f| f.chunks.len()).sum();
        assert_eq!(units.len(), expected);
        assert!(units.len() > 2);

        let order: Vec<(&str, usize)> = units.iter().map(|u| (u.file_name, u.chunk_index)).collect();
        let mut sorted = order.clone();
        sorted.sort_by_key(|(name, idx)| (if *name == "a.py" { 0 } else { 1 }, *idx));
        assert_eq!(order, sorted);
    }

    #[test]
    fn test_unknown_files_count_but_do_not_name_a_language() {
        let diff = "\
diff --git a/Makefile b/Makefile
@@ -1 +1 @@
-all: build
+all: build test
diff --git a/a.py b/a.py
@@ -1 +1 @@
-x = 1
+x = 2
";
        let analyzed = DiffAnalyzer::new(4000).analyze(diff, PullRequestContext::default());
        assert_eq!(analyzed.file_count(), 2);
        assert_eq!(analyzed.languages().into_iter().collect::<Vec<_>>(), vec!["Python"]);

        let only_unknown = DiffAnalyzer::new(4000).analyze(
            "diff --git a/LICENSE b/LICENSE\n@@ -1 +1 @@\n-a\n+b\n",
            PullRequestContext::default(),
        );
        assert_eq!(only_unknown.file_count(), 1);
        assert!(only_unknown.languages().is_empty());
    }

    #[test]
    fn test_crlf_survives_into_chunks() {
        let analyzed = DiffAnalyzer::new(4000).analyze(
            "diff --git a/w.bat b/w.bat\r\n@@ -1 +1 @@\r\n-echo a\r\n+echo b\r\n",
            PullRequestContext::default(),
        );
        assert_eq!(
            analyzed.files[0].chunks,
            vec!["diff --git a/w.bat b/w.bat\r\n@@ -1 +1 @@\r\n-echo a\r\n+echo b\r\n".to_string()]
        );
    }

    #[test]
    fn test_excluded_files_are_not_counted() {
        let analyzed = DiffAnalyzer::new(4000)
            .with_exclude(vec![glob::Pattern::new("*.rs").unwrap()])
            .analyze(TWO_FILE_DIFF, PullRequestContext::default());

        assert_eq!(analyzed.file_count(), 1);
        assert_eq!(analyzed.files[0].file_name, "a.py");
    }
}
