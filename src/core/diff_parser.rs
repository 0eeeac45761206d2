use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

const FILE_BOUNDARY: &str = "diff --git";

static FILE_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"a/(.+) b/(.+)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSegment {
    pub file_name: String,
    pub raw_lines: Vec<String>,
}

pub struct DiffParser;

impl DiffParser {
    pub fn segment(diff_content: &str) -> Vec<FileSegment> {
        let mut segments = Vec::new();
        let mut current: Option<Vec<&str>> = None;

        // split on '\n' only; '\r' stays part of the line content
        let mut lines: Vec<&str> = diff_content.split('\n').collect();
        if lines.last() == Some(&"") {
            lines.pop();
        }

        for line in lines {
            if line.starts_with(FILE_BOUNDARY) {
                if let Some(lines) = current.take() {
                    segments.extend(Self::build_segment(&lines));
                }
                current = Some(vec![line]);
            } else if let Some(lines) = current.as_mut() {
                lines.push(line);
            }
        }

        if let Some(lines) = current {
            segments.extend(Self::build_segment(&lines));
        }

        segments
    }

    fn build_segment(lines: &[&str]) -> Option<FileSegment> {
        let header = lines.first()?;
        match Self::extract_file_path(header) {
            Some(file_name) => Some(FileSegment {
                file_name,
                raw_lines: lines.iter().map(|l| l.to_string()).collect(),
            }),
            None => {
                debug!("Dropping diff segment without a file header: {}", header);
                None
            }
        }
    }

    pub fn extract_file_path(header: &str) -> Option<String> {
        let rest = header.strip_prefix(FILE_BOUNDARY).unwrap_or(header);
        let caps = FILE_HEADER.captures(rest)?;
        let path = caps.get(2)?.as_str().trim_end();
        if path.is_empty() {
            None
        } else {
            Some(path.to_string())
        }
    }
}
