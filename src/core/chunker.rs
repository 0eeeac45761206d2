use crate::core::redact::redact;

pub const DEFAULT_MAX_CHUNK_SIZE: usize = 4000;

pub fn chunk_lines<S: AsRef<str>>(lines: &[S], max_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in lines {
        let redacted = redact(line.as_ref());
        let line_len = redacted.chars().count() + 1;

        if current_len > 0 && current_len + line_len > max_size {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        current.push_str(&redacted);
        current.push('\n');
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
