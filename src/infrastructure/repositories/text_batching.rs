use regex::Regex;
use std::sync::OnceLock;

fn sentence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([.!?]+\s+)").expect("sentence pattern is valid"))
}

/// Split text into batches that respect sentence boundaries.
/// Each batch is at most `max_bytes` bytes long.
pub fn split_into_batches(text: &str, max_bytes: usize) -> Vec<String> {
    if text.len() <= max_bytes {
        return vec![text.to_string()];
    }

    let mut batches = Vec::new();
    let mut current_batch = String::new();
    let mut last_end = 0;

    for mat in sentence_pattern().find_iter(text) {
        let sentence = &text[last_end..mat.end()];

        if !current_batch.is_empty() && current_batch.len() + sentence.len() > max_bytes {
            batches.push(current_batch.trim().to_string());
            current_batch = String::new();
        }

        if sentence.len() > max_bytes {
            batches.extend(split_on_char_boundaries(sentence, max_bytes));
        } else {
            current_batch.push_str(sentence);
        }
        last_end = mat.end();
    }

    // Text after the last sentence boundary
    if last_end < text.len() {
        let remaining = &text[last_end..];

        if !current_batch.is_empty() && current_batch.len() + remaining.len() > max_bytes {
            batches.push(current_batch.trim().to_string());
            current_batch = String::new();
        }

        if remaining.len() > max_bytes {
            batches.extend(split_on_char_boundaries(remaining, max_bytes));
        } else {
            current_batch.push_str(remaining);
        }
    }

    if !current_batch.trim().is_empty() {
        batches.push(current_batch.trim().to_string());
    }

    batches.retain(|b| !b.trim().is_empty());
    batches
}

/// Hard split for runs with no sentence boundary; never cuts a UTF-8 sequence
fn split_on_char_boundaries(text: &str, max_bytes: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = (start + max_bytes).min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        // A limit narrower than the next character still emits that whole character
        if end == start {
            end = text[start..]
                .chars()
                .next()
                .map_or(text.len(), |c| start + c.len_utf8());
        }
        chunks.push(text[start..end].to_string());
        start = end;
    }

    chunks
}
