//! Misc small utilities shared across modules.
use crate::constants::MAX_MESSAGE_LEN;

/// Splits a reply into Discord-sized pieces, preferring line boundaries.
/// A single line longer than the limit is cut on character boundaries.
pub fn chunk_message(text: &str) -> Vec<String> {
    chunk_with_limit(text, MAX_MESSAGE_LEN)
}

fn chunk_with_limit(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        let sep = usize::from(!current.is_empty());
        if current_len + sep + line_len <= limit {
            if sep == 1 {
                current.push('\n');
            }
            current.push_str(line);
            current_len += sep + line_len;
            continue;
        }
        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if line_len <= limit {
            current.push_str(line);
            current_len = line_len;
            continue;
        }
        // Oversized line: emit full slices and keep the tail open.
        let chars: Vec<char> = line.chars().collect();
        let mut pieces = chars.chunks(limit).peekable();
        while let Some(piece) = pieces.next() {
            let piece: String = piece.iter().collect();
            if pieces.peek().is_some() {
                chunks.push(piece);
            } else {
                current_len = piece.chars().count();
                current = piece;
            }
        }
    }
    if !current.trim().is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(chunk_message("hello\nworld"), vec!["hello\nworld".to_string()]);
    }

    #[test]
    fn blank_text_yields_nothing() {
        assert!(chunk_message("").is_empty());
        assert!(chunk_message("\n\n").is_empty());
    }

    #[test]
    fn splits_on_line_boundaries() {
        let chunks = chunk_with_limit("aaaa\nbbbb\ncccc", 9);
        assert_eq!(chunks, vec!["aaaa\nbbbb".to_string(), "cccc".to_string()]);
    }

    #[test]
    fn long_lines_are_cut_without_breaking_chars() {
        let line = "é".repeat(25);
        let chunks = chunk_with_limit(&line, 10);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(chunks.concat(), line);
    }

    #[test]
    fn every_chunk_respects_discord_limit() {
        let text = (0..500).map(|i| format!("Listing {i}: a summer dress")).collect::<Vec<_>>().join("\n");
        let chunks = chunk_message(&text);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= MAX_MESSAGE_LEN));
        assert_eq!(chunks.join("\n"), text);
    }
}
