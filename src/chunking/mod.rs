//! Splitting page text into embeddable chunks.

/// Split text into chunks of at most `max_words` whitespace-delimited words.
///
/// Chunks do not overlap and preserve the original word order; the last chunk
/// may contain fewer than `max_words` words. Empty or whitespace-only input
/// yields no chunks.
pub fn chunk_words(text: &str, max_words: usize) -> Vec<String> {
    if max_words == 0 {
        return Vec::new();
    }

    let words: Vec<&str> = text.split_whitespace().collect();

    words
        .chunks(max_words)
        .map(|chunk| chunk.join(" "))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_no_chunks() {
        assert!(chunk_words("", 10).is_empty());
        assert!(chunk_words("   \n\t ", 10).is_empty());
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = chunk_words("hello world", 10);
        assert_eq!(chunks, vec!["hello world"]);
    }

    #[test]
    fn test_chunk_word_bound() {
        let text = (0..25).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");
        let chunks = chunk_words(&text, 10);

        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert!(chunk.split_whitespace().count() <= 10);
        }
        assert_eq!(chunks[2].split_whitespace().count(), 5);
    }

    #[test]
    fn test_chunks_preserve_word_sequence() {
        let text = "the quick brown fox jumps over the lazy dog again and again";
        let chunks = chunk_words(text, 5);

        let rejoined: Vec<&str> = chunks
            .iter()
            .flat_map(|c| c.split_whitespace())
            .collect();
        let original: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn test_collapses_irregular_whitespace() {
        let chunks = chunk_words("a  b\n\nc\td", 2);
        assert_eq!(chunks, vec!["a b", "c d"]);
    }

    #[test]
    fn test_zero_max_words() {
        assert!(chunk_words("some text", 0).is_empty());
    }
}
