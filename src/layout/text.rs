use super::TextBlock;

/// Greedy word wrap by character count.
///
/// Words are never split: a word longer than `max_chars` sits alone on its
/// own line. Absent, empty, or whitespace-only text produces no lines.
pub fn wrap_text(text: Option<&str>, max_chars: usize) -> Vec<String> {
    let Some(text) = text else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if char_len(&candidate) <= max_chars {
            current = candidate;
        } else {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

pub(super) fn wrap_block(text: Option<&str>, max_chars: usize, line_height: f32) -> TextBlock {
    let lines = wrap_text(text, max_chars);
    let height = lines.len() as f32 * line_height;
    TextBlock { lines, height }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_missing_text_produce_no_lines() {
        assert!(wrap_text(None, 10).is_empty());
        assert!(wrap_text(Some(""), 10).is_empty());
        assert!(wrap_text(Some("   \t\n "), 10).is_empty());
    }

    #[test]
    fn short_text_stays_on_one_line() {
        assert_eq!(wrap_text(Some("Build API"), 28), vec!["Build API"]);
    }

    #[test]
    fn breaks_at_word_boundaries() {
        let lines = wrap_text(Some("the quick brown fox jumps over the lazy dog"), 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]);
    }

    #[test]
    fn long_word_gets_its_own_line() {
        let lines = wrap_text(Some("a supercalifragilistic word"), 8);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "word"]);
    }

    #[test]
    fn collapses_runs_of_whitespace() {
        let lines = wrap_text(Some("  alpha   beta\tgamma  "), 30);
        assert_eq!(lines, vec!["alpha beta gamma"]);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let lines = wrap_text(Some("éééé éééé"), 9);
        assert_eq!(lines, vec!["éééé éééé"]);
    }

    #[test]
    fn rejoining_lines_reconstructs_words() {
        let samples = [
            "Migrate the legacy billing service onto the new event bus and retire the cron jobs",
            "x",
            "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa b cc ddd",
            "one two  three   four",
        ];
        for text in samples {
            for max in [1, 5, 12, 28, 36, 80] {
                let lines = wrap_text(Some(text), max);
                let words: Vec<&str> = text.split_whitespace().collect();
                assert_eq!(lines.join(" "), words.join(" "), "{text:?} at {max}");
                for line in &lines {
                    let single_word = !line.contains(' ');
                    assert!(
                        line.chars().count() <= max || single_word,
                        "line {line:?} exceeds {max}"
                    );
                }
            }
        }
    }

    #[test]
    fn wrap_block_reports_height() {
        let block = wrap_block(Some("one two three"), 7, 14.0);
        assert_eq!(block.lines.len(), 2);
        assert_eq!(block.height, 28.0);
    }
}
