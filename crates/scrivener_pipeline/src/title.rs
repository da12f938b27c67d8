//! Chapter title derivation.

const STOP_WORDS: [&str; 7] = ["the", "and", "but", "for", "are", "this", "that"];
const MIN_WORDS_FOR_TITLE: usize = 10;
const SCAN_WORDS: usize = 20;
const TITLE_WORDS: usize = 3;

/// Deterministic title for a chapter.
///
/// For content of more than ten words, the first twenty are scanned for words
/// longer than three characters that are not stop words, keeping at most
/// three. Otherwise, or when nothing qualifies, the title is the title-cased
/// genre followed by "Chapter".
///
/// # Examples
///
/// ```
/// use scrivener_pipeline::derive_title;
///
/// let content = "The morning light filtered through the curtains as Sarah stretched languidly";
/// assert_eq!(derive_title(content, "fantasy"), "morning light filtered");
/// assert_eq!(derive_title("Too short.", "science fiction"), "Science Fiction Chapter");
/// ```
pub fn derive_title(content: &str, genre: &str) -> String {
    let words: Vec<&str> = content.split_whitespace().collect();

    if words.len() > MIN_WORDS_FOR_TITLE {
        let picked: Vec<&str> = words
            .iter()
            .take(SCAN_WORDS)
            .filter(|word| word.chars().count() > 3)
            .filter(|word| !STOP_WORDS.contains(&word.to_lowercase().as_str()))
            .take(TITLE_WORDS)
            .copied()
            .collect();
        if !picked.is_empty() {
            return picked.join(" ");
        }
    }

    format!("{} Chapter", title_case(genre))
}

/// Upper-case every letter that follows a non-letter and lower-case the rest,
/// so `sci-fi` becomes `Sci-Fi`.
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut titled = String::with_capacity(word.len());
            let mut after_letter = false;
            for c in word.chars() {
                if after_letter {
                    titled.extend(c.to_lowercase());
                } else {
                    titled.extend(c.to_uppercase());
                }
                after_letter = c.is_alphabetic();
            }
            titled
        })
        .collect::<Vec<String>>()
        .join(" ")
}
