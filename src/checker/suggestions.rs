use super::dictionary::{capitalize, Casing, HunspellDictionary};

/// Used when the affix file has no `TRY` line.
const DEFAULT_TRY: &str = "esianrtolcdugmphbyfvkwz";

/// Prefix neighbours scanned per word.
const PREFIX_SCAN_LIMIT: usize = 2000;

struct Collector<'a> {
    dictionary: &'a HunspellDictionary,
    word: &'a str,
    max: usize,
    found: Vec<String>,
}

impl<'a> Collector<'a> {
    fn is_full(&self) -> bool {
        self.found.len() >= self.max
    }

    fn offer(&mut self, candidate: String) {
        if self.is_full()
            || candidate == self.word
            || self.found.contains(&candidate)
            || !self.dictionary.suggestable(&candidate)
            || !self.dictionary.check(&candidate)
        {
            return;
        }
        self.found.push(candidate);
    }
}

/// Generate spelling suggestions for a misspelled word, best first.
pub fn generate(word: &str, dictionary: &HunspellDictionary, max_suggestions: usize) -> Vec<String> {
    let mut collector = Collector {
        dictionary,
        word,
        max: max_suggestions,
        found: Vec::new(),
    };

    // 1. Replacement table (typical misspellings declared by the dictionary)
    for (from, to) in dictionary.replacements().iter().filter(|(from, _)| !from.is_empty()) {
        for (idx, _) in word.match_indices(from.as_str()) {
            collector.offer(format!("{}{}{}", &word[..idx], to, &word[idx + from.len()..]));
        }
    }

    // 2. Wrong case
    collector.offer(capitalize(&word.to_lowercase()));
    collector.offer(word.to_lowercase());

    // 3. Single edits over the dictionary's alphabet
    let default_try: Vec<char> = DEFAULT_TRY.chars().collect();
    let alphabet = if dictionary.try_chars().is_empty() {
        default_try.as_slice()
    } else {
        dictionary.try_chars()
    };
    for candidate in single_edits(word, alphabet) {
        collector.offer(candidate);
        if collector.is_full() {
            return collector.found;
        }
    }

    // 4. Prefix neighbours within a small edit distance (slow path)
    let lower = word.to_lowercase();
    if lower.chars().count() >= 3 {
        let prefix: String = lower.chars().take(3).collect();
        let mut neighbours: Vec<(usize, String)> = dictionary
            .words_with_prefix(&prefix, PREFIX_SCAN_LIMIT)
            .into_iter()
            .filter_map(|w| {
                let distance = edit_distance(&lower, &w);
                (distance <= 2).then_some((distance, w))
            })
            .collect();
        neighbours.sort_by_key(|(distance, _)| *distance);

        let casing = Casing::of(word);
        for (_, neighbour) in neighbours {
            collector.offer(match casing {
                Casing::Capitalized => capitalize(&neighbour),
                Casing::Upper => neighbour.to_uppercase(),
                Casing::Lower | Casing::Mixed => neighbour,
            });
        }
    }

    collector.found
}

/// Calculate Levenshtein distance between two strings
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j + 1] + 1) // deletion
                .min(current[j] + 1) // insertion
                .min(previous[j] + cost); // substitution
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

/// Every word one edit away from `word`: swapped neighbours, a missing
/// character, an extra character, then a wrong character.
fn single_edits(word: &str, alphabet: &[char]) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut edits = Vec::new();

    // Transpositions (swap adjacent)
    for i in 0..chars.len().saturating_sub(1) {
        if chars[i] != chars[i + 1] {
            let mut new_word = chars.clone();
            new_word.swap(i, i + 1);
            edits.push(new_word.iter().collect());
        }
    }

    // Insertions
    for i in 0..=chars.len() {
        for &ch in alphabet {
            let mut new_word = chars.clone();
            new_word.insert(i, ch);
            edits.push(new_word.iter().collect());
        }
    }

    // Deletions
    for i in 0..chars.len() {
        let mut new_word = chars.clone();
        new_word.remove(i);
        edits.push(new_word.iter().collect());
    }

    // Replacements
    for i in 0..chars.len() {
        for &ch in alphabet {
            if ch != chars[i] {
                let mut new_word = chars.clone();
                new_word[i] = ch;
                edits.push(new_word.iter().collect());
            }
        }
    }

    edits
}
