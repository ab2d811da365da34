//! Porter stemmer.
//!
//! The original 1980 algorithm with the suffix lists used by documentation
//! search front ends, so stems computed here line up with the stems stored
//! in generated `terms` tables.

/// Stateless Porter stemmer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

const STEP2_RULES: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("bli", "ble"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
    ("logi", "log"),
];

const STEP3_RULES: &[(&str, &str)] = &[
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

const STEP4_RULES: &[(&str, &str)] = &[
    ("al", ""),
    ("ance", ""),
    ("ence", ""),
    ("er", ""),
    ("ic", ""),
    ("able", ""),
    ("ible", ""),
    ("ant", ""),
    ("ement", ""),
    ("ment", ""),
    ("ent", ""),
    ("ou", ""),
    ("ism", ""),
    ("ate", ""),
    ("iti", ""),
    ("ous", ""),
    ("ive", ""),
    ("ize", ""),
];

impl PorterStemmer {
    pub fn new() -> Self {
        Self
    }

    /// Stem a single word. The result is always lowercase.
    pub fn stem(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        if lower.len() <= 2 || !lower.is_ascii() {
            return lower;
        }

        let mut w = lower.into_bytes();
        step1a(&mut w);
        step1b(&mut w);
        step1c(&mut w);
        replace_longest(&mut w, STEP2_RULES, 0);
        replace_longest(&mut w, STEP3_RULES, 0);
        step4(&mut w);
        step5a(&mut w);
        step5b(&mut w);

        String::from_utf8_lossy(&w).into_owned()
    }
}

fn is_consonant(w: &[u8], i: usize) -> bool {
    match w[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => i == 0 || !is_consonant(w, i - 1),
        _ => true,
    }
}

/// Number of vowel-consonant sequences, the `m` in `[C](VC){m}[V]`.
fn measure(w: &[u8]) -> usize {
    let n = w.len();
    let mut i = 0;
    while i < n && is_consonant(w, i) {
        i += 1;
    }

    let mut m = 0;
    loop {
        while i < n && !is_consonant(w, i) {
            i += 1;
        }
        if i >= n {
            return m;
        }
        while i < n && is_consonant(w, i) {
            i += 1;
        }
        m += 1;
        if i >= n {
            return m;
        }
    }
}

fn has_vowel(w: &[u8]) -> bool {
    (0..w.len()).any(|i| !is_consonant(w, i))
}

fn ends_double_consonant(w: &[u8]) -> bool {
    let n = w.len();
    n >= 2 && w[n - 1] == w[n - 2] && is_consonant(w, n - 1)
}

/// Ends consonant-vowel-consonant, where the last consonant is not w, x or y.
fn ends_cvc(w: &[u8]) -> bool {
    let n = w.len();
    n >= 3
        && is_consonant(w, n - 1)
        && !is_consonant(w, n - 2)
        && is_consonant(w, n - 3)
        && !matches!(w[n - 1], b'w' | b'x' | b'y')
}

fn step1a(w: &mut Vec<u8>) {
    if w.ends_with(b"sses") || w.ends_with(b"ies") {
        w.truncate(w.len() - 2);
    } else if w.ends_with(b"s") && !w.ends_with(b"ss") {
        w.pop();
    }
}

fn step1b(w: &mut Vec<u8>) {
    if w.ends_with(b"eed") {
        if measure(&w[..w.len() - 3]) > 0 {
            w.pop();
        }
        return;
    }

    let suffix_len = if w.ends_with(b"ed") {
        2
    } else if w.ends_with(b"ing") {
        3
    } else {
        return;
    };
    let stem = w.len() - suffix_len;
    if !has_vowel(&w[..stem]) {
        return;
    }
    w.truncate(stem);

    if w.ends_with(b"at") || w.ends_with(b"bl") || w.ends_with(b"iz") {
        w.push(b'e');
    } else if ends_double_consonant(w) && !matches!(w.last(), Some(b'l' | b's' | b'z')) {
        w.pop();
    } else if measure(w) == 1 && ends_cvc(w) {
        w.push(b'e');
    }
}

fn step1c(w: &mut Vec<u8>) {
    if w.ends_with(b"y") && has_vowel(&w[..w.len() - 1]) {
        let last = w.len() - 1;
        w[last] = b'i';
    }
}

/// Apply the rule with the longest matching suffix, if the remaining stem
/// has a measure above `min_measure`. Returns whether any suffix matched.
fn replace_longest(w: &mut Vec<u8>, rules: &[(&str, &str)], min_measure: usize) -> bool {
    let matched = rules
        .iter()
        .filter(|(suffix, _)| w.len() > suffix.len() && w.ends_with(suffix.as_bytes()))
        .max_by_key(|(suffix, _)| suffix.len());

    let Some((suffix, replacement)) = matched else {
        return false;
    };

    let stem = w.len() - suffix.len();
    if measure(&w[..stem]) > min_measure {
        w.truncate(stem);
        w.extend_from_slice(replacement.as_bytes());
    }
    true
}

fn step4(w: &mut Vec<u8>) {
    if replace_longest(w, STEP4_RULES, 1) {
        return;
    }

    if w.len() > 4 && w.ends_with(b"ion") {
        let stem = w.len() - 3;
        if matches!(w[stem - 1], b's' | b't') && measure(&w[..stem]) > 1 {
            w.truncate(stem);
        }
    }
}

fn step5a(w: &mut Vec<u8>) {
    if !w.ends_with(b"e") || w.len() < 2 {
        return;
    }
    let stem = &w[..w.len() - 1];
    let m = measure(stem);
    if m > 1 || (m == 1 && !ends_cvc(stem)) {
        w.pop();
    }
}

fn step5b(w: &mut Vec<u8>) {
    if w.ends_with(b"ll") && measure(w) > 1 {
        w.pop();
    }
}
