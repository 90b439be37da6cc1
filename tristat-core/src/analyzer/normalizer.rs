//! Text normalization.
//!
//! Turns raw text into the form the tokenizer expects: letters only,
//! lower-cased, words separated by exactly one ASCII space, no leading or
//! trailing space. Everything that is not a letter (digits, underscore,
//! punctuation, symbols, any whitespace) acts as a word separator.

/// Maps an ASCII byte to its lower-case letter, or 0 for a separator.
#[rustfmt::skip]
const ASCII_LETTERS: [u8; 128] = [
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
    0,   b'a',b'b',b'c',b'd',b'e',b'f',b'g',b'h',b'i',b'j',b'k',b'l',b'm',b'n',b'o',
    b'p',b'q',b'r',b's',b't',b'u',b'v',b'w',b'x',b'y',b'z',0,0,0,0,0,
    0,   b'a',b'b',b'c',b'd',b'e',b'f',b'g',b'h',b'i',b'j',b'k',b'l',b'm',b'n',b'o',
    b'p',b'q',b'r',b's',b't',b'u',b'v',b'w',b'x',b'y',b'z',0,0,0,0,0,
];

/// Configuration options for text normalization.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizerConfig {
    /// When enabled, strips diacritical marks from Latin characters.
    /// For example, "café" becomes "cafe".
    pub strip_diacritics: bool,
}

/// Unicode-aware text normalizer.
///
/// # Examples
///
/// ```
/// use tristat_core::analyzer::normalizer::{NormalizerConfig, TextNormalizer};
///
/// let normalizer = TextNormalizer::default();
/// assert_eq!(normalizer.normalize("  Hello, WORLD!  42 "), "hello world");
///
/// let stripper = TextNormalizer::new(NormalizerConfig { strip_diacritics: true });
/// assert_eq!(stripper.normalize("Café"), "cafe");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer {
    config: NormalizerConfig,
}

impl TextNormalizer {
    /// Creates a new normalizer with the specified configuration.
    pub const fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Normalizes text into an existing String buffer.
    ///
    /// Clears the buffer first and reuses its capacity when sufficient.
    pub fn normalize_into(&self, input: &str, out: &mut String) {
        out.clear();
        out.reserve(input.len());

        let strip = self.config.strip_diacritics;
        // A separator is only written once the next letter arrives, which
        // collapses runs and drops leading/trailing separators.
        let mut pending_space = false;

        for ch in input.chars() {
            if ch.is_ascii() {
                let letter = ASCII_LETTERS[ch as usize];
                if letter == 0 {
                    pending_space = !out.is_empty();
                } else {
                    if pending_space {
                        out.push(' ');
                        pending_space = false;
                    }
                    out.push(letter as char);
                }
                continue;
            }

            if !is_word_char(ch) {
                pending_space = !out.is_empty();
                continue;
            }

            for lowered in ch.to_lowercase() {
                let folded = if strip { fold_latin1(lowered) } else { lowered };
                if folded == '\0' {
                    continue;
                }
                if pending_space {
                    out.push(' ');
                    pending_space = false;
                }
                out.push(folded);
            }
        }
    }

    /// Normalizes text and returns a new String.
    #[inline]
    pub fn normalize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.normalize_into(input, &mut out);
        out
    }
}

/// Letters, plus combining marks so decomposed accents stay inside their word.
#[inline(always)]
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphabetic() || is_combining_mark(c)
}

#[inline(always)]
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

#[inline(always)]
fn fold_latin1(c: char) -> char {
    if is_combining_mark(c) {
        return '\0';
    }

    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'ā' | 'ă' | 'ą' | 'æ' => 'a',
        'ç' | 'ć' | 'č' | 'ĉ' | 'ċ' => 'c',
        'ð' | 'đ' => 'd',
        'é' | 'è' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ł' => 'l',
        'ñ' | 'ń' | 'ň' | 'ņ' => 'n',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ō' | 'ŏ' | 'ő' | 'ø' | 'œ' => 'o',
        'ś' | 'š' | 'ş' | 'ß' => 's',
        'ú' | 'ù' | 'û' | 'ü' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ž' | 'ż' => 'z',
        _ => c,
    }
}
