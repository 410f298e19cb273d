use aho_corasick::AhoCorasick;
use std::collections::BTreeSet;
use tracing::warn;

/// Reports which keywords occur as substrings of a text.
///
/// Implementations must agree exactly: a keyword is present iff it is a
/// contiguous substring of `text`. The empty keyword is a substring of
/// every text, including the empty one.
pub trait PatternMatcher: Send + Sync {
    fn find_matches(&self, text: &str, keywords: &BTreeSet<String>) -> BTreeSet<String>;
}

/// Rolling-hash substring search over UTF-8 bytes.
///
/// The default modulus is tiny, so hash hits are frequent and every hit is
/// confirmed by comparing the window with the pattern.
#[derive(Debug, Clone, Copy)]
pub struct RabinKarp {
    base: u64,
    modulus: u64,
}

impl Default for RabinKarp {
    fn default() -> Self {
        Self::new(256, 101)
    }
}

impl RabinKarp {
    pub fn new(base: u32, modulus: u32) -> Self {
        Self {
            base: u64::from(base),
            modulus: u64::from(modulus.max(1)),
        }
    }

    /// Polynomial hash of `bytes`, most significant byte first.
    pub fn hash(&self, bytes: &[u8]) -> u64 {
        bytes
            .iter()
            .fold(0, |h, &b| (h * self.base + u64::from(b)) % self.modulus)
    }

    /// Offset of the first occurrence of `pattern` in `text`.
    pub fn find(&self, text: &str, pattern: &str) -> Option<usize> {
        let (text, pattern) = (text.as_bytes(), pattern.as_bytes());
        let m = pattern.len();
        if m == 0 {
            return Some(0);
        }
        if m > text.len() {
            return None;
        }

        let target = self.hash(pattern);
        let mut window = self.hash(&text[..m]);
        let lead = self.pow_mod(m - 1);

        for i in 0..=text.len() - m {
            if window == target && &text[i..i + m] == pattern {
                return Some(i);
            }
            if i + m < text.len() {
                window = self.roll(window, text[i], text[i + m], lead);
            }
        }

        None
    }

    pub fn contains(&self, text: &str, pattern: &str) -> bool {
        self.find(text, pattern).is_some()
    }

    /// Drop `outgoing` from the front of the window and append `incoming`.
    fn roll(&self, window: u64, outgoing: u8, incoming: u8, lead: u64) -> u64 {
        let removed = (u64::from(outgoing) * lead) % self.modulus;
        let without = (window + self.modulus - removed) % self.modulus;
        (without * self.base + u64::from(incoming)) % self.modulus
    }

    /// base^exp mod modulus
    fn pow_mod(&self, mut exp: usize) -> u64 {
        let mut result = 1 % self.modulus;
        let mut base = self.base % self.modulus;
        while exp > 0 {
            if exp & 1 == 1 {
                result = result * base % self.modulus;
            }
            base = base * base % self.modulus;
            exp >>= 1;
        }
        result
    }
}

impl PatternMatcher for RabinKarp {
    fn find_matches(&self, text: &str, keywords: &BTreeSet<String>) -> BTreeSet<String> {
        keywords
            .iter()
            .filter(|keyword| self.contains(text, keyword))
            .cloned()
            .collect()
    }
}

/// All keywords in one pass with an Aho-Corasick automaton.
#[derive(Debug, Clone, Copy, Default)]
pub struct AhoCorasickMatcher;

impl PatternMatcher for AhoCorasickMatcher {
    fn find_matches(&self, text: &str, keywords: &BTreeSet<String>) -> BTreeSet<String> {
        // The automaton rejects empty patterns; they match anywhere anyway
        let mut found: BTreeSet<String> =
            keywords.iter().filter(|k| k.is_empty()).cloned().collect();
        let patterns: Vec<&String> = keywords.iter().filter(|k| !k.is_empty()).collect();
        if patterns.is_empty() {
            return found;
        }

        let automaton = match AhoCorasick::new(&patterns) {
            Ok(automaton) => automaton,
            Err(e) => {
                warn!(error = %e, patterns = patterns.len(), "Automaton build failed, using rolling hash");
                return RabinKarp::default().find_matches(text, keywords);
            }
        };

        // Overlapping search so "java" is still reported next to "javascript"
        for hit in automaton.find_overlapping_iter(text) {
            found.insert(patterns[hit.pattern().as_usize()].clone());
            if found.len() == keywords.len() {
                break;
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_basic_search() {
        let rk = RabinKarp::default();
        assert_eq!(rk.find("i write rust daily", "rust"), Some(8));
        assert_eq!(rk.find("rust", "rust"), Some(0));
        assert_eq!(rk.find("trust me", "rust"), Some(1));
        assert_eq!(rk.find("ru st", "rust"), None);
    }

    #[test]
    fn test_pattern_longer_than_text() {
        assert_eq!(RabinKarp::default().find("go", "golang"), None);
    }

    #[test]
    fn test_empty_pattern_is_present() {
        let rk = RabinKarp::default();
        assert_eq!(rk.find("anything", ""), Some(0));
        assert_eq!(rk.find("", ""), Some(0));
        assert_eq!(rk.find_matches("", &set(&[""])), set(&[""]));
        assert_eq!(AhoCorasickMatcher.find_matches("anything", &set(&[""])), set(&[""]));
        assert_eq!(
            AhoCorasickMatcher.find_matches("rust only", &set(&["", "go", "rust"])),
            set(&["", "rust"])
        );
    }

    #[test]
    fn test_collision_is_verified() {
        let rk = RabinKarp::default();
        // 54 * 97 + 98 == 54 * 98 + 44 == 5336, and 256 % 101 == 54
        assert_eq!(rk.hash(b"ab"), rk.hash(b"b,"));

        assert_eq!(rk.find("xxb,yy", "ab"), None);
        assert_eq!(rk.find("b,b,b,ab", "ab"), Some(6));
        assert_eq!(rk.find("c[b,", "ab"), None);
    }

    #[test]
    fn test_agrees_with_str_contains() {
        let rk = RabinKarp::default();
        let text = "senior python/django developer; c++ and c#, node.js — kubernetes, k8s";
        let patterns = [
            "python", "django", "c++", "c#", "node.js", "kubernetes", "k8s", "java", "go",
            "developer;", "—", "ab", "b,", "s, k", "zz",
        ];
        for pattern in patterns {
            assert_eq!(rk.contains(text, pattern), text.contains(pattern), "pattern {pattern:?}");
        }
    }

    #[test]
    fn test_multibyte_text() {
        let rk = RabinKarp::default();
        assert_eq!(rk.find("josé müller, münchen", "münchen"), Some(15));
        assert!(!rk.contains("josé müller", "mueller"));
    }

    #[test]
    fn test_tiny_modulus_still_exact() {
        // Every window collides under modulus 1
        let rk = RabinKarp::new(256, 1);
        assert!(rk.contains("abcabd", "abd"));
        assert!(!rk.contains("abcabc", "abd"));
    }

    #[test]
    fn test_matchers_agree() {
        let text = "java, javascript and typescript; sql server";
        let keywords = set(&["java", "javascript", "script", "sql server", "rust", "", "t; s"]);

        let expected = set(&["", "java", "javascript", "script", "sql server", "t; s"]);
        assert_eq!(RabinKarp::default().find_matches(text, &keywords), expected);
        assert_eq!(AhoCorasickMatcher.find_matches(text, &keywords), expected);
    }
}
