//! Glob-style search patterns.
//!
//! In a pattern, `*` matches any sequence of characters (including the empty one) and `?` matches
//! exactly one character. Everything else is literal. A pattern always matches the whole text.

prelude! {
    regex::{Regex, RegexBuilder},
}

/// A compiled search pattern.
///
/// Patterns without wildcards are kept as-is so that the registry can use exact key lookups
/// instead of scanning its containers.
#[derive(Debug, Clone)]
pub enum Pattern {
    Exact(String),
    Glob(Regex),
    /// Wildcard pattern too big for a regex, matched by backtracking over its characters.
    ///
    /// Runs of `*` are collapsed.
    Chars(Vec<char>),
}

impl Pattern {
    pub const ANY_SEQ: char = '*';
    pub const ANY_CHAR: char = '?';

    /// Size limit for the compiled regex of a glob pattern.
    pub const SIZE_LIMIT: usize = 1 << 24;

    /// True if `s` contains a wildcard.
    pub fn has_wildcards(s: &str) -> bool {
        s.contains(&[Self::ANY_SEQ, Self::ANY_CHAR][..])
    }

    /// Compiles a pattern.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # college_rs::prelude! {}
    /// let pattern = Pattern::new("Alg*").expect("pattern compilation failed");
    /// assert!(pattern.is_match("Algebra"));
    /// assert!(pattern.is_match("Alg"));
    /// assert!(!pattern.is_match("Linear Algebra"));
    ///
    /// let pattern = Pattern::new("J?n").expect("pattern compilation failed");
    /// assert!(pattern.is_match("Jan"));
    /// assert!(!pattern.is_match("Jn"));
    /// assert!(pattern.as_exact().is_none());
    ///
    /// let pattern = Pattern::new("Jan").expect("pattern compilation failed");
    /// assert_eq!(pattern.as_exact(), Some("Jan"));
    /// ```
    pub fn new(pattern: impl AsRef<str>) -> Res<Self> {
        let pattern = pattern.as_ref();
        if !Self::has_wildcards(pattern) {
            return Ok(Self::Exact(pattern.into()));
        }

        let mut chars: Vec<char> = Vec::with_capacity(pattern.len());
        for c in pattern.chars() {
            if c == Self::ANY_SEQ && chars.last() == Some(&Self::ANY_SEQ) {
                continue;
            }
            chars.push(c);
        }

        let mut re = String::with_capacity(chars.len() + 8);
        re.push_str("(?s)^(?:");
        let mut literal = String::new();
        for &c in &chars {
            match c {
                Self::ANY_SEQ | Self::ANY_CHAR => {
                    re.push_str(&regex::escape(&literal));
                    literal.clear();
                    re.push_str(if c == Self::ANY_SEQ { ".*" } else { "." });
                }
                _ => literal.push(c),
            }
        }
        re.push_str(&regex::escape(&literal));
        re.push_str(")$");

        match RegexBuilder::new(&re).size_limit(Self::SIZE_LIMIT).build() {
            Ok(re) => Ok(Self::Glob(re)),
            Err(regex::Error::CompiledTooBig(_)) => {
                log::trace!(
                    "pattern of {} characters is too big for a regex, matching it directly",
                    chars.len()
                );
                Ok(Self::Chars(chars))
            }
            Err(e) => Err(e).context(|| {
                format!("failed to compile a pattern of {} characters", chars.len())
            }),
        }
    }

    /// The literal text, if the pattern has no wildcards.
    pub fn as_exact(&self) -> Option<&str> {
        match self {
            Self::Exact(s) => Some(s),
            Self::Glob(_) | Self::Chars(_) => None,
        }
    }

    pub fn is_match(&self, text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        match self {
            Self::Exact(s) => s == text,
            Self::Glob(re) => re.is_match(text),
            Self::Chars(chars) => Self::chars_match(chars, text),
        }
    }

    /// Two-pointer glob matching, backtracking to the last `*` only.
    fn chars_match(pattern: &[char], text: &str) -> bool {
        let text: Vec<char> = text.chars().collect();
        let (mut p, mut t) = (0, 0);
        // Position of the last `*` in the pattern and of the text it resumes from.
        let mut star: Option<(usize, usize)> = None;
        while t < text.len() {
            match pattern.get(p) {
                Some(&Self::ANY_SEQ) => {
                    star = Some((p, t));
                    p += 1;
                }
                Some(&c) if c == Self::ANY_CHAR || c == text[t] => {
                    p += 1;
                    t += 1;
                }
                _ => match star {
                    Some((star_p, star_t)) => {
                        p = star_p + 1;
                        t = star_t + 1;
                        star = Some((star_p, t));
                    }
                    None => return false,
                },
            }
        }
        pattern[p..].iter().all(|c| *c == Self::ANY_SEQ)
    }
}

/// One-shot matching of `text` against `pattern`.
pub fn matches(pattern: impl AsRef<str>, text: impl AsRef<str>) -> Res<bool> {
    Pattern::new(pattern).map(|pattern| pattern.is_match(text))
}

#[cfg(test)]
mod tests {
    use super::{matches, Pattern};

    fn check(pattern: &str, text: &str) -> bool {
        matches(pattern, text).unwrap()
    }

    #[test]
    fn star() {
        assert!(check("*", ""));
        assert!(check("*", "anything at all"));
        assert!(check("Kow*", "Kowalski"));
        assert!(check("*ski", "Kowalski"));
        assert!(check("K*l*i", "Kowalski"));
        assert!(!check("K*z", "Kowalski"));
    }

    #[test]
    fn question_mark() {
        assert!(check("?", "a"));
        assert!(!check("?", ""));
        assert!(!check("?", "ab"));
        assert!(check("J??", "Jan"));
        assert!(check("Ł?d?", "Łódź"));
    }

    #[test]
    fn full_string_only() {
        assert!(!check("an", "Jan"));
        assert!(!check("Ja", "Jan"));
        assert!(!check("?a", "Jan"));
    }

    #[test]
    fn regex_chars_are_literal() {
        assert!(check("C++ (intro)*", "C++ (intro) 2024"));
        assert!(!check("C++ (intro)*", "CC (intro) 2024"));
        assert!(check("a.b", "a.b"));
        assert!(!check("a.b", "axb"));
        assert!(check("$[x]^*", "$[x]^ tail"));
        assert!(check("back\\slash?", "back\\slash!"));
    }

    #[test]
    fn exact_patterns() {
        let pattern = Pattern::new("a.b").unwrap();
        assert_eq!(pattern.as_exact(), Some("a.b"));
        assert!(pattern.is_match("a.b"));
        assert!(!pattern.is_match("axb"));
        assert!(Pattern::new("").unwrap().is_match(""));
        assert!(!Pattern::new("").unwrap().is_match("x"));
    }

    #[test]
    fn newlines() {
        assert!(check("a*b", "a\nb"));
        assert!(check("a?b", "a\nb"));
    }

    #[test]
    fn long_star_run() {
        let stars = "*".repeat(100_000);
        assert!(check(&stars, ""));
        assert!(check(&stars, "Kowalski"));
        assert!(check(&format!("K{}i", stars), "Kowalski"));
        assert!(!check(&format!("K{}z", stars), "Kowalski"));
    }

    #[test]
    fn long_literal_with_one_wildcard() {
        let head = "a".repeat(50_000);
        let pattern = format!("{}?{}", head, head);
        assert!(check(&pattern, &format!("{}b{}", head, head)));
        assert!(!check(&pattern, &format!("{}{}", head, head)));
        assert!(!check(&pattern, &format!("{}bb{}", head, head)));
    }

    #[test]
    fn direct_matching_agrees_with_regex() {
        let cases = [
            ("*", ""),
            ("*", "anything"),
            ("?", ""),
            ("?", "a"),
            ("K*l*i", "Kowalski"),
            ("K*z", "Kowalski"),
            ("*ski", "Kowalski"),
            ("*a*a*", "banana"),
            ("a*b?c", "axxbyc"),
            ("a*b?c", "axxbc"),
            ("Ł?d?", "Łódź"),
            ("a?b", "a\nb"),
        ];
        for (pattern, text) in cases {
            let chars: Vec<char> = pattern.chars().collect();
            assert_eq!(
                Pattern::chars_match(&chars, text),
                check(pattern, text),
                "`{}` against `{}`",
                pattern,
                text,
            );
        }
        let pattern = Pattern::Chars("Kow*?".chars().collect());
        assert!(pattern.is_match("Kowalski"));
        assert!(!pattern.is_match("Kow"));
        assert!(pattern.as_exact().is_none());
    }
}
