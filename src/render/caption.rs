//! Table caption detection and splitting.
//!
//! Captions look like `<label> <n>[.<n>]* <separator> <text>`. The label and
//! separator come from the preset, so detection works for any locale.

use regex::Regex;

/// A caption split into its numbered prefix and free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionParts {
    /// Label, number and separator (`"Таблица 1 — "`); empty when the text
    /// did not match the caption shape
    pub prefix: String,
    /// Text after the prefix
    pub rest: String,
}

/// Caption patterns compiled for one label and separator.
#[derive(Debug, Clone)]
pub struct CaptionPattern {
    label: String,
    separator: String,
    detect: Regex,
    with_separator: Regex,
    without_separator: Regex,
}

impl CaptionPattern {
    /// Compile patterns for a caption label and separator.
    pub fn new(label: &str, separator: &str) -> Self {
        let label_re = regex::escape(label.trim());

        let mut dashes = vec![r"[—–-]".to_string()];
        let sep = separator.trim();
        if !sep.is_empty() {
            dashes.insert(0, regex::escape(sep));
        }
        let dash = dashes.join("|");

        // ASCII word boundary: a number glued to Cyrillic text still counts.
        let detect = format!(r"(?i)^{label_re}\s+\d+[.\d]*(?-u:\b)");
        let with_separator = format!(r"(?i)^({label_re}\s+\d+(?:\.\d+)*\s*(?:{dash})\s*)(.*)$");
        let without_separator = format!(r"(?i)^({label_re}\s+\d+(?:\.\d+)*\s+)(.*)$");

        Self {
            label: label.trim().to_string(),
            separator: separator.to_string(),
            detect: compile(&detect),
            with_separator: compile(&with_separator),
            without_separator: compile(&without_separator),
        }
    }

    /// Check if a paragraph's flattened text is a caption.
    pub fn is_caption(&self, text: &str) -> bool {
        self.detect.is_match(text.trim())
    }

    /// Default caption for a table without one.
    pub fn default_caption(&self, number: u32) -> String {
        format!("{} {}{}", self.label, number, self.separator)
    }

    /// Split caption text into prefix and remainder.
    ///
    /// Tries the separator form first, then the bare-number form. Text that
    /// matches neither becomes the remainder with an empty prefix.
    pub fn split(&self, text: &str) -> CaptionParts {
        let text = text.trim();
        for re in [&self.with_separator, &self.without_separator] {
            if let Some(caps) = re.captures(text) {
                return CaptionParts {
                    prefix: caps[1].to_string(),
                    rest: caps[2].to_string(),
                };
            }
        }
        CaptionParts {
            prefix: String::new(),
            rest: text.to_string(),
        }
    }
}

fn compile(pattern: &str) -> Regex {
    // Every dynamic part is escaped, so the pattern is always valid.
    Regex::new(pattern).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ru() -> CaptionPattern {
        CaptionPattern::new("Таблица", " — ")
    }

    #[test]
    fn test_detection() {
        let p = ru();
        assert!(p.is_caption("Таблица 1 — Итоги"));
        assert!(p.is_caption("  таблица 2.3 Продажи"));
        assert!(p.is_caption("ТАБЛИЦА 10"));
        assert!(!p.is_caption("Таблица без номера"));
        assert!(!p.is_caption("См. Таблица 1"));
        assert!(p.is_caption("Таблица 1Итоги"));
        assert!(!p.is_caption("Таблица 1x"));
    }

    #[test]
    fn test_split_with_separator() {
        let parts = ru().split("Таблица 1 — Итоги");
        assert_eq!(parts.prefix, "Таблица 1 — ");
        assert_eq!(parts.rest, "Итоги");

        let parts = ru().split("Таблица 1.2 - Hyphenated");
        assert_eq!(parts.prefix, "Таблица 1.2 - ");
        assert_eq!(parts.rest, "Hyphenated");
    }

    #[test]
    fn test_split_without_separator() {
        let parts = ru().split("Таблица 4 Данные");
        assert_eq!(parts.prefix, "Таблица 4 ");
        assert_eq!(parts.rest, "Данные");
    }

    #[test]
    fn test_split_fallback() {
        let parts = ru().split("Свободный текст");
        assert!(parts.prefix.is_empty());
        assert_eq!(parts.rest, "Свободный текст");
    }

    #[test]
    fn test_default_caption_has_empty_remainder() {
        let p = ru();
        let caption = p.default_caption(3);
        assert_eq!(caption, "Таблица 3 — ");
        let parts = p.split(&caption);
        assert_eq!(parts.prefix, "Таблица 3 —");
        assert!(parts.rest.is_empty());
    }

    #[test]
    fn test_label_is_escaped() {
        let p = CaptionPattern::new("Tab.", ": ");
        assert!(p.is_caption("Tab. 5: Results"));
        assert!(!p.is_caption("Tabx 5: Results"));
        let parts = p.split("Tab. 5: Results");
        assert_eq!(parts.prefix, "Tab. 5: ");
        assert_eq!(parts.rest, "Results");
    }
}
