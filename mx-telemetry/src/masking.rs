//! Sensitive data masking for logs.
//!
//! API keys, secrets and request signatures must never reach log output.
//! Callers mask known values with [`SensitiveDataMasker::mask_value`],
//! request headers with [`SensitiveDataMasker::mask_headers`], and free text
//! with [`SensitiveDataMasker::mask_string`].

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

/// Header names whose values are always masked (compared case-insensitively).
pub const SENSITIVE_HEADERS: [&str; 4] = [
    "mx-api-key",
    "mx-signature",
    "authorization",
    "x-api-key",
];

/// Patterns for detecting sensitive data in free text.
static PATTERNS: LazyLock<Vec<SensitivePattern>> = LazyLock::new(|| {
    [
        // api_key=..., "apiKey": "...", MX-API-KEY: ...
        r#"(?i)((?:mx[_-])?api[_-]?key["']?\s*[:=]\s*["']?)([A-Za-z0-9_\-]{8,128})"#,
        // api_secret=..., secret: ...
        r#"(?i)((?:api[_-]?)?secret["']?\s*[:=]\s*["']?)([^\s"',}]{4,})"#,
        // MX-SIGNATURE: <hex>, signature=<hex>
        r#"(?i)((?:mx[_-])?signature["']?\s*[:=]\s*["']?)([a-fA-F0-9]{16,})"#,
        // Bearer tokens
        r"(?i)(bearer\s+)([A-Za-z0-9._\-]{20,})",
    ]
    .into_iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .map(|regex| SensitivePattern { regex })
    .collect()
});

struct SensitivePattern {
    /// Group 1 is the kept prefix, group 2 the value to mask.
    regex: Regex,
}

/// Masks sensitive data in strings.
#[derive(Debug, Clone)]
pub struct SensitiveDataMasker {
    /// Minimum length of value that keeps its first and last characters
    min_length: usize,
    /// Characters to show at start of masked value
    show_start: usize,
    /// Characters to show at end of masked value
    show_end: usize,
    /// Mask character
    mask_char: char,
}

impl Default for SensitiveDataMasker {
    fn default() -> Self {
        Self::new()
    }
}

impl SensitiveDataMasker {
    /// Create a new masker with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_length: 8,
            show_start: 3,
            show_end: 3,
            mask_char: '*',
        }
    }

    /// Create a masker with custom settings.
    #[must_use]
    pub fn with_settings(min_length: usize, show_start: usize, show_end: usize) -> Self {
        Self {
            min_length: min_length.max(show_start + show_end + 1),
            show_start,
            show_end,
            mask_char: '*',
        }
    }

    /// Mask a known sensitive value.
    ///
    /// # Example
    ///
    /// ```
    /// use mx_telemetry::masking::SensitiveDataMasker;
    ///
    /// let masker = SensitiveDataMasker::new();
    /// assert_eq!(masker.mask_value("my_secret_api_key_12345"), "my_***345");
    /// assert_eq!(masker.mask_value("short"), "*****");
    /// ```
    #[must_use]
    pub fn mask_value(&self, value: &str) -> String {
        let chars: Vec<char> = value.chars().collect();
        if chars.len() < self.min_length {
            return self.mask_char.to_string().repeat(chars.len().max(3));
        }

        let start: String = chars[..self.show_start].iter().collect();
        let end: String = chars[chars.len() - self.show_end..].iter().collect();
        format!("{start}{}{end}", self.mask_char.to_string().repeat(3))
    }

    /// Mask sensitive data in a string using pattern detection.
    ///
    /// # Example
    ///
    /// ```
    /// use mx_telemetry::masking::SensitiveDataMasker;
    ///
    /// let masker = SensitiveDataMasker::new();
    /// let input = r#"{"api_key": "abcdefghijklmnop1234567890"}"#;
    /// let masked = masker.mask_string(input);
    /// assert!(masked.contains("***"));
    /// assert!(!masked.contains("abcdefghijklmnop1234567890"));
    /// ```
    #[must_use]
    pub fn mask_string<'a>(&self, input: &'a str) -> Cow<'a, str> {
        let mut result = Cow::Borrowed(input);

        for pattern in PATTERNS.iter() {
            if pattern.regex.is_match(&result) {
                let replaced = pattern
                    .regex
                    .replace_all(&result, |caps: &Captures<'_>| {
                        format!("{}{}", &caps[1], self.mask_value(&caps[2]))
                    })
                    .into_owned();
                result = Cow::Owned(replaced);
            }
        }

        result
    }

    /// Returns a copy of `headers` with sensitive header values masked.
    ///
    /// # Example
    ///
    /// ```
    /// use mx_telemetry::masking::SensitiveDataMasker;
    ///
    /// let headers = vec![
    ///     ("MX-API-KEY".to_string(), "key-0123456789".to_string()),
    ///     ("MX-NONCE".to_string(), "1700000000000".to_string()),
    /// ];
    /// let masked = SensitiveDataMasker::new().mask_headers(&headers);
    /// assert_eq!(masked[0].1, "key***789");
    /// assert_eq!(masked[1].1, "1700000000000");
    /// ```
    #[must_use]
    pub fn mask_headers(&self, headers: &[(String, String)]) -> Vec<(String, String)> {
        headers
            .iter()
            .map(|(name, value)| {
                let value = if is_sensitive_header(name) {
                    self.mask_value(value)
                } else {
                    value.clone()
                };
                (name.clone(), value)
            })
            .collect()
    }
}

/// Returns true if values of header `name` must be masked.
#[must_use]
pub fn is_sensitive_header(name: &str) -> bool {
    SENSITIVE_HEADERS
        .iter()
        .any(|sensitive| sensitive.eq_ignore_ascii_case(name))
}

/// A wrapper type for sensitive values that masks them in Display/Debug.
///
/// Deserializes transparently from the inner value; serializes as
/// `"[REDACTED]"`.
#[derive(Clone, PartialEq, Eq)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    /// Wrap a value as sensitive.
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Get the inner value (use with caution).
    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl<T> std::fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl<T> std::fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl<T> serde::Serialize for Sensitive<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str("[REDACTED]")
    }
}

impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for Sensitive<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Self)
    }
}
