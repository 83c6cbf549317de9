//! Environment variable validation with helpful warnings
//!
//! Invalid values fall back to a default and log a warning with a
//! Levenshtein-based typo suggestion.

/// Validator for environment variable values
pub struct EnvVarValidator<'a> {
    var_name: &'a str,
    valid_values: &'a [&'a str],
}

impl<'a> EnvVarValidator<'a> {
    pub fn new(var_name: &'a str, valid_values: &'a [&'a str]) -> Self {
        Self {
            var_name,
            valid_values,
        }
    }

    /// Parse a value, returning `default` if invalid (with warning)
    pub fn parse<T, F>(&self, value: &str, parser: F, default: T) -> T
    where
        F: Fn(&str) -> Option<T>,
    {
        match parser(value) {
            Some(parsed) => parsed,
            None => {
                tracing::warn!("{}", self.warning(value));
                default
            }
        }
    }

    /// Warning text for an invalid value
    pub fn warning(&self, value: &str) -> String {
        format!(
            "Invalid {} value '{}'{}. Valid values: {}",
            self.var_name,
            value,
            self.suggest(value),
            self.valid_values.join(", ")
        )
    }

    fn suggest(&self, value: &str) -> String {
        let input = value.to_lowercase();
        let mut best: Option<(&str, usize)> = None;

        for &valid in self.valid_values {
            let dist = levenshtein(&input, valid);
            match best {
                None => best = Some((valid, dist)),
                Some((_, best_dist)) if dist < best_dist => best = Some((valid, dist)),
                _ => {}
            }
        }

        // Only suggest if distance is reasonable (≤ 2 edits)
        match best {
            Some((suggested, dist)) if dist <= 2 && dist > 0 => {
                format!(" (did you mean '{}'?)", suggested)
            }
            _ => String::new(),
        }
    }
}

/// Simple Levenshtein distance for typo detection
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let a_len = a_bytes.len();
    let b_len = b_bytes.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row: Vec<usize> = vec![0; b_len + 1];

    for (i, a_char) in a_bytes.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, b_char) in b_bytes.iter().enumerate() {
            let cost = if a_char == b_char { 0 } else { 1 };
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_one_char_diff() {
        assert_eq!(levenshtein("test", "tast"), 1);
        assert_eq!(levenshtein("test", "tests"), 1);
        assert_eq!(levenshtein("tests", "test"), 1);
        assert_eq!(levenshtein("", "json"), 4);
    }

    #[test]
    fn test_levenshtein_typos() {
        assert_eq!(levenshtein("regoin", "region"), 2);
        assert_eq!(levenshtein("jsno", "json"), 2);
    }

    #[test]
    fn test_invalid_value_returns_default() {
        let validator = EnvVarValidator::new("STACKGATE_OUTPUT", &["text", "json"]);
        let result = validator.parse("yaml", |s| (s == "json").then_some(1), 0);
        assert_eq!(result, 0);
    }

    #[test]
    fn test_warning_suggests_close_value() {
        let validator = EnvVarValidator::new("STACKGATE_OUTPUT", &["text", "json"]);
        assert_eq!(
            validator.warning("jsn"),
            "Invalid STACKGATE_OUTPUT value 'jsn' (did you mean 'json'?). Valid values: text, json"
        );
    }

    #[test]
    fn test_no_suggestion_for_distant_value() {
        let validator = EnvVarValidator::new("STACKGATE_OUTPUT", &["text", "json"]);
        assert!(!validator
            .warning("something_completely_different")
            .contains("did you mean"));
    }
}
