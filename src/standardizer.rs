//! Street address standardization.
//!
//! Rewrites street-type and directional abbreviations, along with their
//! common misspellings, into full canonical words. Matching is literal,
//! case-insensitive and restricted to whole words.

use crate::error::{ProcessorError, Result};
use regex::{Regex, RegexBuilder};
use std::cmp::Reverse;
use std::fmt::Display;
use tracing::debug;

/// Abbreviation and typo tokens with their canonical expansion, in declared order
pub const ABBREVIATIONS: &[(&str, &str)] = &[
    // Street types
    ("St", "Street"),
    ("Str", "Street"),
    ("Streeet", "Street"),
    ("Sreet", "Street"),
    ("St.", "Street"),
    ("Ave", "Avenue"),
    ("Aven", "Avenue"),
    ("Avenu", "Avenue"),
    ("Avnue", "Avenue"),
    ("Avenuee", "Avenue"),
    ("Av", "Avenue"),
    ("Blvd", "Boulevard"),
    ("Bld", "Boulevard"),
    ("Bulevard", "Boulevard"),
    ("Blv", "Boulevard"),
    ("Blvd.", "Boulevard"),
    ("Rd", "Road"),
    ("Roa", "Road"),
    ("Rode", "Road"),
    ("Rd.", "Road"),
    ("Dr", "Drive"),
    ("Drv", "Drive"),
    ("Dri", "Drive"),
    ("Drve", "Drive"),
    ("Dr.", "Drive"),
    ("Ln", "Lane"),
    ("La", "Lane"),
    ("Lne", "Lane"),
    ("Ln.", "Lane"),
    ("Pl", "Place"),
    ("Plc", "Place"),
    ("Pla", "Place"),
    ("Pl.", "Place"),
    ("Ct", "Court"),
    ("Crt", "Court"),
    ("Cr", "Court"),
    ("Court", "Court"),
    ("Sq", "Square"),
    ("Sqre", "Square"),
    ("Squr", "Square"),
    ("Sqr", "Square"),
    ("Square", "Square"),
    ("Pkwy", "Parkway"),
    ("Pkway", "Parkway"),
    ("Pky", "Parkway"),
    ("Pkw", "Parkway"),
    ("Cir", "Circle"),
    ("Crcle", "Circle"),
    ("Circ", "Circle"),
    ("Cir.", "Circle"),
    ("Terr", "Terrace"),
    ("Ter", "Terrace"),
    ("Tr", "Terrace"),
    ("Hwy", "Highway"),
    ("Hiway", "Highway"),
    ("Hyw", "Highway"),
    ("Hway", "Highway"),
    ("Expr", "Expressway"),
    ("Expw", "Expressway"),
    ("Exp", "Expressway"),
    ("Ctr", "Center"),
    ("Cntr", "Center"),
    ("Ctr.", "Center"),
    ("Mt", "Mountain"),
    ("Mtn", "Mountain"),
    ("Mntn", "Mountain"),
    // Directionals
    ("N", "North"),
    ("N.", "North"),
    ("No", "North"),
    ("No.", "North"),
    ("S", "South"),
    ("S.", "South"),
    ("So", "South"),
    ("So.", "South"),
    ("E", "East"),
    ("E.", "East"),
    ("W", "West"),
    ("W.", "West"),
    ("NE", "Northeast"),
    ("N.E.", "Northeast"),
    ("N.E", "Northeast"),
    ("NE.", "Northeast"),
    ("NW", "Northwest"),
    ("N.W.", "Northwest"),
    ("N.W", "Northwest"),
    ("NW.", "Northwest"),
    ("SE", "Southeast"),
    ("S.E.", "Southeast"),
    ("S.E", "Southeast"),
    ("SE.", "Southeast"),
    ("SW", "Southwest"),
    ("S.W.", "Southwest"),
    ("S.W", "Southwest"),
    ("SW.", "Southwest"),
];

/// A single compiled token rule
#[derive(Debug, Clone)]
struct Rule {
    token: &'static str,
    expansion: &'static str,
    pattern: Regex,
}

impl Rule {
    /// Replace every whole-word occurrence of the token
    fn apply(&self, text: &str) -> String {
        let mut output = String::with_capacity(text.len());
        let mut last = 0;

        for found in self.pattern.find_iter(text) {
            if !is_whole_word(text, found.start(), found.end()) {
                continue;
            }
            output.push_str(&text[last..found.start()]);
            output.push_str(self.expansion);
            last = found.end();
        }

        output.push_str(&text[last..]);
        output
    }
}

/// Deterministic normalizer for single street-address strings
#[derive(Debug, Clone)]
pub struct AddressStandardizer {
    rules: Vec<Rule>,
    whitespace: Regex,
}

impl AddressStandardizer {
    /// Build a standardizer over the built-in abbreviation table
    pub fn new() -> Result<Self> {
        Self::with_table(ABBREVIATIONS)
    }

    /// Build a standardizer over a custom table.
    ///
    /// Rules apply longest token first; tokens of equal length keep their
    /// declared order. This lets "N.E." win over "N." and "N", and "St."
    /// win over "St".
    pub fn with_table(table: &[(&'static str, &'static str)]) -> Result<Self> {
        let mut entries = table.to_vec();
        entries.sort_by_key(|(token, _)| Reverse(token.chars().count()));

        let rules = entries
            .into_iter()
            .map(|(token, expansion)| {
                let pattern = RegexBuilder::new(&regex::escape(token))
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        ProcessorError::configuration(format!(
                            "Invalid abbreviation token '{}': {}",
                            token, e
                        ))
                    })?;
                Ok(Rule {
                    token,
                    expansion,
                    pattern,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let whitespace = Regex::new(r"\s+").map_err(|e| {
            ProcessorError::configuration(format!("Invalid whitespace pattern: {}", e))
        })?;

        debug!("Address standardizer ready with {} rules", rules.len());

        Ok(Self { rules, whitespace })
    }

    /// Standardize one address string. Empty input is returned unchanged.
    pub fn standardize(&self, address: &str) -> String {
        if address.is_empty() {
            return String::new();
        }

        let expanded = self
            .rules
            .iter()
            .fold(address.to_string(), |text, rule| rule.apply(&text));

        self.whitespace
            .replace_all(&expanded, " ")
            .trim()
            .to_string()
    }

    /// Standardize an optional cell; absent values stay absent
    pub fn standardize_opt(&self, address: Option<&str>) -> Option<String> {
        address.map(|value| self.standardize(value))
    }

    /// Standardize any scalar by its string rendering
    pub fn standardize_scalar(&self, value: impl Display) -> String {
        self.standardize(&value.to_string())
    }

    /// Tokens in the order they are applied
    pub fn tokens(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.token)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A match is a whole word when neither neighbour is a word character
fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standardizer() -> AddressStandardizer {
        AddressStandardizer::new().unwrap()
    }

    #[test]
    fn test_expands_street_types() {
        let s = standardizer();
        assert_eq!(s.standardize("123 Main St"), "123 Main Street");
        assert_eq!(s.standardize("45 Park Ave"), "45 Park Avenue");
        assert_eq!(s.standardize("9 Sunset Blvd"), "9 Sunset Boulevard");
        assert_eq!(s.standardize("1 Ocean Pkwy"), "1 Ocean Parkway");
        assert_eq!(s.standardize("77 Mill Rd"), "77 Mill Road");
    }

    #[test]
    fn test_expands_typos() {
        let s = standardizer();
        assert_eq!(s.standardize("10 Elm Streeet"), "10 Elm Street");
        assert_eq!(s.standardize("10 Elm Avnue"), "10 Elm Avenue");
        assert_eq!(s.standardize("3 Lake Bulevard"), "3 Lake Boulevard");
    }

    #[test]
    fn test_case_insensitive() {
        let s = standardizer();
        assert_eq!(s.standardize("123 MAIN ST"), "123 MAIN Street");
        assert_eq!(s.standardize("123 main st"), "123 main Street");
    }

    #[test]
    fn test_does_not_match_inside_words() {
        let s = standardizer();
        assert_eq!(s.standardize("12 Stone Lane"), "12 Stone Lane");
        assert_eq!(s.standardize("8 Newton Place"), "8 Newton Place");
        assert_eq!(s.standardize("4 Avenue Stanton"), "4 Avenue Stanton");
    }

    #[test]
    fn test_dotted_tokens_consume_punctuation() {
        let s = standardizer();
        assert_eq!(s.standardize("123 Main St."), "123 Main Street");
        assert_eq!(s.standardize("5 Oak Dr. Apt 2"), "5 Oak Drive Apt 2");
    }

    #[test]
    fn test_compound_directionals_take_precedence() {
        let s = standardizer();
        assert_eq!(s.standardize("100 NE 5th Ave"), "100 Northeast 5th Avenue");
        assert_eq!(s.standardize("100 N.E. 5th Ave"), "100 Northeast 5th Avenue");
        assert_eq!(s.standardize("100 S.W 5th Ave"), "100 Southwest 5th Avenue");
        assert_eq!(s.standardize("100 N 5th Ave"), "100 North 5th Avenue");
        assert_eq!(s.standardize("100 W. 5th St"), "100 West 5th Street");
    }

    #[test]
    fn test_collapses_whitespace() {
        let s = standardizer();
        assert_eq!(s.standardize("  123   Main \t St  "), "123 Main Street");
    }

    #[test]
    fn test_empty_and_absent_values_unchanged() {
        let s = standardizer();
        assert_eq!(s.standardize(""), "");
        assert_eq!(s.standardize_opt(None), None);
        assert_eq!(s.standardize_opt(Some("")), Some(String::new()));
    }

    #[test]
    fn test_scalar_input() {
        let s = standardizer();
        assert_eq!(s.standardize_scalar(12345), "12345");
    }

    #[test]
    fn test_idempotent() {
        let s = standardizer();
        let samples = [
            "123 Main St",
            "100 N.E. 5th Ave",
            "7 st.louis ct",
            "  22  W   Hwy 9 ",
            "N.E.E",
            "1 Mtn View Terr Apt 3",
        ];
        for sample in samples {
            let once = s.standardize(sample);
            assert_eq!(s.standardize(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_rules_ordered_longest_first() {
        let s = standardizer();
        let tokens: Vec<_> = s.tokens().collect();
        let lengths: Vec<_> = tokens.iter().map(|t| t.chars().count()).collect();
        assert!(lengths.windows(2).all(|w| w[0] >= w[1]));
        // Equal lengths keep declared order
        let st = tokens.iter().position(|t| *t == "St").unwrap();
        let av = tokens.iter().position(|t| *t == "Av").unwrap();
        assert!(st < av);
    }

    #[test]
    fn test_custom_table() {
        let s = AddressStandardizer::with_table(&[("Apt", "Apartment")]).unwrap();
        assert_eq!(s.standardize("5 Main St Apt 2"), "5 Main St Apartment 2");
    }
}
