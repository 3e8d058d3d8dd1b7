//! Deterministic login handles built from a person's names.
//!
//! Candidates are offered shortest first and the first one the host does not
//! know yet wins:
//!
//! 1. `first[0]_last[0]`
//! 2. the base extended with the following last names, one letter at a time
//!    (`aa_cc_d`, `aa_cc_dd`)
//! 3. the first name extended with the following first names, one letter at
//!    a time, in front of `last[0]` (`aa_b_cc`, `aa_bb_cc`)
//! 4. every state of step 3 extended as in step 2 (`aa_b_cc_d`, ...)
//! 5. the base truncated to leave room for a number, then `1`, `2`, ...
//!
//! A full name made of a single token skips the steps above: the token itself
//! is offered, then the token followed by `1`, `2`, ...
//!
//! Candidates longer than the maximum length are never offered.

use std::vec;

use deunicode::deunicode;
use log::{debug, error};

use crate::{
    BatchError,
    config::{USERNAME_MAX_LENGTH, USERNAME_MAX_SUFFIX, USERNAME_SUFFIX_HEADROOM},
};

/// Tokenized first names and last names of a person.
///
/// Tokens are transliterated to ASCII, lower-cased and stripped of anything
/// but letters, digits and `_`. Both lists hold at least one token, possibly
/// the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParts {
    first_names: Vec<String>,
    last_names: Vec<String>,
    /// Built from a full name holding a single token
    lone_token: bool,
}

fn tokenize(raw: &str) -> Vec<String> {
    let ascii = deunicode(&raw.to_lowercase()).to_lowercase();
    let cleaned: String = ascii
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                ' '
            }
        })
        .collect();

    let tokens: Vec<String> = cleaned.split_whitespace().map(str::to_string).collect();
    if tokens.is_empty() {
        vec![String::new()]
    } else {
        tokens
    }
}

impl NameParts {
    /// Names entered in separate fields.
    ///
    /// ```
    /// use bulk_enroll_rs::username::NameParts;
    ///
    /// let parts = NameParts::new("José  Ignacio", "Muñoz O'Higgins");
    /// assert_eq!(parts.first_names(), ["jose", "ignacio"]);
    /// assert_eq!(parts.last_names(), ["munoz", "o", "higgins"]);
    /// ```
    pub fn new(first_names: &str, last_names: &str) -> Self {
        Self {
            first_names: tokenize(first_names),
            last_names: tokenize(last_names),
            lone_token: false,
        }
    }

    /// A full name in a single field: the first half of the tokens are first
    /// names, the rest last names. A lone token is a first name and is used
    /// as the username on its own.
    ///
    /// ```
    /// use bulk_enroll_rs::username::{NameParts, UsernameGenerator};
    ///
    /// let parts = NameParts::from_full_name("Madonna");
    /// let username = UsernameGenerator::default().generate(&parts, |_| false).unwrap();
    /// assert_eq!(username, "madonna");
    /// ```
    pub fn from_full_name(full_name: &str) -> Self {
        let mut tokens = tokenize(full_name);
        if tokens.len() < 2 {
            let lone_token = tokens.iter().any(|token| !token.is_empty());
            return Self {
                first_names: tokens,
                last_names: vec![String::new()],
                lone_token,
            };
        }

        let last_names = tokens.split_off(tokens.len() / 2);
        Self {
            first_names: tokens,
            last_names,
            lone_token: false,
        }
    }

    pub fn first_names(&self) -> &[String] {
        &self.first_names
    }

    pub fn last_names(&self) -> &[String] {
        &self.last_names
    }

    fn base(&self) -> String {
        format!("{}_{}", self.first_names[0], self.last_names[0])
    }
}

/// Ordered candidates of one search: the name expansions, then the numbered stem.
pub struct Candidates {
    expanded: vec::IntoIter<String>,
    stem: String,
    next_suffix: u32,
    max_suffix: u32,
}

impl Iterator for Candidates {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if let Some(candidate) = self.expanded.next() {
            return Some(candidate);
        }
        if self.next_suffix > self.max_suffix {
            return None;
        }
        let candidate = format!("{}{}", self.stem, self.next_suffix);
        self.next_suffix += 1;
        Some(candidate)
    }
}

/// Produces the candidates of one username search.
pub struct UsernameGenerator {
    max_length: usize,
    suffix_headroom: usize,
    max_suffix: u32,
}

impl Default for UsernameGenerator {
    fn default() -> Self {
        Self::new(USERNAME_MAX_LENGTH, USERNAME_SUFFIX_HEADROOM, USERNAME_MAX_SUFFIX)
    }
}

impl UsernameGenerator {
    pub fn new(max_length: usize, suffix_headroom: usize, max_suffix: u32) -> Self {
        Self {
            max_length,
            suffix_headroom,
            max_suffix,
        }
    }

    /// Returns the first candidate `exists` reports as free.
    ///
    /// ```
    /// use std::collections::HashSet;
    /// use bulk_enroll_rs::username::{NameParts, UsernameGenerator};
    ///
    /// let taken: HashSet<&str> = ["aa_cc", "aa_cc_d"].into();
    /// let parts = NameParts::new("aa bb", "cc dd");
    ///
    /// let username = UsernameGenerator::default()
    ///     .generate(&parts, |candidate| taken.contains(candidate))
    ///     .unwrap();
    /// assert_eq!(username, "aa_cc_dd");
    /// ```
    ///
    /// # Errors
    /// `BatchError::UsernameExhausted` once every numbered candidate is taken.
    pub fn generate<F>(&self, parts: &NameParts, exists: F) -> Result<String, BatchError>
    where
        F: Fn(&str) -> bool,
    {
        match self.candidates(parts).find(|candidate| !exists(candidate.as_str())) {
            Some(username) => {
                debug!("Generated username {}", username);
                Ok(username)
            }
            None => {
                let names = format!(
                    "{} {}",
                    parts.first_names.join(" "),
                    parts.last_names.join(" ")
                );
                error!("Username space exhausted for {}", names);
                Err(BatchError::UsernameExhausted(names))
            }
        }
    }

    /// Every candidate in the order they are tried, each within the length limit.
    pub fn candidates(&self, parts: &NameParts) -> Candidates {
        let mut expanded = Vec::new();
        if parts.lone_token {
            let token = &parts.first_names[0];
            self.offer(&mut expanded, token.clone());
            return self.numbered(expanded, token);
        }

        let base = parts.base();
        let last_tail = &parts.last_names[1..];

        self.offer(&mut expanded, base.clone());
        self.extend_last_names(&mut expanded, &base, last_tail);

        let first_states = self.first_name_states(parts);
        for first in &first_states {
            self.offer(&mut expanded, format!("{}_{}", first, parts.last_names[0]));
        }
        for first in &first_states {
            let with_last = format!("{}_{}", first, parts.last_names[0]);
            if with_last.len() > self.max_length {
                break;
            }
            self.extend_last_names(&mut expanded, &with_last, last_tail);
        }

        self.numbered(expanded, &base)
    }

    /// Appends the numbered candidates, built on `base` truncated to leave
    /// room for the number.
    fn numbered(&self, expanded: Vec<String>, base: &str) -> Candidates {
        let mut stem: String = base
            .chars()
            .take(self.max_length.saturating_sub(self.suffix_headroom))
            .collect();
        if stem.ends_with('_') {
            stem.pop();
        }

        Candidates {
            expanded: expanded.into_iter(),
            stem,
            next_suffix: 1,
            max_suffix: self.max_suffix,
        }
    }

    fn offer(&self, candidates: &mut Vec<String>, candidate: String) {
        if candidate.len() <= self.max_length {
            candidates.push(candidate);
        }
    }

    /// Grows `prefix` with `_` and the letters of each following last name.
    fn extend_last_names(&self, candidates: &mut Vec<String>, prefix: &str, tail: &[String]) {
        let mut grown = prefix.to_string();
        for token in tail {
            grown.push('_');
            for letter in token.chars() {
                grown.push(letter);
                if grown.len() > self.max_length {
                    return;
                }
                candidates.push(grown.clone());
            }
        }
    }

    /// `first[0]` grown with `_` and the letters of each following first name,
    /// one state per appended letter.
    fn first_name_states(&self, parts: &NameParts) -> Vec<String> {
        let mut states = Vec::new();
        let mut grown = parts.first_names[0].clone();
        for token in &parts.first_names[1..] {
            grown.push('_');
            for letter in token.chars() {
                grown.push(letter);
                if grown.len() > self.max_length {
                    return states;
                }
                states.push(grown.clone());
            }
        }
        states
    }
}
