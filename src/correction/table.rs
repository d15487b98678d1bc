//! Substitution table and the replace pass.

use std::borrow::Cow;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::TableError;
use super::CORRECTIONS;

/// Single substitution: garbled text and its intended spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    /// Mis-encoded text as it appears in the message.
    pub from: String,
    /// Correct replacement.
    pub to: String,
}

impl Correction {
    /// Creates a new correction.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Validated, immutable set of corrections.
#[derive(Debug, Clone)]
pub struct CorrectionTable {
    entries: Vec<Correction>,
    /// Indices into `entries`, longest search string first so that
    /// `salÃ³nes` is replaced before its prefix `salÃ³n` can split it.
    order: Vec<usize>,
}

impl CorrectionTable {
    /// Builds a table, rejecting empty keys, duplicates, and replacements
    /// that could produce garbled text a second pass would rewrite again.
    pub fn new(entries: Vec<Correction>) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        for (index, entry) in entries.iter().enumerate() {
            if entry.from.is_empty() {
                return Err(TableError::EmptyKey(index));
            }
            if !seen.insert(entry.from.as_str()) {
                return Err(TableError::DuplicateKey(entry.from.clone()));
            }
        }

        for entry in &entries {
            if let Some(key) = entries.iter().find(|other| can_produce(entry, &other.from)) {
                return Err(TableError::NotIdempotent {
                    key: key.from.clone(),
                    value: entry.to.clone(),
                });
            }
        }

        let order = application_order(&entries);
        Ok(Self { entries, order })
    }

    /// Returns the built-in table.
    pub fn builtin() -> &'static Self {
        static BUILTIN: OnceLock<CorrectionTable> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let entries: Vec<Correction> = CORRECTIONS
                .iter()
                .map(|(from, to)| Correction::new(*from, *to))
                .collect();
            let order = application_order(&entries);
            Self { entries, order }
        })
    }

    /// Returns a new table with `extra` added to this one.
    ///
    /// An extra entry whose search string already exists replaces the
    /// existing entry in place.
    pub fn extend(&self, extra: Vec<Correction>) -> Result<Self, TableError> {
        let mut entries = self.entries.clone();
        for correction in extra {
            match entries.iter_mut().find(|e| e.from == correction.from) {
                Some(existing) => {
                    debug!(from = %correction.from, "Overriding built-in correction");
                    existing.to = correction.to;
                }
                None => entries.push(correction),
            }
        }
        Self::new(entries)
    }

    /// Corrections in declaration order.
    pub fn entries(&self) -> &[Correction] {
        &self.entries
    }

    /// Number of corrections.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no corrections.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replaces every occurrence of every garbled string in `message`.
    pub fn apply<'a>(&self, message: &'a str) -> Cow<'a, str> {
        if message.is_empty() {
            return Cow::Borrowed(message);
        }

        let mut fixed = Cow::Borrowed(message);
        for &index in &self.order {
            let entry = &self.entries[index];
            if fixed.contains(entry.from.as_str()) {
                fixed = Cow::Owned(fixed.replace(entry.from.as_str(), &entry.to));
            }
        }
        fixed
    }
}

/// Whether writing `entry.to` in place of `entry.from` can leave `key` in the text.
///
/// Besides `key` appearing inside the replacement, `key` may straddle a
/// boundary of it: an end of the replacement joined with surrounding text.
/// A straddling overlap is harmless when the same characters end (or start)
/// the search string too, since `key` was then already in the input.
fn can_produce(entry: &Correction, key: &str) -> bool {
    let (from, to) = (entry.from.as_str(), entry.to.as_str());
    if to.contains(key) {
        return true;
    }

    let runs_past_end = (0..to.len())
        .filter(|&i| to.is_char_boundary(i))
        .map(|i| &to[i..])
        .any(|tail| tail.len() < key.len() && key.starts_with(tail) && !from.ends_with(tail));
    let starts_before = (1..=to.len())
        .filter(|&i| to.is_char_boundary(i))
        .map(|i| &to[..i])
        .any(|head| head.len() < key.len() && key.ends_with(head) && !from.starts_with(head));
    let wraps = key.len() > to.len()
        && key
            .match_indices(to)
            .any(|(i, _)| i > 0 && i + to.len() < key.len());

    runs_past_end || starts_before || wraps
}

/// Longest search string first; ties keep declaration order.
fn application_order(entries: &[Correction]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..entries.len()).collect();
    order.sort_by_key(|&index| Reverse(entries[index].from.len()));
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_keeps_declaration_order() {
        let table = CorrectionTable::builtin();
        assert_eq!(table.len(), CORRECTIONS.len());
        assert_eq!(table.entries()[0].from, "ActualizaciÃ³n");
        assert_eq!(table.entries()[17].to, "hacía");
    }

    #[test]
    fn builtin_passes_validation() {
        let entries = CorrectionTable::builtin().entries().to_vec();
        assert!(CorrectionTable::new(entries).is_ok());
    }

    #[test]
    fn rejects_empty_key() {
        let err = CorrectionTable::new(vec![
            Correction::new("diseÃ±o", "diseño"),
            Correction::new("", "x"),
        ])
        .unwrap_err();
        assert_eq!(err, TableError::EmptyKey(1));
    }

    #[test]
    fn rejects_duplicate_key() {
        let err = CorrectionTable::new(vec![
            Correction::new("diseÃ±o", "diseño"),
            Correction::new("diseÃ±o", "diseno"),
        ])
        .unwrap_err();
        assert_eq!(err, TableError::DuplicateKey("diseÃ±o".to_string()));
    }

    #[test]
    fn rejects_value_containing_a_key() {
        let err = CorrectionTable::new(vec![
            Correction::new("Ã³", "ó"),
            Correction::new("versiÃ", "versiÃ³n"),
        ])
        .unwrap_err();
        assert!(matches!(err, TableError::NotIdempotent { .. }));
    }

    #[test]
    fn rejects_replacement_completing_a_key_with_following_text() {
        // "abb" becomes "ab" on the first pass and "a" on the second.
        let err = CorrectionTable::new(vec![Correction::new("ab", "a")]).unwrap_err();
        assert_eq!(
            err,
            TableError::NotIdempotent {
                key: "ab".to_string(),
                value: "a".to_string(),
            }
        );

        let extended = CorrectionTable::builtin().extend(vec![Correction::new("ab", "a")]);
        assert!(matches!(extended, Err(TableError::NotIdempotent { .. })));
    }

    #[test]
    fn rejects_replacement_completing_a_key_with_preceding_text() {
        let result = CorrectionTable::new(vec![
            Correction::new("xy", "Z"),
            Correction::new("qy", "y"),
        ]);
        // "xqy" becomes "xy" on the first pass and "Z" on the second.
        assert!(matches!(result, Err(TableError::NotIdempotent { .. })));
    }

    #[test]
    fn rejects_replacement_inside_a_longer_key() {
        let result = CorrectionTable::new(vec![
            Correction::new("abc", "Z"),
            Correction::new("x", "b"),
        ]);
        assert!(matches!(result, Err(TableError::NotIdempotent { .. })));
    }

    #[test]
    fn rejects_deletion_joining_a_key() {
        let result = CorrectionTable::new(vec![
            Correction::new("ab", "Z"),
            Correction::new("x", ""),
        ]);
        assert!(matches!(result, Err(TableError::NotIdempotent { .. })));
    }

    #[test]
    fn accepts_overlap_already_present_in_the_search_string() {
        // "pÃ¡ginas" ends with the "s" that starts "salÃ³n".
        let table = CorrectionTable::new(vec![
            Correction::new("pÃ¡ginas", "páginas"),
            Correction::new("salÃ³n", "salón"),
        ])
        .unwrap();

        let once = table.apply("pÃ¡ginasalÃ³n");
        assert_eq!(once, "páginasalón");
        assert_eq!(table.apply(&once), once);
    }

    #[test]
    fn extend_adds_and_overrides() {
        let table = CorrectionTable::builtin()
            .extend(vec![
                Correction::new("VersiÃ³n", "Versión"),
                Correction::new("hacÃ­a", "hacia"),
            ])
            .unwrap();

        assert_eq!(table.len(), CORRECTIONS.len() + 1);
        assert_eq!(table.apply("VersiÃ³n nueva"), "Versión nueva");
        assert_eq!(table.apply("hacÃ­a"), "hacia");
    }

    #[test]
    fn extend_rejects_conflicting_entry() {
        let result = CorrectionTable::builtin().extend(vec![Correction::new("xx", "cachÃ©")]);
        assert!(result.is_err());
    }

    #[test]
    fn empty_table_is_identity() {
        let table = CorrectionTable::new(Vec::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.apply("diseÃ±o"), "diseÃ±o");
    }

    #[test]
    fn longer_keys_apply_first_regardless_of_declaration() {
        let table = CorrectionTable::new(vec![
            Correction::new("ab", "X"),
            Correction::new("abc", "Y"),
        ])
        .unwrap();
        assert_eq!(table.apply("abc ab"), "Y X");
    }
}
