//! Correction engine for mis-encoded commit messages.
//!
//! Text that was written as UTF-8 and later decoded as Latin-1 turns every
//! accented letter into a two-character sequence (`ó` becomes `Ã³`). The
//! engine holds a table of known garbled words and replaces each literal
//! occurrence with the intended spelling.

use std::borrow::Cow;

pub mod error;
pub mod table;

pub use error::TableError;
pub use table::{Correction, CorrectionTable};

/// Built-in substitutions, in declaration order.
pub const CORRECTIONS: &[(&str, &str)] = &[
    ("ActualizaciÃ³n", "Actualización"),
    ("diseÃ±o", "diseño"),
    ("cÃ³digo", "código"),
    ("pÃ¡ginas", "páginas"),
    ("estÃ¡ticos", "estáticos"),
    ("salÃ³n", "salón"),
    ("salÃ³nes", "salones"),
    ("tÃ­tulos", "títulos"),
    ("mÃºltiples", "múltiples"),
    ("ConsolidaciÃ³n", "Consolidación"),
    ("OptimizaciÃ³n", "Optimización"),
    ("EliminaciÃ³n", "Eliminación"),
    ("correcciÃ³n", "corrección"),
    ("cachÃ©", "caché"),
    ("pÃ¡gina", "página"),
    ("reorganizaciÃ³n", "reorganización"),
    ("alineaciÃ³n", "alineación"),
    ("hacÃ­a", "hacía"),
];

/// Fixes a commit message using the built-in table.
///
/// Messages without any known garbled word are returned borrowed.
pub fn fix_commit_message(message: &str) -> Cow<'_, str> {
    CorrectionTable::builtin().apply(message)
}

/// Fixes a message that may be absent.
pub fn fix_optional_message(message: Option<&str>) -> Option<Cow<'_, str>> {
    message.map(fix_commit_message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixes_subject_with_two_words() {
        assert_eq!(
            fix_commit_message("ActualizaciÃ³n del diseÃ±o"),
            "Actualización del diseño"
        );
    }

    #[test]
    fn leaves_clean_message_untouched() {
        let fixed = fix_commit_message("Sin errores aquí");
        assert_eq!(fixed, "Sin errores aquí");
        assert!(matches!(fixed, Cow::Borrowed(_)));
    }

    #[test]
    fn fixes_mixed_words() {
        assert_eq!(fix_commit_message("cachÃ© y pÃ¡gina"), "caché y página");
    }

    #[test]
    fn empty_message() {
        assert_eq!(fix_commit_message(""), "");
    }

    #[test]
    fn absent_message() {
        assert_eq!(fix_optional_message(None), None);
        assert_eq!(
            fix_optional_message(Some("hacÃ­a")).as_deref(),
            Some("hacía")
        );
    }

    #[test]
    fn replaces_every_occurrence() {
        assert_eq!(
            fix_commit_message("pÃ¡gina pÃ¡gina pÃ¡gina"),
            "página página página"
        );
    }

    #[test]
    fn every_builtin_key_maps_to_its_value() {
        for (from, to) in CORRECTIONS {
            assert_eq!(fix_commit_message(from), *to, "correcting {from}");
        }
    }

    #[test]
    fn plural_forms_win_over_their_prefixes() {
        assert_eq!(fix_commit_message("salÃ³nes"), "salones");
        assert_eq!(fix_commit_message("pÃ¡ginas"), "páginas");
        assert_eq!(
            fix_commit_message("un salÃ³n, dos salÃ³nes"),
            "un salón, dos salones"
        );
    }

    #[test]
    fn preserves_body_layout() {
        let message = "EliminaciÃ³n de cÃ³digo\n\n- correcciÃ³n de tÃ­tulos\n";
        assert_eq!(
            fix_commit_message(message),
            "Eliminación de código\n\n- corrección de títulos\n"
        );
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;
        use proptest::prelude::prop;

        fn fragment() -> impl Strategy<Value = String> {
            let mut pieces: Vec<String> = CORRECTIONS
                .iter()
                .flat_map(|(from, to)| [(*from).to_string(), (*to).to_string()])
                .collect();
            pieces.extend(
                ["Ã", "³", "¡", "nes", "s", " ", "\n", "sal", "p", "es"]
                    .iter()
                    .map(|s| (*s).to_string()),
            );
            prop::sample::select(pieces)
        }

        fn garbled_message() -> impl Strategy<Value = String> {
            prop::collection::vec(fragment(), 0..24).prop_map(|parts| parts.concat())
        }

        proptest! {
            #[test]
            fn identity_without_mojibake(s in "[a-zA-Z0-9 áéíóúñÁÉÍÓÚÑ.,:\n-]*") {
                prop_assert_eq!(fix_commit_message(&s), s.as_str());
            }

            #[test]
            fn idempotent(s in garbled_message()) {
                let once = fix_commit_message(&s).into_owned();
                let twice = fix_commit_message(&once).into_owned();
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn no_key_survives(s in garbled_message()) {
                let fixed = fix_commit_message(&s);
                for (from, _) in CORRECTIONS {
                    prop_assert!(!fixed.contains(from), "{} left in {:?}", from, fixed);
                }
            }
        }
    }
}
