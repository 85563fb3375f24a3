//=========================================================================
// Key-Code Translator
//
// Bidirectional lookup between engine `Key`s and one backend's native
// key codes, built from a single mapping table.
//
// Each backend declares one `&[(Key, Native)]` table. The forward map is
// built from it and the reverse map is generated from the same rows, so
// the two directions cannot disagree:
//
// ```text
//   to_native(k) == n   <=>   to_engine(n) == k     for every row (k, n)
// ```
//
// Anything not in the table maps to the respective "unknown" sentinel.
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::collections::HashMap;
use std::hash::Hash;

//=== External Crates =====================================================
use log::warn;

//=== Internal Modules ====================================================
use super::key::Key;

//=== KeyTranslator =======================================================

pub struct KeyTranslator<N> {
    to_native: HashMap<Key, N>,
    to_engine: HashMap<N, Key>,
    unknown: N,
}

impl<N: Copy + Eq + Hash + std::fmt::Debug> KeyTranslator<N> {
    //--- Construction -----------------------------------------------------
    //
    // Rows naming `Key::Unknown` or the native sentinel are skipped. If a
    // key or a native code appears twice, the first row wins and the
    // duplicate is logged; the table stays one-to-one either way.
    //
    pub fn new(table: &[(Key, N)], unknown: N) -> Self {
        let mut to_native = HashMap::with_capacity(table.len());
        let mut to_engine = HashMap::with_capacity(table.len());

        for &(key, native) in table {
            if key == Key::Unknown || native == unknown {
                continue;
            }
            if to_native.contains_key(&key) || to_engine.contains_key(&native) {
                warn!(
                    target: "platform::input",
                    "Duplicate key table row ignored: {:?} <-> {:?}",
                    key,
                    native
                );
                continue;
            }
            to_native.insert(key, native);
            to_engine.insert(native, key);
        }

        Self {
            to_native,
            to_engine,
            unknown,
        }
    }

    //--- Lookups ----------------------------------------------------------

    pub fn to_engine(&self, native: N) -> Key {
        self.to_engine.get(&native).copied().unwrap_or(Key::Unknown)
    }

    pub fn to_native(&self, key: Key) -> N {
        self.to_native.get(&key).copied().unwrap_or(self.unknown)
    }

    pub fn unknown(&self) -> N {
        self.unknown
    }

    /// Number of keys mapped in both directions.
    pub fn len(&self) -> usize {
        self.to_native.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_native.is_empty()
    }

    pub fn mapped_keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.to_native.keys().copied()
    }

    pub fn mapped_natives(&self) -> impl Iterator<Item = N> + '_ {
        self.to_engine.keys().copied()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum FakeCode {
        Letter(char),
        Escape,
        Unidentified,
    }

    fn translator() -> KeyTranslator<FakeCode> {
        KeyTranslator::new(
            &[
                (Key::A, FakeCode::Letter('a')),
                (Key::B, FakeCode::Letter('b')),
                (Key::Escape, FakeCode::Escape),
            ],
            FakeCode::Unidentified,
        )
    }

    #[test]
    fn translates_both_directions() {
        let table = translator();

        assert_eq!(table.to_engine(FakeCode::Letter('b')), Key::B);
        assert_eq!(table.to_native(Key::Escape), FakeCode::Escape);
    }

    #[test]
    fn unmapped_values_hit_the_sentinels() {
        let table = translator();

        assert_eq!(table.to_engine(FakeCode::Letter('z')), Key::Unknown);
        assert_eq!(table.to_native(Key::F12), FakeCode::Unidentified);
        assert_eq!(table.to_native(Key::Unknown), FakeCode::Unidentified);
    }

    #[test]
    fn duplicate_rows_keep_the_first_mapping() {
        let table = KeyTranslator::new(
            &[
                (Key::A, FakeCode::Letter('a')),
                (Key::A, FakeCode::Letter('x')),
                (Key::C, FakeCode::Letter('a')),
            ],
            FakeCode::Unidentified,
        );

        assert_eq!(table.len(), 1);
        assert_eq!(table.to_native(Key::A), FakeCode::Letter('a'));
        assert_eq!(table.to_engine(FakeCode::Letter('x')), Key::Unknown);
        assert_eq!(table.to_native(Key::C), FakeCode::Unidentified);
    }

    #[test]
    fn sentinel_rows_are_skipped() {
        let table = KeyTranslator::new(
            &[(Key::Unknown, FakeCode::Escape), (Key::A, FakeCode::Unidentified)],
            FakeCode::Unidentified,
        );
        assert!(table.is_empty());
    }

    #[test]
    fn every_row_round_trips() {
        let table = translator();

        for key in table.mapped_keys() {
            assert_eq!(table.to_engine(table.to_native(key)), key);
        }
        for native in table.mapped_natives() {
            assert_eq!(table.to_native(table.to_engine(native)), native);
        }
    }
}
