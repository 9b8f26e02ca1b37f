//! Property tests for change-event filtering.

use proptest::prelude::*;

use treewatch::{ChangeEvent, ChangeKind, EventFilter, PatternSet};

fn kind() -> impl Strategy<Value = ChangeKind> {
    prop_oneof![
        Just(ChangeKind::Create),
        Just(ChangeKind::Write),
        Just(ChangeKind::Remove),
        Just(ChangeKind::Rename),
        Just(ChangeKind::Metadata),
        Just(ChangeKind::Access),
        Just(ChangeKind::Other),
    ]
}

fn file_path() -> impl Strategy<Value = String> {
    proptest::string::string_regex("/[a-z]{1,8}(/[a-z0-9_]{1,8}){0,3}\\.(go|rs|txt)").unwrap()
}

fn filter(include: &[&str], exclude: &[&str]) -> EventFilter {
    EventFilter::new(
        PatternSet::new(include).unwrap(),
        PatternSet::new(exclude).unwrap(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Blank paths never pass, whatever the patterns.
    #[test]
    fn property_blank_path_never_accepted(
        blank in "[ \t\n]{0,4}",
        with_include in any::<bool>(),
    ) {
        let include: &[&str] = if with_include { &[".*"] } else { &[] };
        let f = filter(include, &[]);
        prop_assert!(!f.accept(&ChangeEvent::write(blank)));
    }

    /// PROPERTY: Only writes are ever accepted.
    #[test]
    fn property_only_writes_accepted(kind in kind(), path in file_path()) {
        let f = filter(&[], &[]);
        prop_assert_eq!(f.accept(&ChangeEvent::new(kind, path)), kind == ChangeKind::Write);
    }

    /// PROPERTY: Exclusion always wins over inclusion.
    #[test]
    fn property_exclude_wins(path in file_path()) {
        let f = filter(&[".*"], &[r"\.go$"]);
        let accepted = f.accept(&ChangeEvent::write(path.clone()));
        prop_assert_eq!(accepted, !path.ends_with(".go"));
    }

    /// PROPERTY: With include patterns configured, non-matching writes are dropped.
    #[test]
    fn property_include_restricts(path in file_path()) {
        let f = filter(&[r"\.rs$"], &[]);
        prop_assert_eq!(f.accept(&ChangeEvent::write(path.clone())), path.ends_with(".rs"));
    }
}
