//! Property tests for pattern compilation and matching.

use proptest::prelude::*;

use treewatch::{PatternSet, WatchError};

fn path_segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9._-]{1,12}").unwrap()
}

fn abs_path() -> impl Strategy<Value = String> {
    proptest::collection::vec(path_segment(), 1..=5).prop_map(|s| format!("/{}", s.join("/")))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Compiling arbitrary pattern text never panics; failures name the pattern.
    #[test]
    fn property_compile_never_panics(pattern in "(?s).{0,64}") {
        match PatternSet::new([pattern.as_str()]) {
            Ok(set) => {
                prop_assert_eq!(set.len(), 1);
            }
            Err(WatchError::InvalidPattern { pattern: reported, .. }) => {
                prop_assert_eq!(reported, pattern);
            }
            Err(other) => {
                prop_assert!(false, "unexpected error: {}", other);
            }
        }
    }

    /// PROPERTY: An escaped segment of a path always matches that path (search, not anchored).
    #[test]
    fn property_escaped_segment_matches(path in abs_path(), pick in any::<prop::sample::Index>()) {
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        let segment = segments[pick.index(segments.len())];
        let set = PatternSet::new([regex::escape(segment)]).unwrap();
        prop_assert!(set.matches(&path));
    }

    /// PROPERTY: The empty set matches nothing, and a set matches iff one member does.
    #[test]
    fn property_set_is_union_of_members(
        path in abs_path(),
        a in path_segment(),
        b in path_segment(),
    ) {
        prop_assert!(!PatternSet::default().matches(&path));

        let pa = regex::escape(&a);
        let pb = regex::escape(&b);
        let both = PatternSet::new([pa.as_str(), pb.as_str()]).unwrap();
        let expected = PatternSet::new([pa.as_str()]).unwrap().matches(&path)
            || PatternSet::new([pb.as_str()]).unwrap().matches(&path);
        prop_assert_eq!(both.matches(&path), expected);
    }
}
