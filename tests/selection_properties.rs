// tests/selection_properties.rs
use git_versions::catalog::AliasMap;
use git_versions::domain::Version;
use git_versions::selector::{apply_limit, in_range};
use proptest::prelude::*;

fn version_strategy() -> impl Strategy<Value = Version> {
    (
        1u64..3,
        0u64..10,
        0u64..10,
        prop::option::of(0u64..3),
        prop::option::of("[ab]"),
    )
        .prop_map(|(major, minor, patch, rc, letter)| {
            let mut text = format!("{}.{}.{}", major, minor, patch);
            if let Some(letter) = letter {
                text.push_str(&letter);
            }
            if let Some(rc) = rc {
                text.push_str(&format!(".rc{}", rc));
            }
            Version::new(&text)
        })
}

proptest! {
    #[test]
    fn canonicalize_is_idempotent(versions in prop::collection::vec(version_strategy(), 0..20)) {
        let aliases = AliasMap::builtin();
        let once = aliases.canonicalize(versions);
        let twice = aliases.canonicalize(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn canonicalize_leaves_no_duplicates(versions in prop::collection::vec(version_strategy(), 0..20)) {
        let result = AliasMap::builtin().canonicalize(versions);
        for (i, a) in result.iter().enumerate() {
            prop_assert!(result[i + 1..].iter().all(|b| a != b));
        }
    }

    #[test]
    fn limit_keeps_a_contiguous_end(
        mut versions in prop::collection::vec(version_strategy(), 0..20),
        limit in -25i64..25,
    ) {
        versions.sort();
        let kept = apply_limit(versions.clone(), limit);
        let n = (limit.unsigned_abs() as usize).min(versions.len());

        if limit == 0 {
            prop_assert_eq!(kept, versions);
        } else if limit > 0 {
            prop_assert_eq!(&kept[..], &versions[versions.len() - n..]);
        } else {
            prop_assert_eq!(&kept[..], &versions[..n]);
        }
    }

    #[test]
    fn range_agrees_with_ordering(
        version in version_strategy(),
        since in version_strategy(),
        until in version_strategy(),
    ) {
        prop_assert!(in_range(&version, None, None));
        prop_assert_eq!(in_range(&version, Some(&since), None), version >= since);
        prop_assert_eq!(in_range(&version, None, Some(&until)), version <= until);
        prop_assert!(in_range(&version, Some(&version), Some(&version)));
    }

    #[test]
    fn prerelease_orders_before_its_release(version in version_strategy(), rc in 0u64..5) {
        prop_assume!(!version.is_prerelease());
        let candidate = Version::new(&format!("{}.rc{}", version, rc));
        prop_assert!(candidate < version);
    }
}
