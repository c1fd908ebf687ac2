// tests/patch_rules.rs
use git_versions::domain::Version;
use git_versions::patch::{builtin_rules, PatchEngine, SystemProbe, DEFAULT_HEADER_FIX_COMMIT};
use proptest::prelude::*;
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

struct FixedHost {
    describe_broken: bool,
    calls: Rc<Cell<usize>>,
}

impl SystemProbe for FixedHost {
    fn command_fails(&self, _program: &str, _args: &[&str], _cwd: &Path) -> bool {
        self.calls.set(self.calls.get() + 1);
        self.describe_broken
    }
}

fn engine(describe_broken: bool) -> (PatchEngine, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let host = FixedHost {
        describe_broken,
        calls: Rc::clone(&calls),
    };
    let engine = PatchEngine::new(
        builtin_rules(DEFAULT_HEADER_FIX_COMMIT),
        Box::new(host),
        PathBuf::from("."),
    );
    (engine, calls)
}

/// Releases around the rule boundaries: 1.0.x through 1.8.x, three or four components,
/// with and without release-candidate markers
fn release_strategy() -> impl Strategy<Value = Version> {
    (
        0u64..9,
        0u64..16,
        prop::option::of(0u64..10),
        prop::option::of(0u64..3),
    )
        .prop_map(|(minor, patch, fourth, rc)| {
            let mut text = format!("1.{}.{}", minor, patch);
            if let Some(fourth) = fourth {
                text.push_str(&format!(".{}", fourth));
            }
            if let Some(rc) = rc {
                text.push_str(&format!(".rc{}", rc));
            }
            Version::new(&text)
        })
}

/// Which correction a release needs, written out from the rule ranges
fn expected_rule(version: &Version, describe_broken: bool) -> Option<&'static str> {
    let between = |low: &str, high: &str| *version >= Version::new(low) && *version <= Version::new(high);

    if describe_broken && between("1.0.10", "1.5.2.5") {
        Some("legacy-describe")
    } else if *version == Version::new("1.0.9") {
        Some("makefile-version")
    } else if between("1.0.0", "1.7.0.9") {
        Some("missing-header")
    } else {
        None
    }
}

proptest! {
    #[test]
    fn rule_for_is_first_matching_rule_in_table_order(
        version in release_strategy(),
        describe_broken in any::<bool>(),
    ) {
        let (engine, _) = engine(describe_broken);
        let first_match = engine
            .rules()
            .iter()
            .find(|rule| rule.range.contains(&version) && (rule.gate.is_none() || describe_broken))
            .map(|rule| rule.name);

        let chosen = engine.rule_for(&version).map(|rule| rule.name);
        prop_assert_eq!(chosen, first_match);
        prop_assert_eq!(chosen, expected_rule(&version, describe_broken));
    }

    #[test]
    fn gate_command_runs_only_inside_its_range(
        version in release_strategy(),
        describe_broken in any::<bool>(),
    ) {
        let (engine, calls) = engine(describe_broken);
        let gated_range = engine.rules()[0].range.clone();
        engine.rule_for(&version);

        let expected_calls = usize::from(gated_range.contains(&version));
        prop_assert_eq!(calls.get(), expected_calls);
    }
}

#[test]
fn test_failed_gate_falls_through_to_header_fix() {
    let (working, _) = engine(false);
    let (broken, _) = engine(true);

    for release in ["1.0.10", "1.3.3", "1.5.2.5"] {
        let version = Version::new(release);
        assert_eq!(
            working.rule_for(&version).map(|r| r.name),
            Some("missing-header")
        );
        assert_eq!(
            broken.rule_for(&version).map(|r| r.name),
            Some("legacy-describe")
        );
    }
}
