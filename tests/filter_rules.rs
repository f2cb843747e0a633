// tests/filter_rules.rs

use watchrun::config::WatchSection;
use watchrun::watch::PathFilter;

#[test]
fn ignored_path_is_never_actioned_even_if_watched() {
    // The ignore rule also matches a path the watch rule matches.
    let filter = PathFilter::new(
        &[r"\.go$".to_string()],
        &[r"_test\.go$".to_string()],
    );

    assert!(filter.qualifies("/proj/main.go"));
    assert!(filter.is_watched("/proj/main_test.go"));
    assert!(filter.is_ignored("/proj/main_test.go"));
    assert!(!filter.qualifies("/proj/main_test.go"));
}

#[test]
fn classification_is_deterministic_and_order_independent() {
    let filter = PathFilter::new(&[r"\.go$".to_string()], &[r"\.md$".to_string()]);

    for _ in 0..5 {
        assert!(filter.is_watched("/proj/main.go"));
        assert!(!filter.is_ignored("/proj/main.go"));
        assert!(filter.is_ignored("/proj/README.md"));
        assert!(!filter.is_watched("/proj/README.md"));
    }

    // Calling is_ignored before is_watched (or not at all) changes nothing.
    assert!(filter.qualifies("/proj/main.go"));
    assert!(!filter.qualifies("/proj/README.md"));
}

#[test]
fn invalid_pattern_fails_open() {
    // "(unclosed" does not compile; it must act as "never matches" without
    // disturbing the valid rules around it.
    let filter = PathFilter::new(
        &["(unclosed".to_string(), r"\.go$".to_string()],
        &["[bad".to_string()],
    );

    assert!(filter.qualifies("/proj/main.go"));
    assert!(!filter.is_ignored("/proj/main.go"));
    assert!(!filter.is_watched("/proj/notes.txt"));
}

#[test]
fn default_rules_watch_go_sources_and_ignore_artifacts() {
    let defaults = WatchSection::default();
    let filter = PathFilter::new(&defaults.watch, &defaults.ignore);

    assert!(filter.qualifies("/proj/cmd/api/main.go"));
    assert!(!filter.qualifies("/proj/README.md"));
    assert!(!filter.qualifies("/proj/proj.exe"));
    assert!(!filter.qualifies("/proj/assets/app.js"));
    assert!(!filter.qualifies("/proj/index.html"));
    assert!(!filter.qualifies("/proj/notes.txt"));
}
