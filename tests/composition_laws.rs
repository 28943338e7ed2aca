//! Composition Laws
//!
//! Algebraic behavior of fragment merging, exercised through real part
//! factories rather than hand-built maps.

use serde_json::{json, Value};
use webpack_parts::parts::{self, Condition, CssModules, Scope, StyleOptions};
use webpack_parts::{Composer, ExtractRegistry, Fragment, MergeError};

fn fragments() -> Vec<Fragment> {
    vec![
        parts::generate_source_maps(None),
        parts::load_css(StyleOptions::default()).unwrap(),
        Fragment::new().set("mode", json!("development")),
        parts::error_overlay(),
        parts::load_sass(StyleOptions::modules(CssModules::On)).unwrap(),
        Fragment::from_value(json!({ "output": { "publicPath": "/" } })).unwrap(),
    ]
}

// =============================================================================
// Identity and associativity
// =============================================================================

#[test]
fn test_empty_fragment_is_identity() {
    for composer in [Composer::plain(), Composer::smart()] {
        for f in fragments() {
            let left = composer.merge(Fragment::new(), f.clone()).unwrap();
            let right = composer.merge(f.clone(), Fragment::new()).unwrap();
            assert_eq!(left, f);
            assert_eq!(right, f);
        }
    }
}

#[test]
fn test_plain_merge_is_associative() {
    let composer = Composer::plain();
    let all = fragments();

    for window in all.windows(3) {
        let (a, b, c) = (window[0].clone(), window[1].clone(), window[2].clone());
        let left = composer
            .merge(composer.merge(a.clone(), b.clone()).unwrap(), c.clone())
            .unwrap();
        let right = composer.merge(a, composer.merge(b, c).unwrap()).unwrap();
        assert_eq!(left, right);
    }
}

#[test]
fn test_compose_equals_left_fold() {
    let composer = Composer::smart();
    let all = fragments();

    let composed = composer
        .compose(Fragment::new(), all.iter().cloned().map(Some))
        .unwrap();

    let mut folded = Fragment::new();
    for f in all {
        folded = composer.merge(folded, f).unwrap();
    }

    assert_eq!(composed, folded);
}

// =============================================================================
// Rule coalescing
// =============================================================================

#[test]
fn test_plain_merge_keeps_both_css_rules() {
    let merged = Composer::plain()
        .merge(
            parts::load_css(StyleOptions::default()).unwrap(),
            parts::load_css(StyleOptions::default()).unwrap(),
        )
        .unwrap();

    assert_eq!(merged.rules().len(), 2);
}

#[test]
fn test_smart_merge_coalesces_css_rules() {
    let extra = Fragment::with_rules(vec![json!({
        "test": "\\.css$",
        "use": ["extra-loader"]
    })]);

    let merged = Composer::smart()
        .merge(parts::load_css(StyleOptions::default()).unwrap(), extra)
        .unwrap();

    let rules = merged.rules();
    assert_eq!(rules.len(), 1);
    let steps = rules[0]["use"].as_array().unwrap();
    assert_eq!(steps.first(), Some(&json!("style-loader")));
    assert_eq!(steps.last(), Some(&json!("extra-loader")));
}

#[test]
fn test_smart_merge_keeps_distinct_tests_apart() {
    let merged = Composer::smart()
        .merge(
            parts::load_css(StyleOptions::default()).unwrap(),
            parts::load_sass(StyleOptions::default()).unwrap(),
        )
        .unwrap();

    let tests: Vec<&Value> = merged.rules().iter().map(|r| &r["test"]).collect();
    assert_eq!(tests, vec![&json!("\\.css$"), &json!("\\.scss$")]);
}

#[test]
fn test_smart_merge_swaps_path_filter_for_regex() {
    let by_path = StyleOptions {
        scope: Scope::default().include(Condition::path("/app/src")),
        ..Default::default()
    };
    let by_regex = StyleOptions {
        scope: Scope::default().include(Condition::pattern("src")),
        ..Default::default()
    };

    let merged = Composer::smart()
        .merge(
            parts::load_css(by_path).unwrap(),
            parts::load_css(by_regex).unwrap(),
        )
        .unwrap();

    let rules = merged.rules();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0]["include"], json!({ "regex": "src" }));
}

// =============================================================================
// Precedence and absent fragments
// =============================================================================

#[test]
fn test_mode_last_wins() {
    let merged = Composer::smart()
        .compose(
            Fragment::new().set("mode", json!("development")),
            [Some(Fragment::new().set("mode", json!("production")))],
        )
        .unwrap();

    assert_eq!(merged.get_str("mode"), Some("production"));
}

#[test]
fn test_absent_fragments_are_skipped() {
    let base = parts::error_overlay();
    let with_absent = Composer::smart()
        .compose(base.clone(), [None, Some(parts::safe_assets()), None])
        .unwrap();
    let without = Composer::smart()
        .compose(base, [Some(parts::safe_assets())])
        .unwrap();

    assert_eq!(with_absent, without);
}

#[test]
fn test_container_conflict_rejected() {
    let err = Composer::plain()
        .merge(
            parts::error_overlay(),
            Fragment::new().set("plugins", json!("not a list")),
        )
        .unwrap_err();

    assert!(matches!(err, MergeError::TypeConflict { .. }));
}

// =============================================================================
// Shared extraction sink
// =============================================================================

#[test]
fn test_extraction_parts_share_one_sink() {
    let mut registry = ExtractRegistry::new();
    let css = parts::extract_css(&mut registry, StyleOptions::default()).unwrap();
    let sass = parts::extract_sass(&mut registry, StyleOptions::default()).unwrap();

    let merged = Composer::smart().merge(css, sass).unwrap();

    assert_eq!(registry.len(), 1);
    let sinks = merged
        .plugins()
        .iter()
        .filter(|p| p["plugin"] == "MiniCssExtractPlugin")
        .count();
    assert_eq!(sinks, 1);
}

#[test]
fn test_named_buckets_get_separate_sinks() {
    let mut registry = ExtractRegistry::new();
    let vendor = StyleOptions {
        name: Some("vendor".to_string()),
        ..Default::default()
    };
    parts::extract_css(&mut registry, StyleOptions::default()).unwrap();
    let sass = parts::extract_sass(&mut registry, vendor).unwrap();

    assert_eq!(registry.len(), 2);
    assert_eq!(sass.plugins()[0]["id"], "extract:vendor");
}
