//! Fragment composition
//!
//! Merge semantics:
//! - Objects: deep-merge by key (recursive)
//! - Arrays: concatenate, left entries first ([`ArrayMerge::Concat`]) or
//!   replace wholesale ([`ArrayMerge::Replace`])
//! - Scalars: override (right wins)
//! - Null: override (null can override any value)

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::{MergeError, ValueKind};
use crate::fragment::Fragment;

/// Keys under which a rule may carry its processing steps.
const STEP_KEYS: &[&str] = &["use", "loaders", "loader"];

/// Rule selector keys. A path and a regex are both valid here, so the right
/// value replaces the left whatever its kind.
const FILTER_KEYS: &[&str] = &["test", "include", "exclude"];

/// How two sequences at the same key combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayMerge {
    /// Left entries followed by right entries
    Concat,
    /// Right sequence wins entirely
    Replace,
}

/// How rule-like sequence entries combine when arrays concatenate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleMerge {
    /// Every right entry is appended as a new entry
    Append,
    /// Right entries whose `test` literally equals a left entry's `test`
    /// have their steps appended onto that entry
    Smart,
}

/// What happens when a container meets a value of another kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Right value overwrites, whatever its kind
    Overwrite,
    /// Sequence or mapping vs. a different non-null kind is an error
    Reject,
}

/// Full set of merge rules applied by a [`Composer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeStrategy {
    pub arrays: ArrayMerge,
    pub rules: RuleMerge,
    pub conflicts: ConflictPolicy,
}

impl MergeStrategy {
    /// Concatenate sequences, reject type conflicts.
    pub const fn plain() -> Self {
        Self {
            arrays: ArrayMerge::Concat,
            rules: RuleMerge::Append,
            conflicts: ConflictPolicy::Reject,
        }
    }

    /// Like [`MergeStrategy::plain`], coalescing rules with equal `test`.
    pub const fn smart() -> Self {
        Self {
            arrays: ArrayMerge::Concat,
            rules: RuleMerge::Smart,
            conflicts: ConflictPolicy::Reject,
        }
    }

    /// Settings layering: arrays replace, last layer always wins.
    pub const fn layered() -> Self {
        Self {
            arrays: ArrayMerge::Replace,
            rules: RuleMerge::Append,
            conflicts: ConflictPolicy::Overwrite,
        }
    }

    pub const fn with_conflicts(mut self, conflicts: ConflictPolicy) -> Self {
        self.conflicts = conflicts;
        self
    }
}

impl Default for MergeStrategy {
    fn default() -> Self {
        Self::plain()
    }
}

/// Deep-merge engine combining fragments in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Composer {
    strategy: MergeStrategy,
}

impl Composer {
    pub fn new(strategy: MergeStrategy) -> Self {
        Self { strategy }
    }

    pub fn plain() -> Self {
        Self::new(MergeStrategy::plain())
    }

    pub fn smart() -> Self {
        Self::new(MergeStrategy::smart())
    }

    /// Merge `right` onto `left`.
    pub fn merge(&self, left: Fragment, right: Fragment) -> Result<Fragment, MergeError> {
        let merged = self.merge_maps("", left.into_map(), right.into_map())?;
        Ok(Fragment::from(merged))
    }

    /// Merge fragments in order onto `base`. Absent fragments are skipped.
    pub fn compose<I>(&self, base: Fragment, fragments: I) -> Result<Fragment, MergeError>
    where
        I: IntoIterator<Item = Option<Fragment>>,
    {
        let mut merged = base;
        let mut applied = 0usize;
        let mut skipped = 0usize;

        for fragment in fragments {
            match fragment {
                Some(fragment) => {
                    merged = self.merge(merged, fragment)?;
                    applied += 1;
                }
                None => skipped += 1,
            }
        }

        debug!(applied, skipped, strategy = ?self.strategy, "composed fragments");
        Ok(merged)
    }

    /// Merge two arbitrary JSON values.
    pub fn merge_values(&self, left: Value, right: Value) -> Result<Value, MergeError> {
        self.merge_value("", left, right)
    }

    /// Merge value layers in order (first is base, last has highest precedence)
    pub fn merge_layers(&self, layers: Vec<Value>) -> Result<Value, MergeError> {
        layers
            .into_iter()
            .try_fold(Value::Null, |acc, layer| self.merge_values(acc, layer))
    }

    fn merge_value(&self, path: &str, left: Value, right: Value) -> Result<Value, MergeError> {
        match (left, right) {
            (Value::Object(left_map), Value::Object(right_map)) => {
                Ok(Value::Object(self.merge_maps(path, left_map, right_map)?))
            }
            (Value::Array(left_items), Value::Array(right_items)) => {
                Ok(Value::Array(self.merge_arrays(path, left_items, right_items)?))
            }
            (left, right) => {
                self.check_conflict(path, &left, &right)?;
                Ok(right)
            }
        }
    }

    fn check_conflict(&self, path: &str, left: &Value, right: &Value) -> Result<(), MergeError> {
        if self.strategy.conflicts == ConflictPolicy::Overwrite {
            return Ok(());
        }

        let left_kind = ValueKind::of(left);
        let right_kind = ValueKind::of(right);
        if left_kind == ValueKind::Null || right_kind == ValueKind::Null || left_kind == right_kind {
            return Ok(());
        }

        if left_kind.is_container() || right_kind.is_container() {
            return Err(MergeError::TypeConflict {
                path: path.to_string(),
                left: left_kind,
                right: right_kind,
            });
        }

        Ok(())
    }

    fn merge_maps(
        &self,
        path: &str,
        mut left: Map<String, Value>,
        right: Map<String, Value>,
    ) -> Result<Map<String, Value>, MergeError> {
        for (key, right_value) in right {
            match left.get_mut(&key) {
                Some(slot) => {
                    let child = child_path(path, &key);
                    let left_value = slot.take();
                    *slot = self.merge_value(&child, left_value, right_value)?;
                }
                None => {
                    left.insert(key, right_value);
                }
            }
        }
        Ok(left)
    }

    fn merge_arrays(
        &self,
        path: &str,
        mut left: Vec<Value>,
        right: Vec<Value>,
    ) -> Result<Vec<Value>, MergeError> {
        if self.strategy.arrays == ArrayMerge::Replace {
            return Ok(right);
        }

        if self.strategy.rules == RuleMerge::Append {
            left.extend(right);
            return Ok(left);
        }

        // Only entries present before this merge are candidates.
        let original_len = left.len();
        for entry in right {
            let target = match rule_test(&entry) {
                Some(test) => left[..original_len]
                    .iter()
                    .position(|existing| rule_test(existing) == Some(test)),
                None => None,
            };

            match (target, entry) {
                (Some(index), Value::Object(incoming)) => {
                    let rule_path = format!("{}[{}]", path, index);
                    let existing = std::mem::take(&mut left[index]);
                    left[index] = match existing {
                        Value::Object(existing) => {
                            Value::Object(self.coalesce_rule(&rule_path, existing, incoming)?)
                        }
                        other => other,
                    };
                }
                (_, entry) => left.push(entry),
            }
        }

        Ok(left)
    }

    /// Append the incoming rule's steps onto the existing rule, take its
    /// filters, then merge the remaining keys normally.
    fn coalesce_rule(
        &self,
        path: &str,
        mut existing: Map<String, Value>,
        mut incoming: Map<String, Value>,
    ) -> Result<Map<String, Value>, MergeError> {
        let incoming_steps = take_steps(&mut incoming);
        if !incoming_steps.is_empty() {
            let mut steps = take_steps(&mut existing);
            trace!(
                path,
                existing = steps.len(),
                appended = incoming_steps.len(),
                "coalescing rule steps"
            );
            steps.extend(incoming_steps);
            existing.insert("use".to_string(), Value::Array(steps));
        }
        for key in FILTER_KEYS {
            if let Some(filter) = incoming.remove(*key) {
                existing.insert(key.to_string(), filter);
            }
        }
        self.merge_maps(path, existing, incoming)
    }
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

/// The literal `test` matcher of a rule-like entry.
fn rule_test(entry: &Value) -> Option<&Value> {
    entry.as_object()?.get("test")
}

/// Remove and normalize a rule's steps into one ordered list.
fn take_steps(rule: &mut Map<String, Value>) -> Vec<Value> {
    let mut steps = Vec::new();
    for key in STEP_KEYS {
        match rule.remove(*key) {
            Some(Value::Array(items)) => steps.extend(items),
            Some(Value::Null) | None => {}
            // `loader` + `options` at rule level describe a single step
            Some(Value::String(loader)) if *key == "loader" => match rule.remove("options") {
                Some(options) => {
                    let mut step = Map::new();
                    step.insert("loader".to_string(), Value::String(loader));
                    step.insert("options".to_string(), options);
                    steps.push(Value::Object(step));
                }
                None => steps.push(Value::String(loader)),
            },
            Some(single) => steps.push(single),
        }
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fragment(value: Value) -> Fragment {
        Fragment::from_value(value).unwrap()
    }

    #[test]
    fn test_scalar_override() {
        let merged = Composer::plain()
            .merge(
                fragment(json!({"mode": "development"})),
                fragment(json!({"mode": "production"})),
            )
            .unwrap();
        assert_eq!(merged.get_str("mode"), Some("production"));
    }

    #[test]
    fn test_object_deep_merge() {
        let base = fragment(json!({
            "output": {
                "filename": "[name].js",
                "publicPath": "/"
            }
        }));
        let overlay = fragment(json!({
            "output": {
                "filename": "[name].[chunkhash:8].js"
            }
        }));
        let merged = Composer::plain().merge(base, overlay).unwrap();

        assert_eq!(merged.get_str("output.filename"), Some("[name].[chunkhash:8].js"));
        assert_eq!(merged.get_str("output.publicPath"), Some("/"));
    }

    #[test]
    fn test_array_concat() {
        let merged = Composer::plain()
            .merge(
                fragment(json!({"plugins": [{"plugin": "A"}]})),
                fragment(json!({"plugins": [{"plugin": "B"}, {"plugin": "C"}]})),
            )
            .unwrap();

        let names: Vec<_> = merged
            .plugins()
            .iter()
            .map(|p| p["plugin"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_array_replace() {
        let composer = Composer::new(MergeStrategy::layered());
        let merged = composer
            .merge_values(json!({"dirs": ["a", "b", "c"]}), json!({"dirs": ["x"]}))
            .unwrap();
        assert_eq!(merged["dirs"], json!(["x"]));
    }

    #[test]
    fn test_empty_fragment_is_identity() {
        let f = fragment(json!({
            "mode": "development",
            "module": {"rules": [{"test": "\\.css$", "use": ["css-loader"]}]},
            "plugins": [{"plugin": "A"}]
        }));

        for composer in [Composer::plain(), Composer::smart()] {
            let left = composer.merge(Fragment::new(), f.clone()).unwrap();
            let right = composer.merge(f.clone(), Fragment::new()).unwrap();
            assert_eq!(left, f);
            assert_eq!(right, f);
        }
    }

    #[test]
    fn test_sequence_concat_is_associative() {
        let a = fragment(json!({"plugins": [{"plugin": "A"}], "module": {"rules": [{"test": "a"}]}}));
        let b = fragment(json!({"plugins": [{"plugin": "B"}], "module": {"rules": [{"test": "b"}]}}));
        let c = fragment(json!({"plugins": [{"plugin": "C"}], "module": {"rules": [{"test": "c"}]}}));
        let composer = Composer::plain();

        let left_first = composer
            .merge(composer.merge(a.clone(), b.clone()).unwrap(), c.clone())
            .unwrap();
        let right_first = composer
            .merge(a, composer.merge(b, c).unwrap())
            .unwrap();

        assert_eq!(left_first, right_first);
        assert_eq!(left_first.plugins().len(), 3);
    }

    #[test]
    fn test_smart_merge_coalesces_equal_tests() {
        let left = fragment(json!({
            "module": {"rules": [
                {"test": "\\.css$", "use": ["style-loader", "css-loader"]}
            ]}
        }));
        let right = fragment(json!({
            "module": {"rules": [
                {"test": "\\.css$", "use": ["postcss-loader"]}
            ]}
        }));

        let merged = Composer::smart().merge(left, right).unwrap();
        let rules = merged.rules();
        assert_eq!(rules.len(), 1);
        assert_eq!(
            rules[0]["use"],
            json!(["style-loader", "css-loader", "postcss-loader"])
        );
    }

    #[test]
    fn test_plain_merge_keeps_duplicate_rules() {
        let left = fragment(json!({"module": {"rules": [{"test": "\\.css$", "use": ["a"]}]}}));
        let right = fragment(json!({"module": {"rules": [{"test": "\\.css$", "use": ["b"]}]}}));

        let merged = Composer::plain().merge(left, right).unwrap();
        assert_eq!(merged.rules().len(), 2);
    }

    #[test]
    fn test_smart_merge_uses_literal_pattern_equality() {
        let left = fragment(json!({"module": {"rules": [{"test": "\\.jsx?$", "use": ["a"]}]}}));
        let right = fragment(json!({"module": {"rules": [{"test": "\\.(?:js|jsx)$", "use": ["b"]}]}}));

        let merged = Composer::smart().merge(left, right).unwrap();
        assert_eq!(merged.rules().len(), 2);
    }

    #[test]
    fn test_smart_merge_appends_unmatched_rules() {
        let left = fragment(json!({"module": {"rules": [{"test": "\\.css$", "use": ["a"]}]}}));
        let right = fragment(json!({"module": {"rules": [
            {"test": "\\.scss$", "use": ["b"]},
            {"use": ["no-test"]}
        ]}}));

        let merged = Composer::smart().merge(left, right).unwrap();
        let rules = merged.rules();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[1]["test"], "\\.scss$");
        assert_eq!(rules[2]["use"], json!(["no-test"]));
    }

    #[test]
    fn test_smart_merge_normalizes_single_loader() {
        let left = fragment(json!({"module": {"rules": [
            {"test": "\\.png$", "loader": "url-loader", "options": {"limit": 10000}}
        ]}}));
        let right = fragment(json!({"module": {"rules": [
            {"test": "\\.png$", "use": [{"loader": "image-webpack-loader"}], "exclude": "node_modules"}
        ]}}));

        let merged = Composer::smart().merge(left, right).unwrap();
        let rule = &merged.rules()[0];
        assert_eq!(
            rule["use"],
            json!([
                {"loader": "url-loader", "options": {"limit": 10000}},
                {"loader": "image-webpack-loader"}
            ])
        );
        assert_eq!(rule["exclude"], "node_modules");
        assert!(rule.get("loader").is_none());
        assert!(rule.get("options").is_none());
    }

    #[test]
    fn test_smart_merge_replaces_filter_of_other_kind() {
        let left = fragment(json!({"module": {"rules": [
            {"test": "\\.css$", "include": "/app/src", "use": ["style-loader"]}
        ]}}));
        let right = fragment(json!({"module": {"rules": [
            {"test": "\\.css$", "include": {"regex": "src"}, "exclude": "/app/vendor", "use": ["css-loader"]}
        ]}}));

        let merged = Composer::smart().merge(left, right).unwrap();
        let rule = &merged.rules()[0];
        assert_eq!(rule["include"], json!({"regex": "src"}));
        assert_eq!(rule["exclude"], "/app/vendor");
        assert_eq!(rule["use"], json!(["style-loader", "css-loader"]));

        // and back again: a path replaces a regex without mixing keys
        let back = fragment(json!({"module": {"rules": [
            {"test": "\\.css$", "include": "/app/src"}
        ]}}));
        let merged = Composer::smart().merge(merged, back).unwrap();
        assert_eq!(merged.rules()[0]["include"], "/app/src");
    }

    #[test]
    fn test_compose_skips_absent_fragments() {
        let composer = Composer::plain();
        let base = fragment(json!({"plugins": [{"plugin": "A"}]}));

        let merged = composer
            .compose(
                base.clone(),
                vec![None, Some(fragment(json!({"plugins": [{"plugin": "B"}]}))), None],
            )
            .unwrap();
        assert_eq!(merged.plugins().len(), 2);

        let untouched = composer.compose(base.clone(), vec![None]).unwrap();
        assert_eq!(untouched, base);
    }

    #[test]
    fn test_rejects_sequence_scalar_conflict() {
        let err = Composer::plain()
            .merge(
                fragment(json!({"module": {"rules": []}})),
                fragment(json!({"module": {"rules": "oops"}})),
            )
            .unwrap_err();

        match err {
            MergeError::TypeConflict { path, left, right } => {
                assert_eq!(path, "module.rules");
                assert_eq!(left, ValueKind::Sequence);
                assert_eq!(right, ValueKind::Scalar);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_overwrite_policy_allows_conflicts() {
        let composer =
            Composer::new(MergeStrategy::plain().with_conflicts(ConflictPolicy::Overwrite));
        let merged = composer
            .merge(
                fragment(json!({"devServer": {"port": 3000}})),
                fragment(json!({"devServer": false})),
            )
            .unwrap();
        assert_eq!(merged.get("devServer"), Some(&json!(false)));
    }

    #[test]
    fn test_null_override() {
        let merged = Composer::plain()
            .merge(
                fragment(json!({"devtool": "source-map"})),
                fragment(json!({"devtool": null})),
            )
            .unwrap();
        assert!(merged.get("devtool").unwrap().is_null());
    }

    #[test]
    fn test_merge_layers() {
        let composer = Composer::new(MergeStrategy::layered());
        let result = composer
            .merge_layers(vec![
                json!({"port": 3004, "paths": {"build": "dist"}}),
                json!({"port": 8080}),
                json!({"paths": {"build": "public"}}),
            ])
            .unwrap();

        assert_eq!(result["port"], 8080);
        assert_eq!(result["paths"]["build"], "public");
    }
}
