//! JavaScript parts: Babel transpilation and ESLint.

use fragment_merge::Fragment;
use serde_json::{json, Map, Value};

use super::{PartError, Rule, Scope, Step};

const SCRIPT_TEST: &str = r"\.jsx?$";

/// Options handed to `babel-loader`.
#[derive(Debug, Clone, PartialEq)]
pub enum LoaderOptions {
    /// User options merged over the defaults. When no `presets` key is
    /// given, `@babel/preset-env` is filled in.
    Merged(Map<String, Value>),
    /// Emit the loader without options (defer to `.babelrc`)
    Disabled,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        LoaderOptions::Merged(Map::new())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BabelOptions {
    pub scope: Scope,
    pub options: LoaderOptions,
}

impl Default for BabelOptions {
    fn default() -> Self {
        Self {
            scope: Scope::skip_node_modules(),
            options: LoaderOptions::default(),
        }
    }
}

/// Run `.js`/`.jsx` through Babel. Modules are left untranspiled so the
/// bundler can tree-shake.
pub fn babelize(options: BabelOptions) -> Result<Fragment, PartError> {
    let loader = match options.options {
        LoaderOptions::Disabled => Step::loader("babel-loader"),
        LoaderOptions::Merged(user) => {
            let mut merged = Map::new();
            if !user.contains_key("presets") {
                merged.insert(
                    "presets".to_string(),
                    json!([[
                        "@babel/preset-env",
                        { "corejs": 3, "modules": false, "useBuiltIns": "usage" }
                    ]]),
                );
            }
            merged.extend(user);
            Step::with_options("babel-loader", Value::Object(merged))
        }
    };

    let rule = Rule::new(SCRIPT_TEST).scoped(options.scope).step(loader);
    rule.validate("babelize")?;
    Ok(Fragment::with_rules(vec![rule.to_value()]))
}

#[derive(Debug, Clone, PartialEq)]
pub struct LintOptions {
    pub scope: Scope,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            scope: Scope::skip_node_modules(),
        }
    }
}

/// Lint `.js`/`.jsx` during the build; configuration is external.
pub fn lint_js(options: LintOptions) -> Result<Fragment, PartError> {
    let rule = Rule::new(SCRIPT_TEST)
        .scoped(options.scope)
        .step(Step::loader("eslint-loader"));
    rule.validate("lint_js")?;
    Ok(Fragment::with_rules(vec![rule.to_value()]))
}
