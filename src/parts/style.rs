//! CSS and SASS parts.
//!
//! Injection parts (`load_*`) put styles in the DOM at runtime; extraction
//! parts (`extract_*`) write them to a file through a shared sink. Both run
//! PostCSS, and the SASS variants add the transpiler at the start of the
//! pipeline (end of the step list).

use fragment_merge::Fragment;
use serde_json::{json, Map, Value};

use super::{PartError, Plugin, Rule, Scope, Step};
use crate::registry::ExtractRegistry;

/// Loader that hands extracted styles to the sink.
pub const EXTRACT_LOADER: &str = "mini-css-extract-plugin/dist/loader";

const LOCAL_IDENT_NAME: &str = "_[name]-[local]-[hash:base64:4]";

/// CSS Modules setting for `css-loader`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CssModules {
    #[default]
    Off,
    /// Debuggable class names and camel-case-only exports
    On,
    /// Forwarded verbatim as `modules`
    Custom(Map<String, Value>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleOptions {
    pub scope: Scope,
    pub modules: CssModules,
    /// Extraction bucket; ignored by the injection parts
    pub name: Option<String>,
}

impl StyleOptions {
    pub fn modules(modules: CssModules) -> Self {
        Self {
            modules,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Flavor {
    part: &'static str,
    ext: &'static str,
    alt_lang: Option<&'static str>,
}

const CSS: Flavor = Flavor {
    part: "css",
    ext: "css",
    alt_lang: None,
};

const SASS: Flavor = Flavor {
    part: "sass",
    ext: "scss",
    alt_lang: Some("sass"),
};

/// Inject `.css` files into the DOM.
pub fn load_css(options: StyleOptions) -> Result<Fragment, PartError> {
    load_styling("load_css", CSS, options)
}

/// Inject `.scss` files into the DOM.
pub fn load_sass(options: StyleOptions) -> Result<Fragment, PartError> {
    load_styling("load_sass", SASS, options)
}

/// Extract `.css` files into the bucket's stylesheet.
pub fn extract_css(
    registry: &mut ExtractRegistry,
    options: StyleOptions,
) -> Result<Fragment, PartError> {
    extract_styling("extract_css", CSS, registry, options)
}

/// Extract `.scss` files into the bucket's stylesheet.
pub fn extract_sass(
    registry: &mut ExtractRegistry,
    options: StyleOptions,
) -> Result<Fragment, PartError> {
    extract_styling("extract_sass", SASS, registry, options)
}

fn css_loader_options(modules: CssModules) -> Value {
    let mut options = Map::new();
    options.insert("importLoaders".to_string(), json!(1));
    options.insert("sourceMap".to_string(), json!(true));

    match modules {
        CssModules::Off => {}
        CssModules::On => {
            options.insert("localsConvention".to_string(), json!("camelCaseOnly"));
            options.insert(
                "modules".to_string(),
                json!({ "localIdentName": LOCAL_IDENT_NAME }),
            );
        }
        CssModules::Custom(custom) => {
            options.insert("modules".to_string(), Value::Object(custom));
        }
    }

    Value::Object(options)
}

/// Shared pipeline: css-loader, postcss-loader, then the optional transpiler.
fn pipeline(flavor: Flavor, modules: CssModules) -> (String, Vec<Step>) {
    let mut steps = vec![
        Step::with_options("css-loader", css_loader_options(modules)),
        Step::with_options(
            "postcss-loader",
            json!({ "plugins": ["postcss-preset-env"], "sourceMap": true }),
        ),
    ];

    if let Some(lang) = flavor.alt_lang {
        steps.push(Step::with_options(
            format!("{}-loader", lang),
            json!({ "sourceMap": true }),
        ));
    }

    (format!(r"\.{}$", flavor.ext), steps)
}

fn load_styling(
    part: &'static str,
    flavor: Flavor,
    options: StyleOptions,
) -> Result<Fragment, PartError> {
    let (test, steps) = pipeline(flavor, options.modules);
    let rule = Rule::new(test)
        .scoped(options.scope)
        .step(Step::loader("style-loader"))
        .steps(steps);
    rule.validate(part)?;
    Ok(Fragment::with_rules(vec![rule.to_value()]))
}

fn extract_styling(
    part: &'static str,
    flavor: Flavor,
    registry: &mut ExtractRegistry,
    options: StyleOptions,
) -> Result<Fragment, PartError> {
    let (test, steps) = pipeline(flavor, options.modules);
    let rule = Rule::new(test).scoped(options.scope);
    rule.validate(part)?;

    let sink = registry.acquire(options.name.as_deref(), || {
        Plugin::new("MiniCssExtractPlugin").arg(json!({ "filename": "[name].css" }))
    });
    tracing::debug!(
        part,
        flavor = flavor.part,
        sink = sink.id(),
        created = sink.created,
        "extraction rule"
    );

    let rule = rule
        .step(Step::with_options(
            EXTRACT_LOADER,
            json!({ "instance": sink.id() }),
        ))
        .steps(steps);

    let plugins = if sink.created {
        vec![sink.plugin.to_value()]
    } else {
        Vec::new()
    };

    Ok(Fragment::with_rules(vec![rule.to_value()]).set("plugins", Value::Array(plugins)))
}
