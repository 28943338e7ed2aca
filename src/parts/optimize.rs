//! Build optimizations: minification, compression, chunking, manifests.

use fragment_merge::Fragment;
use serde_json::{json, Map, Value};

use super::{check_pattern, PartError, Plugin};

fn plugins(list: Vec<Plugin>) -> Fragment {
    Fragment::with_plugins(list.iter().map(Plugin::to_value).collect())
}

fn object(mut base: Map<String, Value>, overrides: Map<String, Value>) -> Value {
    base.extend(overrides);
    Value::Object(base)
}

/// Skip bundling whatever a dynamic `require` matching `request` inside a
/// module matching `context` could load.
pub fn ignore_dynamic_requires_for(request: &str, context: &str) -> Result<Fragment, PartError> {
    check_pattern("ignore_dynamic_requires_for", "request", request)?;
    check_pattern("ignore_dynamic_requires_for", "context", context)?;

    Ok(plugins(vec![Plugin::new("IgnorePlugin")
        .arg(json!({ "regex": request }))
        .arg(json!({ "regex": context }))]))
}

/// Leave Moment.js locales out of the bundle (about 50KB min+gz).
pub fn ignore_moment_locales() -> Fragment {
    plugins(vec![Plugin::new("IgnorePlugin")
        .arg(json!({ "regex": r"^\./locale$" }))
        .arg(json!({ "regex": "moment$" }))])
}

/// Emit nothing when any asset fails to build.
pub fn safe_assets() -> Fragment {
    plugins(vec![Plugin::new("NoEmitOnErrorsPlugin")])
}

/// Minify JS and CSS. Minification runs in parallel with source maps unless
/// overridden.
pub fn minify_all(options: Map<String, Value>) -> Fragment {
    let mut defaults = Map::new();
    defaults.insert("parallel".to_string(), json!(true));
    defaults.insert("sourceMap".to_string(), json!(true));

    plugins(vec![
        Plugin::new("LoaderOptionsPlugin").arg(json!({ "minimize": true })),
        Plugin::new("UglifyJSPlugin").arg(object(defaults, options)),
    ])
}

/// Zopfli pre-compression: text assets get a `.gz` sibling, PNGs are
/// recompressed in place.
pub fn compress_files(options: Map<String, Value>) -> Fragment {
    let mut text = Map::new();
    text.insert("test".to_string(), json!({ "regex": r"\.(?:html|jsx?|css|svg)$" }));
    text.extend(options.clone());
    text.insert("algorithm".to_string(), json!("zopfli-gzip"));

    let mut png = Map::new();
    png.insert("test".to_string(), json!({ "regex": r"\.png$" }));
    png.insert("deleteOriginalAssets".to_string(), json!(true));
    png.extend(options);
    png.insert("algorithm".to_string(), json!("zopfli-gzip"));

    plugins(vec![Plugin::new("CompressionPlugin")
        .arg(Value::Object(text))
        .arg(Value::Object(png))])
}

/// Publish the asset manifest for server-side HTML generation. Source maps
/// and `.gz` files are left out.
pub fn publish_manifest(options: Map<String, Value>) -> Fragment {
    let mut defaults = Map::new();
    defaults.insert("exclude".to_string(), json!({ "regex": r"\.(?:map|gz)$" }));
    defaults.insert("publicPath".to_string(), json!(true));

    plugins(vec![Plugin::new("WebpackAssetsManifest").arg(object(defaults, options))])
}

/// Resolve `process.env.NODE_ENV` statically to `"production"` so dead
/// branches can be dropped by the minifier.
pub fn make_non_production_code_strippable() -> Fragment {
    plugins(vec![Plugin::new("DefinePlugin")
        .arg(json!({ "process.env.NODE_ENV": "\"production\"" }))])
}

/// Scope hoisting for ES modules.
pub fn concatenate_modules() -> Fragment {
    plugins(vec![Plugin::new("ModuleConcatenationPlugin")])
}

/// Split npm modules into a `vendor` chunk and the runtime into its own,
/// with stable hashed module ids.
pub fn auto_vendor() -> Fragment {
    plugins(vec![
        Plugin::new("CommonsChunkPlugin").arg(json!({
            "name": "vendor",
            "minChunks": { "context": { "contains": "node_modules" } }
        })),
        Plugin::new("CommonsChunkPlugin").arg(json!({
            "name": "runtime",
            "minChunks": "Infinity"
        })),
        Plugin::new("HashedModuleIdsPlugin").arg(json!({
            "hashFunction": "sha256",
            "hashDigestLength": 6
        })),
    ])
}

/// Extract explicitly shared code into a `common` chunk.
pub fn extract_common_chunks(options: Map<String, Value>) -> Fragment {
    let mut defaults = Map::new();
    defaults.insert("name".to_string(), json!("common"));

    plugins(vec![Plugin::new("CommonsChunkPlugin").arg(object(defaults, options))])
}

/// Persistent module-level cache across builds.
pub fn use_module_level_cache(options: Option<Value>) -> Fragment {
    let mut plugin = Plugin::new("HardSourceWebpackPlugin");
    if let Some(options) = options {
        plugin = plugin.arg(options);
    }
    plugins(vec![plugin])
}
