//! HTML generation and static files.

use fragment_merge::Fragment;
use serde_json::{json, Map, Value};

use super::Plugin;

/// Options for the generated `index.html`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlOptions {
    pub title: Option<String>,
    /// Extra `<meta>` tags; a responsive viewport is always present unless
    /// overridden here
    pub meta: Map<String, Value>,
    /// Inline the runtime chunk into the page
    pub inline_runtime: bool,
    /// Forwarded verbatim to the plugin
    pub extra: Map<String, Value>,
}

/// Generate `index.html` with the right `<script>` and `<link>` tags. Can be
/// composed several times for several pages.
pub fn html(options: HtmlOptions) -> Fragment {
    let mut args = options.extra;
    if let Some(title) = options.title {
        args.insert("title".to_string(), Value::String(title));
    }

    let mut meta = Map::new();
    meta.insert(
        "viewport".to_string(),
        json!("width=device-width, initial-scale=1"),
    );
    meta.extend(options.meta);
    args.insert("meta".to_string(), Value::Object(meta));

    let mut plugins = vec![Plugin::new("HtmlWebpackPlugin").arg(Value::Object(args)).to_value()];
    if options.inline_runtime {
        plugins.extend(inline_runtime(Map::new()).plugins().iter().cloned());
    }
    Fragment::with_plugins(plugins)
}

/// Inline the `runtime` chunk into the generated HTML, saving a request at
/// startup. Needs `optimization.runtimeChunk`.
pub fn inline_runtime(options: Map<String, Value>) -> Fragment {
    let mut args = Map::new();
    args.insert("inlineChunks".to_string(), json!(["runtime"]));
    args.insert("quiet".to_string(), json!(true));
    args.extend(options);

    Fragment::with_plugins(vec![Plugin::new("HtmlWebpackInlineChunkPlugin")
        .arg(Value::Object(args))
        .to_value()])
}

/// Copy the given directories recursively into the output path.
pub fn copy_static<I, S>(dirs: I) -> Fragment
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let dirs: Vec<Value> = dirs.into_iter().map(|d| Value::String(d.into())).collect();
    Fragment::with_plugins(vec![Plugin::new("CopyPlugin").arg(Value::Array(dirs)).to_value()])
}
