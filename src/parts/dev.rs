//! Developer experience: source maps, dev server, dashboards.

use fragment_merge::Fragment;
use serde_json::{json, Map, Value};

use super::{PartError, Plugin};
use crate::switch::Switch;

/// Line-accurate maps of the original (pre-transpilation) source.
pub const DEFAULT_DEVTOOL: &str = "cheap-module-source-map";

/// Set `devtool`; `None` picks [`DEFAULT_DEVTOOL`].
pub fn generate_source_maps(devtool: Option<&str>) -> Fragment {
    Fragment::new().set("devtool", json!(devtool.unwrap_or(DEFAULT_DEVTOOL)))
}

/// Dev server settings.
///
/// `hot` takes `On`, `Off` or `Named("only")` (hot-only: no full reload on
/// failure). `open` takes `On`, `Off` or `Named(page)` to open a given page.
#[derive(Debug, Clone, PartialEq)]
pub struct DevServerOptions {
    pub content_base: Option<String>,
    pub hot: Switch,
    pub https: Option<bool>,
    pub open: Switch,
    /// Filesystem polling, for environments without native watch events
    pub poll: Option<bool>,
    pub port: Option<u16>,
    /// Forwarded verbatim
    pub proxy: Option<Value>,
}

impl Default for DevServerOptions {
    fn default() -> Self {
        Self {
            content_base: None,
            hot: Switch::On,
            https: None,
            open: Switch::Off,
            poll: None,
            port: None,
            proxy: None,
        }
    }
}

/// Customize the dev server. Deep linking is always on: unknown URLs fall
/// back to `/index.html`.
pub fn dev_server(options: DevServerOptions) -> Result<Fragment, PartError> {
    let mut server = Map::new();
    if let Some(content_base) = options.content_base {
        server.insert("contentBase".to_string(), json!(content_base));
    }
    server.insert("historyApiFallback".to_string(), json!(true));
    if let Some(https) = options.https {
        server.insert("https".to_string(), json!(https));
    }
    server.insert("noInfo".to_string(), json!(true));
    server.insert("overlay".to_string(), json!(true));
    if let Some(port) = options.port {
        if port == 0 {
            return Err(PartError::invalid("dev_server", "port", "must be greater than 0"));
        }
        server.insert("port".to_string(), json!(port));
    }
    if let Some(proxy) = options.proxy {
        server.insert("proxy".to_string(), proxy);
    }

    match options.hot {
        Switch::Named(ref mode) if mode == "only" => {
            server.insert("hotOnly".to_string(), json!(true));
        }
        Switch::Named(ref other) => {
            return Err(PartError::invalid(
                "dev_server",
                "hot",
                format!("expected true, false or \"only\", got {:?}", other),
            ));
        }
        ref flag => {
            server.insert("hot".to_string(), json!(flag.is_enabled()));
        }
    }

    if let Some(poll) = options.poll {
        server.insert("watchOptions".to_string(), json!({ "poll": poll }));
    }

    match options.open {
        Switch::Named(page) if page.is_empty() => {
            return Err(PartError::invalid("dev_server", "open", "empty page"));
        }
        Switch::Named(page) => {
            server.insert("openPage".to_string(), json!(page));
        }
        flag => {
            server.insert("open".to_string(), json!(flag.is_enabled()));
        }
    }

    let mut fragment = Fragment::new().set("devServer", Value::Object(server));
    if options.hot.is_enabled() {
        fragment = fragment.set(
            "plugins",
            json!([
                Plugin::new("HotModuleReplacementPlugin").to_value(),
                Plugin::new("NamedModulesPlugin").to_value()
            ]),
        );
    }
    Ok(fragment)
}

fn single(plugin: Plugin) -> Fragment {
    Fragment::with_plugins(vec![plugin.to_value()])
}

fn with_optional_arg(name: &str, options: Option<Value>) -> Plugin {
    let plugin = Plugin::new(name);
    match options {
        Some(options) => plugin.arg(options),
        None => plugin,
    }
}

/// Serve build stats to the dashboard CLI.
pub fn dashboard(options: Option<Value>) -> Fragment {
    single(with_optional_arg("WebpackDashboardPlugin", options))
}

/// Full-page overlay for runtime errors in the browser.
pub fn error_overlay() -> Fragment {
    single(Plugin::new("ErrorOverlayPlugin"))
}

/// Record build stats between runs for comparison. Launches the monitor UI
/// by default.
pub fn monitor(options: Option<Value>) -> Fragment {
    single(Plugin::new("WebpackMonitor").arg(options.unwrap_or_else(|| json!({ "launch": true }))))
}

/// Purge the output directories before building.
pub fn clean_dist(paths: Vec<String>, options: Option<Value>) -> Fragment {
    let mut plugin = Plugin::new("CleanWebpackPlugin");
    if !paths.is_empty() {
        plugin = plugin.arg(json!(paths));
    }
    if let Some(options) = options {
        plugin = plugin.arg(options);
    }
    single(plugin)
}
