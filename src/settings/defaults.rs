//! Built-in assembly settings (layer 1)
//!
//! Hardcoded defaults for every assembly setting.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::switch::Switch;

/// Project directories, relative to the project root unless absolute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSettings {
    /// Bundle output directory (default: "dist")
    pub build: String,

    /// Application entry directory (default: "src")
    pub source: String,

    /// Directory copied verbatim into the output (default: "static")
    #[serde(rename = "static")]
    pub static_dir: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevServerSettings {
    /// Listening port (default: 3004)
    pub port: u16,

    /// Hot reload: true, false or "only" (default: true)
    pub hot: Switch,

    /// Open a browser: true, false or a page path (default: false)
    pub open: Switch,

    /// Proxy table forwarded to the dev server
    pub proxy: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HtmlSettings {
    pub title: String,

    /// Inline the runtime chunk into the page (default: true)
    pub inline_runtime: bool,
}

/// UMD library build of the demo transforms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibrarySettings {
    pub filename: String,

    /// CommonJS export name
    pub commonjs: String,

    /// AMD module name
    pub amd: String,

    /// Global variable name
    pub root: String,
}

/// All settings consumed by assembly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblySettings {
    pub paths: PathSettings,
    pub dev_server: DevServerSettings,
    pub html: HtmlSettings,

    /// Scoped class names for styles (default: true)
    pub css_modules: bool,

    /// Inline threshold for images and fonts, in bytes (default: 10000)
    pub inline_limit: u64,

    pub library: LibrarySettings,
}

impl Default for AssemblySettings {
    fn default() -> Self {
        Self {
            paths: PathSettings {
                build: "dist".to_string(),
                source: "src".to_string(),
                static_dir: "static".to_string(),
            },
            dev_server: DevServerSettings {
                port: 3004,
                hot: Switch::On,
                open: Switch::Off,
                proxy: json!({
                    "/api": {
                        "target": "https://jsonplaceholder.typicode.com",
                        "pathRewrite": { "^/api": "" },
                        "changeOrigin": true
                    }
                }),
            },
            html: HtmlSettings {
                title: "Webpack 4 - First Steps".to_string(),
                inline_runtime: true,
            },
            css_modules: true,
            inline_limit: 10_000,
            library: LibrarySettings {
                filename: "string-tricks.js".to_string(),
                commonjs: "stringTricks".to_string(),
                amd: "string-tricks".to_string(),
                root: "stringTricks".to_string(),
            },
        }
    }
}

impl AssemblySettings {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> Value {
        json!({
            "paths": {
                "build": self.paths.build,
                "source": self.paths.source,
                "static": self.paths.static_dir
            },
            "dev_server": {
                "port": self.dev_server.port,
                "hot": self.dev_server.hot,
                "open": self.dev_server.open,
                "proxy": self.dev_server.proxy
            },
            "html": {
                "title": self.html.title,
                "inline_runtime": self.html.inline_runtime
            },
            "css_modules": self.css_modules,
            "inline_limit": self.inline_limit,
            "library": {
                "filename": self.library.filename,
                "commonjs": self.library.commonjs,
                "amd": self.library.amd,
                "root": self.library.root
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = AssemblySettings::default();
        assert_eq!(defaults.paths.build, "dist");
        assert_eq!(defaults.paths.source, "src");
        assert_eq!(defaults.dev_server.port, 3004);
        assert_eq!(defaults.dev_server.hot, Switch::On);
        assert!(defaults.css_modules);
        assert_eq!(defaults.inline_limit, 10_000);
    }

    #[test]
    fn test_to_value() {
        let value = AssemblySettings::default().to_value();

        assert_eq!(value["paths"]["static"], "static");
        assert_eq!(value["dev_server"]["hot"], true);
        assert_eq!(value["dev_server"]["open"], false);
        assert_eq!(value["library"]["amd"], "string-tricks");
    }

    #[test]
    fn test_to_value_deserializes_back() {
        let defaults = AssemblySettings::default();
        let parsed: AssemblySettings = serde_json::from_value(defaults.to_value()).unwrap();
        assert_eq!(parsed, defaults);
    }
}
