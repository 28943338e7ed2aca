//! Profile assembly
//!
//! Composes the shared core with profile-specific parts in a fixed order.
//! Order is precedence: later fragments win scalar conflicts, sequences
//! append (and coalesce by `test` in the profile stage).
//!
//! | Stage | Merge | Fragments |
//! |-------|-------|-----------|
//! | core | plain | base, source maps, babel, moment locales, lint, static, images, fonts, html, safe assets |
//! | development | smart | core, mode, dev server, error overlay, dashboard, css, sass |
//! | production | smart | clean, core, mode + hashed output, source maps, extract css/sass, minify, images, compression, manifest, monitor? |

mod env;
mod report;

pub use env::{AssemblyEnv, Profile};
pub use report::AssemblyReport;

use fragment_merge::{Composer, Fragment, MergeError};
use serde_json::{json, Map};
use std::path::Path;
use tracing::info;

use crate::parts::{self, PartError};
use crate::parts::{
    AssetOptions, BabelOptions, Condition, CssModules, DevServerOptions, HtmlOptions,
    ImageOptions, LintOptions, Scope, StyleOptions,
};
use crate::registry::ExtractRegistry;
use crate::settings::AssemblySettings;

/// Assembly errors
#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("Part error: {0}")]
    Part(#[from] PartError),

    #[error("Merge error: {0}")]
    Merge(#[from] MergeError),

    #[error("Fingerprint error: {0}")]
    Fingerprint(String),
}

/// Absolute project directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub build: String,
    pub source: String,
    pub static_dir: String,
}

impl ResolvedPaths {
    /// Resolve settings paths against `root`; absolute paths are kept.
    pub fn resolve(root: &Path, settings: &AssemblySettings) -> Self {
        let join = |p: &str| root.join(p).to_string_lossy().to_string();
        Self {
            build: join(&settings.paths.build),
            source: join(&settings.paths.source),
            static_dir: join(&settings.paths.static_dir),
        }
    }
}

/// Builds final configurations from settings and environment toggles.
#[derive(Debug)]
pub struct Assembler<'a> {
    settings: &'a AssemblySettings,
    paths: ResolvedPaths,
    env: AssemblyEnv,
}

impl<'a> Assembler<'a> {
    pub fn new(settings: &'a AssemblySettings, root: &Path, env: AssemblyEnv) -> Self {
        Self {
            settings,
            paths: ResolvedPaths::resolve(root, settings),
            env,
        }
    }

    pub fn paths(&self) -> &ResolvedPaths {
        &self.paths
    }

    /// Assemble one profile. Every call gets a fresh extraction registry.
    pub fn assemble(&self, profile: Profile) -> Result<Fragment, AssemblyError> {
        let mut registry = ExtractRegistry::new();
        let config = match profile {
            Profile::Development => self.development()?,
            Profile::Production => self.production(&mut registry)?,
        };

        info!(
            profile = %profile,
            rules = config.rules().len(),
            plugins = config.plugins().len(),
            extract_sinks = registry.len(),
            "assembled profile"
        );
        Ok(config)
    }

    /// Configuration shared by both profiles.
    pub fn core(&self) -> Result<Fragment, AssemblyError> {
        let base = Fragment::from_value(json!({
            // Object entry, so extra entries can be split out later
            "entry": { "main": [self.paths.source] },
            "output": {
                "devtoolModuleFilenameTemplate": "webpack:///[resource-path]",
                "filename": "[name].js",
                "path": self.paths.build,
                "publicPath": "/"
            },
            "optimization": {
                "runtimeChunk": true,
                "splitChunks": { "chunks": "all" }
            }
        }))?;

        let own_sources = Scope::skip_node_modules().include(Condition::path(&self.paths.source));
        let limit = self.settings.inline_limit;

        let fragments = vec![
            Some(parts::generate_source_maps(None)),
            Some(parts::babelize(BabelOptions {
                scope: own_sources.clone(),
                ..Default::default()
            })?),
            Some(parts::ignore_moment_locales()),
            Some(parts::lint_js(LintOptions { scope: own_sources })?),
            Some(parts::copy_static([self.paths.static_dir.as_str()])),
            Some(parts::load_images(ImageOptions {
                limit,
                ..Default::default()
            })?),
            Some(parts::load_fonts(AssetOptions {
                limit,
                ..Default::default()
            })?),
            Some(parts::html(HtmlOptions {
                title: Some(self.settings.html.title.clone()),
                inline_runtime: self.settings.html.inline_runtime,
                ..Default::default()
            })),
            Some(parts::safe_assets()),
        ];

        Ok(Composer::plain().compose(base, fragments)?)
    }

    fn css_modules(&self) -> CssModules {
        if self.settings.css_modules {
            CssModules::On
        } else {
            CssModules::Off
        }
    }

    fn development(&self) -> Result<Fragment, AssemblyError> {
        let server = &self.settings.dev_server;

        let fragments = vec![
            Some(Fragment::new().set("mode", json!("development"))),
            Some(parts::dev_server(DevServerOptions {
                hot: server.hot.clone(),
                open: server.open.clone(),
                poll: self.env.poll,
                port: Some(server.port),
                proxy: Some(server.proxy.clone()),
                ..Default::default()
            })?),
            Some(parts::error_overlay()),
            Some(parts::dashboard(None)),
            Some(parts::load_css(StyleOptions::modules(self.css_modules()))?),
            Some(parts::load_sass(StyleOptions::modules(self.css_modules()))?),
        ];

        Ok(Composer::smart().compose(self.core()?, fragments)?)
    }

    fn production(&self, registry: &mut ExtractRegistry) -> Result<Fragment, AssemblyError> {
        // Hashed file names change between builds, so purge first
        let clean = parts::clean_dist(vec![self.paths.build.clone()], None);

        let fragments = vec![
            Some(self.core()?),
            Some(Fragment::from_value(json!({
                "mode": "production",
                "output": { "filename": "[name].[chunkhash:8].js" },
                "stats": { "optimizationBailout": true }
            }))?),
            Some(parts::generate_source_maps(Some("source-map"))),
            Some(parts::extract_css(registry, StyleOptions::modules(self.css_modules()))?),
            Some(parts::extract_sass(registry, StyleOptions::modules(self.css_modules()))?),
            Some(parts::minify_all(Map::new())),
            Some(parts::optimize_images(Map::new())),
            Some(parts::compress_files(Map::new())),
            Some(parts::publish_manifest(Map::new())),
            self.env.monitor.then(|| parts::monitor(None)),
        ];

        Ok(Composer::smart().compose(clean, fragments)?)
    }

    /// UMD build of the demo transforms library, usable from CommonJS, AMD
    /// and a plain `<script>` tag.
    pub fn library(&self) -> Result<Fragment, AssemblyError> {
        let library = &self.settings.library;
        let config = Fragment::from_value(json!({
            "entry": self.paths.source,
            "output": {
                "path": self.paths.build,
                "filename": library.filename,
                "library": {
                    "commonjs": library.commonjs,
                    "amd": library.amd,
                    "root": library.root
                },
                "libraryTarget": "umd",
                "umdNamedDefine": true
            }
        }))?;

        info!(filename = %library.filename, "assembled library");
        Ok(config)
    }
}
