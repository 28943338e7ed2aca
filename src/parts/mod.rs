//! Part factories
//!
//! Each factory turns a small options struct into a [`Fragment`]. Factories
//! are pure, except the extraction parts which share sinks through an
//! [`ExtractRegistry`](crate::registry::ExtractRegistry).
//!
//! Option shapes are checked at call time: bad patterns and out-of-range
//! values fail with [`PartError::InvalidOption`] naming the part and field.

mod assets;
mod dev;
mod html;
mod optimize;
mod plugin;
mod rule;
mod script;
mod style;

pub use assets::{load_fonts, load_images, optimize_images, AssetOptions, ImageOptions};
pub use dev::{
    clean_dist, dashboard, dev_server, error_overlay, generate_source_maps, monitor,
    DevServerOptions, DEFAULT_DEVTOOL,
};
pub use html::{copy_static, html, inline_runtime, HtmlOptions};
pub use optimize::{
    auto_vendor, compress_files, concatenate_modules, extract_common_chunks,
    ignore_dynamic_requires_for, ignore_moment_locales, make_non_production_code_strippable,
    minify_all, publish_manifest, safe_assets, use_module_level_cache,
};
pub use plugin::Plugin;
pub use rule::{Condition, Rule, Scope, Step};
pub use script::{babelize, lint_js, BabelOptions, LoaderOptions, LintOptions};
pub use style::{
    extract_css, extract_sass, load_css, load_sass, CssModules, StyleOptions, EXTRACT_LOADER,
};

/// Errors raised by part factories
#[derive(Debug, thiserror::Error)]
pub enum PartError {
    #[error("Invalid option `{field}` for part `{part}`: {reason}")]
    InvalidOption {
        part: &'static str,
        field: &'static str,
        reason: String,
    },
}

impl PartError {
    pub(crate) fn invalid(part: &'static str, field: &'static str, reason: impl Into<String>) -> Self {
        PartError::InvalidOption {
            part,
            field,
            reason: reason.into(),
        }
    }
}

/// Ensure `pattern` compiles as a regular expression.
pub(crate) fn check_pattern(
    part: &'static str,
    field: &'static str,
    pattern: &str,
) -> Result<(), PartError> {
    regex_lite::Regex::new(pattern)
        .map(|_| ())
        .map_err(|e| PartError::invalid(part, field, format!("bad pattern `{}`: {}", pattern, e)))
}
