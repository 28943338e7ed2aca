//! Images and fonts.
//!
//! Small files are inlined as `data:` URLs under `limit` bytes; larger ones
//! are emitted with a 16-char content hash in their name.

use fragment_merge::Fragment;
use serde_json::{json, Map, Value};

use super::{PartError, Rule, Scope, Step};

const DEFAULT_INLINE_LIMIT: u64 = 10_000;
const HASHED_NAME: &str = "[sha256:hash:16].[ext]";

#[derive(Debug, Clone, PartialEq)]
pub struct AssetOptions {
    pub scope: Scope,
    /// Inline threshold in bytes
    pub limit: u64,
}

impl Default for AssetOptions {
    fn default() -> Self {
        Self {
            scope: Scope::default(),
            limit: DEFAULT_INLINE_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageOptions {
    pub scope: Scope,
    pub limit: u64,
    /// Rework inlined SVGs so old IE renders them
    pub ie_safe_svgs: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            scope: Scope::default(),
            limit: DEFAULT_INLINE_LIMIT,
            ie_safe_svgs: true,
        }
    }
}

fn check_limit(part: &'static str, limit: u64) -> Result<(), PartError> {
    if limit == 0 {
        return Err(PartError::invalid(part, "limit", "must be greater than 0"));
    }
    Ok(())
}

/// Web fonts through `url-loader`.
pub fn load_fonts(options: AssetOptions) -> Result<Fragment, PartError> {
    check_limit("load_fonts", options.limit)?;

    let rule = Rule::new(r"\.(?:woff2?|eot|ttf|otf)$")
        .scoped(options.scope)
        .step(Step::with_options(
            "url-loader",
            json!({ "limit": options.limit, "name": HASHED_NAME }),
        ));
    rule.validate("load_fonts")?;
    Ok(Fragment::with_rules(vec![rule.to_value()]))
}

/// Raster images through `url-loader`, SVGs through `svg-url-loader`.
pub fn load_images(options: ImageOptions) -> Result<Fragment, PartError> {
    check_limit("load_images", options.limit)?;

    let raster = Rule::new(r"\.(?:jpe?g|png|gif|webp)$")
        .scoped(options.scope.clone())
        .step(Step::with_options(
            "url-loader",
            json!({ "limit": options.limit, "name": HASHED_NAME }),
        ));
    let svg = Rule::new(r"\.svg$").scoped(options.scope).step(Step::with_options(
        "svg-url-loader",
        json!({
            "iesafe": options.ie_safe_svgs,
            "limit": options.limit,
            "name": HASHED_NAME
        }),
    ));

    raster.validate("load_images")?;
    svg.validate("load_images")?;
    Ok(Fragment::with_rules(vec![raster.to_value(), svg.to_value()]))
}

/// Pass every image through imagemin. `optipng` is off and JPEG quality
/// defaults to 75; other keys are forwarded.
pub fn optimize_images(options: Map<String, Value>) -> Fragment {
    let mut merged = Map::new();
    merged.insert("optipng".to_string(), json!({ "enabled": false }));

    let mut mozjpeg = Map::new();
    mozjpeg.insert("quality".to_string(), json!(75));
    for (key, value) in options {
        match (key.as_str(), value) {
            ("mozjpeg", Value::Object(user)) => mozjpeg.extend(user),
            (_, value) => {
                merged.insert(key, value);
            }
        }
    }
    merged.insert("mozjpeg".to_string(), Value::Object(mozjpeg));

    let rule = Rule::new(r"\.(?:jpe?g|png|gif|webp|svg)$").step(Step::with_options(
        "image-webpack-loader",
        Value::Object(merged),
    ));
    Fragment::with_rules(vec![rule.to_value()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_fonts_defaults() {
        let fragment = load_fonts(AssetOptions::default()).unwrap();
        let step = &fragment.rules()[0]["use"][0];

        assert_eq!(step["loader"], "url-loader");
        assert_eq!(step["options"]["limit"], 10000);
        assert_eq!(step["options"]["name"], HASHED_NAME);
    }

    #[test]
    fn test_load_fonts_zero_limit_rejected() {
        let err = load_fonts(AssetOptions {
            limit: 0,
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("limit"));
        assert!(err.to_string().contains("load_fonts"));
    }

    #[test]
    fn test_load_images_two_rules() {
        let fragment = load_images(ImageOptions {
            limit: 4096,
            ie_safe_svgs: false,
            ..Default::default()
        })
        .unwrap();
        let rules = fragment.rules();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0]["use"][0]["options"]["limit"], 4096);
        assert_eq!(rules[1]["test"], r"\.svg$");
        assert_eq!(rules[1]["use"][0]["loader"], "svg-url-loader");
        assert_eq!(rules[1]["use"][0]["options"]["iesafe"], false);
    }

    #[test]
    fn test_optimize_images_defaults() {
        let fragment = optimize_images(Map::new());
        let options = &fragment.rules()[0]["use"][0]["options"];

        assert_eq!(options["optipng"]["enabled"], false);
        assert_eq!(options["mozjpeg"]["quality"], 75);
    }

    #[test]
    fn test_optimize_images_merges_mozjpeg() {
        let mut user = Map::new();
        user.insert("mozjpeg".to_string(), json!({ "progressive": true }));
        user.insert("optipng".to_string(), json!({ "enabled": true }));

        let fragment = optimize_images(user);
        let options = &fragment.rules()[0]["use"][0]["options"];

        assert_eq!(options["mozjpeg"]["quality"], 75);
        assert_eq!(options["mozjpeg"]["progressive"], true);
        assert_eq!(options["optipng"]["enabled"], true);
    }
}
