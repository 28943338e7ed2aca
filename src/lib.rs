//! webpack-parts - composable bundler configuration
//!
//! Small part factories each return a configuration fragment; profiles are
//! assembled by merging a shared core with profile-specific parts in a fixed
//! order. Merging lives in the `fragment-merge` crate, the demo string
//! transforms in `string-tricks`.

pub mod assembly;
pub mod parts;
pub mod registry;
pub mod settings;
pub mod switch;

pub use assembly::{Assembler, AssemblyEnv, AssemblyError, AssemblyReport, Profile};
pub use fragment_merge::{Composer, Fragment, MergeError, MergeStrategy};
pub use parts::PartError;
pub use registry::ExtractRegistry;
pub use settings::{AssemblySettings, EffectiveSettings, SettingsError};
pub use switch::Switch;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "webpack_parts=info";

/// Install the stderr subscriber. Stdout stays reserved for configuration
/// output. Call once, at the start of `main`.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
