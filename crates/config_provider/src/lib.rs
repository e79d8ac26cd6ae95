//! Configuration file discovery, format detection, and loading.
//!
//! `nextver-core` owns the `Config` data model and the branch-resolution
//! `Builder`; this crate owns only getting a `Config` off disk per spec.md
//! §6's search order, with YAML and TOML support and unknown-key
//! tolerance.
//!
//! ```no_run
//! use nextver_config::ConfigLoader;
//!
//! let loader = ConfigLoader::new(".");
//! let config = loader.load(None).expect("load configuration");
//! ```

pub mod errors;
pub mod formats;
pub mod loader;
pub mod validation;

pub use errors::{ConfigProviderError, ConfigProviderResult};
pub use formats::{ConfigFormat, FormatDetector};
pub use loader::ConfigLoader;
pub use validation::{validate, ValidationResult};
