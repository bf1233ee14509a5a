//! Service layer: persistence, access scoping, asset generation, metrics.

pub mod access;
pub mod assets;
pub mod database;
pub mod guard;
pub mod metrics;

pub use access::{site_scope, SiteScope};
pub use assets::{AssetStore, LocalAssetStore};
pub use database::Database;
pub use metrics::{get_metrics, init_metrics};
