mod context;

pub use context::{ContextConfig, LauncherContext, DEFAULT_MANIFEST_URLS};
