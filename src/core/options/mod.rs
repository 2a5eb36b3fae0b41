pub mod modpack_defaults;
pub mod reconciler;
pub mod store;

pub use reconciler::{apply_user_options, AppliedOptions};
pub use store::OptionsMap;
