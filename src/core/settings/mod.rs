pub mod profile;
pub mod store;

pub use profile::{ProfileKind, ProfileSettings};
pub use store::{SettingsBundle, SettingsStore};
