// ─── Modpack sync ───
// Remote manifest model, the sync engine that diffs it against the local
// snapshot, and the prune pass that removes unlisted files.

pub mod engine;
pub mod manifest;
pub mod prune;

pub use engine::{ManifestSyncEngine, UpdateCheck, LOCAL_MANIFEST_FILE};
pub use manifest::{ForgeFiles, Manifest};
