// ─── OptionsReconciler ───
// Applies a normalized profile onto the game's options.txt. Only the managed
// keys below are ever overwritten; anything else already in the file (hand
// edits, mod-added keys) is preserved verbatim.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::options::store::{self, OptionsMap};
use crate::core::settings::profile::ProfileSettings;

pub const OPTIONS_FILE: &str = "options.txt";

/// Baseline values filled in when absent from both the existing file and the
/// managed overlay.
const BASELINE_DEFAULTS: &[(&str, &str)] = &[
    ("fullscreen", "false"),
    ("fov", "87"),
    ("gamma", "0.5"),
    ("fovEffectScale", "1.0"),
    ("particles", "0"),
    ("maxFps", "120"),
    ("autoJump", "false"),
    ("rawMouseInput", "true"),
    ("mouseSensitivity", "1.0"),
    ("enableVsync", "true"),
    ("soundCategory_music", "0.0"),
    ("key_key.sprint", "key.keyboard.left.control"),
    ("key_key.sneak", "key.keyboard.left.shift"),
];

/// Result of a verified options write.
#[derive(Debug, Clone)]
pub struct AppliedOptions {
    pub path: PathBuf,
    pub verified: String,
}

/// Load the existing options file (or start from a blank slate when `reset`),
/// fill missing baseline keys, overlay the managed keys computed from
/// `settings`, and write back with verification.
pub async fn apply_user_options(
    settings: &ProfileSettings,
    root: &Path,
    reset: bool,
) -> LauncherResult<AppliedOptions> {
    let settings = settings.normalized();
    let options_path = root.join(OPTIONS_FILE);

    tokio::fs::create_dir_all(root)
        .await
        .map_err(|e| LauncherError::Io {
            path: root.to_path_buf(),
            source: e,
        })?;

    let mut map = if reset {
        OptionsMap::new()
    } else {
        store::load(&options_path).await
    };

    for (key, value) in BASELINE_DEFAULTS {
        map.entry((*key).to_string())
            .or_insert_with(|| (*value).to_string());
    }

    let merged = store::merge(&map, &managed_overlay(&settings));
    let verified = store::write_verified(&options_path, &merged).await?;
    info!("Applied user options to {:?}", options_path);
    Ok(AppliedOptions {
        path: options_path,
        verified,
    })
}

/// The fixed set of keys this launcher owns in options.txt.
fn managed_overlay(settings: &ProfileSettings) -> BTreeMap<String, Option<String>> {
    let mut overlay = BTreeMap::new();
    let mut set = |key: &str, value: String| {
        overlay.insert(key.to_string(), Some(value));
    };

    set("fullscreen", bool_str(settings.fullscreen));
    if settings.fullscreen {
        // The game picks the display size; zero disables the overrides.
        set("overrideWidth", "0".to_string());
        set("overrideHeight", "0".to_string());
    } else {
        set("overrideWidth", settings.window_width.to_string());
        set("overrideHeight", settings.window_height.to_string());
    }
    set("fov", settings.fov.to_string());
    set("mouseSensitivity", settings.sensitivity.to_string());
    set("gamma", settings.gamma.to_string());
    set(
        "soundCategory_music",
        format!("{:.2}", settings.music_vol as f64 / 100.0),
    );
    set("maxFps", settings.max_fps.to_string());
    set("renderDistance", settings.render_distance.to_string());
    set(
        "simulationDistance",
        settings.simulation_distance.to_string(),
    );
    set("enableVsync", bool_str(settings.enable_vsync));
    set("key_key.sprint", settings.key_sprint.clone());
    set("key_key.sneak", settings.key_sneak.clone());

    overlay
}

fn bool_str(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}
