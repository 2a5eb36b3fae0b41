// Fixed 1.12.x options baseline written before a modpack launch so the game
// starts from a known-good state regardless of launcher settings. Key
// bindings use the numeric codes 1.12 expects.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::options::reconciler::OPTIONS_FILE;

const DEFAULT_MODPACK_OPTIONS: &[&str] = &[
    "version:1343",
    "invertYMouse:false",
    "mouseSensitivity:0.50",
    "fov:0",
    "gamma:0.50",
    "saturation:0.0",
    "renderDistance:12",
    "guiScale:0",
    "particles:0",
    "bobView:true",
    "anaglyph3d:false",
    "maxFps:120",
    "fboEnable:true",
    "difficulty:2",
    "fancyGraphics:true",
    "ao:2",
    "renderClouds:true",
    "resourcePacks:[]",
    "incompatibleResourcePacks:[]",
    "lastServer:",
    "lang:en_us",
    "chatVisibility:0",
    "chatColors:true",
    "chatLinks:true",
    "chatLinksPrompt:true",
    "chatOpacity:1.0",
    "snooperEnabled:true",
    "fullscreen:false",
    "enableVsync:false",
    "useVbo:true",
    "hideServerAddress:false",
    "advancedItemTooltips:false",
    "pauseOnLostFocus:true",
    "touchscreen:false",
    "overrideWidth:0",
    "overrideHeight:0",
    "heldItemTooltips:true",
    "chatHeightFocused:1.0",
    "chatHeightUnfocused:0.4375",
    "chatScale:1.0",
    "chatWidth:1.0",
    "mipmapLevels:4",
    "forceUnicodeFont:false",
    "reducedDebugInfo:false",
    "useNativeTransport:true",
    "entityShadows:true",
    "mainHand:right",
    "attackIndicator:1",
    "showSubtitles:false",
    "realmsNotifications:true",
    "enableWeakAttacks:false",
    "autoJump:false",
    "narrator:0",
    "tutorialStep:none",
    "fovEffectScale:1.0",
    "rawMouseInput:true",
    "soundCategory_master:1.0",
    "soundCategory_music:0.00",
    "soundCategory_record:1.0",
    "soundCategory_weather:1.0",
    "soundCategory_block:1.0",
    "soundCategory_hostile:1.0",
    "soundCategory_neutral:1.0",
    "soundCategory_player:1.0",
    "soundCategory_ambient:1.0",
    "soundCategory_voice:1.0",
    "soundCategory_ui:1.0",
    "modelPart_cape:true",
    "modelPart_jacket:true",
    "modelPart_left_sleeve:true",
    "modelPart_right_sleeve:true",
    "modelPart_left_pants_leg:true",
    "modelPart_right_pants_leg:true",
    "modelPart_hat:true",
    "key_key.attack:-100",
    "key_key.use:-99",
    "key_key.forward:17",
    "key_key.left:30",
    "key_key.back:31",
    "key_key.right:32",
    "key_key.jump:57",
    "key_key.sneak:42",
    "key_key.sprint:29",
    "key_key.drop:16",
    "key_key.inventory:18",
    "key_key.chat:20",
    "key_key.playerlist:15",
    "key_key.pickItem:-98",
    "key_key.command:53",
    "key_key.screenshot:60",
    "key_key.togglePerspective:63",
    "key_key.smoothCamera:0",
    "key_key.fullscreen:87",
    "key_key.spectatorOutlines:0",
    "key_key.swapHands:33",
    "key_key.saveToolbarActivator:46",
    "key_key.loadToolbarActivator:45",
    "key_key.advancements:38",
    "key_key.hotbar.1:2",
    "key_key.hotbar.2:3",
    "key_key.hotbar.3:4",
    "key_key.hotbar.4:5",
    "key_key.hotbar.5:6",
    "key_key.hotbar.6:7",
    "key_key.hotbar.7:8",
    "key_key.hotbar.8:9",
    "key_key.hotbar.9:10",
];

/// Overwrite `<root>/options.txt` with the stock modpack baseline.
pub async fn write_default_modpack_options(root: &Path) -> LauncherResult<PathBuf> {
    let options_path = root.join(OPTIONS_FILE);
    if let Some(parent) = options_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| LauncherError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
    }

    tokio::fs::write(&options_path, DEFAULT_MODPACK_OPTIONS.join("\r\n"))
        .await
        .map_err(|e| LauncherError::Io {
            path: options_path.clone(),
            source: e,
        })?;

    info!(
        "Wrote {} default modpack options to {:?}",
        DEFAULT_MODPACK_OPTIONS.len(),
        options_path
    );
    Ok(options_path)
}
