use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named settings configuration. The launcher keeps one per game flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Vanilla,
    Modpack,
}

impl ProfileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKind::Vanilla => "vanilla",
            ProfileKind::Modpack => "modpack",
        }
    }
}

impl std::str::FromStr for ProfileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vanilla" => Ok(ProfileKind::Vanilla),
            "modpack" => Ok(ProfileKind::Modpack),
            other => Err(format!("Unknown profile '{}'", other)),
        }
    }
}

/// Per-profile game settings. Every field is guaranteed in-range once
/// `from_raw`/`normalized` has run; callers never observe out-of-range values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSettings {
    #[serde(rename = "ramMB")]
    pub ram_mb: u32,
    pub fullscreen: bool,
    pub close_launcher: bool,
    pub enable_vsync: bool,
    pub window_width: u32,
    pub window_height: u32,
    pub key_sneak: String,
    pub key_sprint: String,
    pub fov: u32,
    pub sensitivity: f64,
    pub gamma: f64,
    pub music_vol: u32,
    pub max_fps: u32,
    pub render_distance: u32,
    pub simulation_distance: u32,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            ram_mb: 4000,
            fullscreen: false,
            close_launcher: false,
            enable_vsync: false,
            window_width: 854,
            window_height: 480,
            key_sneak: "key.keyboard.left.shift".to_string(),
            key_sprint: "key.keyboard.left.control".to_string(),
            fov: 90,
            sensitivity: 0.5,
            gamma: 0.5,
            music_vol: 50,
            max_fps: 120,
            render_distance: 12,
            simulation_distance: 12,
        }
    }
}

impl ProfileSettings {
    /// Build a fully-populated, in-range record from arbitrary JSON.
    ///
    /// Missing, wrong-typed, or non-finite fields fall back to the field's
    /// default before clamping. This never fails: a broken settings file must
    /// not hard-fail a launch.
    pub fn from_raw(raw: &Value) -> Self {
        let d = Self::default();

        // Percent-like sensitivity (> 2) is converted to the 0-2 scale first.
        let mut sensitivity = num_field(raw, "sensitivity").unwrap_or(d.sensitivity);
        if sensitivity > 2.0 {
            sensitivity /= 100.0;
        }

        // 0 means "unlimited" and bypasses the clamp; negatives collapse to 0.
        let max_fps = match num_field(raw, "maxFps") {
            Some(v) if v <= 0.0 => 0,
            other => clamp_u32(other, 30, 260, d.max_fps),
        };

        Self {
            ram_mb: clamp_u32(num_field(raw, "ramMB"), 1000, 20000, d.ram_mb),
            fullscreen: bool_field(raw, "fullscreen", d.fullscreen),
            close_launcher: bool_field(raw, "closeLauncher", d.close_launcher),
            enable_vsync: bool_field(raw, "enableVsync", d.enable_vsync),
            window_width: clamp_u32(num_field(raw, "windowWidth"), 640, 5120, d.window_width),
            window_height: clamp_u32(num_field(raw, "windowHeight"), 480, 2880, d.window_height),
            key_sneak: string_field(raw, "keySneak", &d.key_sneak),
            key_sprint: string_field(raw, "keySprint", &d.key_sprint),
            fov: clamp_u32(num_field(raw, "fov"), 30, 120, d.fov),
            sensitivity: sensitivity.clamp(0.1, 2.0),
            gamma: clamp_f64(num_field(raw, "gamma"), 0.0, 5.0, d.gamma),
            music_vol: clamp_u32(num_field(raw, "musicVol"), 0, 100, d.music_vol),
            max_fps,
            render_distance: clamp_u32(num_field(raw, "renderDistance"), 5, 32, d.render_distance),
            simulation_distance: clamp_u32(
                num_field(raw, "simulationDistance"),
                5,
                32,
                d.simulation_distance,
            ),
        }
    }

    /// Re-run normalization on an already-typed record. Idempotent.
    pub fn normalized(&self) -> Self {
        match serde_json::to_value(self) {
            Ok(value) => Self::from_raw(&value),
            Err(_) => Self::default(),
        }
    }

    /// Overlay a partial JSON value map onto this record and normalize.
    pub fn merge_raw(&self, values: &Value) -> Self {
        let mut base = serde_json::to_value(self).unwrap_or(Value::Null);
        if let (Some(obj), Some(patch)) = (base.as_object_mut(), values.as_object()) {
            for (key, value) in patch {
                obj.insert(key.clone(), value.clone());
            }
        }
        Self::from_raw(&base)
    }
}

// Numbers arrive as JSON numbers or numeric strings; anything non-finite is
// treated as absent so the field default applies.
fn num_field(raw: &Value, key: &str) -> Option<f64> {
    match raw.get(key)? {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn bool_field(raw: &Value, key: &str, fallback: bool) -> bool {
    match raw.get(key) {
        None => fallback,
        Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn string_field(raw: &Value, key: &str, fallback: &str) -> String {
    match raw.get(key) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => fallback.to_string(),
    }
}

fn clamp_f64(value: Option<f64>, min: f64, max: f64, fallback: f64) -> f64 {
    match value {
        Some(v) => v.clamp(min, max),
        None => fallback,
    }
}

fn clamp_u32(value: Option<f64>, min: u32, max: u32, fallback: u32) -> u32 {
    match value {
        Some(v) => (v.round() as i64).clamp(min as i64, max as i64) as u32,
        None => fallback,
    }
}
