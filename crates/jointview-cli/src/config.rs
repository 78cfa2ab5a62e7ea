//! Viewer configuration – reads/writes `~/.jointview/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use jointview_control::{ControlMode, JogConfig};
use jointview_hal::Robot;
use jointview_monitor::MonitorConfig;
use jointview_runtime::SceneConfig;
use jointview_types::ViewError;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Persisted configuration.  Every field has a default, so a partial file
/// is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// URDF model served at `/URDF/{model_name}.urdf`.
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Directory holding `{model_name}.urdf` and its meshes.
    #[serde(default = "default_urdf_dir")]
    pub urdf_dir: PathBuf,

    /// HTTP + WebSocket port of the viewer.
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_frame_rate_hz")]
    pub frame_rate_hz: u32,

    #[serde(default = "default_monitor_interval_ms")]
    pub monitor_interval_ms: u64,

    /// Initial jog step per frame, in degrees.
    #[serde(default = "default_speed_deg")]
    pub default_speed_deg: f64,

    #[serde(default = "default_alert_duration_ms")]
    pub alert_duration_ms: u64,

    #[serde(default = "default_highlight_duration_ms")]
    pub highlight_duration_ms: u64,

    #[serde(default)]
    pub control_mode: ControlMode,

    /// Joints whose URDF limits are not enforced while jogging.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore_limits: Vec<String>,
}

fn default_model_name() -> String {
    jointview_hal::urdf::DEFAULT_MODEL.to_string()
}
fn default_urdf_dir() -> PathBuf {
    PathBuf::from("./URDF")
}
fn default_port() -> u16 {
    jointview_cockpit::DEFAULT_PORT
}
fn default_frame_rate_hz() -> u32 {
    jointview_runtime::DEFAULT_FRAME_RATE_HZ
}
fn default_monitor_interval_ms() -> u64 {
    1000
}
fn default_speed_deg() -> f64 {
    jointview_control::jog::DEFAULT_SPEED_DEG
}
fn default_alert_duration_ms() -> u64 {
    3000
}
fn default_highlight_duration_ms() -> u64 {
    2000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_name: default_model_name(),
            urdf_dir: default_urdf_dir(),
            port: default_port(),
            frame_rate_hz: default_frame_rate_hz(),
            monitor_interval_ms: default_monitor_interval_ms(),
            default_speed_deg: default_speed_deg(),
            alert_duration_ms: default_alert_duration_ms(),
            highlight_duration_ms: default_highlight_duration_ms(),
            control_mode: ControlMode::default(),
            ignore_limits: Vec::new(),
        }
    }
}

impl Config {
    /// Where the model's URDF lives on disk.
    pub fn urdf_file(&self) -> PathBuf {
        jointview_hal::urdf::asset_file(&self.urdf_dir, &self.model_name)
    }

    /// Scene loop parameters derived from this config.
    pub fn scene_config(&self) -> SceneConfig {
        SceneConfig {
            frame_rate_hz: self.frame_rate_hz,
            jog: JogConfig {
                mode: self.control_mode,
                speed_deg: self.default_speed_deg,
                alert_duration: Duration::from_millis(self.alert_duration_ms),
                highlight_window: Duration::from_millis(self.highlight_duration_ms),
            },
            monitor: MonitorConfig {
                tick_interval: Duration::from_millis(self.monitor_interval_ms.max(1)),
            },
            seed: None,
        }
    }

    /// Flag every joint in `ignore_limits` on `robot`.  Unknown names are
    /// logged and skipped.
    pub fn apply_ignore_limits(&self, robot: &mut Robot) {
        for name in &self.ignore_limits {
            if !robot.set_ignore_limits(name, true) {
                warn!(joint = %name, "ignore_limits names an unknown joint");
            }
        }
    }
}

/// Return the path to `~/.jointview/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".jointview").join("config.toml")
}

/// Load the config from disk with environment overrides applied.  Returns
/// `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, ViewError> {
    let mut cfg = load_from(&config_path())?;
    if let Some(cfg) = cfg.as_mut() {
        apply_env_overrides(cfg);
    }
    Ok(cfg)
}

pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, ViewError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|e| {
        ViewError::Config(format!("Failed to read config at {}: {e}", path.display()))
    })?;
    let cfg: Config = toml::from_str(&raw)
        .map_err(|e| ViewError::Config(format!("Failed to parse config: {e}")))?;
    Ok(Some(cfg))
}

/// Apply `JOINTVIEW_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `JOINTVIEW_MODEL` | `model_name` |
/// | `JOINTVIEW_URDF_DIR` | `urdf_dir` |
/// | `JOINTVIEW_PORT` | `port` |
/// | `JOINTVIEW_FRAME_RATE` | `frame_rate_hz` |
/// | `JOINTVIEW_MONITOR_INTERVAL_MS` | `monitor_interval_ms` |
///
/// Values that do not parse are ignored.
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("JOINTVIEW_MODEL") {
        cfg.model_name = v;
    }
    if let Ok(v) = std::env::var("JOINTVIEW_URDF_DIR") {
        cfg.urdf_dir = PathBuf::from(v);
    }
    if let Ok(v) = std::env::var("JOINTVIEW_PORT")
        && let Ok(port) = v.parse::<u16>()
    {
        cfg.port = port;
    }
    if let Ok(v) = std::env::var("JOINTVIEW_FRAME_RATE")
        && let Ok(rate) = v.parse::<u32>()
    {
        cfg.frame_rate_hz = rate;
    }
    if let Ok(v) = std::env::var("JOINTVIEW_MONITOR_INTERVAL_MS")
        && let Ok(ms) = v.parse::<u64>()
    {
        cfg.monitor_interval_ms = ms;
    }
}

/// Save the config to disk, creating `~/.jointview/` if necessary.
pub fn save(cfg: &Config) -> Result<(), ViewError> {
    save_to(cfg, &config_path())
}

pub(crate) fn save_to(cfg: &Config, path: &Path) -> Result<(), ViewError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700))?;
        }
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| ViewError::Serialization(format!("Failed to serialize config: {e}")))?;
    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)?;
        file.write_all(raw.as_bytes())?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jointview_hal::sim::SimRobot;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        save_to(&Config::default(), &path).expect("save");

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.model_name, "genkiarm");
        assert_eq!(loaded.port, 8080);
        assert_eq!(loaded.frame_rate_hz, 60);
        assert_eq!(loaded.control_mode, ControlMode::Keyboard);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "port = 9000\nignore_limits = [\"joint6\"]\n").expect("write");

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.port, 9000);
        assert_eq!(loaded.ignore_limits, vec!["joint6".to_string()]);
        assert_eq!(loaded.monitor_interval_ms, 1000);
        assert_eq!(loaded.default_speed_deg, 0.2);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "port = \"not a number\"").expect("write");
        assert!(matches!(load_from(&path), Err(ViewError::Config(_))));
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        assert!(load_from(&path).expect("no error").is_none());
    }

    #[test]
    fn config_path_points_to_jointview_dir() {
        let p = config_path_for_home("/home/testuser");
        assert!(p.to_string_lossy().contains(".jointview"));
        assert!(p.to_string_lossy().ends_with("config.toml"));
    }

    #[cfg(unix)]
    #[test]
    fn config_file_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        save_to(&Config::default(), &path).expect("save");

        let file_mode = fs::metadata(&path).expect("file metadata").permissions().mode() & 0o777;
        assert_eq!(file_mode, 0o600);
        let dir_mode = fs::metadata(path.parent().unwrap())
            .expect("dir metadata")
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(dir_mode, 0o700);
    }

    #[test]
    fn scene_config_carries_timings() {
        let cfg = Config {
            frame_rate_hz: 30,
            monitor_interval_ms: 250,
            default_speed_deg: 1.0,
            ..Config::default()
        };
        let scene = cfg.scene_config();
        assert_eq!(scene.frame_rate_hz, 30);
        assert_eq!(scene.monitor.tick_interval, Duration::from_millis(250));
        assert_eq!(scene.jog.speed_deg, 1.0);
        assert_eq!(scene.jog.alert_duration, Duration::from_secs(3));
        assert_eq!(scene.jog.highlight_window, Duration::from_secs(2));
    }

    #[test]
    fn ignore_limits_flags_known_joints() {
        let cfg = Config {
            ignore_limits: vec!["joint2".to_string(), "ghost".to_string()],
            ..Config::default()
        };
        let mut robot = SimRobot::six_axis_arm().build();
        cfg.apply_ignore_limits(&mut robot);
        assert!(robot.joint("joint2").unwrap().ignore_limits());
        assert!(!robot.joint("joint1").unwrap().ignore_limits());
    }

    #[test]
    fn urdf_file_joins_dir_and_model() {
        let cfg = Config {
            urdf_dir: PathBuf::from("/srv/URDF"),
            model_name: "arm".to_string(),
            ..Config::default()
        };
        assert_eq!(cfg.urdf_file(), PathBuf::from("/srv/URDF/arm.urdf"));
    }

    #[test]
    fn apply_env_overrides_changes_port_and_ignores_garbage() {
        // SAFETY: the only test in this crate touching JOINTVIEW_* variables.
        unsafe {
            std::env::set_var("JOINTVIEW_PORT", "8181");
            std::env::set_var("JOINTVIEW_FRAME_RATE", "fast");
            std::env::set_var("JOINTVIEW_MODEL", "desk_arm");
        }
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.port, 8181);
        assert_eq!(cfg.frame_rate_hz, 60);
        assert_eq!(cfg.model_name, "desk_arm");
        unsafe {
            std::env::remove_var("JOINTVIEW_PORT");
            std::env::remove_var("JOINTVIEW_FRAME_RATE");
            std::env::remove_var("JOINTVIEW_MODEL");
        }
    }
}
