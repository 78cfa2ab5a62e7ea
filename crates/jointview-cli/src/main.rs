//! `jointview-cli` – JointView command line entry point.
//!
//! This binary:
//!
//! 1. Initialises tracing (console, optional OTLP export).
//! 2. Loads `~/.jointview/config.toml`, writing the defaults on first run.
//! 3. Loads the configured URDF and logs every joint's limits.
//! 4. Boots the cockpit server and the scene loop on one tokio runtime.
//! 5. Intercepts **Ctrl-C** to stop the scene loop and exit.

mod config;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;
use tracing::{error, info, warn};

use jointview_cockpit::{CockpitServer, SceneSettings};
use jointview_control::page;
use jointview_hal::{Robot, report, urdf};
use jointview_middleware::{BusUi, EventBus};
use jointview_runtime::SceneLoop;
use jointview_types::ViewError;

use config::Config;

fn main() {
    let _telemetry = jointview_runtime::telemetry::init_tracing("jointview");

    print_banner();

    let cfg = load_config();

    // ── Shutdown flag ─────────────────────────────────────────────────────
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = Arc::clone(&shutdown);
    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "⚠  Ctrl-C received – stopping JointView …".yellow().bold());
        shutdown_clone.store(true, Ordering::Release);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler; stop the process with a signal instead");
    }

    // ── Robot ─────────────────────────────────────────────────────────────
    let robot = match load_robot(&cfg) {
        Ok(robot) => robot,
        Err(e) => {
            println!("  {} {}", "URDF error:".red().bold(), e);
            error!(error = %e, "Cannot start without a robot model");
            std::process::exit(1);
        }
    };

    // ── Runtime ───────────────────────────────────────────────────────────
    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            println!("  {} {}", "Runtime error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(cfg, robot, shutdown)) {
        println!("  {} {}", "Error:".red().bold(), e);
        error!(error = %e, "JointView stopped with an error");
        std::process::exit(1);
    }

    println!("{}", "  ✓ JointView stopped.".green());
}

/// Read the config file; on first run write the defaults so the user has a
/// file to edit.
fn load_config() -> Config {
    match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => {
            let mut cfg = Config::default();
            match config::save(&cfg) {
                Ok(()) => println!(
                    "  {} Default config written to {}",
                    "✓".green().bold(),
                    config::config_path().display().to_string().bold()
                ),
                Err(e) => println!("  {}: {}", "Error saving config".red(), e),
            }
            config::apply_env_overrides(&mut cfg);
            cfg
        }
        Err(e) => {
            println!("  {}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            let mut cfg = Config::default();
            config::apply_env_overrides(&mut cfg);
            cfg
        }
    }
}

fn load_robot(cfg: &Config) -> Result<Robot, ViewError> {
    let path = cfg.urdf_file();
    println!("  Loading model {} from {}", cfg.model_name.bold(), path.display().to_string().dimmed());
    let mut robot = urdf::load_file(&path)?;
    report::log_joint_limits(&robot);
    cfg.apply_ignore_limits(&mut robot);
    Ok(robot)
}

async fn run(cfg: Config, robot: Robot, shutdown: Arc<AtomicBool>) -> Result<(), ViewError> {
    let bus = EventBus::default();

    let cockpit = CockpitServer::new(Arc::new(bus.clone()))
        .with_port(cfg.port)
        .with_asset_dir(cfg.urdf_dir.clone())
        .with_scene(SceneSettings::for_model(&cfg.model_name));
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cockpit.port())).await?;

    let ui = BusUi::new(bus.clone()).with_static_elements(page::static_elements());
    let scene = SceneLoop::new(robot, ui, bus, cfg.scene_config()).with_shutdown(shutdown);

    println!(
        "  {} Viewer running at {}",
        "✓".green().bold(),
        format!("http://localhost:{}/", cfg.port).bold().cyan()
    );
    println!("  Press {} to stop.\n", "Ctrl-C".bold());
    info!(port = cfg.port, model = %cfg.model_name, "JointView started");

    let server = tokio::spawn(cockpit.serve(listener));
    scene.run().await;
    server.abort();
    Ok(())
}

fn print_banner() {
    println!();
    println!("{}", r#"      __     _       __ _   ___              "#.bold().cyan());
    println!("{}", r#"   __/ /__  (_)__  / /| | / (_)__ _    __   "#.bold().cyan());
    println!("{}", r#"  / // / _ \/ / _ \/ __/ |/ / / -_) |/|/ /  "#.bold().cyan());
    println!("{}", r#"  \___/\___/_/_//_/\__/|___/_/\__/|__,__/   "#.bold().cyan());
    println!();
    println!(
        "  {} {}",
        "JointView".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  URDF joint jogging and health monitoring");
    println!();
}
