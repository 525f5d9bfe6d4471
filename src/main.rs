use armkit::{build_controller, config_path, init_logging, load_config, run_demo, CONFIG_ENV};
use std::path::PathBuf;
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let path = config_path(std::env::var_os(CONFIG_ENV).map(PathBuf::from));
    let config = load_config(path.as_deref())?;

    let mut arm = build_controller(&config)?;
    tracing::info!("Arm controller bound to {}", arm.port());

    run_demo(&mut arm, Duration::from_secs(5))
}
