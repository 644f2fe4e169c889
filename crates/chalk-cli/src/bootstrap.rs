use std::path::PathBuf;

use anyhow::Context;
use chalk_config::ChalkConfig;

use crate::cli::GlobalFlags;

pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<ChalkConfig> {
    load_dotenv(flags)?;
    ChalkConfig::load().context("failed to load chalk configuration")
}

/// `.env` in `--env-dir` wins, then the current directory's.
fn load_dotenv(flags: &GlobalFlags) -> anyhow::Result<()> {
    if let Some(dir) = &flags.env_dir {
        let env_path = PathBuf::from(dir).join(".env");
        if env_path.exists() {
            dotenvy::from_path(&env_path)
                .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
            return Ok(());
        }
        tracing::debug!(path = %env_path.display(), "no dotenv file in --env-dir");
    }

    dotenvy::dotenv().ok();
    Ok(())
}
