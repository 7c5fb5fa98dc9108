use std::{fs, path::Path};

use anyhow::Result;

use super::{CommandResult, CommandSummary, InitSummary};
use crate::config::{CONFIG_FILE_NAME, default_config_json};

pub fn init() -> Result<CommandResult> {
    let config_path = Path::new(CONFIG_FILE_NAME);

    let created = if config_path.exists() {
        false
    } else {
        fs::write(config_path, format!("{}\n", default_config_json()?))?;
        true
    };

    Ok(CommandResult {
        summary: CommandSummary::Init(InitSummary {
            created,
            path: config_path.to_path_buf(),
        }),
        failure_count: usize::from(!created),
    })
}
