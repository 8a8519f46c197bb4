use crate::commands::{CmdMessage, CmdResult};
use crate::config::MindmapConfig;
use crate::error::{MindmapError, Result};
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

/// The payload is the config as it stands after the action.
pub fn run(dir: &Path, action: ConfigAction) -> Result<CmdResult<MindmapConfig>> {
    let mut config = MindmapConfig::load(dir)?;
    match action {
        ConfigAction::ShowAll => {
            let mut result = CmdResult::new(config.clone());
            for key in MindmapConfig::keys() {
                if let Some(value) = config.get(key) {
                    result.add_message(CmdMessage::info(format!("{key} = {value}")));
                }
            }
            Ok(result)
        }
        ConfigAction::ShowKey(key) => {
            let value = config
                .get(&key)
                .ok_or_else(|| MindmapError::Config(format!("Unknown config key: {key}")))?;
            Ok(CmdResult::new(config).with_message(CmdMessage::info(value)))
        }
        ConfigAction::Set(key, value) => {
            config.set(&key, &value)?;
            config.save(dir)?;
            let display_val = config.get(&key).unwrap_or(value);
            Ok(CmdResult::new(config)
                .with_message(CmdMessage::success(format!("{key} set to {display_val}"))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Status;
    use tempfile::TempDir;

    #[test]
    fn show_all_lists_every_key() {
        let dir = TempDir::new().unwrap();
        let result = run(dir.path(), ConfigAction::ShowAll).unwrap();
        assert_eq!(
            result.message(),
            "default-map = my_map.json\nshow-ids = true"
        );
    }

    #[test]
    fn set_persists() {
        let dir = TempDir::new().unwrap();
        let result = run(
            dir.path(),
            ConfigAction::Set("default-map".into(), "work".into()),
        )
        .unwrap();
        assert_eq!(result.message(), "default-map set to work.json");

        let shown = run(dir.path(), ConfigAction::ShowKey("default-map".into())).unwrap();
        assert_eq!(shown.message(), "work.json");
    }

    #[test]
    fn unknown_key_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = run(dir.path(), ConfigAction::ShowKey("colour".into())).unwrap_err();
        assert_eq!(err.status(), Status::Error);
        assert!(run(dir.path(), ConfigAction::Set("colour".into(), "red".into())).is_err());
    }
}
