use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::infrastructure::{AlertError, RunLogger};
use crate::models::number::{deserialize_f64, deserialize_i64};
use crate::models::AlertState;

/// 草稿文件中的记录格式：`{"last_ts": 1371780000, "last_val": 87.0}`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StateRecord {
    #[serde(deserialize_with = "deserialize_i64")]
    last_ts: i64,
    #[serde(deserialize_with = "deserialize_f64")]
    last_val: f64,
}

impl From<AlertState> for StateRecord {
    fn from(state: AlertState) -> Self {
        Self {
            last_ts: state.last_timestamp,
            last_val: state.last_value,
        }
    }
}

impl From<StateRecord> for AlertState {
    fn from(record: StateRecord) -> Self {
        AlertState::new(record.last_ts, record.last_val)
    }
}

/// 草稿状态文件
///
/// 单写者，不加锁。读取永不失败：文件缺失或损坏都按“没有历史状态”处理。
pub struct StateStore {
    path: PathBuf,
    logger: RunLogger,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>, logger: &RunLogger) -> Self {
        Self {
            path: path.into(),
            logger: logger.for_component("state_store"),
        }
    }

    /// 读取上一次的状态，任何问题都返回零值状态
    pub fn load(&self) -> AlertState {
        let path = self.path.display().to_string();

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                self.logger.debug(
                    "草稿文件不可读，使用零值状态",
                    Some(&[("path", &path), ("error", &e.to_string())]),
                );
                return AlertState::zero();
            }
        };

        match serde_json::from_str::<StateRecord>(&content) {
            Ok(record) => {
                let state = AlertState::from(record);
                self.logger.debug(
                    "已读取草稿状态",
                    Some(&[
                        ("last_ts", &state.last_timestamp.to_string()),
                        ("last_val", &state.last_value.to_string()),
                    ]),
                );
                state
            }
            Err(e) => {
                self.logger.debug(
                    "草稿文件内容无效，使用零值状态",
                    Some(&[("path", &path), ("error", &e.to_string())]),
                );
                AlertState::zero()
            }
        }
    }

    /// 整体覆盖写入，不追加、不合并
    pub fn save(&self, state: &AlertState) -> Result<(), AlertError> {
        let path = self.path.display().to_string();

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    AlertError::storage(format!("无法创建目录: {}", e), Some(parent.display().to_string()))
                })?;
            }
        }

        let json = serde_json::to_string(&StateRecord::from(*state))
            .map_err(|e| AlertError::storage(format!("无法序列化状态: {}", e), Some(path.clone())))?;

        fs::write(&self.path, json)
            .map_err(|e| AlertError::storage(format!("无法写入草稿文件: {}", e), Some(path.clone())))?;

        self.logger.debug(
            "已写入草稿状态",
            Some(&[
                ("path", &path),
                ("last_ts", &state.last_timestamp.to_string()),
                ("last_val", &state.last_value.to_string()),
            ]),
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    fn store_at(path: &Path) -> StateStore {
        StateStore::new(path, &RunLogger::new(false))
    }

    #[test]
    fn test_missing_file_is_zero_state() {
        let dir = tempdir().unwrap();
        let store = store_at(&dir.path().join("missing.json"));
        assert_eq!(store.load(), AlertState::zero());
    }

    #[test]
    fn test_corrupt_file_is_zero_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scratch.json");

        for content in ["", "not json", "[]", "{\"last_ts\": 1000}", "{\"last_val\": 80.0}", "{\"last_ts\": \"abc\", \"last_val\": 1}"] {
            fs::write(&path, content).unwrap();
            assert_eq!(store_at(&path).load(), AlertState::zero(), "content: {:?}", content);
        }
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scratch.json");
        let store = store_at(&path);

        store.save(&AlertState::new(2000, 120.0)).unwrap();
        assert_eq!(store.load(), AlertState::new(2000, 120.0));

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["last_ts"], 2000);
        assert_eq!(raw["last_val"], 120.0);
    }

    #[test]
    fn test_save_overwrites_previous_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scratch.json");
        fs::write(&path, "{\"last_ts\": 1, \"last_val\": 2.0, \"extra\": \"padding padding padding\"}").unwrap();

        let store = store_at(&path);
        store.save(&AlertState::new(3000, 90.0)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("extra"));
        assert_eq!(store.load(), AlertState::new(3000, 90.0));
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("scratch.json");
        let store = store_at(&path);

        store.save(&AlertState::new(1000, 80.0)).unwrap();
        assert_eq!(store.load(), AlertState::new(1000, 80.0));
    }

    #[test]
    fn test_integer_value_is_accepted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scratch.json");
        fs::write(&path, "{\"last_ts\": 1000, \"last_val\": 80}").unwrap();

        assert_eq!(store_at(&path).load(), AlertState::new(1000, 80.0));
    }
}
