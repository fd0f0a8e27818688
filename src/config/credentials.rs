use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::infrastructure::AlertError;
use crate::models::Credentials;

/// 凭据文件中某个应用的配置
///
/// ```json
/// {"hazealert": {"appid": "...", "token": "...", "number": "+65..."}}
/// ```
///
/// `number` 写成 JSON 数字也可以。
#[derive(Debug, Default, Deserialize)]
struct AppSettings {
    #[serde(default)]
    appid: Option<Value>,
    #[serde(default)]
    token: Option<Value>,
    #[serde(default)]
    number: Option<Value>,
}

/// 展开开头的 `~`
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" || path.starts_with("~/") {
        if let Ok(home) = env::var("HOME") {
            return PathBuf::from(format!("{}{}", home, &path[1..]));
        }
    }
    PathBuf::from(path)
}

/// 读取 `app_name` 下的凭据
///
/// 任何字段缺失或为空都视为没有凭据。
pub fn load_credentials(path: &Path, app_name: &str) -> Result<Credentials, AlertError> {
    let display = Some(path.display().to_string());

    let content = fs::read_to_string(path)
        .map_err(|e| AlertError::missing_credentials(format!("无法读取凭据文件: {}", e), display.clone()))?;

    let mut apps: HashMap<String, Value> = serde_json::from_str(&content)
        .map_err(|e| AlertError::missing_credentials(format!("凭据文件格式错误: {}", e), display.clone()))?;

    let settings: AppSettings = apps
        .remove(app_name)
        .filter(|value| !value.is_null())
        .ok_or_else(|| AlertError::missing_credentials(format!("缺少应用 `{}` 的配置", app_name), display.clone()))
        .and_then(|value| {
            serde_json::from_value(value).map_err(|e| {
                AlertError::missing_credentials(format!("应用 `{}` 的配置格式错误: {}", app_name, e), display.clone())
            })
        })?;

    let field = |value: Option<Value>, name: &str| -> Result<String, AlertError> {
        value
            .and_then(|v| match v {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AlertError::missing_credentials(format!("缺少字段 `{}`", name), display.clone()))
    };

    Ok(Credentials::new(
        field(settings.appid, "appid")?,
        field(settings.token, "token")?,
        field(settings.number, "number")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".hoiioapi");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_credentials() {
        let (_dir, path) = write(
            r#"{"hazealert": {"appid": "app-1", "token": "tok-1", "number": "+6591234567"}, "other": "unrelated"}"#,
        );

        let creds = load_credentials(&path, "hazealert").unwrap();
        assert_eq!(creds, Credentials::new("app-1", "tok-1", "+6591234567"));
    }

    #[test]
    fn test_numeric_destination() {
        let (_dir, path) = write(r#"{"hazealert": {"appid": "a", "token": "t", "number": 6591234567}}"#);
        let creds = load_credentials(&path, "hazealert").unwrap();
        assert_eq!(creds.destination, "6591234567");
    }

    #[test]
    fn test_missing_or_empty_fields() {
        for content in [
            r#"{"hazealert": {"appid": "a", "token": "t"}}"#,
            r#"{"hazealert": {"appid": "a", "token": "", "number": "1"}}"#,
            r#"{"hazealert": null}"#,
            r#"{"other": {"appid": "a", "token": "t", "number": "1"}}"#,
            r#"not json"#,
        ] {
            let (_dir, path) = write(content);
            let err = load_credentials(&path, "hazealert").unwrap_err();
            assert!(matches!(err, AlertError::MissingCredentials { .. }), "content: {}", content);
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_credentials(&dir.path().join("nope"), "hazealert").unwrap_err();
        assert!(matches!(err, AlertError::MissingCredentials { .. }));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/etc/hoiio"), PathBuf::from("/etc/hoiio"));
        assert_eq!(expand_home("relative/path"), PathBuf::from("relative/path"));

        if let Ok(home) = env::var("HOME") {
            assert_eq!(expand_home("~/.hoiioapi"), PathBuf::from(format!("{}/.hoiioapi", home)));
            assert_eq!(expand_home("~"), PathBuf::from(home));
        }
    }
}
