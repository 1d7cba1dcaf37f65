use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// 规范请求模型的 JSON
    #[default]
    Json,
    /// curl 命令
    Curl,
    /// .http 文件
    Http,
    /// 摘要表格
    Table,
}

/// `reqconv.toml` 中的配置项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 默认输出格式
    pub output: OutputFormat,

    /// 是否使用彩色输出
    pub color: bool,

    /// JSON 是否格式化输出
    pub pretty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output: OutputFormat::Json,
            color: true,
            pretty: true,
        }
    }
}

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置文件名
    const CONFIG_FILE: &'static str = "reqconv.toml";

    /// 从指定路径加载配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Settings> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// 解析配置文本，缺省的字段使用默认值
    pub fn parse(content: &str) -> Result<Settings> {
        Ok(toml::from_str(content)?)
    }

    /// 查找并加载配置文件
    /// 查找顺序：
    /// 1. 当前目录
    /// 2. 父目录递归查找
    /// 3. 用户配置目录 ~/.config/reqconv/
    pub fn find_and_load() -> Option<Settings> {
        // 1-2. 当前目录及父目录
        if let Some(settings) = Self::try_load_from_current_dir() {
            return Some(settings);
        }

        // 3. 用户配置目录
        if let Some(settings) = Self::try_load_from_user_dir() {
            return Some(settings);
        }

        None
    }

    /// 找不到或解析失败时返回默认配置
    pub fn load_or_default() -> Settings {
        Self::find_and_load().unwrap_or_default()
    }

    /// 尝试从当前目录及其父目录加载
    fn try_load_from_current_dir() -> Option<Settings> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.exists() {
                return Self::load_logged(&config_path);
            }

            // 尝试父目录
            if !current.pop() {
                break;
            }
        }

        None
    }

    /// 尝试从用户配置目录加载
    fn try_load_from_user_dir() -> Option<Settings> {
        let config_path = dirs::config_dir()?.join("reqconv").join(Self::CONFIG_FILE);
        if config_path.exists() {
            return Self::load_logged(&config_path);
        }
        None
    }

    fn load_logged(path: &Path) -> Option<Settings> {
        match Self::load_from_path(path) {
            Ok(settings) => {
                tracing::debug!("Loaded config from {}", path.display());
                Some(settings)
            }
            Err(e) => {
                tracing::warn!("Ignoring config file {}: {}", path.display(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let settings = ConfigLoader::parse("output = \"curl\"\ncolor = false\npretty = false\n").unwrap();
        assert_eq!(settings.output, OutputFormat::Curl);
        assert!(!settings.color);
        assert!(!settings.pretty);
    }

    #[test]
    fn test_parse_partial_config() {
        let settings = ConfigLoader::parse("output = \"table\"").unwrap();
        assert_eq!(settings.output, OutputFormat::Table);
        assert!(settings.color);
        assert!(settings.pretty);
    }

    #[test]
    fn test_parse_invalid_config() {
        assert!(ConfigLoader::parse("output = \"yaml\"").is_err());
        assert!(ConfigLoader::parse("output = ").is_err());
    }
}
