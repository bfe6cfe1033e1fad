//! 配置模块
//!
//! 提供重命名与打包行为的配置管理功能，支持从YAML文件加载配置。

use crate::epub::error::{EpubError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 默认配置文件路径（相对于工作目录）
pub const DEFAULT_CONFIG_PATH: &str = "epubshelf.yaml";

/// 重命名配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameConfig {
    /// 要处理的文件扩展名（不区分大小写，不含句点）
    pub extension: String,
    /// 清理后的文件名主体最多保留的字符数
    pub max_stem_chars: usize,
    /// 标题与作者之间的分隔符
    pub separator: String,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            extension: "epub".to_string(),
            max_stem_chars: 254,
            separator: " - ".to_string(),
        }
    }
}

/// 打包配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    /// 生成的压缩包扩展名（不含句点）
    pub archive_extension: String,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            archive_extension: "zip".to_string(),
        }
    }
}

/// 完整配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfConfig {
    pub rename: RenameConfig,
    pub pack: PackConfig,
}

impl ShelfConfig {
    /// 从指定文件加载配置
    ///
    /// 文件中未出现的字段使用默认值。
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| EpubError::ConfigError(format!("无法读取配置文件: {}", e)))?;

        let config: Self = serde_yml::from_str(&content)
            .map_err(|e| EpubError::ConfigError(format!("配置文件格式错误: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// 获取默认配置
    pub fn default_config() -> Self {
        Self::default()
    }

    /// 生成默认配置文件
    ///
    /// # 示例
    ///
    /// ```rust,no_run
    /// use epubshelf::ShelfConfig;
    /// ShelfConfig::generate_default_config("epubshelf.yaml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let yaml_content = serde_yml::to_string(&Self::default_config())
            .map_err(|e| EpubError::ConfigError(format!("序列化配置失败: {}", e)))?;

        // 在YAML内容前添加注释说明
        let content_with_header = format!(
            "# epubshelf配置文件\n# rename: EPUB重命名规则\n# pack: 批量打包规则\n\n{}",
            yaml_content
        );

        fs::write(path.as_ref(), content_with_header)
            .map_err(|e| EpubError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }

    /// 加载配置
    ///
    /// 指定了路径时必须能成功加载；否则尝试工作目录下的 `epubshelf.yaml`，
    /// 不存在时使用默认配置。不会自动生成配置文件。
    pub fn load(explicit: Option<&Path>, work_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let candidate = work_dir.join(DEFAULT_CONFIG_PATH);
        if candidate.is_file() {
            Self::from_file(candidate)
        } else {
            Ok(Self::default_config())
        }
    }

    fn validate(&self) -> Result<()> {
        if self.rename.max_stem_chars == 0 {
            return Err(EpubError::ConfigError("rename.max_stem_chars必须大于0".to_string()));
        }
        if self.rename.extension.is_empty() || self.pack.archive_extension.is_empty() {
            return Err(EpubError::ConfigError("扩展名不能为空".to_string()));
        }
        Ok(())
    }
}
