use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EpubError>;

/// Epub元数据提取与重命名相关的错误类型
#[derive(Error, Debug)]
pub enum EpubError {
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),

    #[error("Zip文件错误: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("缺少压缩包条目: '{0}'")]
    MissingEntry(String),

    #[error("XML解析错误: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML格式错误: {0}")]
    MalformedXml(String),

    #[error("OPF文件中没有metadata元素")]
    MissingMetadata,

    #[error("元数据中没有{field}")]
    NoMetadata { field: &'static str },

    #[error("重命名失败 {from:?} -> {to:?}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("遍历目录失败: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("配置文件错误: {0}")]
    ConfigError(String),
}

impl EpubError {
    /// 是否为XML解析类错误（container.xml或OPF文件格式错误）
    pub fn is_xml_error(&self) -> bool {
        matches!(self, EpubError::Xml(_) | EpubError::MalformedXml(_))
    }

    /// 批量处理时可以跳过的错误：只影响单个文件，不影响后续文件
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EpubError::Io(_)
                | EpubError::Archive(_)
                | EpubError::MissingEntry(_)
                | EpubError::Xml(_)
                | EpubError::MalformedXml(_)
                | EpubError::MissingMetadata
                | EpubError::NoMetadata { .. }
                | EpubError::Rename { .. }
        )
    }

    /// 用于日志输出的简短错误类别
    pub fn kind(&self) -> &'static str {
        match self {
            EpubError::Io(_) => "io",
            EpubError::Archive(_) => "archive",
            EpubError::MissingEntry(_) => "missing-entry",
            EpubError::Xml(_) | EpubError::MalformedXml(_) => "xml",
            EpubError::MissingMetadata => "missing-metadata",
            EpubError::NoMetadata { .. } => "no-metadata",
            EpubError::Rename { .. } => "rename",
            EpubError::Walk(_) => "walk",
            EpubError::ConfigError(_) => "config",
        }
    }
}
