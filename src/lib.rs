pub mod epub;
pub mod sanitize;
pub mod config;
pub mod rename;
pub mod pack;

// === 核心API重新导出 ===

/// EPUB文件读取器与元数据
pub use epub::{Epub, OpfMetadata, Identifier, read_metadata, parse_opf};

/// 错误处理
pub use epub::{EpubError, Result};

/// 容器组件
pub use epub::{Container, RootFile};

/// 文件名清理
pub use sanitize::{clean_filename, truncate_chars};

/// 配置
pub use config::{ShelfConfig, RenameConfig, PackConfig};

/// 重命名
pub use rename::{Renamer, RenameOptions, RenameOutcome, RenameReport, destination_name};

/// 打包
pub use pack::{pack, prompt_prefix, validate_prefix, PackError, PackOptions, PackReport};

// === 库信息 ===

/// 库的版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库的描述
pub const DESCRIPTION: &str = "按元数据重命名EPUB文件，并批量整理子目录文件";
