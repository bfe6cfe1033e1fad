pub mod error;
pub mod xml;
pub mod container;
pub mod reader;
pub mod opf;

#[cfg(test)]
pub(crate) mod test_support;

// 重新导出错误处理
pub use error::{EpubError, Result};

// 重新导出容器相关
pub use container::{Container, RootFile, MIMETYPE_OPF};

// 重新导出EPUB读取器
pub use reader::{Epub, read_metadata};

// 重新导出OPF相关
pub use opf::{Identifier, OpfMetadata, parse_opf};
