use std::io;
use thiserror::Error;

pub type PackResult<T> = std::result::Result<T, PackError>;

/// 批量打包相关的错误类型
///
/// 打包过程不做任何恢复，任何错误都会中止整个流程。
#[derive(Error, Debug)]
pub enum PackError {
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),

    #[error("Zip文件错误: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("无效的前缀: {0:?}")]
    InvalidPrefix(String),

    #[error("读取前缀失败: {0}")]
    Prompt(String),
}
