//! 批量重命名与打包
//!
//! 把工作目录下每个子目录中的文件移动到工作目录，文件名加上 `前缀-序号-` 前缀，
//! 然后在 `前缀.zip` 中为每个子目录添加一个空目录条目，并删除已清空的子目录。
//!
//! 压缩包中只有目录条目，不包含文件内容。

mod error;

pub use error::{PackError, PackResult};

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::PackConfig;

/// 打包选项
#[derive(Debug, Clone)]
pub struct PackOptions {
    /// 压缩包扩展名（不含句点）
    pub archive_extension: String,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self::from_config(&PackConfig::default())
    }
}

impl PackOptions {
    pub fn from_config(config: &PackConfig) -> Self {
        Self {
            archive_extension: config.archive_extension.clone(),
        }
    }
}

/// 打包结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackReport {
    /// 生成的压缩包路径
    pub archive: PathBuf,
    /// 按处理顺序排列的子目录名（序号从1开始）
    pub directories: Vec<String>,
    /// 移动过的文件(原路径, 新路径)
    pub moved: Vec<(PathBuf, PathBuf)>,
}

/// 校验前缀：去除首尾空白后不能为空，也不能包含路径分隔符
pub fn validate_prefix(prefix: &str) -> PackResult<String> {
    let prefix = prefix.trim();
    if prefix.is_empty() || prefix.contains(['/', '\\']) {
        return Err(PackError::InvalidPrefix(prefix.to_string()));
    }
    Ok(prefix.to_string())
}

/// 交互式读取前缀
pub fn prompt_prefix<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> PackResult<String> {
    write!(output, "Prefix: ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(PackError::Prompt("输入已结束".to_string()));
    }

    Ok(line.trim().to_string())
}

fn directory_options() -> FileOptions<'static, ()> {
    FileOptions::<()>::default().compression_method(CompressionMethod::Deflated)
}

/// 按名称排序列出目录下的直接条目
fn sorted_entries(dir: &Path) -> PackResult<Vec<fs::DirEntry>> {
    let mut entries = fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());
    Ok(entries)
}

/// 执行批量重命名与打包
///
/// 子目录按名称的字典序处理，序号从1开始。每个子目录中的直接文件被移动到 `root`，
/// 新文件名为 `{prefix}-{序号}-{原文件名}`。随后压缩包中添加该子目录的空条目，
/// 并删除子目录；子目录中还有嵌套目录时删除失败，整个流程中止，不做回滚。
pub fn pack(root: &Path, prefix: &str, options: &PackOptions) -> PackResult<PackReport> {
    let prefix = validate_prefix(prefix)?;
    let archive_path = root.join(format!("{}.{}", prefix, options.archive_extension));

    let file = File::create(&archive_path)?;
    let mut zip = ZipWriter::new(file);
    info!(archive = %archive_path.display(), "创建压缩包");

    let mut report = PackReport {
        archive: archive_path,
        ..Default::default()
    };

    let directories: Vec<fs::DirEntry> = sorted_entries(root)?
        .into_iter()
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .collect();

    for (ix, dir_entry) in directories.iter().enumerate() {
        let index = ix + 1;
        let dir_path = dir_entry.path();
        let dir_name = dir_entry.file_name().to_string_lossy().to_string();
        debug!(directory = %dir_name, index, "处理子目录");

        for entry in sorted_entries(&dir_path)? {
            if entry.file_type()?.is_dir() {
                continue;
            }

            let mut new_name = OsString::from(format!("{}-{}-", prefix, index));
            new_name.push(entry.file_name());
            let new_path = root.join(&new_name);

            fs::rename(entry.path(), &new_path)?;
            println!(
                "{} >> {}",
                entry.file_name().to_string_lossy(),
                new_name.to_string_lossy()
            );
            report.moved.push((entry.path(), new_path));
        }

        zip.add_directory(dir_name.as_str(), directory_options())?;
        fs::remove_dir(&dir_path)?;
        report.directories.push(dir_name);
    }

    zip.finish()?;
    info!(
        directories = report.directories.len(),
        files = report.moved.len(),
        "打包完成"
    );

    Ok(report)
}
