//! EPUB批量重命名
//!
//! 递归遍历目录，读取每个EPUB文件的标题和作者，把文件重命名为 `标题 - 作者.epub`。
//! 单个文件的错误只跳过该文件，不影响其他文件。

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::RenameConfig;
use crate::epub::error::{EpubError, Result};
use crate::epub::opf::OpfMetadata;
use crate::epub::reader::read_metadata;
use crate::sanitize::{clean_filename, truncate_chars};

/// 重命名选项
#[derive(Debug, Clone)]
pub struct RenameOptions {
    /// 要处理的扩展名（不含句点）
    pub extension: String,
    /// 文件名主体的最大字符数
    pub max_stem_chars: usize,
    /// 标题与作者之间的分隔符
    pub separator: String,
    /// 只显示结果，不修改文件
    pub dry_run: bool,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self::from_config(&RenameConfig::default())
    }
}

impl RenameOptions {
    pub fn from_config(config: &RenameConfig) -> Self {
        Self {
            extension: config.extension.clone(),
            max_stem_chars: config.max_stem_chars,
            separator: config.separator.clone(),
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 文件名是否以目标扩展名结尾（不区分大小写）
    pub fn matches(&self, file_name: &str) -> bool {
        let suffix = format!(".{}", self.extension.to_lowercase());
        file_name.to_lowercase().ends_with(&suffix)
    }
}

/// 根据元数据生成目标文件名
///
/// 取第一个标题和第一个作者，清理后截断到 `max_stem_chars` 个字符，再追加扩展名。
/// 截断后不再重新清理。
pub fn destination_name(metadata: &OpfMetadata, options: &RenameOptions) -> Result<String> {
    let title = metadata
        .first_title()
        .ok_or(EpubError::NoMetadata { field: "标题" })?;
    let author = metadata
        .first_creator()
        .ok_or(EpubError::NoMetadata { field: "作者" })?;

    let cleaned = clean_filename(&format!("{}{}{}", title, options.separator, author));
    let stem = truncate_chars(&cleaned, options.max_stem_chars);

    Ok(format!("{}.{}", stem, options.extension))
}

/// 单个文件的处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum RenameOutcome {
    /// 已重命名
    Renamed { from: PathBuf, to: PathBuf },
    /// 试运行：将会重命名
    WouldRename { from: PathBuf, to: PathBuf },
    /// 目标文件已存在，未做修改
    Skipped { existing: PathBuf },
}

/// 一次批量重命名的统计
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenameReport {
    /// 处理过的EPUB文件数
    pub scanned: usize,
    /// 已重命名（或试运行中将会重命名）的文件
    pub renamed: Vec<(PathBuf, PathBuf)>,
    /// 因目标已存在而跳过的文件
    pub skipped: Vec<PathBuf>,
    /// 因可恢复错误而跳过的文件及错误类别
    pub failed: Vec<(PathBuf, &'static str)>,
}

/// EPUB重命名器
pub struct Renamer {
    root: PathBuf,
    options: RenameOptions,
}

impl Renamer {
    pub fn new<P: Into<PathBuf>>(root: P, options: RenameOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    /// 收集根目录下所有待处理的EPUB文件
    ///
    /// 按文件名排序遍历。根目录本身无法读取时返回错误，子目录的错误只记录警告。
    pub fn collect_candidates(&self) -> Result<Vec<PathBuf>> {
        let mut candidates = Vec::new();

        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(EpubError::Walk(e)),
                Err(e) => {
                    warn!(error = %e, "无法读取目录项，已跳过");
                    continue;
                }
            };

            if entry.file_type().is_file()
                && self.options.matches(&entry.file_name().to_string_lossy())
            {
                candidates.push(entry.into_path());
            }
        }

        debug!(root = %self.root.display(), count = candidates.len(), "找到EPUB文件");
        Ok(candidates)
    }

    /// 处理单个EPUB文件
    ///
    /// 目标文件已存在时不覆盖，源文件保持不变。
    pub fn process_file(&self, path: &Path) -> Result<RenameOutcome> {
        let metadata = read_metadata(path)?;
        let dest_name = destination_name(&metadata, &self.options)?;

        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        let dest = dir.join(&dest_name);

        if dest.exists() {
            debug!(dest = %dest.display(), "目标文件已存在，跳过");
            return Ok(RenameOutcome::Skipped { existing: dest });
        }

        if self.options.dry_run {
            return Ok(RenameOutcome::WouldRename {
                from: path.to_path_buf(),
                to: dest,
            });
        }

        fs::rename(path, &dest).map_err(|source| EpubError::Rename {
            from: path.to_path_buf(),
            to: dest.clone(),
            source,
        })?;

        info!(from = %path.display(), to = %dest.display(), "已重命名");
        Ok(RenameOutcome::Renamed {
            from: path.to_path_buf(),
            to: dest,
        })
    }

    /// 批量重命名
    ///
    /// 先收集文件列表再逐个处理，重命名后的文件不会被再次处理。
    /// 单个文件的错误（包括重命名本身失败）记录后跳过，只有根目录无法遍历时返回错误。
    pub fn run(&self) -> Result<RenameReport> {
        let mut report = RenameReport::default();

        for path in self.collect_candidates()? {
            report.scanned += 1;
            println!("{}", file_name_lossy(&path));

            match self.process_file(&path) {
                Ok(RenameOutcome::Renamed { from, to }) => {
                    println!("\"{}\" ==> \"{}\"", file_name_lossy(&from), file_name_lossy(&to));
                    report.renamed.push((from, to));
                }
                Ok(RenameOutcome::WouldRename { from, to }) => {
                    println!(
                        "[试运行] \"{}\" ==> \"{}\"",
                        file_name_lossy(&from),
                        file_name_lossy(&to)
                    );
                    report.renamed.push((from, to));
                }
                Ok(RenameOutcome::Skipped { existing }) => {
                    report.skipped.push(existing);
                }
                Err(e) if e.is_recoverable() => {
                    warn!(
                        file = %path.display(),
                        kind = e.kind(),
                        error = %e,
                        "无法处理文件，已跳过"
                    );
                    report.failed.push((path, e.kind()));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}
