use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::epub::container::{CONTAINER_PATH, Container};
use crate::epub::error::{EpubError, Result};
use crate::epub::opf::{OpfMetadata, parse_opf};

/// 表示一个打开的EPUB文件
pub struct Epub {
    archive: ZipArchive<File>,
}

impl Epub {
    /// 从文件路径打开EPUB
    ///
    /// 只检查文件是否为有效的zip压缩包，不校验mimetype。
    ///
    /// # 参数
    /// * `path` - epub文件的路径
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Epub> {
        let file = File::open(path)?;
        let archive = ZipArchive::new(file)?;
        Ok(Epub { archive })
    }

    /// 列出EPUB文件中的所有条目
    pub fn list_files(&mut self) -> Result<Vec<String>> {
        let mut files = Vec::new();

        for i in 0..self.archive.len() {
            let file = self.archive.by_index(i)?;
            files.push(file.name().to_string());
        }

        Ok(files)
    }

    /// 读取指定条目的二进制内容
    ///
    /// 条目不存在时返回 `EpubError::MissingEntry`。
    ///
    /// # 参数
    /// * `name` - 条目在压缩包中的完整路径
    pub fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut file = self.archive.by_name(name).map_err(|e| match e {
            ZipError::FileNotFound => EpubError::MissingEntry(name.to_string()),
            other => EpubError::Archive(other),
        })?;

        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    /// 解析container.xml文件
    pub fn container(&mut self) -> Result<Container> {
        let content = self.read_entry(CONTAINER_PATH)?;
        Container::parse_xml(&content)
    }

    /// 获取OPF文件路径，container.xml中没有OPF类型的rootfile时返回空字符串
    pub fn opf_path(&mut self) -> Result<String> {
        let container = self.container()?;
        Ok(container.opf_path().unwrap_or_default().to_string())
    }

    /// 读取并解析OPF文件中的元数据
    pub fn metadata(&mut self) -> Result<OpfMetadata> {
        let opf_path = self.opf_path()?;
        debug!(opf_path = %opf_path, "读取OPF文件");

        let content = match self.read_entry(&opf_path) {
            Err(EpubError::MissingEntry(name)) => {
                let entries = self.list_files()?;
                debug!(opf_path = %opf_path, entries = ?entries, "压缩包中没有OPF文件");
                return Err(EpubError::MissingEntry(name));
            }
            other => other?,
        };
        parse_opf(&content)
    }
}

/// 打开EPUB文件并读取元数据
///
/// 压缩包在返回前关闭。
pub fn read_metadata<P: AsRef<Path>>(path: P) -> Result<OpfMetadata> {
    Epub::open(path)?.metadata()
}
