use crate::epub::error::Result;
use crate::epub::xml;

/// OPF包文件的媒体类型
pub const MIMETYPE_OPF: &str = "application/oebps-package+xml";

/// container.xml在EPUB压缩包中的固定路径
pub const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Container.xml中的rootfile信息
#[derive(Debug, Clone, PartialEq)]
pub struct RootFile {
    pub full_path: String,
    pub media_type: String,
}

/// Container.xml的解析结果
#[derive(Debug, Clone)]
pub struct Container {
    pub rootfiles: Vec<RootFile>,
}

impl Container {
    /// 解析container.xml内容
    ///
    /// 按文档顺序收集所有rootfile元素，缺少的属性按空字符串处理。
    ///
    /// # 参数
    /// * `xml_content` - container.xml的文件内容
    pub fn parse_xml(xml_content: &[u8]) -> Result<Container> {
        let root = xml::parse_document(xml_content)?;

        let rootfiles = root
            .descendants_named("rootfile")
            .into_iter()
            .map(|element| RootFile {
                full_path: element.attribute("full-path").to_string(),
                media_type: element.attribute("media-type").to_string(),
            })
            .collect();

        Ok(Container { rootfiles })
    }

    /// 获取OPF文件路径
    ///
    /// 只取第一个媒体类型为 `application/oebps-package+xml` 的rootfile，
    /// 没有匹配项时返回None。
    pub fn opf_path(&self) -> Option<&str> {
        self.rootfiles
            .iter()
            .find(|rootfile| rootfile.media_type == MIMETYPE_OPF)
            .map(|rootfile| rootfile.full_path.as_str())
    }
}
