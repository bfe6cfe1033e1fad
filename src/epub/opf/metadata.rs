//! 元数据处理模块
//!
//! 提供OPF包文件中Dublin Core元数据的结构定义和填充规则。

/// 标识符信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    /// 标识符值
    pub content: String,
    /// id属性，缺失时为空字符串
    pub id: String,
    /// opf:scheme属性(如ISBN、UUID等)，缺失时为空字符串
    pub scheme: String,
}

/// OPF文件中的元数据信息
///
/// 由一次解析填充，之后只读使用。同一字段的多个元素按文档顺序处理，
/// 单值字段(description、publisher、dc_type、format、source)以最后一个为准。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpfMetadata {
    pub titles: Vec<String>,
    pub creators: Vec<String>,
    pub subjects: Vec<String>,
    pub description: Option<String>,
    pub publisher: Option<String>,
    pub contributors: Vec<String>,
    pub dates: Vec<String>,
    pub dc_type: Option<String>,
    pub format: Option<String>,
    pub identifiers: Vec<Identifier>,
    pub source: Option<String>,
    pub languages: Vec<String>,
}

impl OpfMetadata {
    /// 创建空的元数据实例
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加标题，语言属性不保留
    pub fn add_title(&mut self, title: String, _lang: &str) {
        self.titles.push(title);
    }

    /// 添加创建者，角色和排序名不保留
    pub fn add_creator(&mut self, name: String, _role: &str, _file_as: &str) {
        self.creators.push(name);
    }

    /// 添加主题，忽略空值
    pub fn add_subject(&mut self, subject: String) {
        if !subject.is_empty() {
            self.subjects.push(subject);
        }
    }

    /// 添加贡献者，忽略空值
    pub fn add_contributor(&mut self, name: String, _role: &str, _file_as: &str) {
        if !name.is_empty() {
            self.contributors.push(name);
        }
    }

    /// 添加日期（原始字符串，不做解析），忽略空值
    pub fn add_date(&mut self, date: String, _event: &str) {
        if !date.is_empty() {
            self.dates.push(date);
        }
    }

    /// 添加标识符，忽略内容为空的标识符
    pub fn add_identifier(&mut self, content: String, id: &str, scheme: &str) {
        if content.is_empty() {
            return;
        }
        self.identifiers.push(Identifier {
            content,
            id: id.to_string(),
            scheme: scheme.to_string(),
        });
    }

    pub fn add_language(&mut self, lang: String) {
        self.languages.push(lang);
    }

    /// 获取ISBN
    ///
    /// 返回第一个scheme（不区分大小写）为 "isbn" 的标识符内容。
    pub fn isbn(&self) -> Option<&str> {
        self.identifiers
            .iter()
            .find(|identifier| identifier.scheme.eq_ignore_ascii_case("isbn"))
            .map(|identifier| identifier.content.as_str())
    }

    /// 第一个标题
    pub fn first_title(&self) -> Option<&str> {
        self.titles.first().map(String::as_str)
    }

    /// 第一个创建者
    pub fn first_creator(&self) -> Option<&str> {
        self.creators.first().map(String::as_str)
    }
}
