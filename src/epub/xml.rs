//! 轻量XML元素树
//!
//! 基于quick_xml的事件流构建一个小型的元素树，供container.xml和OPF文件解析使用。
//! 元素名和属性名保留完整的限定名（如 `dc:title`、`opf:role`），按限定名精确匹配。

use crate::epub::error::{EpubError, Result};
use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use once_cell::sync::Lazy;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use regex::bytes::Regex;

/// XML声明中的encoding伪属性
static DECLARED_ENCODING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^<\?xml[^>]*?\sencoding\s*=\s*["']([A-Za-z][A-Za-z0-9._:-]*)["']"#)
        .expect("无效的正则表达式")
});

/// XML节点
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// 子元素
    Element(XmlElement),
    /// 文本（相邻的文本与CDATA已合并）
    Text(String),
    /// 注释、处理指令等其他节点
    Other,
}

/// XML元素
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    /// 限定名，如 "dc:title"
    pub name: String,
    /// 属性列表(限定名, 值)，按文档顺序
    pub attributes: Vec<(String, String)>,
    /// 子节点
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    fn from_start(e: &BytesStart) -> Result<Self> {
        let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
        let mut attributes = Vec::new();

        for attr_result in e.attributes() {
            let attr = attr_result.map_err(|e| EpubError::Xml(quick_xml::Error::InvalidAttr(e)))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr.unescape_value()?.to_string();
            attributes.push((key, value));
        }

        Ok(XmlElement {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    /// 获取属性值，属性不存在时返回空字符串
    pub fn attribute(&self, name: &str) -> &str {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    /// 元素的文本内容：第一个子节点为文本时返回其去除首尾空白后的内容，否则返回空字符串
    pub fn text(&self) -> String {
        match self.children.first() {
            Some(XmlNode::Text(text)) => text.trim().to_string(),
            _ => String::new(),
        }
    }

    /// 直接子元素
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// 按文档顺序（先序）查找子树中所有指定名称的元素，不包含自身
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a XmlElement> {
        let mut found = Vec::new();
        Self::collect_named(self, name, &mut found);
        found
    }

    fn collect_named<'a>(element: &'a XmlElement, name: &str, found: &mut Vec<&'a XmlElement>) {
        for child in element.child_elements() {
            if child.name == name {
                found.push(child);
            }
            Self::collect_named(child, name, found);
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(XmlNode::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(XmlNode::Text(text.to_string()));
        }
    }
}

/// 解析XML字节内容并返回根元素
///
/// 按BOM、XML声明中的encoding的顺序确定编码，都没有时按UTF-8解码。
pub fn parse_document(bytes: &[u8]) -> Result<XmlElement> {
    let (encoding, bom_len) = detect_encoding(bytes);
    let content = encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        .ok_or_else(|| {
            EpubError::MalformedXml(format!("内容不是有效的{}编码", encoding.name()))
        })?;
    parse_str(&content)
}

/// 确定文档编码，返回编码和BOM的字节长度
fn detect_encoding(bytes: &[u8]) -> (&'static Encoding, usize) {
    if let Some(found) = Encoding::for_bom(bytes) {
        return found;
    }

    // 没有BOM的UTF-16文档以 "<?" 开头
    match bytes {
        [b'<', 0, b'?', 0, ..] => return (UTF_16LE, 0),
        [0, b'<', 0, b'?', ..] => return (UTF_16BE, 0),
        _ => {}
    }

    let declared = DECLARED_ENCODING
        .captures(bytes)
        .and_then(|caps| caps.get(1))
        .and_then(|label| Encoding::for_label(label.as_bytes()));

    // 以ASCII形式写出的声明不可能是UTF-16
    match declared {
        Some(encoding) => (encoding.output_encoding(), 0),
        None => (UTF_8, 0),
    }
}

/// 解析XML字符串并返回根元素
pub fn parse_str(xml_content: &str) -> Result<XmlElement> {
    let xml_content = xml_content.strip_prefix('\u{feff}').unwrap_or(xml_content);
    let mut reader = Reader::from_str(xml_content);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                if root.is_some() && stack.is_empty() {
                    return Err(EpubError::MalformedXml("存在多个根元素".to_string()));
                }
                stack.push(XmlElement::from_start(e)?);
            }
            Event::Empty(ref e) => {
                let element = XmlElement::from_start(e)?;
                close_element(element, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                // 结束标签名称的匹配由quick_xml检查
                let element = stack
                    .pop()
                    .ok_or_else(|| EpubError::MalformedXml("多余的结束标签".to_string()))?;
                close_element(element, &mut stack, &mut root)?;
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                match stack.last_mut() {
                    Some(parent) => parent.push_text(&text),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(EpubError::MalformedXml("根元素之外存在文本内容".to_string()));
                    }
                }
            }
            Event::CData(e) => {
                let inner = e.into_inner();
                let text = String::from_utf8_lossy(&inner);
                match stack.last_mut() {
                    Some(parent) => parent.push_text(&text),
                    None => {
                        return Err(EpubError::MalformedXml("根元素之外存在CDATA".to_string()));
                    }
                }
            }
            Event::Comment(_) | Event::PI(_) => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlNode::Other);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(EpubError::MalformedXml(format!("元素 <{}> 没有闭合", open.name)));
    }

    root.ok_or_else(|| EpubError::MalformedXml("文档中没有根元素".to_string()))
}

fn close_element(
    element: XmlElement,
    stack: &mut Vec<XmlElement>,
    root: &mut Option<XmlElement>,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None => {
            if root.is_some() {
                return Err(EpubError::MalformedXml("存在多个根元素".to_string()));
            }
            *root = Some(element);
        }
    }
    Ok(())
}
