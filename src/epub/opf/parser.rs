//! OPF解析器模块
//!
//! 提供OPF（Open Packaging Format）包文件中Dublin Core元数据的解析功能。

use crate::epub::error::{EpubError, Result};
use crate::epub::opf::metadata::OpfMetadata;
use crate::epub::xml::{self, XmlElement};
use std::collections::HashMap;
use tracing::debug;

/// 解析OPF文件内容，提取metadata元素中的元数据
///
/// 根元素的直接子元素按小写标签名（去掉 `opf:` 前缀）索引，同名元素以最后一个为准。
/// 缺少metadata子元素时返回 `EpubError::MissingMetadata`。
///
/// # 参数
/// * `xml_content` - OPF文件的XML内容
pub fn parse_opf(xml_content: &[u8]) -> Result<OpfMetadata> {
    let package = xml::parse_document(xml_content)?;

    let mut sections: HashMap<String, &XmlElement> = HashMap::new();
    for child in package.child_elements() {
        let tag = child.name.to_lowercase();
        let tag = match tag.strip_prefix("opf:") {
            Some(stripped) => stripped.to_string(),
            None => tag,
        };
        sections.insert(tag, child);
    }

    let metadata = sections.get("metadata").ok_or(EpubError::MissingMetadata)?;
    let parsed = parse_metadata_element(metadata);

    debug!(
        titles = parsed.titles.len(),
        creators = parsed.creators.len(),
        identifiers = parsed.identifiers.len(),
        "解析OPF元数据完成"
    );

    Ok(parsed)
}

/// 扫描metadata元素的整个子树（不限于直接子元素），填充元数据
fn parse_metadata_element(element: &XmlElement) -> OpfMetadata {
    let mut metadata = OpfMetadata::new();

    for node in element.descendants_named("dc:title") {
        metadata.add_title(node.text(), node.attribute("xml:lang"));
    }

    for node in element.descendants_named("dc:creator") {
        metadata.add_creator(
            node.text(),
            node.attribute("opf:role"),
            node.attribute("opf:file-as"),
        );
    }

    for node in element.descendants_named("dc:subject") {
        metadata.add_subject(node.text());
    }

    for node in element.descendants_named("dc:description") {
        metadata.description = Some(node.text());
    }

    for node in element.descendants_named("dc:publisher") {
        metadata.publisher = Some(node.text());
    }

    for node in element.descendants_named("dc:contributor") {
        metadata.add_contributor(
            node.text(),
            node.attribute("opf:role"),
            node.attribute("opf:file-as"),
        );
    }

    for node in element.descendants_named("dc:date") {
        metadata.add_date(node.text(), node.attribute("opf:event"));
    }

    for node in element.descendants_named("dc:type") {
        metadata.dc_type = Some(node.text());
    }

    for node in element.descendants_named("dc:format") {
        metadata.format = Some(node.text());
    }

    for node in element.descendants_named("dc:identifier") {
        metadata.add_identifier(node.text(), node.attribute("id"), node.attribute("opf:scheme"));
    }

    for node in element.descendants_named("dc:source") {
        metadata.source = Some(node.text());
    }

    for node in element.descendants_named("dc:language") {
        metadata.add_language(node.text());
    }

    metadata
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_OPF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="BookId">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
    <dc:title xml:lang="en">The Left Hand of Darkness</dc:title>
    <dc:creator opf:role="aut" opf:file-as="Le Guin, Ursula K.">Ursula K. Le Guin</dc:creator>
    <dc:creator opf:role="aut">Second Author</dc:creator>
    <dc:subject>Science Fiction</dc:subject>
    <dc:subject></dc:subject>
    <dc:subject>Gender</dc:subject>
    <dc:description>First description</dc:description>
    <dc:description>Second description</dc:description>
    <dc:publisher>Ace</dc:publisher>
    <dc:contributor opf:role="ill">Cover Artist</dc:contributor>
    <dc:contributor opf:role="edt"></dc:contributor>
    <dc:date opf:event="publication">1969</dc:date>
    <dc:date opf:event="modification">2010-01-01</dc:date>
    <dc:type>Text</dc:type>
    <dc:format>application/epub+zip</dc:format>
    <dc:identifier id="BookId" opf:scheme="UUID">urn:uuid:0000</dc:identifier>
    <dc:identifier opf:scheme="ISBN">9780441478125</dc:identifier>
    <dc:identifier opf:scheme="ISBN"></dc:identifier>
    <dc:source>Scan</dc:source>
    <dc:language>en</dc:language>
    <dc:language>fr</dc:language>
    <dc:relation>ignored</dc:relation>
  </metadata>
  <manifest>
    <item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine><itemref idref="ch1"/></spine>
</package>"#;

    #[test]
    fn test_parse_full_metadata() {
        let metadata = parse_opf(FULL_OPF.as_bytes()).expect("解析OPF失败");

        assert_eq!(metadata.titles, vec!["The Left Hand of Darkness"]);
        assert_eq!(metadata.creators, vec!["Ursula K. Le Guin", "Second Author"]);
        assert_eq!(metadata.subjects, vec!["Science Fiction", "Gender"]);
        assert_eq!(metadata.description.as_deref(), Some("Second description"));
        assert_eq!(metadata.publisher.as_deref(), Some("Ace"));
        assert_eq!(metadata.contributors, vec!["Cover Artist"]);
        assert_eq!(metadata.dates, vec!["1969", "2010-01-01"]);
        assert_eq!(metadata.dc_type.as_deref(), Some("Text"));
        assert_eq!(metadata.format.as_deref(), Some("application/epub+zip"));
        assert_eq!(metadata.source.as_deref(), Some("Scan"));
        assert_eq!(metadata.languages, vec!["en", "fr"]);

        assert_eq!(metadata.identifiers.len(), 2);
        assert_eq!(metadata.identifiers[0].id, "BookId");
        assert_eq!(metadata.identifiers[0].scheme, "UUID");
        assert_eq!(metadata.identifiers[1].id, "");
        assert_eq!(metadata.isbn(), Some("9780441478125"));
    }

    #[test]
    fn test_opf_prefixed_sections() {
        let opf = r#"<opf:package xmlns:opf="http://www.idpf.org/2007/opf">
  <OPF:Metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>Prefixed</dc:title>
    <dc:creator>Someone</dc:creator>
  </OPF:Metadata>
</opf:package>"#;

        let metadata = parse_opf(opf.as_bytes()).unwrap();
        assert_eq!(metadata.first_title(), Some("Prefixed"));
        assert_eq!(metadata.first_creator(), Some("Someone"));
    }

    #[test]
    fn test_last_metadata_section_wins() {
        let opf = r#"<package>
  <metadata><dc:title>First</dc:title></metadata>
  <metadata><dc:title>Second</dc:title></metadata>
</package>"#;

        let metadata = parse_opf(opf.as_bytes()).unwrap();
        assert_eq!(metadata.titles, vec!["Second"]);
    }

    #[test]
    fn test_nested_elements_are_found() {
        let opf = r#"<package>
  <metadata>
    <dc-metadata>
      <dc:title>Nested Title</dc:title>
      <dc:creator>Nested Author</dc:creator>
    </dc-metadata>
  </metadata>
</package>"#;

        let metadata = parse_opf(opf.as_bytes()).unwrap();
        assert_eq!(metadata.first_title(), Some("Nested Title"));
        assert_eq!(metadata.first_creator(), Some("Nested Author"));
    }

    #[test]
    fn test_unprefixed_dc_elements_are_ignored() {
        let opf = r#"<package xmlns="http://www.idpf.org/2007/opf">
  <metadata xmlns="http://purl.org/dc/elements/1.1/">
    <title>No Prefix</title>
  </metadata>
</package>"#;

        let metadata = parse_opf(opf.as_bytes()).unwrap();
        assert!(metadata.titles.is_empty());
    }

    #[test]
    fn test_metadata_outside_package_children_is_missing() {
        let opf =
            r#"<package><wrapper><metadata><dc:title>x</dc:title></metadata></wrapper></package>"#;

        let result = parse_opf(opf.as_bytes());
        assert!(matches!(result, Err(EpubError::MissingMetadata)));
    }

    #[test]
    fn test_utf16_opf_with_bom() {
        let opf = r#"<?xml version="1.0" encoding="UTF-16"?>
<package><metadata><dc:title>T</dc:title><dc:creator>A</dc:creator></metadata></package>"#;
        let mut bytes = vec![0xFF, 0xFE];
        bytes.extend(opf.encode_utf16().flat_map(|unit| unit.to_le_bytes()));

        let metadata = parse_opf(&bytes).unwrap();
        assert_eq!(metadata.titles, vec!["T"]);
        assert_eq!(metadata.creators, vec!["A"]);
    }

    #[test]
    fn test_latin1_opf() {
        let mut bytes =
            br#"<?xml version="1.0" encoding="ISO-8859-1"?><package><metadata><dc:title>Caf"#
                .to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"</dc:title></metadata></package>");

        let metadata = parse_opf(&bytes).unwrap();
        assert_eq!(metadata.titles, vec!["Café"]);
    }

    #[test]
    fn test_malformed_opf() {
        let result = parse_opf(b"<package><metadata></package>");
        assert!(result.unwrap_err().is_xml_error());
    }
}
