//! 测试用EPUB文件生成工具

use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::ZipWriter;
use zip::write::FileOptions;

use crate::epub::error::Result;

/// 标准的container.xml
pub const CONTAINER_XML: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
    <rootfiles>
        <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
    </rootfiles>
</container>"#;

/// 生成只包含一个标题和一个作者的OPF文件
pub fn opf_document(title: &str, creator: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package version="2.0" xmlns="http://www.idpf.org/2007/opf" unique-identifier="BookId">
    <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
        <dc:title>{}</dc:title>
        <dc:creator opf:role="aut">{}</dc:creator>
        <dc:language>en</dc:language>
        <dc:identifier id="BookId" opf:scheme="ISBN">978-1234567890</dc:identifier>
    </metadata>
    <manifest>
        <item id="chapter1" href="text/chapter1.xhtml" media-type="application/xhtml+xml"/>
    </manifest>
    <spine>
        <itemref idref="chapter1"/>
    </spine>
</package>"#,
        title, creator
    )
}

/// 按给定条目生成zip文件
pub fn write_epub_entries(path: &Path, entries: &[(&str, &str)]) -> Result<()> {
    let file = File::create(path)?;
    let mut zip = ZipWriter::new(file);

    zip.start_file("mimetype", FileOptions::<()>::default())?;
    zip.write_all(b"application/epub+zip")?;

    for (name, content) in entries {
        zip.start_file(*name, FileOptions::<()>::default())?;
        zip.write_all(content.as_bytes())?;
    }

    zip.finish()?;
    Ok(())
}

/// 生成一个有效的EPUB文件
pub fn write_epub(path: &Path, title: &str, creator: &str) -> Result<()> {
    write_epub_entries(
        path,
        &[
            ("META-INF/container.xml", CONTAINER_XML),
            ("OEBPS/content.opf", &opf_document(title, creator)),
        ],
    )
}

/// 生成包含自定义OPF内容的EPUB文件
pub fn write_epub_with_opf(path: &Path, opf: &str) -> Result<()> {
    write_epub_entries(
        path,
        &[
            ("META-INF/container.xml", CONTAINER_XML),
            ("OEBPS/content.opf", opf),
        ],
    )
}
