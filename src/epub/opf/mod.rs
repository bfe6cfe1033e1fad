//! OPF（Open Packaging Format）文件解析模块
//!
//! 此模块从EPUB中OPF包文件的metadata部分提取Dublin Core元数据。

mod metadata;
mod parser;

pub use metadata::{Identifier, OpfMetadata};
pub use parser::parse_opf;
