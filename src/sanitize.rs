//! 文件名清理
//!
//! 把任意字符串转换为可以安全用作文件名的片段。

use once_cell::sync::Lazy;
use regex::Regex;

/// 除Unicode单词字符、连字符、句点和空白以外的字符
///
/// Unicode的 `\w` 包含组合符号（Mn/Mc），分解形式的重音字母保持完整。
static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^-\w.\s]").expect("无效的正则表达式"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("无效的正则表达式"));

/// 清理文件名
///
/// 先删除不允许的字符（斜杠、冒号、引号等），再把连续空白压缩为一个空格并去除首尾空白。
/// 结果对再次清理保持不变。
///
/// # 示例
///
/// ```rust
/// use epubshelf::clean_filename;
///
/// assert_eq!(clean_filename("Dune:  Messiah / Part\t1"), "Dune Messiah Part 1");
/// ```
pub fn clean_filename(name: &str) -> String {
    let kept = DISALLOWED.replace_all(name, "");
    let collapsed = WHITESPACE.replace_all(&kept, " ");
    collapsed.trim().to_string()
}

/// 按字符（而不是字节）截断字符串
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((index, _)) => &s[..index],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_removes_path_hostile_characters() {
        let cleaned = clean_filename(r#"a/b\c:d*e?f"g<h>i|j"#);
        assert_eq!(cleaned, "abcdefghij");
        for c in ['/', '\\', ':', '*', '?', '"', '<', '>', '|'] {
            assert!(!cleaned.contains(c));
        }
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(clean_filename("  The   Hobbit \t\n - Tolkien  "), "The Hobbit - Tolkien");
        assert_eq!(clean_filename("a : b"), "a b");
    }

    #[test]
    fn test_keeps_unicode_word_characters() {
        assert_eq!(clean_filename("三体 - 刘慈欣"), "三体 - 刘慈欣");
        assert_eq!(clean_filename("Café_Crème v1.2"), "Café_Crème v1.2");
        assert_eq!(clean_filename("Œuvres «complètes»"), "Œuvres complètes");
    }

    #[test]
    fn test_keeps_combining_marks() {
        // NFD形式的 "é" 由 "e" 和组合重音符 U+0301 组成
        assert_eq!(clean_filename("Cafe\u{301} - Zola"), "Cafe\u{301} - Zola");
        assert_eq!(clean_filename("क्षत्रिय"), "क्षत्रिय");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "   ",
            "a : b",
            ": leading colon",
            "trailing /",
            "Title: Subtitle - Author, Jr.",
            "tabs\t\tand\nnewlines",
            "“Smart quotes” — and dashes",
            "三体：黑暗森林 - 刘慈欣",
        ];

        for sample in samples {
            let once = clean_filename(sample);
            assert_eq!(clean_filename(&once), once, "输入: {:?}", sample);
            assert!(!once.contains("  "));
        }
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("三体黑暗森林", 2), "三体");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn proptest_clean_filename_is_idempotent() {
        proptest!(|(text in "\\PC{0,200}")| {
            let once = clean_filename(&text);
            prop_assert_eq!(clean_filename(&once), once.clone());
            prop_assert!(!once.contains("  "));
            prop_assert!(!once.contains(['/', '\\', ':', '*', '?', '"', '<', '>', '|']));
        });
    }
}
