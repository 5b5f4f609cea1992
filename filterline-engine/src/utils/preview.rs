/// 日志里展示的单行摘要：空白压成单个空格，超过 max_chars 个字符截断并补 `…`
pub fn short_preview(text: &str, max_chars: usize) -> String {
    let folded = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match folded.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &folded[..cut]),
        None => folded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_folds_whitespace() {
        assert_eq!(short_preview("  a \t\n b ", 10), "a b");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(short_preview("abcdef", 3), "abc…");
        assert_eq!(short_preview("abc", 3), "abc");
        assert_eq!(short_preview("日志过滤器", 2), "日志…");
    }
}
