use std::borrow::Cow;

/// 左侧补空格右对齐到最小宽度（按字符计数）
/// 超过宽度的字符串原样返回（零拷贝）
#[inline(always)]
pub fn pad_with_blank(s: &str, width: usize) -> Cow<'_, str> {
    let len = s.chars().count();
    if len >= width {
        return Cow::Borrowed(s);
    }
    let mut padded = String::with_capacity(width - len + s.len());
    padded.extend(std::iter::repeat(' ').take(width - len));
    padded.push_str(s);
    Cow::Owned(padded)
}
