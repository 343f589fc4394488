//! 빈도 집계용 문자열 정규화
//!
//! 길이는 바이트가 아니라 문자(`char`) 단위로 셉니다.
//! 잘린 결과는 말줄임표를 포함하여 `max_len` 문자를 넘지 않습니다.

const ELLIPSIS: &str = "...";

/// `max_len` 문자를 넘으면 `max_len - 3` 문자만 남기고 `...`를 붙입니다.
///
/// `max_len`이 3 이하이면 말줄임표 없이 앞부분만 남깁니다.
pub fn truncate_with_ellipsis(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_owned();
    }
    let Some(keep) = max_len.checked_sub(ELLIPSIS.len()).filter(|k| *k > 0) else {
        return s.chars().take(max_len).collect();
    };
    let mut out: String = s.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// 페이지 정규화: 첫 `?`부터 잘라내고 길이를 제한합니다.
pub fn normalize_page(url: &str, max_len: usize) -> String {
    let path = url.split_once('?').map_or(url, |(path, _)| path);
    truncate_with_ellipsis(path, max_len)
}

/// User-Agent 정규화: 길이만 제한합니다.
pub fn normalize_user_agent(user_agent: &str, max_len: usize) -> String {
    truncate_with_ellipsis(user_agent, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_strings_are_untouched() {
        assert_eq!(truncate_with_ellipsis("abc", 100), "abc");
        assert_eq!(truncate_with_ellipsis("", 10), "");
    }

    #[test]
    fn exact_length_is_untouched() {
        let s = "a".repeat(100);
        assert_eq!(truncate_with_ellipsis(&s, 100), s);
    }

    #[test]
    fn long_strings_keep_97_plus_ellipsis() {
        let s = "a".repeat(150);
        let out = truncate_with_ellipsis(&s, 100);
        assert_eq!(out.chars().count(), 100);
        assert!(out.ends_with("..."));
        assert_eq!(&out[..97], &s[..97]);
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let s = "가".repeat(60);
        let out = truncate_with_ellipsis(&s, 50);
        assert_eq!(out.chars().count(), 50);
        assert!(out.starts_with(&"가".repeat(47)));
    }

    #[test]
    fn tiny_limits_skip_ellipsis() {
        assert_eq!(truncate_with_ellipsis("abcdef", 3), "abc");
        assert_eq!(truncate_with_ellipsis("abcdef", 0), "");
    }

    #[test]
    fn page_drops_query_string() {
        assert_eq!(normalize_page("/search?q=1&x=2", 100), "/search");
        assert_eq!(normalize_page("/?", 100), "/");
        assert_eq!(normalize_page("/plain", 100), "/plain");
    }

    #[test]
    fn page_is_truncated_after_query_strip() {
        let url = format!("/{}?q=1", "p".repeat(200));
        let page = normalize_page(&url, 100);
        assert_eq!(page.chars().count(), 100);
        assert!(page.ends_with("..."));
        assert!(!page.contains('?'));
    }

    #[test]
    fn user_agent_keeps_query_like_text() {
        assert_eq!(normalize_user_agent("agent?v=1", 100), "agent?v=1");
    }
}
