/// Escapes LaTeX special characters in free text.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes a URL for use as the first argument of `\href`.
/// hyperref takes the URL verbatim apart from `%` and `#`.
pub fn escape_url(url: &str) -> String {
    url.replace('%', "\\%").replace('#', "\\#")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_latex_specials() {
        assert_eq!(escape_latex("R&D 50% $5 #1"), "R\\&D 50\\% \\$5 \\#1");
        assert_eq!(escape_latex("snake_case {x}"), "snake\\_case \\{x\\}");
        assert_eq!(escape_latex("a\\b"), "a\\textbackslash{}b");
        assert_eq!(escape_latex("~^"), "\\textasciitilde{}\\textasciicircum{}");
    }

    #[test]
    fn test_escape_latex_leaves_plain_text() {
        assert_eq!(escape_latex("Senior Engineer, Berlin"), "Senior Engineer, Berlin");
    }

    #[test]
    fn test_escape_url_only_touches_percent_and_hash() {
        assert_eq!(
            escape_url("https://x.dev/a_b?q=%20#top"),
            "https://x.dev/a_b?q=\\%20\\#top"
        );
    }
}
