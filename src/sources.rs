//! Line-oriented converter for a sources section: headings of any depth and
//! numbered reference lists, where each physical line decides its own role.
//! Blank lines do not merge lists here, unlike the block segmenter.

use crate::html::{self, Emit, Mode};
use crate::inline::{LINK_RULES, parse_inline};
use crate::marker;

/// Convert a sources section to HTML, one element per output line
pub fn render(document: &str, escape: bool) -> String {
    let emit = Emit {
        mode: Mode::Html,
        escape,
    };
    let mut out: Vec<String> = Vec::new();
    let mut in_list = false;

    for line in document.lines().map(str::trim) {
        let item = marker::ordered_marker(line);
        if in_list && item.is_none() {
            out.push("</ol>".to_string());
            in_list = false;
        }

        if line.is_empty() {
            continue;
        }

        if let Some(heading) = marker::loose_heading(line) {
            out.push(format!(
                "<h{level}>{text}</h{level}>",
                level = heading.level,
                text = links_only(heading.text, emit)
            ));
        } else if let Some(item) = item {
            if !in_list {
                out.push("<ol>".to_string());
                in_list = true;
            }
            out.push(format!("<li>{}</li>", links_only(item.rest.trim(), emit)));
        } else {
            out.push(format!("<p>{}</p>", links_only(line, emit)));
        }
    }

    if in_list {
        out.push("</ol>".to_string());
    }

    out.join("\n")
}

fn links_only(text: &str, emit: Emit) -> String {
    html::spans_to_string(&parse_inline(text, LINK_RULES), emit)
}

#[cfg(test)]
mod tests {
    use crate::render_sources_section;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn headings_and_numbered_sources() {
        let doc = indoc! {"
            ## Sources

            1. [Gcore CDN](https://gcore.com/cdn)
            2. [RFC 9110](https://www.rfc-editor.org/rfc/rfc9110)

            ### Further reading
            1. Plain title only
        "};
        assert_eq!(
            render_sources_section(doc),
            indoc! {r#"
                <h2>Sources</h2>
                <ol>
                <li><a href="https://gcore.com/cdn">Gcore CDN</a></li>
                <li><a href="https://www.rfc-editor.org/rfc/rfc9110">RFC 9110</a></li>
                </ol>
                <h3>Further reading</h3>
                <ol>
                <li>Plain title only</li>
                </ol>"#}
        );
    }

    #[test]
    fn blank_line_splits_a_list() {
        assert_eq!(
            render_sources_section("1. a\n\n2. b"),
            "<ol>\n<li>a</li>\n</ol>\n<ol>\n<li>b</li>\n</ol>"
        );
    }

    #[test]
    fn prose_line_closes_the_list() {
        assert_eq!(
            render_sources_section("1. a\nsee [x](y)\n2. b"),
            "<ol>\n<li>a</li>\n</ol>\n<p>see <a href=\"y\">x</a></p>\n<ol>\n<li>b</li>\n</ol>"
        );
    }

    #[test]
    fn heading_closes_the_list() {
        assert_eq!(
            render_sources_section("1. a\n## Next"),
            "<ol>\n<li>a</li>\n</ol>\n<h2>Next</h2>"
        );
    }

    #[test]
    fn deep_headings_are_clamped() {
        assert_eq!(
            render_sources_section("######## Deep\n#### Four"),
            "<h6>Deep</h6>\n<h4>Four</h4>"
        );
    }

    #[test]
    fn emphasis_is_left_alone() {
        assert_eq!(
            render_sources_section("1. **Bold** title"),
            "<ol>\n<li>**Bold** title</li>\n</ol>"
        );
    }

    #[test]
    fn bullets_are_paragraphs() {
        assert_eq!(render_sources_section("• not a source"), "<p>• not a source</p>");
    }

    #[test]
    fn empty_input() {
        assert_eq!(render_sources_section(""), "");
        assert_eq!(render_sources_section("\n\n"), "");
    }
}
