//! Line classification for text/gemini bodies.
//!
//! A body is interpreted one line at a time; the first character decides
//! the line class. A fence line (exactly three leading backticks) toggles
//! a persistent preformatted flag; while it is set, every line passes
//! through verbatim and only another fence is recognized. An odd number
//! of fences leaves the parser in preformatted state at end of input --
//! that is the document's literal meaning and is not auto-corrected.

/// A single entry in a document's link table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// 0-based index, assigned in order of first appearance.
    pub index: usize,
    /// Raw link target as written in the source (absolute or relative).
    pub target: String,
    /// Display label: the description text, or the target when absent.
    pub label: String,
}

/// Ordered link table for one parsed document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkTable {
    links: Vec<Link>,
}

impl LinkTable {
    /// Append a link, assigning the next index. Returns that index.
    fn push(&mut self, target: String, label: String) -> usize {
        let index = self.links.len();
        self.links.push(Link {
            index,
            target,
            label,
        });
        index
    }

    /// Look up a link by its rendered index.
    pub fn get(&self, index: usize) -> Option<&Link> {
        self.links.get(index)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }
}

/// Classification of one rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Plain text (or any text when markup is disabled).
    Normal,
    /// Heading with level 1-3; deeper `#` runs saturate at 3.
    Heading(u8),
    /// `*` list item, marker replaced by a bullet.
    List,
    /// `>` quote; the marker itself stays in the text.
    Quote,
    /// `=>` link, rendered as `(N) label`.
    Link,
    /// Verbatim line inside a preformatted block.
    Preformatted,
}

/// One logical (pre-wrap) output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub kind: LineKind,
    pub text: String,
}

/// A fully classified document body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDoc {
    pub lines: Vec<ParsedLine>,
    pub links: LinkTable,
    /// True when an odd number of fences left the parser in
    /// preformatted state at end of input.
    pub ends_preformatted: bool,
}

/// Classify a body line by line.
///
/// With `markup` disabled every line is [`LineKind::Normal`] verbatim
/// and the link table stays empty.
pub fn parse(body: &str, markup: bool) -> ParsedDoc {
    let mut lines = Vec::new();
    let mut links = LinkTable::default();
    let mut preformatted = false;

    for raw in body.lines() {
        if !markup {
            lines.push(ParsedLine {
                kind: LineKind::Normal,
                text: raw.to_string(),
            });
            continue;
        }

        // Fences are recognized in either state; the line itself is
        // consumed, never rendered.
        if is_fence(raw) {
            preformatted = !preformatted;
            continue;
        }

        if preformatted {
            lines.push(ParsedLine {
                kind: LineKind::Preformatted,
                text: raw.to_string(),
            });
            continue;
        }

        lines.push(classify(raw, &mut links));
    }

    ParsedDoc {
        lines,
        links,
        ends_preformatted: preformatted,
    }
}

/// Exactly three backticks at line start. Alt text may follow, but a
/// longer backtick run is ordinary text, not a fence.
fn is_fence(raw: &str) -> bool {
    raw.starts_with("```") && !raw[3..].starts_with('`')
}

/// Classify a single non-preformatted line by its first character.
fn classify(raw: &str, links: &mut LinkTable) -> ParsedLine {
    match raw.chars().next() {
        Some('#') => {
            let hashes = raw.chars().take_while(|&c| c == '#').count();
            let level = hashes.min(3) as u8;
            let text = raw[hashes..].trim_start().to_string();
            ParsedLine {
                kind: LineKind::Heading(level),
                text,
            }
        },
        Some('*') => ParsedLine {
            kind: LineKind::List,
            text: format!("\u{2022}{}", &raw[1..]),
        },
        Some('>') => ParsedLine {
            kind: LineKind::Quote,
            text: raw.to_string(),
        },
        Some('=') => parse_link_line(raw, links),
        _ => ParsedLine {
            kind: LineKind::Normal,
            text: raw.to_string(),
        },
    }
}

/// Parse a link line: `=> target [description]`.
///
/// The target is the first whitespace-delimited token after the marker;
/// everything after it is the description. The table entry is appended
/// at the next free index and the rendered text substitutes `(N)` for
/// the marker.
fn parse_link_line(raw: &str, links: &mut LinkTable) -> ParsedLine {
    let rest = raw
        .strip_prefix('=')
        .map(|r| r.strip_prefix('>').unwrap_or(r))
        .unwrap_or(raw)
        .trim_start();

    let (target, description) = match rest.find(char::is_whitespace) {
        Some(pos) => (&rest[..pos], rest[pos..].trim()),
        None => (rest, ""),
    };

    let label = if description.is_empty() {
        target.to_string()
    } else {
        description.to_string()
    };

    let index = links.push(target.to_string(), label.clone());

    ParsedLine {
        kind: LineKind::Link,
        text: format!("({index}) {label}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(doc: &ParsedDoc) -> Vec<LineKind> {
        doc.lines.iter().map(|l| l.kind).collect()
    }

    #[test]
    fn heading_blank_and_text() {
        let doc = parse("# Title\n\nNormal text\n", true);
        assert_eq!(doc.lines.len(), 3);
        assert_eq!(doc.lines[0].kind, LineKind::Heading(1));
        assert_eq!(doc.lines[0].text, "Title");
        assert_eq!(doc.lines[1].text, "");
        assert_eq!(doc.lines[2].kind, LineKind::Normal);
        assert_eq!(doc.lines[2].text, "Normal text");
        assert!(doc.links.is_empty());
    }

    #[test]
    fn heading_levels() {
        let doc = parse("# one\n## two\n### three\n", true);
        assert_eq!(
            kinds(&doc),
            vec![
                LineKind::Heading(1),
                LineKind::Heading(2),
                LineKind::Heading(3)
            ]
        );
        assert_eq!(doc.lines[1].text, "two");
    }

    #[test]
    fn heading_level_saturates_at_three() {
        for run in [4usize, 5, 10] {
            let body = format!("{} deep\n", "#".repeat(run));
            let doc = parse(&body, true);
            assert_eq!(doc.lines[0].kind, LineKind::Heading(3));
            assert_eq!(doc.lines[0].text, "deep");
        }
    }

    #[test]
    fn list_marker_becomes_bullet() {
        let doc = parse("* first\n* second\n", true);
        assert_eq!(doc.lines[0].kind, LineKind::List);
        assert_eq!(doc.lines[0].text, "\u{2022} first");
        assert_eq!(doc.lines[1].text, "\u{2022} second");
    }

    #[test]
    fn quote_marker_is_kept() {
        let doc = parse("> words of wisdom\n", true);
        assert_eq!(doc.lines[0].kind, LineKind::Quote);
        assert_eq!(doc.lines[0].text, "> words of wisdom");
    }

    #[test]
    fn link_with_description() {
        let doc = parse("=> gemini://x.org/ Click me\n", true);
        assert_eq!(doc.lines[0].kind, LineKind::Link);
        assert_eq!(doc.lines[0].text, "(0) Click me");
        assert_eq!(doc.links.len(), 1);
        let link = doc.links.get(0).unwrap();
        assert_eq!(link.index, 0);
        assert_eq!(link.target, "gemini://x.org/");
        assert_eq!(link.label, "Click me");
    }

    #[test]
    fn link_without_description_uses_target() {
        let doc = parse("=> /bare\n", true);
        assert_eq!(doc.lines[0].text, "(0) /bare");
        assert_eq!(doc.links.get(0).unwrap().label, "/bare");
    }

    #[test]
    fn link_indices_increase_in_source_order() {
        let doc = parse("=> /a A\ntext\n=> /b\n=> /c C\n", true);
        let targets: Vec<&str> = doc.links.iter().map(|l| l.target.as_str()).collect();
        assert_eq!(targets, vec!["/a", "/b", "/c"]);
        for (i, link) in doc.links.iter().enumerate() {
            assert_eq!(link.index, i);
        }
        assert_eq!(doc.lines[2].text, "(1) /b");
    }

    #[test]
    fn fence_lines_are_consumed() {
        let doc = parse("```\ncode\n```\n", true);
        assert_eq!(doc.lines.len(), 1);
        assert_eq!(doc.lines[0].kind, LineKind::Preformatted);
        assert_eq!(doc.lines[0].text, "code");
        assert!(!doc.ends_preformatted);
    }

    #[test]
    fn markup_is_inert_inside_preformatted_block() {
        let doc = parse("```\n# not a heading\n=> /x not a link\n```\n", true);
        assert_eq!(
            kinds(&doc),
            vec![LineKind::Preformatted, LineKind::Preformatted]
        );
        assert_eq!(doc.lines[0].text, "# not a heading");
        assert!(doc.links.is_empty());
    }

    #[test]
    fn odd_fence_count_stays_preformatted() {
        let doc = parse("```\nstuck\n", true);
        assert!(doc.ends_preformatted);
        assert_eq!(doc.lines[0].kind, LineKind::Preformatted);

        let even = parse("```\nin\n```\nout\n", true);
        assert!(!even.ends_preformatted);
        assert_eq!(even.lines[1].kind, LineKind::Normal);
    }

    #[test]
    fn fence_with_alt_text_still_toggles() {
        let doc = parse("```rust\nfn x() {}\n```\n", true);
        assert_eq!(doc.lines.len(), 1);
        assert_eq!(doc.lines[0].text, "fn x() {}");
    }

    #[test]
    fn four_backtick_line_is_not_a_fence() {
        let doc = parse("````\ntext\n", true);
        assert_eq!(kinds(&doc), vec![LineKind::Normal, LineKind::Normal]);
        assert_eq!(doc.lines[0].text, "````");
        assert!(!doc.ends_preformatted);

        // Inside a block it passes through verbatim and the real fence
        // still closes.
        let inner = parse("```\n````\n```\nafter\n", true);
        assert_eq!(inner.lines[0].kind, LineKind::Preformatted);
        assert_eq!(inner.lines[0].text, "````");
        assert_eq!(inner.lines[1].kind, LineKind::Normal);
        assert!(!inner.ends_preformatted);
    }

    #[test]
    fn markup_disabled_is_verbatim() {
        let doc = parse("# raw\n=> /a link\n```\n", false);
        assert_eq!(
            kinds(&doc),
            vec![LineKind::Normal, LineKind::Normal, LineKind::Normal]
        );
        assert_eq!(doc.lines[0].text, "# raw");
        assert!(doc.links.is_empty());
        assert!(!doc.ends_preformatted);
    }

    #[test]
    fn crlf_terminated_lines_keep_carriage_return_out_of_classes() {
        // str::lines strips \n but leaves \r; classification happens on
        // the first character so the classes are unaffected.
        let doc = parse("# Title\r\ntext\r\n", true);
        assert_eq!(doc.lines[0].kind, LineKind::Heading(1));
        assert_eq!(doc.lines[1].kind, LineKind::Normal);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn link_indices_are_dense_from_zero(n in 1usize..20) {
                let body: String = (0..n).map(|i| format!("=> /p{i} L{i}\n")).collect();
                let doc = parse(&body, true);
                prop_assert_eq!(doc.links.len(), n);
                for (i, link) in doc.links.iter().enumerate() {
                    prop_assert_eq!(link.index, i);
                    prop_assert_eq!(link.target.clone(), format!("/p{i}"));
                }
            }

            #[test]
            fn fence_parity_decides_final_state(n in 0usize..10) {
                let body: String = (0..n).map(|_| "```\n").collect();
                let doc = parse(&body, true);
                prop_assert_eq!(doc.ends_preformatted, n % 2 == 1);
                // Fence lines themselves never render.
                prop_assert!(doc.lines.is_empty());
            }

            #[test]
            fn parse_never_panics_on_arbitrary_text(body in ".{0,200}") {
                let _ = parse(&body, true);
                let _ = parse(&body, false);
            }
        }
    }
}
