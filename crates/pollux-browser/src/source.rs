//! Local content sources: `file:` reads and bundled `about:` pages.
//!
//! Remote fetching lives in pollux-net; this module covers everything
//! that never touches the network. Local sources have no status codes:
//! a missing file degrades to a fixed marker page instead of an error,
//! so navigation always lands somewhere.

use std::fs;
use std::path::Path;

use pollux_types::{Address, Scheme};

/// Body and markup flag for a locally-sourced page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalPage {
    pub text: String,
    /// Whether the body should be interpreted as text/gemini.
    pub markup: bool,
}

const NEWTAB: &str = include_str!("../pages/newtab.gmi");
const HELP: &str = include_str!("../pages/help.gmi");

/// Load a non-network address. Panics are never an option here, so the
/// caller must only pass `File` or `About` schemes; a `Gemini` address
/// degrades to the not-found marker.
pub fn load_local(addr: &Address, pages_dir: Option<&Path>) -> LocalPage {
    match addr.scheme {
        Scheme::File => load_file(&addr.path),
        Scheme::About => load_about(&addr.path, pages_dir),
        Scheme::Gemini => not_found(&addr.to_string()),
    }
}

/// Read a filesystem path. Markup is gated on the file extension so a
/// plain text file is not mangled by the classifier.
fn load_file(path: &str) -> LocalPage {
    match fs::read_to_string(path) {
        Ok(text) => LocalPage {
            text,
            markup: has_gemtext_extension(path),
        },
        Err(e) => {
            log::warn!("could not read {path}: {e}");
            not_found(path)
        },
    }
}

/// Look up an `about:` page: the configured pages directory first,
/// then the bundled pages. Always rendered as markup.
fn load_about(name: &str, pages_dir: Option<&Path>) -> LocalPage {
    if let Some(dir) = pages_dir {
        let path = dir.join(format!("{name}.gmi"));
        if let Ok(text) = fs::read_to_string(&path) {
            return LocalPage { text, markup: true };
        }
    }

    let text = match name {
        "newtab" => NEWTAB,
        "help" => HELP,
        _ => return not_found(&format!("about:{name}")),
    };
    LocalPage {
        text: text.to_string(),
        markup: true,
    }
}

fn has_gemtext_extension(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.ends_with(".gmi") || lower.ends_with(".gemini")
}

/// Marker page shown when a local source does not exist.
fn not_found(what: &str) -> LocalPage {
    LocalPage {
        text: format!("# Not found\n\nNothing here: {what}\n\n=> about:newtab Start page\n"),
        markup: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    #[test]
    fn bundled_pages_resolve_without_a_pages_dir() {
        let page = load_local(&addr("about:newtab"), None);
        assert!(page.markup);
        assert!(page.text.contains("# Pollux"));

        let help = load_local(&addr("about:help"), None);
        assert!(help.text.contains("# Help"));
    }

    #[test]
    fn unknown_about_page_degrades_to_the_marker() {
        let page = load_local(&addr("about:nonsense"), None);
        assert!(page.text.contains("Nothing here: about:nonsense"));
        assert!(page.markup);
    }

    #[test]
    fn pages_dir_overrides_bundled_pages() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("newtab.gmi"), "# Custom start\n").unwrap();

        let page = load_local(&addr("about:newtab"), Some(dir.path()));
        assert_eq!(page.text, "# Custom start\n");

        // Pages absent from the directory still fall back.
        let help = load_local(&addr("about:help"), Some(dir.path()));
        assert!(help.text.contains("# Help"));
    }

    #[test]
    fn gemtext_extension_enables_markup() {
        let mut file = tempfile::Builder::new()
            .suffix(".gmi")
            .tempfile()
            .unwrap();
        writeln!(file, "# Heading").unwrap();

        let page = load_local(&addr(&format!("file://{}", file.path().display())), None);
        assert!(page.markup);
        assert_eq!(page.text, "# Heading\n");
    }

    #[test]
    fn other_extensions_render_verbatim() {
        let mut file = tempfile::Builder::new()
            .suffix(".txt")
            .tempfile()
            .unwrap();
        writeln!(file, "# not a heading").unwrap();

        let page = load_local(&addr(&format!("file://{}", file.path().display())), None);
        assert!(!page.markup);
    }

    #[test]
    fn missing_file_degrades_to_the_marker() {
        let page = load_local(&addr("file:///no/such/file.gmi"), None);
        assert!(page.text.contains("Nothing here: /no/such/file.gmi"));
        assert!(page.markup);
    }
}
