//! Navigation session: one current document, a scroll offset, and the
//! command interpreter driving both.
//!
//! The session owns no terminal state. Each frame the front end calls
//! [`Session::view`] with the current geometry, paints the returned
//! document, and feeds keys and commands back in. Failed navigation
//! never discards the current document; the failure becomes a note for
//! the status bar.

use std::collections::HashSet;
use std::path::PathBuf;

use pollux_gemtext::{Document, LinkTable, Viewport, render};
use pollux_net::GeminiClient;
use pollux_types::{Address, PolluxError, Response, Result, Scheme, StatusClass};

use crate::config::Config;
use crate::source;

/// Remote fetch seam, so session logic tests without a network.
pub trait Fetcher {
    fn fetch(&self, addr: &Address) -> Result<Response>;
}

impl Fetcher for GeminiClient {
    fn fetch(&self, addr: &Address) -> Result<Response> {
        GeminiClient::fetch(self, addr)
    }
}

/// One parsed command-mode input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Down,
    Up,
    Open(String),
    Help,
    Empty,
    Unknown(String),
}

/// Parse command-mode input. A leading `:` is tolerated so the caller
/// can hand over the raw typed line.
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let input = input.strip_prefix(':').unwrap_or(input).trim();
    if input.is_empty() {
        return Command::Empty;
    }

    let (verb, arg) = match input.find(char::is_whitespace) {
        Some(pos) => (&input[..pos], input[pos..].trim()),
        None => (input, ""),
    };

    match verb {
        "quit" => Command::Quit,
        "down" => Command::Down,
        "up" => Command::Up,
        "help" => Command::Help,
        "open" if !arg.is_empty() => Command::Open(arg.to_string()),
        _ => Command::Unknown(input.to_string()),
    }
}

/// What one load attempt produced.
enum Outcome {
    /// A new document to display.
    Document {
        address: Address,
        body: String,
        markup: bool,
    },
    /// A server reply that is not a document (input prompt, failure
    /// detail, unsupported feature). The current document stays.
    Notice(String),
}

/// The navigation state machine.
pub struct Session<F: Fetcher> {
    fetcher: F,
    pages_dir: Option<PathBuf>,
    max_redirects: usize,

    address: Address,
    body: String,
    markup: bool,
    scroll: usize,
    /// Link table of the last rendered frame.
    links: LinkTable,
    /// Whether the last rendered frame showed the end of the document.
    at_end: bool,
    note: Option<String>,
    running: bool,
}

impl<F: Fetcher> Session<F> {
    /// Build an idle session; nothing is fetched until [`navigate`].
    ///
    /// [`navigate`]: Session::navigate
    pub fn new(fetcher: F, config: &Config) -> Self {
        Self {
            fetcher,
            pages_dir: config.pages_dir.clone(),
            max_redirects: config.max_redirects,
            address: Address {
                scheme: Scheme::About,
                host: String::new(),
                port: None,
                path: "newtab".to_string(),
                query: None,
            },
            body: String::new(),
            markup: true,
            scroll: 0,
            links: LinkTable::default(),
            at_end: true,
            note: None,
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Address of the current document, for the status bar.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Pending status-bar note, cleared by the next successful
    /// navigation.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Drop the pending note. The front end calls this when the user
    /// starts typing a command, since the note owns the bottom row.
    pub fn clear_note(&mut self) {
        self.note = None;
    }

    /// Render the current document for one frame and remember the link
    /// table and end-of-document flag for subsequent commands.
    pub fn view(&mut self, viewport: Viewport) -> Document {
        let doc = render(&self.body, self.markup, viewport, self.scroll);
        self.links = doc.links.clone();
        self.at_end = doc.reached_end;
        doc
    }

    /// One line down, unless the last frame already showed the end.
    pub fn scroll_down(&mut self) {
        if !self.at_end {
            self.scroll += 1;
        }
    }

    /// One line up, clamped at the top.
    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    /// Execute one command-mode input.
    pub fn handle_command(&mut self, input: &str) {
        match parse_command(input) {
            Command::Quit => self.running = false,
            Command::Down => self.scroll_down(),
            Command::Up => self.scroll_up(),
            Command::Help => self.open("about:help"),
            Command::Open(target) => self.open(&target),
            Command::Empty => {},
            Command::Unknown(input) => {
                self.note = Some(format!("unknown command: {input}"));
            },
        }
    }

    /// Open a link by number, or a typed target as a literal address.
    /// Only link targets resolve relatively, against the page that
    /// carried them.
    pub fn open(&mut self, target: &str) {
        if !target.is_empty() && target.chars().all(|c| c.is_ascii_digit()) {
            match target.parse::<usize>().ok().and_then(|i| self.links.get(i)) {
                Some(link) => {
                    let target = link.target.clone();
                    self.open_link_target(&target);
                },
                None => {
                    self.note = Some(format!("no link ({target}) on this page"));
                },
            }
            return;
        }

        match Address::parse(target) {
            Ok(addr) => self.navigate(addr),
            Err(e) => self.note = Some(e.to_string()),
        }
    }

    fn open_link_target(&mut self, target: &str) {
        match self.address.resolve(target) {
            Ok(addr) => self.navigate(addr),
            Err(e) => self.note = Some(e.to_string()),
        }
    }

    /// Load an address and, on success, replace the current document
    /// and reset the scroll offset.
    pub fn navigate(&mut self, addr: Address) {
        match self.load(addr) {
            Ok(Outcome::Document {
                address,
                body,
                markup,
            }) => {
                log::info!("now viewing {address}");
                self.address = address;
                self.body = body;
                self.markup = markup;
                self.scroll = 0;
                self.at_end = false;
                self.note = None;
            },
            Ok(Outcome::Notice(msg)) => {
                log::info!("navigation notice: {msg}");
                self.note = Some(msg);
            },
            Err(e) => {
                log::warn!("navigation failed: {e}");
                self.note = Some(e.to_string());
            },
        }
    }

    fn load(&mut self, addr: Address) -> Result<Outcome> {
        match addr.scheme {
            Scheme::File | Scheme::About => {
                let page = source::load_local(&addr, self.pages_dir.as_deref());
                Ok(Outcome::Document {
                    address: addr,
                    body: page.text,
                    markup: page.markup,
                })
            },
            Scheme::Gemini => self.load_remote(addr),
        }
    }

    /// Fetch an address, chasing redirects up to the hop cap and
    /// refusing any target seen earlier in the chain.
    fn load_remote(&mut self, addr: Address) -> Result<Outcome> {
        let mut current = addr;
        let mut visited = HashSet::new();
        visited.insert(current.to_string());

        for _ in 0..=self.max_redirects {
            let resp = self.fetcher.fetch(&current)?;
            match resp.status.class() {
                StatusClass::Success => {
                    let markup = is_gemtext(&resp.meta);
                    return Ok(Outcome::Document {
                        address: current,
                        body: resp.body.unwrap_or_default(),
                        markup,
                    });
                },
                StatusClass::Redirect => {
                    let next = current.resolve(resp.meta.trim())?;
                    log::info!("redirect {current} -> {next}");
                    if !visited.insert(next.to_string()) {
                        return Err(PolluxError::RedirectLoop(next.to_string()));
                    }
                    current = next;
                },
                StatusClass::Input => {
                    return Ok(Outcome::Notice(format!("input required: {}", resp.meta)));
                },
                StatusClass::CertRequired => {
                    return Ok(Outcome::Notice(format!(
                        "client certificate required (status {})",
                        resp.status.0
                    )));
                },
                StatusClass::TemporaryFailure => {
                    return Ok(Outcome::Notice(format!(
                        "temporary failure {}: {}",
                        resp.status.0, resp.meta
                    )));
                },
                StatusClass::PermanentFailure => {
                    return Ok(Outcome::Notice(format!(
                        "permanent failure {}: {}",
                        resp.status.0, resp.meta
                    )));
                },
                StatusClass::Malformed => {
                    return Ok(Outcome::Notice("malformed response from server".to_string()));
                },
            }
        }

        Err(PolluxError::RedirectLoop(format!(
            "more than {} redirects",
            self.max_redirects
        )))
    }
}

/// Success metas that should be classified as text/gemini. An empty
/// meta defaults to gemtext per the protocol.
fn is_gemtext(meta: &str) -> bool {
    meta.is_empty() || meta.starts_with("text/gemini")
}
