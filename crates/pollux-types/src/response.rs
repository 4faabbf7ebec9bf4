//! Gemini response model: two-digit status codes and their classes.

/// Sentinel status for responses whose framing could not be parsed.
pub const STATUS_MALFORMED: u8 = 0;

/// Status classes, selected by the tens digit of the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// Status 0: the client could not parse the status line at all.
    Malformed,
    /// 10-19: the server wants user input before serving the resource.
    Input,
    /// 20-29: success, body follows.
    Success,
    /// 30-39: redirect, meta is the new target.
    Redirect,
    /// 40-49: temporary failure, meta is a human-readable detail.
    TemporaryFailure,
    /// 50-59: permanent failure.
    PermanentFailure,
    /// 60-69: client certificate required (not supported).
    CertRequired,
}

/// A two-digit response status (0 reserved for "malformed").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(pub u8);

impl Status {
    /// Classify the code by its tens digit.
    pub fn class(self) -> StatusClass {
        match self.0 {
            10..=19 => StatusClass::Input,
            20..=29 => StatusClass::Success,
            30..=39 => StatusClass::Redirect,
            40..=49 => StatusClass::TemporaryFailure,
            50..=59 => StatusClass::PermanentFailure,
            60..=69 => StatusClass::CertRequired,
            _ => StatusClass::Malformed,
        }
    }

    pub fn is_success(self) -> bool {
        self.class() == StatusClass::Success
    }

    pub fn is_redirect(self) -> bool {
        self.class() == StatusClass::Redirect
    }
}

/// A parsed Gemini response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: Status,
    /// MIME-ish hint for success, redirect target for 3x, detail text
    /// for the error classes. Empty when the framing was malformed.
    pub meta: String,
    /// Body text, present only for 2x statuses.
    pub body: Option<String>,
}

impl Response {
    /// A client-side response for unparseable framing: status 0, no
    /// meta, no body.
    pub fn malformed() -> Self {
        Response {
            status: Status(STATUS_MALFORMED),
            meta: String::new(),
            body: None,
        }
    }
}
