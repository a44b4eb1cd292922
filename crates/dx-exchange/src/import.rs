//! Result of a "receiving data" (import) call.

use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveTime;
use tracing::{info, warn};

use relatics_dx_soap::SoapValue;

use crate::response::ResponseBody;

/// Row-change marker emitted by the import log.
const ROW_MARKER: &str = "Processing row :";
/// Summary marker carrying the imported row count.
const TOTAL_ROWS_MARKER: &str = "Total rows imported:";
/// Summary marker carrying the elapsed import time in milliseconds.
const TOTAL_TIME_MARKER: &str = "Total time (ms):";

/// Status of one message in an import log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStatus {
    Progress,
    Comment,
    Success,
    Warning,
    Error,
}

impl FromStr for MessageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Progress" => Ok(MessageStatus::Progress),
            "Comment" => Ok(MessageStatus::Comment),
            "Success" => Ok(MessageStatus::Success),
            "Warning" => Ok(MessageStatus::Warning),
            "Error" => Ok(MessageStatus::Error),
            other => Err(format!("unknown message status: {other}")),
        }
    }
}

impl std::fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MessageStatus::Progress => "Progress",
            MessageStatus::Comment => "Comment",
            MessageStatus::Success => "Success",
            MessageStatus::Warning => "Warning",
            MessageStatus::Error => "Error",
        };
        f.write_str(name)
    }
}

/// Action recorded for a changed element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementAction {
    Add,
    Update,
}

impl FromStr for ElementAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Add" => Ok(ElementAction::Add),
            "Update" => Ok(ElementAction::Update),
            other => Err(format!("unknown element action: {other}")),
        }
    }
}

impl std::fmt::Display for ElementAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ElementAction::Add => "Add",
            ElementAction::Update => "Update",
        })
    }
}

/// One message from the import log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportMessage {
    /// Time of day the service logged the message.
    pub time: NaiveTime,
    pub status: MessageStatus,
    pub message: String,
    /// Row the message belongs to, derived while walking the log.
    pub row: u32,
}

/// One element created or updated by an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportElement {
    pub action: ElementAction,
    pub id: String,
    pub foreign_key: String,
}

/// Accumulator for the single pass over the import message log.
///
/// The current row updates *before* the marker message is recorded, so a
/// `"Processing row : N"` message itself is stamped with row N. That
/// attribution is a behavioral contract of the service log, not an
/// off-by-one to fix.
#[derive(Debug, Default)]
struct MessageScan {
    current_row: u32,
    total_rows: Option<u32>,
    elapsed_time: Option<Duration>,
}

impl MessageScan {
    /// Feed one progress message; non-marker messages leave the state as-is.
    fn observe(&mut self, text: &str) {
        if let Some(row) = trailing_number(text, ROW_MARKER) {
            self.current_row = row;
        } else if let Some(total) = trailing_number(text, TOTAL_ROWS_MARKER) {
            self.total_rows = Some(total);
        } else if let Some(millis) = trailing_number(text, TOTAL_TIME_MARKER) {
            self.elapsed_time = Some(Duration::from_millis(millis));
        }
    }
}

/// Parse the integer following `marker` in `text`, if the marker occurs.
fn trailing_number<T: FromStr>(text: &str, marker: &str) -> Option<T> {
    let (_, tail) = text.split_once(marker)?;
    tail.trim().parse().ok()
}

/// Interpreted result of a `run_import` call.
///
/// Service-reported failures are data, not `Err`: check [`is_ok`] (or
/// [`has_error`]) before trusting the import.
///
/// [`is_ok`]: ImportResult::is_ok
/// [`has_error`]: ImportResult::has_error
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    has_error: bool,
    error_msg: Option<String>,
    messages: Vec<ImportMessage>,
    elements: Vec<ImportElement>,
    total_rows: Option<u32>,
    elapsed_time: Option<Duration>,
}

impl ImportResult {
    pub(crate) fn from_response(response: Option<SoapValue>) -> Self {
        match ResponseBody::classify(response) {
            ResponseBody::Empty => {
                warn!("empty response received from the import request; this indicates an undefined error");
                Self {
                    has_error: true,
                    error_msg: Some(String::new()),
                    ..Default::default()
                }
            }
            ResponseBody::ServiceError { message, .. } => {
                info!(error = %message, "received an error response from the import request");
                Self {
                    has_error: true,
                    error_msg: Some(message),
                    ..Default::default()
                }
            }
            ResponseBody::Import(raw) => {
                // classify() only returns Import when the child is present
                match raw.child("Import") {
                    Some(import) => Self::from_import_node(import),
                    None => Self::unrecognized(&raw),
                }
            }
            ResponseBody::Report(raw) | ResponseBody::Other(raw) => Self::unrecognized(&raw),
        }
    }

    fn unrecognized(raw: &SoapValue) -> Self {
        warn!("unrecognized response received from the import request");
        Self {
            has_error: true,
            error_msg: Some(format!("{raw:?}")),
            ..Default::default()
        }
    }

    fn from_import_node(import: &SoapValue) -> Self {
        let mut result = ImportResult::default();
        let mut scan = MessageScan::default();

        for message in import.children("Message") {
            let text = message.text().unwrap_or_default().to_string();
            let status = message
                .attr("Result")
                .unwrap_or_default()
                .parse()
                .unwrap_or(MessageStatus::Comment);
            let time = message
                .attr("Time")
                .and_then(|value| value.parse().ok())
                .unwrap_or(NaiveTime::MIN);

            if status == MessageStatus::Progress {
                scan.observe(&text);
            }

            result.messages.push(ImportMessage {
                time,
                status,
                message: text,
                row: scan.current_row,
            });
        }

        result.total_rows = scan.total_rows;
        result.elapsed_time = scan.elapsed_time;

        // A lone entry comes through like a list of one; absent or empty
        // collections yield nothing.
        if let Some(elements) = import.child("Elements") {
            for element in elements.elements() {
                let action_raw = element.attr("Action").unwrap_or_default();
                let Ok(action) = action_raw.parse() else {
                    warn!(action = action_raw, "skipping element with unrecognized action");
                    continue;
                };
                result.elements.push(ImportElement {
                    action,
                    id: element.attr("ID").unwrap_or_default().to_string(),
                    foreign_key: element.attr("ForeignKey").unwrap_or_default().to_string(),
                });
            }
        }

        result
    }

    /// Whether the import ran.
    pub fn is_ok(&self) -> bool {
        !self.has_error
    }

    /// Whether the service reported an error, or the response was
    /// empty/unrecognized.
    pub fn has_error(&self) -> bool {
        self.has_error
    }

    /// The service's error message, when there is one.
    pub fn error_msg(&self) -> Option<&str> {
        self.error_msg.as_deref()
    }

    /// The import log, in service order.
    pub fn messages(&self) -> &[ImportMessage] {
        &self.messages
    }

    /// Elements the import created or updated, in service order.
    pub fn elements(&self) -> &[ImportElement] {
        &self.elements
    }

    /// Row count from the import summary, when the log carried one.
    pub fn total_rows(&self) -> Option<u32> {
        self.total_rows
    }

    /// Elapsed time from the import summary, when the log carried one.
    pub fn elapsed_time(&self) -> Option<Duration> {
        self.elapsed_time
    }

    /// Messages with the given status.
    pub fn filter_messages(&self, status: MessageStatus) -> Vec<&ImportMessage> {
        self.messages.iter().filter(|m| m.status == status).collect()
    }

    /// All progress messages.
    pub fn progress_messages(&self) -> Vec<&ImportMessage> {
        self.filter_messages(MessageStatus::Progress)
    }

    /// All comment messages.
    pub fn comment_messages(&self) -> Vec<&ImportMessage> {
        self.filter_messages(MessageStatus::Comment)
    }

    /// All success messages.
    pub fn success_messages(&self) -> Vec<&ImportMessage> {
        self.filter_messages(MessageStatus::Success)
    }

    /// All warning messages.
    pub fn warning_messages(&self) -> Vec<&ImportMessage> {
        self.filter_messages(MessageStatus::Warning)
    }

    /// All error messages.
    pub fn error_messages(&self) -> Vec<&ImportMessage> {
        self.filter_messages(MessageStatus::Error)
    }

    /// Elements with the given action.
    pub fn filter_elements(&self, action: ElementAction) -> Vec<&ImportElement> {
        self.elements.iter().filter(|e| e.action == action).collect()
    }

    /// Elements the import added.
    pub fn added_elements(&self) -> Vec<&ImportElement> {
        self.filter_elements(ElementAction::Add)
    }

    /// Elements the import updated.
    pub fn updated_elements(&self) -> Vec<&ImportElement> {
        self.filter_elements(ElementAction::Update)
    }
}
