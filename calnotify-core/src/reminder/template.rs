//! Notification command templates.
//!
//! A template is a shell command with `{name}` placeholders. `{{` and `}}`
//! produce literal braces. Templates are parsed once when the config is
//! loaded, so an unknown placeholder is reported before any reminder fires.

use std::fmt;
use std::str::FromStr;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::error::{CalNotifyError, CalNotifyResult};
use crate::event::Event;

pub const DEFAULT_NOTIFICATION_CMD: &str = "notify-send -u critical -a GoogleCalendar {calendar} {title}";

/// Text substituted for values an event does not have.
const MISSING: &str = "None";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Title,
    Calendar,
    Start,
    End,
    Description,
    Link,
}

impl Placeholder {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Placeholder::Title),
            "calendar" => Some(Placeholder::Calendar),
            "start" => Some(Placeholder::Start),
            "end" => Some(Placeholder::End),
            "description" => Some(Placeholder::Description),
            "link" => Some(Placeholder::Link),
            _ => None,
        }
    }

    /// Unquoted value for `event`, times shown in `offset`.
    fn value(self, event: &Event, offset: &FixedOffset) -> Option<String> {
        match self {
            Placeholder::Title => Some(event.summary.clone()),
            Placeholder::Calendar => Some(event.calendar_label.clone()),
            Placeholder::Start => Some(event.start.with_timezone(offset).format("%H:%M").to_string()),
            Placeholder::End => Some(event.end.with_timezone(offset).format("%H:%M").to_string()),
            Placeholder::Description => event.description.clone(),
            Placeholder::Link => event
                .link()
                .map(str::to_string)
                .or_else(|| event.description.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommandTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl CommandTemplate {
    pub fn parse(source: &str) -> CalNotifyResult<Self> {
        let error = |reason: String| CalNotifyError::Template {
            template: source.to_string(),
            reason,
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(c) => name.push(c),
                            None => return Err(error(format!("unterminated placeholder '{{{name}'"))),
                        }
                    }
                    let placeholder = Placeholder::from_name(&name)
                        .ok_or_else(|| error(format!("unknown placeholder '{{{name}}}'")))?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(placeholder));
                }
                '}' => return Err(error("single '}' outside a placeholder".into())),
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(CommandTemplate {
            source: source.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Substitute every placeholder with the quoted value from `event`.
    pub fn render(&self, event: &Event, offset: &FixedOffset) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.clone(),
                Segment::Placeholder(placeholder) => {
                    quote(placeholder.value(event, offset).as_deref().unwrap_or(MISSING))
                }
            })
            .collect()
    }
}

impl Default for CommandTemplate {
    fn default() -> Self {
        CommandTemplate {
            source: DEFAULT_NOTIFICATION_CMD.to_string(),
            segments: vec![
                Segment::Literal("notify-send -u critical -a GoogleCalendar ".to_string()),
                Segment::Placeholder(Placeholder::Calendar),
                Segment::Literal(" ".to_string()),
                Segment::Placeholder(Placeholder::Title),
            ],
        }
    }
}

impl FromStr for CommandTemplate {
    type Err = CalNotifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandTemplate::parse(s)
    }
}

impl TryFrom<String> for CommandTemplate {
    type Error = CalNotifyError;

    fn try_from(source: String) -> Result<Self, Self::Error> {
        CommandTemplate::parse(&source)
    }
}

impl From<CommandTemplate> for String {
    fn from(template: CommandTemplate) -> Self {
        template.source
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// Wrap in double quotes, escaping what the shell would expand inside them.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
