//! Command parsing
//!
//! One line, one command:
//!
//! ```text
//! set <row> <payload> [section|-] [document|-]
//! get <row> | has <row> | clear <row> | clear-all
//! section <section> | clear-doc <document>
//! list | count | help | exit
//! ```
//!
//! `""` stands for an empty payload. A quoted document (`"007"`) is always text.
//! Blank lines and `#` comments parse to nothing.

use signet_core::{DocumentId, RowId, SectionId};
use thiserror::Error;

/// Placeholder for an omitted optional argument
const NONE_TOKEN: &str = "-";
/// Token for an empty payload
const EMPTY_PAYLOAD_TOKEN: &str = "\"\"";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command}: missing <{argument}>")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("Invalid section id: {0}")]
    InvalidSection(String),

    #[error("{command}: unexpected argument '{extra}'")]
    TooManyArguments { command: &'static str, extra: String },
}

/// A parsed store command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set {
        row_id: RowId,
        payload: String,
        section_id: Option<SectionId>,
        document_id: Option<DocumentId>,
    },
    Get(RowId),
    Has(RowId),
    Clear(RowId),
    ClearAll,
    Section(SectionId),
    ClearDocument(DocumentId),
    List,
    Count,
    Help,
    Exit,
}

/// Parse one input line. `Ok(None)` for blank lines and comments.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut args = Args::new(line);
    let verb = args.next_token().unwrap_or_default().to_ascii_lowercase();

    let command = match verb.as_str() {
        "set" => {
            let row_id = RowId::from(args.required("set", "row")?);
            let payload = args.required("set", "payload")?;
            let payload = if payload == EMPTY_PAYLOAD_TOKEN {
                String::new()
            } else {
                payload.to_string()
            };
            let section_id = args.optional().map(parse_section).transpose()?;
            let document_id = args.optional().map(DocumentId::parse);
            args.finish("set")?;
            Command::Set {
                row_id,
                payload,
                section_id,
                document_id,
            }
        }
        "get" => Command::Get(args.single_row("get")?),
        "has" => Command::Has(args.single_row("has")?),
        "clear" => Command::Clear(args.single_row("clear")?),
        "clear-all" => {
            args.finish("clear-all")?;
            Command::ClearAll
        }
        "section" => {
            let section_id = parse_section(args.required("section", "section")?)?;
            args.finish("section")?;
            Command::Section(section_id)
        }
        "clear-doc" => {
            let document_id = DocumentId::parse(args.required("clear-doc", "document")?);
            args.finish("clear-doc")?;
            Command::ClearDocument(document_id)
        }
        "list" => {
            args.finish("list")?;
            Command::List
        }
        "count" => {
            args.finish("count")?;
            Command::Count
        }
        "help" => {
            args.finish("help")?;
            Command::Help
        }
        "exit" | "quit" => {
            args.finish("exit")?;
            Command::Exit
        }
        _ => return Err(CommandError::UnknownCommand(verb)),
    };

    Ok(Some(command))
}

fn parse_section(token: &str) -> Result<SectionId, CommandError> {
    token
        .parse::<SectionId>()
        .map_err(|_| CommandError::InvalidSection(token.to_string()))
}

struct Args<'a> {
    tokens: std::str::SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            tokens: line.split_whitespace(),
        }
    }

    fn next_token(&mut self) -> Option<&'a str> {
        self.tokens.next()
    }

    fn required(
        &mut self,
        command: &'static str,
        argument: &'static str,
    ) -> Result<&'a str, CommandError> {
        self.next_token()
            .ok_or(CommandError::MissingArgument { command, argument })
    }

    /// Next token unless absent or `-`
    fn optional(&mut self) -> Option<&'a str> {
        self.next_token().filter(|token| *token != NONE_TOKEN)
    }

    fn single_row(&mut self, command: &'static str) -> Result<RowId, CommandError> {
        let row_id = RowId::from(self.required(command, "row")?);
        self.finish(command)?;
        Ok(row_id)
    }

    fn finish(&mut self, command: &'static str) -> Result<(), CommandError> {
        match self.next_token() {
            Some(extra) => Err(CommandError::TooManyArguments {
                command,
                extra: extra.to_string(),
            }),
            None => Ok(()),
        }
    }
}

pub const HELP_TEXT: &str = "\
Commands:
  set <row> <payload> [section|-] [document|-]   capture a signature (\"\" = empty payload)
  get <row>                                      show one record
  has <row>                                      true if signed with a non-empty payload
  clear <row>                                    remove one record
  clear-all                                      remove every record
  section <section>                              records in a section
  clear-doc <document>                           remove every record of a document
  list                                           all records
  count                                          number of records
  help                                           this text
  exit                                           leave";
