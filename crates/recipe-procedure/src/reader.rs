//! Event-driven reader for `ProcessingProcedure` documents.

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::ProcedureError;
use crate::{Command, Procedure};

/// Command being assembled inside a `ProcessingCommand` element.
#[derive(Default)]
struct PendingCommand {
    name: Option<String>,
    parameters: Vec<(String, String)>,
    keyword: Option<String>,
    value: Option<String>,
}

impl PendingCommand {
    fn finish_parameter(&mut self) -> Result<(), ProcedureError> {
        let value = self.value.take().unwrap_or_default();
        let Some(keyword) = self.keyword.take() else {
            return Err(ProcedureError::MissingKeyword {
                command: self.name.clone().unwrap_or_default(),
            });
        };
        self.parameters.push((keyword, value));
        Ok(())
    }

    fn finish(self, index: usize) -> Result<Command, ProcedureError> {
        match self.name {
            Some(name) if !name.is_empty() => Ok(Command {
                name,
                parameters: self.parameters,
            }),
            _ => Err(ProcedureError::MissingCommandName { index }),
        }
    }
}

#[derive(Default)]
struct ProcedureReader {
    title: Option<String>,
    commands: Vec<Command>,
    current: Option<PendingCommand>,
    text: String,
}

impl ProcedureReader {
    fn start(&mut self, name: &str) {
        self.text.clear();
        if name == "ProcessingCommand" {
            self.current = Some(PendingCommand::default());
        }
    }

    fn end(&mut self, name: &str) -> Result<(), ProcedureError> {
        let text = self.text.trim().to_owned();
        self.text.clear();

        if name == "ProcedureTitle" {
            self.title = Some(text);
            return Ok(());
        }
        if name == "ProcessingCommand" {
            if let Some(pending) = self.current.take() {
                let command = pending.finish(self.commands.len())?;
                self.commands.push(command);
            }
            return Ok(());
        }

        // Remaining elements only matter inside a command
        let Some(pending) = self.current.as_mut() else {
            return Ok(());
        };
        match name {
            "Command" => pending.name = Some(text),
            "Keyword" => pending.keyword = Some(text),
            "Value" => pending.value = Some(text),
            "Parameter" => pending.finish_parameter()?,
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Procedure {
        tracing::debug!(commands = self.commands.len(), "Read processing procedure");
        Procedure {
            title: self.title,
            commands: self.commands,
        }
    }
}

pub(crate) fn read(xml: &str) -> Result<Procedure, ProcedureError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut state = ProcedureReader::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let name = reader.decoder().decode(e.name().as_ref())?.into_owned();
                state.start(&name);
            }
            Event::Empty(e) => {
                let name = reader.decoder().decode(e.name().as_ref())?.into_owned();
                state.start(&name);
                state.end(&name)?;
            }
            Event::End(e) => {
                let name = reader.decoder().decode(e.name().as_ref())?.into_owned();
                state.end(&name)?;
            }
            Event::Text(e) => {
                let text = reader.decoder().decode(&e)?;
                state.text.push_str(&text);
            }
            Event::GeneralRef(e) => {
                let entity = reader.decoder().decode(&e)?;
                state.text.push_str(&decode_entity(&entity));
            }
            Event::CData(e) => {
                state.text.push_str(&String::from_utf8_lossy(&e));
            }
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
        buf.clear();
    }

    Ok(state.finish())
}

/// Decode an XML entity reference to its character value.
fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        _ => format!("&{entity};"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_entity() {
        assert_eq!(decode_entity("lt"), "<");
        assert_eq!(decode_entity("amp"), "&");
        assert_eq!(decode_entity("#65"), "A");
        assert_eq!(decode_entity("#x3E"), ">");
        assert_eq!(decode_entity("nbsp"), "&nbsp;");
        assert_eq!(decode_entity("#xZZ"), "&#xZZ;");
    }

    #[test]
    fn test_elements_outside_commands_are_ignored() {
        let procedure =
            read("<ProcessingProcedure><Keyword>stray</Keyword></ProcessingProcedure>")
                .unwrap();
        assert!(procedure.commands.is_empty());
        assert_eq!(procedure.title, None);
    }

    #[test]
    fn test_cdata_value() {
        let procedure = read(
            "<ProcessingProcedure><ProcessingCommand><Command>c</Command>\
             <ParameterSet><Parameter><Keyword>k</Keyword>\
             <Value><![CDATA[a<b]]></Value></Parameter></ParameterSet>\
             </ProcessingCommand></ProcessingProcedure>",
        )
        .unwrap();
        assert_eq!(procedure.commands[0].get("k"), Some("a<b"));
    }
}
