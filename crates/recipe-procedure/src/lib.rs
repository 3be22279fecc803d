//! Reader for expanded processing procedures.
//!
//! Turns the XML produced by recipe expansion back into an ordered list of
//! [`Command`]s so callers can inspect what the executor will run. Only the
//! document structure is checked; parameter values are kept as text.
//!
//! # Example
//!
//! ```
//! use recipe_procedure::Procedure;
//!
//! let xml = r"
//! <ProcessingProcedure>
//!   <ProcedureTitle>hifv_calimage_cont</ProcedureTitle>
//!   <ProcessingCommand>
//!     <Command>hifv_importdata</Command>
//!     <ParameterSet>
//!       <Parameter><Keyword>vis</Keyword><Value>13A-398.ms</Value></Parameter>
//!     </ParameterSet>
//!   </ProcessingCommand>
//! </ProcessingProcedure>";
//!
//! let procedure = Procedure::parse(xml).unwrap();
//! assert_eq!(procedure.title.as_deref(), Some("hifv_calimage_cont"));
//! assert_eq!(procedure.commands[0].name, "hifv_importdata");
//! assert_eq!(procedure.commands[0].get("vis"), Some("13A-398.ms"));
//! ```

mod error;
mod reader;

pub use error::ProcedureError;

/// An expanded processing procedure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Procedure {
    /// Contents of `ProcedureTitle`, if present.
    pub title: Option<String>,
    /// Commands in document order.
    pub commands: Vec<Command>,
}

impl Procedure {
    /// Read a procedure from its XML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the XML is malformed, a command has no name, or a
    /// parameter has no keyword.
    pub fn parse(xml: &str) -> Result<Self, ProcedureError> {
        reader::read(xml)
    }

    /// Command names in execution order.
    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(|c| c.name.as_str())
    }
}

/// One task invocation with its parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    /// `(keyword, value)` pairs in document order.
    pub parameters: Vec<(String, String)>,
}

impl Command {
    /// Value of the first parameter named `keyword`.
    #[must_use]
    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, v)| v.as_str())
    }
}
