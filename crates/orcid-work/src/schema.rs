//! The bundled work record schema, compiled and applied by libxml2

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use libxml::error::StructuredError;
use libxml::parser::Parser;
use libxml::schemas::{SchemaParserContext, SchemaValidationContext};

use crate::error::{Result, SchemaError};

/// Registry API and record schema version
pub const API_VERSION: &str = "2.0";

/// Reported for a blank document, in libxml2's wording
pub const EMPTY_DOCUMENT: &str = "Document is empty";

// libxml2 keeps parser and error-handler state in globals
static LIBXML: Mutex<()> = Mutex::new(());

/// `<schema_dir>/record_2.0/work-2.0.xsd`
pub fn work_schema_path(schema_dir: &Path) -> PathBuf {
    schema_dir
        .join(format!("record_{}", API_VERSION))
        .join(format!("work-{}.xsd", API_VERSION))
}

/// The compiled work schema with its imports resolved.
///
/// Holds a libxml2 validation context, so it stays on the thread that
/// loaded it.
pub struct WorkSchema {
    path: PathBuf,
    context: RefCell<SchemaValidationContext>,
}

impl WorkSchema {
    /// Compile `<schema_dir>/record_2.0/work-2.0.xsd`
    pub fn load(schema_dir: &Path) -> Result<Self> {
        let path = work_schema_path(schema_dir);
        if !path.is_file() {
            return Err(SchemaError::Missing { path }.into());
        }
        tracing::debug!(path = %path.display(), "compiling work schema");

        let _guard = LIBXML.lock().unwrap_or_else(PoisonError::into_inner);
        let mut parser = SchemaParserContext::from_file(&path.to_string_lossy());
        let context = SchemaValidationContext::from_parser(&mut parser).map_err(|errors| {
            SchemaError::Invalid {
                path: path.clone(),
                messages: errors.iter().map(describe).collect(),
            }
        })?;

        Ok(Self {
            path,
            context: RefCell::new(context),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validate a document, returning one line per error (empty when valid)
    pub fn validate(&self, xml: &str) -> Vec<String> {
        if xml.trim().is_empty() {
            return vec![format!("line 1: {}", EMPTY_DOCUMENT)];
        }

        let _guard = LIBXML.lock().unwrap_or_else(PoisonError::into_inner);
        let document = match Parser::default().parse_string(xml) {
            Ok(document) => document,
            Err(err) => return vec![format!("line 1: Document is not well-formed ({:?})", err)],
        };
        match self.context.borrow_mut().validate_document(&document) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.iter().map(describe).collect(),
        }
    }
}

impl fmt::Debug for WorkSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkSchema")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// `line N: message`, as libxml2 reports it
fn describe(error: &StructuredError) -> String {
    let message = error
        .message
        .as_deref()
        .map(str::trim)
        .unwrap_or("unknown libxml2 error");
    match error.line {
        Some(line) if line > 0 => format!("line {}: {}", line, message),
        _ => message.to_string(),
    }
}
