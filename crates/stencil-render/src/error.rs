//! Error types for the render pipeline.
//!
//! [`RenderError`] covers every way a render job can fail. Each variant names
//! the step that failed and the file involved, and keeps the underlying error
//! as its [`source`](std::error::Error::source) so callers can print the full
//! chain.

use std::io;
use std::path::PathBuf;

use crate::values::ValuesError;

/// Error type for template rendering operations.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The template file could not be read.
    #[error("reading template {}", .path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The template could not be compiled.
    #[error("parsing template {}", .path.display())]
    TemplateSyntax {
        path: PathBuf,
        #[source]
        source: minijinja::Error,
    },

    /// The values file could not be read.
    #[error("reading values {}", .path.display())]
    ValuesRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The values file is not a YAML mapping we can use as a context.
    #[error("processing values {}", .path.display())]
    ValuesDecode {
        path: PathBuf,
        #[source]
        source: ValuesError,
    },

    /// The output file could not be created or truncated.
    #[error("creating output file {}", .path.display())]
    OutputCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Template execution failed. Output may be partially written.
    #[error("rendering {} into {}", .template.display(), .output.display())]
    Render {
        template: PathBuf,
        output: PathBuf,
        #[source]
        source: minijinja::Error,
    },

    /// Buffered output could not be written out.
    #[error("writing output file {}", .path.display())]
    OutputFlush {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RenderError {
    /// Returns the underlying template engine error, if this failure came
    /// from compiling or executing the template.
    ///
    /// Useful for printing the engine's source-context debug info.
    pub fn template_error(&self) -> Option<&minijinja::Error> {
        match self {
            RenderError::TemplateSyntax { source, .. } | RenderError::Render { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}
