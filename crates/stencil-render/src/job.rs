//! The render pipeline.
//!
//! A [`RenderJob`] runs the four steps in a fixed order and stops at the
//! first failure:
//!
//! 1. parse the template
//! 2. load the values
//! 3. create (or truncate) the output file
//! 4. render the template into the output
//!
//! Because the output is created only after the template and values have been
//! accepted, a bad template or values file never touches an existing output.
//! A render failure leaves the partially written output in place.

use std::path::PathBuf;
use std::time::Instant;

use crate::error::RenderError;
use crate::output::OutputFile;
use crate::template::{EngineOptions, Template};
use crate::values::Values;

/// One template + values + output invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    /// Template file to compile.
    pub template: PathBuf,
    /// YAML values file supplying the template context.
    pub values: PathBuf,
    /// Destination, created or truncated before rendering.
    pub output: PathBuf,
    pub options: EngineOptions,
}

/// What a successful run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    /// Bytes written to the output file.
    pub bytes_written: u64,
    /// Number of top-level keys in the values mapping.
    pub value_keys: usize,
}

impl RenderJob {
    pub fn new(
        template: impl Into<PathBuf>,
        values: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            template: template.into(),
            values: values.into(),
            output: output.into(),
            options: EngineOptions::default(),
        }
    }

    /// Replaces the engine options.
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs the pipeline.
    ///
    /// # Errors
    ///
    /// Returns the [`RenderError`] of the first step that failed.
    pub fn run(&self) -> Result<RenderSummary, RenderError> {
        let span = tracing::info_span!(
            "render",
            template = %self.template.display(),
            output = %self.output.display()
        );
        let _guard = span.enter();
        let started = Instant::now();

        let template = Template::from_path(&self.template, &self.options)?;
        let values = Values::load(&self.values)?;
        let mut output = OutputFile::create(&self.output)?;
        tracing::debug!(
            template = template.name(),
            output = %output.path().display(),
            "executing template"
        );

        template.render_to(&values, &mut output, &self.output)?;
        let bytes_written = output.finish()?;

        tracing::info!(
            bytes = bytes_written,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "rendered"
        );
        Ok(RenderSummary {
            bytes_written,
            value_keys: values.len(),
        })
    }
}
