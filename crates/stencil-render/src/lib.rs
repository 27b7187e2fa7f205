//! # Stencil Render - YAML-driven text templating
//!
//! `stencil-render` renders a text template with values taken from a YAML
//! document and writes the result to a file. It is the library behind the
//! `stencil` command-line tool.
//!
//! ## Core Concepts
//!
//! - [`Template`]: a compiled MiniJinja template (Jinja2 syntax)
//! - [`Values`]: a YAML mapping decoded into a string-keyed context
//! - [`OutputFile`]: the truncated, buffered destination
//! - [`RenderJob`]: the whole parse → load → create → render sequence
//! - [`RenderError`]: which step failed, on which file, and why
//!
//! ## Quick Start
//!
//! ```rust
//! use stencil_render::{EngineOptions, Template, Values};
//!
//! let template = Template::from_source(
//!     "deploy",
//!     "image: {{ image.repository }}:{{ image.tag }}",
//!     &EngineOptions::new(),
//! ).unwrap();
//!
//! let values = Values::from_yaml_str(r#"
//! image:
//!   repository: quay.io/acme/web
//!   tag: "1.4"
//! "#).unwrap();
//!
//! assert_eq!(template.render(&values).unwrap(), "image: quay.io/acme/web:1.4");
//! ```
//!
//! ## Files
//!
//! ```rust,ignore
//! use stencil_render::RenderJob;
//!
//! let summary = RenderJob::new("deploy.yaml.j2", "values.yaml", "deploy.yaml").run()?;
//! println!("wrote {} bytes", summary.bytes_written);
//! ```

mod error;
pub mod job;
pub mod output;
pub mod template;
pub mod values;

pub use error::RenderError;
pub use job::{RenderJob, RenderSummary};
pub use output::OutputFile;
pub use template::{EngineOptions, Template, UndefinedMode};
pub use values::{Values, ValuesError};
