//! Template parsing and execution.
//!
//! A [`Template`] is compiled once from a file (or an inline source) and then
//! executed against a [`Values`] context. Compilation happens up front, so a
//! syntax error is reported before any output is touched.
//!
//! Templates use Jinja2 syntax as implemented by MiniJinja:
//!
//! ```jinja
//! Hello {{ name }}!
//! {% for port in ports %}
//!   - {{ port }}
//! {% endfor %}
//! ```
//!
//! See [`engine`] for the environment settings and [`filters`] for the filters
//! available on top of MiniJinja's builtins.

pub mod engine;
pub mod filters;

use std::io::Write;
use std::path::{Path, PathBuf};

use minijinja::Environment;

use crate::error::RenderError;
use crate::values::Values;

pub use engine::{EngineOptions, UndefinedMode};

/// A compiled template ready for execution.
///
/// # Example
///
/// ```rust
/// use stencil_render::{EngineOptions, Template, Values};
///
/// let template = Template::from_source("greeting", "Hello {{ name }}", &EngineOptions::new()).unwrap();
/// let values = Values::from_yaml_str("name: World").unwrap();
/// assert_eq!(template.render(&values).unwrap(), "Hello World");
/// ```
pub struct Template {
    env: Environment<'static>,
    name: String,
    path: PathBuf,
}

impl Template {
    /// Reads and compiles the template at `path`.
    ///
    /// The template is registered under its file name. Included templates are
    /// resolved against [`EngineOptions::include_dir`], falling back to the
    /// directory containing `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::TemplateRead`] if the file cannot be read and
    /// [`RenderError::TemplateSyntax`] if it does not compile.
    pub fn from_path<P: AsRef<Path>>(path: P, options: &EngineOptions) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| RenderError::TemplateRead {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let loader_root = options
            .include_dir
            .clone()
            .unwrap_or_else(|| parent_dir(path));

        let template = Self::compile(name, source, path.to_path_buf(), options, Some(loader_root))?;
        tracing::debug!(path = %path.display(), name = %template.name, "parsed template");
        Ok(template)
    }

    /// Compiles a template from an in-memory source.
    ///
    /// Includes are only available when [`EngineOptions::include_dir`] is set.
    pub fn from_source(
        name: impl Into<String>,
        source: impl Into<String>,
        options: &EngineOptions,
    ) -> Result<Self, RenderError> {
        let name = name.into();
        Self::compile(
            name.clone(),
            source.into(),
            PathBuf::from(name),
            options,
            options.include_dir.clone(),
        )
    }

    fn compile(
        name: String,
        source: String,
        path: PathBuf,
        options: &EngineOptions,
        loader_root: Option<PathBuf>,
    ) -> Result<Self, RenderError> {
        let mut env = engine::build_environment(options, loader_root);
        if let Err(source) = env.add_template_owned(name.clone(), source) {
            return Err(RenderError::TemplateSyntax { path, source });
        }
        Ok(Self { env, name, path })
    }

    /// Name the template is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path the template was loaded from, or its name for inline sources.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Executes the template, streaming the output into `writer`.
    ///
    /// `output` only labels the error; nothing is opened here. On failure
    /// whatever was rendered before the error has already been written.
    pub fn render_to<W: Write>(
        &self,
        values: &Values,
        writer: W,
        output: &Path,
    ) -> Result<(), RenderError> {
        let render_error = |source| RenderError::Render {
            template: self.path.clone(),
            output: output.to_path_buf(),
            source,
        };
        let template = self.env.get_template(&self.name).map_err(render_error)?;
        template.render_captured_to(values, writer).map_err(render_error)?;
        Ok(())
    }

    /// Executes the template into a string.
    pub fn render(&self, values: &Values) -> Result<String, RenderError> {
        let mut buffer = Vec::new();
        self.render_to(values, &mut buffer, Path::new("<string>"))?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("name", &self.name)
            .field("path", &self.path)
            .finish()
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(yaml: &str) -> Values {
        Values::from_yaml_str(yaml).unwrap()
    }

    #[test]
    fn test_render_substitution() {
        let template = Template::from_source("t", "Hello {{ name }}", &EngineOptions::new()).unwrap();
        assert_eq!(template.render(&values("name: World")).unwrap(), "Hello World");
    }

    #[test]
    fn test_field_access_is_case_sensitive() {
        let template = Template::from_source("t", "[{{ Name }}]", &EngineOptions::new()).unwrap();
        assert_eq!(template.render(&values("name: World")).unwrap(), "[]");
    }

    #[test]
    fn test_loops_and_conditionals() {
        let source = "{% for p in ports %}{{ p }}{% if not loop.last %},{% endif %}{% endfor %}";
        let template = Template::from_source("t", source, &EngineOptions::new()).unwrap();
        assert_eq!(
            template.render(&values("ports: [80, 443, 8080]")).unwrap(),
            "80,443,8080"
        );
    }

    #[test]
    fn test_mapping_iteration_is_sorted() {
        let source = "{% for k, v in labels | items %}{{ k }}={{ v }};{% endfor %}";
        let template = Template::from_source("t", source, &EngineOptions::new()).unwrap();
        let out = template
            .render(&values("labels:\n  tier: web\n  app: shop\n"))
            .unwrap();
        assert_eq!(out, "app=shop;tier=web;");
    }

    #[test]
    fn test_syntax_error_at_compile_time() {
        let err = Template::from_source("broken", "{{ unclosed", &EngineOptions::new()).unwrap_err();
        assert!(matches!(err, RenderError::TemplateSyntax { .. }));
    }

    #[test]
    fn test_unclosed_block_is_syntax_error() {
        let err = Template::from_source("broken", "{% if x %}never closed", &EngineOptions::new())
            .unwrap_err();
        assert!(matches!(err, RenderError::TemplateSyntax { .. }));
    }

    #[test]
    fn test_strict_render_error() {
        let options = EngineOptions::new().undefined(UndefinedMode::Strict);
        let template = Template::from_source("t", "{{ missing }}", &options).unwrap();
        let err = template.render(&Values::new()).unwrap_err();
        assert!(matches!(err, RenderError::Render { .. }));
        assert!(err.template_error().is_some());
    }

    #[test]
    fn test_literal_text_unchanged() {
        let source = "plain text\nwith two lines\n";
        let template = Template::from_source("t", source, &EngineOptions::new()).unwrap();
        assert_eq!(template.render(&Values::new()).unwrap(), source);
    }

    #[test]
    fn test_name_and_path_of_inline_source() {
        let template = Template::from_source("greeting", "hi", &EngineOptions::new()).unwrap();
        assert_eq!(template.name(), "greeting");
        assert_eq!(template.path(), Path::new("greeting"));
    }

    #[test]
    fn test_name_and_path_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("deployment.yaml.j2");
        std::fs::write(&path, "kind: Deployment\n").unwrap();

        let template = Template::from_path(&path, &EngineOptions::new()).unwrap();
        assert_eq!(template.name(), "deployment.yaml.j2");
        assert_eq!(template.path(), path);
    }

    #[test]
    fn test_non_utf8_template_is_read_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("latin1.txt");
        std::fs::write(&path, [b'c', b'a', b'f', 0xe9, b'\n']).unwrap();

        let err = Template::from_path(&path, &EngineOptions::new()).unwrap_err();
        assert!(matches!(err, RenderError::TemplateRead { .. }));
        assert!(err.to_string().contains("latin1.txt"));
    }

    #[test]
    fn test_parent_dir_of_bare_file_name() {
        assert_eq!(parent_dir(Path::new("tmpl.txt")), PathBuf::from("."));
        assert_eq!(parent_dir(Path::new("a/b/tmpl.txt")), PathBuf::from("a/b"));
    }
}
