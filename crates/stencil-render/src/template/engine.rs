//! Environment construction.
//!
//! Every template is compiled inside a [`minijinja::Environment`] configured
//! from [`EngineOptions`]. The settings make the engine behave like a plain
//! text templater:
//!
//! - auto-escaping is off for every file extension, so `.html` or `.xml`
//!   templates are not HTML-escaped
//! - the template's trailing newline is kept, so literal text round-trips
//! - missing values follow [`UndefinedMode`]

use std::path::PathBuf;

use minijinja::{AutoEscape, Environment, UndefinedBehavior};

use super::filters::register_filters;

/// How the engine treats values missing from the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndefinedMode {
    /// Missing values render as empty text. Attribute access on a missing
    /// value is an error.
    #[default]
    Lenient,
    /// Like `Lenient`, but attribute access on a missing value also yields
    /// a missing value.
    Chainable,
    /// Any use of a missing value is a render error.
    Strict,
}

impl From<UndefinedMode> for UndefinedBehavior {
    fn from(mode: UndefinedMode) -> Self {
        match mode {
            UndefinedMode::Lenient => UndefinedBehavior::Lenient,
            UndefinedMode::Chainable => UndefinedBehavior::Chainable,
            UndefinedMode::Strict => UndefinedBehavior::Strict,
        }
    }
}

/// Options controlling template compilation and execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Missing value handling.
    pub undefined: UndefinedMode,
    /// Directory that `{% include %}`, `{% import %}` and `{% extends %}`
    /// resolve against. `None` means the template file's own directory.
    pub include_dir: Option<PathBuf>,
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the missing value handling.
    pub fn undefined(mut self, mode: UndefinedMode) -> Self {
        self.undefined = mode;
        self
    }

    /// Sets the directory used to resolve included templates.
    pub fn include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_dir = Some(dir.into());
        self
    }
}

/// Builds an environment configured from `options`.
///
/// When `loader_root` is given, templates referenced by name from inside the
/// compiled template are loaded from that directory on demand.
pub(crate) fn build_environment(
    options: &EngineOptions,
    loader_root: Option<PathBuf>,
) -> Environment<'static> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|_name: &str| AutoEscape::None);
    env.set_undefined_behavior(options.undefined.into());
    if let Some(root) = loader_root {
        env.set_loader(minijinja::path_loader(root));
    }
    register_filters(&mut env);
    env
}
