//! Command-line arguments.
//!
//! Every option can also come from a `STENCIL_*` environment variable. The
//! single-dash long spellings `-input`, `-output` and `-values` are accepted
//! for compatibility with older scripts; [`normalize_legacy_flags`] rewrites
//! them before clap sees them.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use stencil_render::{EngineOptions, RenderJob, UndefinedMode};

/// Long option names that may be spelled with a single dash.
const LEGACY_FLAGS: &[&str] = &["input", "output", "values", "undefined", "include-dir", "verbose"];

/// Render a text template with values from a YAML file.
#[derive(Debug, Parser)]
#[command(name = "stencil")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The input template file.
    #[arg(short, long, env = "STENCIL_INPUT", value_name = "PATH", value_parser = non_empty_path)]
    pub input: PathBuf,

    /// The output file. Created, or truncated if it exists.
    #[arg(short, long, env = "STENCIL_OUTPUT", value_name = "PATH", value_parser = non_empty_path)]
    pub output: PathBuf,

    /// The YAML values file.
    #[arg(short = 'f', long, env = "STENCIL_VALUES", value_name = "PATH", value_parser = non_empty_path)]
    pub values: PathBuf,

    /// How to treat template references to missing values.
    #[arg(long, env = "STENCIL_UNDEFINED", value_enum, default_value_t = Undefined::Lenient)]
    pub undefined: Undefined,

    /// Directory for included templates [default: the template's directory]
    #[arg(long, env = "STENCIL_INCLUDE_DIR", value_name = "DIR", value_parser = non_empty_path)]
    pub include_dir: Option<PathBuf>,

    /// Enable debug logging on stderr.
    #[arg(long)]
    pub verbose: bool,
}

/// Missing value handling, as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Undefined {
    /// Render missing values as empty text
    Lenient,
    /// Also allow attribute access on missing values
    Chainable,
    /// Fail the render on any missing value
    Strict,
}

impl From<Undefined> for UndefinedMode {
    fn from(value: Undefined) -> Self {
        match value {
            Undefined::Lenient => UndefinedMode::Lenient,
            Undefined::Chainable => UndefinedMode::Chainable,
            Undefined::Strict => UndefinedMode::Strict,
        }
    }
}

impl Cli {
    /// Builds the render job described by the arguments.
    pub fn job(&self) -> RenderJob {
        let mut options = EngineOptions::new().undefined(self.undefined.into());
        if let Some(dir) = &self.include_dir {
            options = options.include_dir(dir);
        }
        RenderJob::new(&self.input, &self.values, &self.output).with_options(options)
    }
}

fn non_empty_path(value: &str) -> Result<PathBuf, String> {
    if value.is_empty() {
        Err("must not be empty".to_string())
    } else {
        Ok(PathBuf::from(value))
    }
}

/// Rewrites `-input x` / `-input=x` style arguments to their `--` form.
///
/// Arguments after a bare `--` are left alone, as is anything that is not
/// valid UTF-8.
pub fn normalize_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut after_separator = false;
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| {
            if i == 0 || after_separator {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                after_separator = true;
                return arg;
            }
            match legacy_flag(text) {
                Some(rewritten) => OsString::from(rewritten),
                None => arg,
            }
        })
        .collect()
}

fn legacy_flag(arg: &str) -> Option<String> {
    let rest = arg.strip_prefix('-')?;
    if rest.starts_with('-') {
        return None;
    }
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    LEGACY_FLAGS.contains(&name).then(|| format!("-{}", arg))
}
