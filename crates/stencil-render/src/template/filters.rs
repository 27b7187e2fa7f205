//! MiniJinja filter registration.

use minijinja::{Environment, Error, ErrorKind, Value};

/// Registers stencil's filters on a minijinja environment.
///
/// These sit alongside minijinja's builtins (`upper`, `default`, `indent`,
/// `items`, ...):
///
/// - `nl`: appends a newline to the value
/// - `to_yaml`: serializes the value as a YAML document
/// - `to_json`: serializes the value as compact JSON
pub fn register_filters(env: &mut Environment<'static>) {
    // Usage: {{ content | nl }} outputs content followed by \n
    //        {{ "" | nl }} outputs just \n (a blank line)
    env.add_filter("nl", |value: Value| -> String { format!("{}\n", value) });

    // Usage: {{ resources | to_yaml | indent(2) }}
    env.add_filter("to_yaml", |value: Value| -> Result<String, Error> {
        serde_yaml::to_string(&value).map_err(|err| {
            Error::new(
                ErrorKind::InvalidOperation,
                format!("cannot serialize value as YAML: {}", err),
            )
        })
    });

    env.add_filter("to_json", |value: Value| -> Result<String, Error> {
        serde_json::to_string(&value).map_err(|err| {
            Error::new(
                ErrorKind::InvalidOperation,
                format!("cannot serialize value as JSON: {}", err),
            )
        })
    });
}
