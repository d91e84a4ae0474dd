//! CLI overrides on top of loaded settings

use crate::domain::Config;

/// Values given on the command line. `None`/empty means "not given".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub fields: Vec<String>,
    pub label_column: Option<String>,
    pub pretty: bool,
    pub indent: Option<usize>,
}

/// CLI > settings file > defaults.
pub fn merge_cli_with_config(mut config: Config, cli: CliOverrides) -> Config {
    if !cli.fields.is_empty() {
        config.fields = cli.fields;
    }
    if cli.label_column.is_some() {
        config.label_column = cli.label_column;
    }
    // --pretty is a switch; it can turn pretty output on but never off.
    if cli.pretty {
        config.pretty = true;
    }
    if let Some(indent) = cli.indent {
        config.indent = indent;
    }
    config
}
