use std::io::IsTerminal;

use serde::Serialize;

use crate::core::config::Settings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub pretty: bool,
    pub use_color: bool,
}

impl OutputOptions {
    /// Command-line flags win over the config file's settings.
    pub fn resolve(
        json: bool,
        format: Option<&str>,
        pretty: bool,
        no_color: bool,
        settings: &Settings,
    ) -> Self {
        let format = if json {
            OutputFormat::Json
        } else {
            format
                .or(Some(settings.default_format.as_str()))
                .and_then(OutputFormat::from_id)
                .unwrap_or(OutputFormat::Text)
        };
        let use_color = match settings.color.as_str() {
            _ if no_color => false,
            "never" => false,
            "always" => std::env::var("NO_COLOR").is_err(),
            _ => detect_color(true),
        };
        Self {
            format,
            pretty,
            use_color,
        }
    }
}

/// Print `value` as one line of JSON, or indented with `pretty`.
pub fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> serde_json::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

pub fn detect_color(color_flag: bool) -> bool {
    if !color_flag {
        return false;
    }
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    std::io::stdout().is_terminal()
}
