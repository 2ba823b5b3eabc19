//! Output formatting for result tables

mod json;
mod text;

use anyhow::Result;

use crate::model::Table;

pub use json::JsonOutput;
pub use text::render_text;

/// Output format for rendered tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderFormat {
    #[default]
    Text,
    Json,
    JsonCompact,
}

impl std::str::FromStr for RenderFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(RenderFormat::Text),
            "json" => Ok(RenderFormat::Json),
            "json-compact" => Ok(RenderFormat::JsonCompact),
            _ => Err(format!("Unknown render format: {}", s)),
        }
    }
}

/// Render a table in the given format
pub fn render(table: &Table, format: RenderFormat) -> Result<String> {
    match format {
        RenderFormat::Text => Ok(render_text(table)),
        RenderFormat::Json => JsonOutput::new().render(table),
        RenderFormat::JsonCompact => JsonOutput::compact().render(table),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_format_from_str() {
        assert_eq!("text".parse::<RenderFormat>(), Ok(RenderFormat::Text));
        assert_eq!("JSON".parse::<RenderFormat>(), Ok(RenderFormat::Json));
        assert!("yaml".parse::<RenderFormat>().is_err());
    }
}
