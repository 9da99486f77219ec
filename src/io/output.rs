use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::form::Payload;

use super::DocumentFormat;

/// Where a rendered document is written. `-` on the command line means stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDestination {
    Stdout,
    File(PathBuf),
}

impl OutputDestination {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "-" => Self::Stdout,
            path => Self::File(PathBuf::from(path)),
        }
    }

    pub fn is_stdout(&self) -> bool {
        matches!(self, Self::Stdout)
    }

    /// Format implied by a file extension.
    pub fn format_hint(&self) -> Option<DocumentFormat> {
        match self {
            Self::Stdout => None,
            Self::File(path) => Some(DocumentFormat::from_path(path)),
        }
    }

    fn write(&self, rendered: &str) -> Result<()> {
        match self {
            Self::Stdout => write_line(&mut io::stdout().lock(), rendered)
                .context("failed to write to stdout"),
            Self::File(path) => File::create(path)
                .map_err(anyhow::Error::from)
                .and_then(|mut file| write_line(&mut file, rendered))
                .with_context(|| format!("failed to write to file {}", path.display())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: DocumentFormat,
    pub pretty: bool,
    pub destinations: Vec<OutputDestination>,
}

impl OutputOptions {
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            pretty: true,
            destinations: vec![OutputDestination::Stdout],
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_destinations(mut self, destinations: Vec<OutputDestination>) -> Self {
        self.destinations = destinations;
        self
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self::new(DocumentFormat::Json)
    }
}

/// Write a submitted payload, `_meta` block first.
pub fn emit_payload(payload: &Payload, options: &OutputOptions) -> Result<()> {
    let value = serde_json::to_value(payload).context("failed to encode payload")?;
    emit(&value, options)
}

/// Render `value` once and write it to every destination.
pub fn emit(value: &Value, options: &OutputOptions) -> Result<()> {
    if options.destinations.is_empty() {
        return Ok(());
    }
    let rendered = render(value, options.format, options.pretty)?;
    options
        .destinations
        .iter()
        .try_for_each(|destination| destination.write(&rendered))
}

fn render(value: &Value, format: DocumentFormat, pretty: bool) -> Result<String> {
    let rendered = match format {
        DocumentFormat::Json if pretty => serde_json::to_string_pretty(value)?,
        DocumentFormat::Json => serde_json::to_string(value)?,
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => serde_yaml::to_string(value)?,
        #[cfg(feature = "toml")]
        DocumentFormat::Toml if pretty => toml::to_string_pretty(value)?,
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => toml::to_string(value)?,
    };
    Ok(rendered)
}

fn write_line(writer: &mut impl Write, rendered: &str) -> Result<()> {
    writeln!(writer, "{}", rendered.trim_end())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::form::PayloadMeta;

    #[test]
    fn dash_means_stdout() {
        assert_eq!(OutputDestination::parse("-"), OutputDestination::Stdout);
        assert_eq!(
            OutputDestination::parse("out/booking.json"),
            OutputDestination::File(PathBuf::from("out/booking.json"))
        );
        assert_eq!(OutputDestination::parse("-").format_hint(), None);
        assert_eq!(
            OutputDestination::parse("booking.json").format_hint(),
            Some(DocumentFormat::Json)
        );
    }

    #[test]
    fn no_destinations_is_a_noop() {
        let options = OutputOptions::default().with_destinations(Vec::new());
        emit(&serde_json::json!({"ok": true}), &options).unwrap();
    }

    #[test]
    fn writes_compact_payload_to_every_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = dir.path().join("payload.json");
        let second = dir.path().join("copy.json");
        let payload = Payload::new(
            PayloadMeta {
                widget: "contact".into(),
                locale: "fr".into(),
                ..PayloadMeta::default()
            },
            1,
        );
        let options = OutputOptions::default().with_pretty(false).with_destinations(vec![
            OutputDestination::File(first.clone()),
            OutputDestination::File(second.clone()),
        ]);
        emit_payload(&payload, &options).unwrap();
        for path in [first, second] {
            let contents = fs::read_to_string(&path).unwrap();
            assert_eq!(contents, "{\"_meta\":{\"widget\":\"contact\",\"locale\":\"fr\"}}\n");
        }
    }

    #[test]
    fn missing_directory_names_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("payload.json");
        let options = OutputOptions::default()
            .with_destinations(vec![OutputDestination::File(path.clone())]);
        let err = emit(&serde_json::json!({}), &options).unwrap_err();
        assert!(format!("{err:#}").contains("payload.json"));
    }
}
