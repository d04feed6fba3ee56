// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::IntoDiagnostic;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

use super::{TracingConfig, WriterConfig};

pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

/// Initialize the global tracing subscriber with the provided [`TracingConfig`]. Does
/// nothing if the config turns logging off.
///
/// # Errors
///
/// If the log file can't be set up, or a global subscriber is already installed.
pub fn init_tracing(tracing_config: TracingConfig) -> miette::Result<()> {
    if let Some(layers) = try_create_layers(&tracing_config)? {
        tracing_subscriber::registry()
            .with(layers)
            .try_init()
            .into_diagnostic()?;
    }
    Ok(())
}

/// Returns the layers, or `None` if logging is off. This does not initialize the tracing
/// system, see [`init_tracing()`] for that.
///
/// # Errors
///
/// If the log file can't be set up.
pub fn try_create_layers(
    tracing_config: &TracingConfig,
) -> miette::Result<Option<Vec<Box<DynLayer<tracing_subscriber::Registry>>>>> {
    if matches!(tracing_config.writer_config, WriterConfig::None) {
        return Ok(None);
    }

    let level_filter = tracing_config.level_filter;
    let mut return_it: Vec<Box<DynLayer<tracing_subscriber::Registry>>> = vec![];

    // Set the level filter from the tracing configuration. This is needed if you add
    // more layers that don't have a level filter of their own.
    return_it.push(Box::new(level_filter));

    if let Some(layer) = tracing_config
        .writer_config
        .create_display_layer(level_filter)
    {
        return_it.push(layer);
    }

    if let Some(layer) = tracing_config
        .writer_config
        .try_create_file_layer(level_filter)?
    {
        return_it.push(layer);
    }

    Ok(Some(return_it))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use emu_test_fixtures::create_temp_dir;
    use pretty_assertions::assert_eq;
    use tracing_core::LevelFilter;

    use super::*;
    use crate::{Application, DisplayPreference, MessageOutput, StdMutex};

    #[derive(Default)]
    struct RecordingOutput {
        lines: StdMutex<Vec<String>>,
    }

    impl MessageOutput for RecordingOutput {
        fn print_msg(&self, text: &str) {
            self.lines.lock().unwrap().push(text.to_string());
        }
    }

    #[test]
    fn test_logging_off() {
        let tracing_config = TracingConfig::new(false, None, LevelFilter::DEBUG);
        assert!(try_create_layers(&tracing_config).unwrap().is_none());
    }

    #[test]
    fn test_display_and_file_layers() {
        let temp_dir = create_temp_dir().unwrap();
        let tracing_config = TracingConfig {
            writer_config: WriterConfig::DisplayAndFile(
                DisplayPreference::Stderr,
                temp_dir.path.join("log.txt").display().to_string(),
            ),
            level_filter: LevelFilter::DEBUG,
        };

        let layers = try_create_layers(&tracing_config).unwrap().unwrap();

        // Level filter, display, file.
        assert_eq!(layers.len(), 3);
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_display_logs_go_through_application() {
        let app = Application::new(false);
        let recording = Arc::new(RecordingOutput::default());
        let _stdout = app.set_message_output(recording.clone());
        let tracing_config = TracingConfig::new(
            false,
            Some(DisplayPreference::MessageOutput(app)),
            LevelFilter::INFO,
        );
        let layers = try_create_layers(&tracing_config).unwrap().unwrap();

        let subscriber = tracing_subscriber::registry().with(layers);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(message = "machine: reset");
            tracing::debug!(message = "filtered out");
        });

        let lines = recording.lines.lock().unwrap().clone();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("machine: reset"));
        assert!(!lines[0].ends_with('\n'));
    }
}
