// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use tracing_core::LevelFilter;
use tracing_subscriber::{Layer, registry::LookupSpan};

use super::{DisplayPreference, DynLayer, WriterConfig, rolling_file_appender_impl};
use crate::MessageWriter;

/// Avoid gnarly type annotations by using a macro to create the `fmt` layer.
#[macro_export]
macro_rules! create_fmt {
    () => {
        tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_thread_ids(true)
            .with_thread_names(false)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(true)
    };
}

impl WriterConfig {
    /// This erases the concrete type of the writer, and returns a boxed layer. This is
    /// useful for composition of layers. There's more info in the docs
    /// [here](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/index.html#runtime-configuration-with-layers).
    #[must_use]
    pub fn create_display_layer<S>(&self, level_filter: LevelFilter) -> Option<Box<DynLayer<S>>>
    where
        S: tracing_core::Subscriber,
        for<'a> S: LookupSpan<'a>,
    {
        // Shared configuration regardless of where logs are output to.
        let fmt_layer = create_fmt!();

        let preferred_display = match self {
            WriterConfig::Display(it) | WriterConfig::DisplayAndFile(it, _) => it.clone(),
            WriterConfig::None | WriterConfig::File(_) => return None,
        };

        let layer: Box<DynLayer<S>> = match preferred_display {
            DisplayPreference::Stdout => Box::new(
                fmt_layer
                    .with_writer(std::io::stdout)
                    .with_filter(level_filter),
            ),
            DisplayPreference::Stderr => Box::new(
                fmt_layer
                    .with_writer(std::io::stderr)
                    .with_filter(level_filter),
            ),
            DisplayPreference::MessageOutput(app) => {
                let tracing_writer = move || MessageWriter::new(app.clone());
                Box::new(
                    fmt_layer
                        .with_writer(tracing_writer)
                        .with_filter(level_filter),
                )
            }
        };
        Some(layer)
    }

    /// Like [`WriterConfig::create_display_layer()`], for the log file.
    ///
    /// # Errors
    ///
    /// If the log file path is unusable.
    pub fn try_create_file_layer<S>(
        &self,
        level_filter: LevelFilter,
    ) -> miette::Result<Option<Box<DynLayer<S>>>>
    where
        S: tracing_core::Subscriber,
        for<'a> S: LookupSpan<'a>,
    {
        let file_path = match self {
            WriterConfig::File(it) | WriterConfig::DisplayAndFile(_, it) => it,
            WriterConfig::None | WriterConfig::Display(_) => return Ok(None),
        };

        let file = rolling_file_appender_impl::try_create(file_path)?;
        Ok(Some(Box::new(
            create_fmt!()
                .with_ansi(false)
                .with_writer(file)
                .with_filter(level_filter),
        )))
    }
}
