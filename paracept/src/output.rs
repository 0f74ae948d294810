// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logging to stderr, and the styles used for it.

use clap::{Args, ValueEnum};
use owo_colors::{OwoColorize, Style, style};
use std::fmt;
use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
    level_filters::LevelFilter,
    warn,
};
use tracing_subscriber::{
    Layer,
    filter::Targets,
    fmt::{FmtContext, FormatEvent, FormatFields, format},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Log target for messages printed without an `error:`/`warning:` heading.
pub(crate) const NO_HEADING: &str = "paracept::no_heading";

/// Overrides the level filter, in `tracing_subscriber` target syntax.
const LOG_ENV: &str = "PARACEPT_LOG";

#[derive(Copy, Clone, Debug, Args)]
#[must_use]
pub(crate) struct OutputOpts {
    /// Verbose output
    #[arg(long, short, global = true, env = "PARACEPT_VERBOSE")]
    pub(crate) verbose: bool,

    /// Produce color output: auto, always, never
    #[arg(
        long,
        value_enum,
        default_value_t,
        hide_possible_values = true,
        global = true,
        value_name = "WHEN",
        env = "CARGO_TERM_COLOR"
    )]
    pub(crate) color: Color,
}

impl OutputOpts {
    pub(crate) fn init(self) -> OutputContext {
        let colorize = self.color.should_colorize(supports_color::Stream::Stderr);
        init_logger(self.verbose, colorize);
        OutputContext { colorize }
    }
}

/// Output settings that were used to set up logging.
#[derive(Copy, Clone, Debug)]
#[must_use]
pub struct OutputContext {
    colorize: bool,
}

impl OutputContext {
    /// Returns styles for error messages printed to stderr.
    pub fn stderr_styles(&self) -> StderrStyles {
        if self.colorize {
            StderrStyles {
                bold: style().bold(),
            }
        } else {
            StderrStyles::default()
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
#[must_use]
pub(crate) enum Color {
    #[default]
    Auto,
    Always,
    Never,
}

impl Color {
    fn should_colorize(self, stream: supports_color::Stream) -> bool {
        match self {
            Color::Auto => supports_color::on_cached(stream).is_some(),
            Color::Always => true,
            Color::Never => false,
        }
    }
}

/// Installs the stderr logger. If a logger is already installed, it is kept.
fn init_logger(verbose: bool, colorize: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let env_targets = std::env::var(LOG_ENV)
        .ok()
        .filter(|targets| !targets.is_empty())
        .map(|targets| targets.parse::<Targets>());
    let targets = match &env_targets {
        Some(Ok(targets)) => targets.clone(),
        Some(Err(_)) | None => Targets::new().with_default(default_level),
    };

    let layer = tracing_subscriber::fmt::layer()
        .event_format(HeadingFormatter { colorize })
        .with_writer(std::io::stderr)
        .with_filter(targets);
    if tracing_subscriber::registry().with(layer).try_init().is_err() {
        return;
    }

    if let Some(Err(error)) = env_targets {
        warn!("ignoring invalid {LOG_ENV}: {error}");
    }
}

/// Prefixes each message with its level, unless logged to [`NO_HEADING`].
struct HeadingFormatter {
    colorize: bool,
}

impl HeadingFormatter {
    fn heading(&self, level: Level) -> (&'static str, Style) {
        let (name, colored) = match level {
            Level::ERROR => ("error", style().red().bold()),
            Level::WARN => ("warning", style().yellow().bold()),
            Level::INFO => ("info", style().bold()),
            Level::DEBUG => ("debug", style().bold()),
            Level::TRACE => ("trace", style().dimmed()),
        };
        (name, if self.colorize { colored } else { Style::new() })
    }
}

impl<S, N> FormatEvent<S, N> for HeadingFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        if metadata.target() != NO_HEADING {
            let (name, style) = self.heading(*metadata.level());
            write!(writer, "{}: ", name.style(style))?;
        }

        let mut visitor = MessageVisitor {
            writer: &mut writer,
            result: Ok(()),
        };
        event.record(&mut visitor);
        visitor.result?;

        writeln!(writer)
    }
}

/// Writes only the `message` field; structured fields are not shown.
struct MessageVisitor<'a, 'writer> {
    writer: &'a mut format::Writer<'writer>,
    result: fmt::Result,
}

impl Visit for MessageVisitor<'_, '_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.result = write!(self.writer, "{value:?}");
        }
    }
}

/// Styles for error messages printed to stderr.
#[derive(Debug, Default)]
pub struct StderrStyles {
    pub(crate) bold: Style,
}
