//! Check command implementation for the Reparto CLI.

use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use reparto_core::{ResolveError, SlotId, SlotSnapshot, ValidationState};
use reparto_session::{DEFAULT_DEBOUNCE, ValidationConfig, ValidationCoordinator};
use serde::{Deserialize, Serialize};

use crate::geocoder::{
    DefaultResolverBuilder, GeocoderSettings, ResolverBuilder, build_runtime, read_stops_file,
};
use crate::{
    ARG_DEBOUNCE_MS, ARG_END, ARG_GEOCODER_URL, ARG_START, ARG_STOPS_FILE, ARG_TIMEOUT_SECS,
    ARG_USER_AGENT, CliError,
};

/// CLI arguments for the `check` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "check",
    long_about = "Feed each address field through the same debounced \
                 validation the editor uses and report whether it resolves. \
                 Exits with an error when any address does not resolve.",
    about = "Validate addresses without planning a route"
)]
#[ortho_config(prefix = "REPARTO")]
pub(crate) struct CheckArgs {
    /// Start address to validate.
    #[arg(long = ARG_START, value_name = "address")]
    #[serde(default)]
    pub(crate) start: Option<String>,
    /// End address to validate.
    #[arg(long = ARG_END, value_name = "address")]
    #[serde(default)]
    pub(crate) end: Option<String>,
    /// File listing intermediate stops, one address per line.
    #[arg(long = ARG_STOPS_FILE, value_name = "path")]
    #[serde(default)]
    pub(crate) stops_file: Option<Utf8PathBuf>,
    /// Base URL of the Nominatim-compatible geocoder.
    #[arg(long = ARG_GEOCODER_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) geocoder_url: Option<String>,
    /// `User-Agent` sent to the geocoder.
    #[arg(long = ARG_USER_AGENT, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
    /// Per-lookup timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Quiet period before each lookup, in milliseconds.
    #[arg(long = ARG_DEBOUNCE_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) debounce_ms: Option<u64>,
}

impl CheckArgs {
    pub(crate) fn into_config(self) -> Result<CheckConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        CheckConfig::try_from(merged)
    }
}

/// Resolved `check` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CheckConfig {
    pub(crate) start: Option<String>,
    pub(crate) end: Option<String>,
    pub(crate) stops_file: Option<Utf8PathBuf>,
    pub(crate) geocoder: GeocoderSettings,
    pub(crate) debounce: Duration,
}

impl TryFrom<CheckArgs> for CheckConfig {
    type Error = CliError;

    fn try_from(args: CheckArgs) -> Result<Self, Self::Error> {
        if args.start.is_none() && args.end.is_none() && args.stops_file.is_none() {
            return Err(CliError::NothingToCheck);
        }
        Ok(Self {
            start: args.start,
            end: args.end,
            stops_file: args.stops_file,
            geocoder: GeocoderSettings::from_options(
                args.geocoder_url,
                args.user_agent,
                args.timeout_secs,
            ),
            debounce: args
                .debounce_ms
                .map_or(DEFAULT_DEBOUNCE, Duration::from_millis),
        })
    }
}

/// Settled view of one slot, with the failure that made it invalid.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SlotReport {
    pub(crate) snapshot: SlotSnapshot,
    pub(crate) error: Option<ResolveError>,
}

pub(super) fn run_check(args: CheckArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_check_with(args, &DefaultResolverBuilder, &mut stdout)
}

pub(super) fn run_check_with(
    args: CheckArgs,
    builder: &dyn ResolverBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let reports = execute_check(&config, builder)?;
    write_reports(writer, &reports)?;
    let count = reports
        .iter()
        .filter(|report| report.snapshot.state == ValidationState::Invalid)
        .count();
    if count == 0 {
        Ok(())
    } else {
        Err(CliError::UnresolvedAddresses { count })
    }
}

fn execute_check(
    config: &CheckConfig,
    builder: &dyn ResolverBuilder,
) -> Result<Vec<SlotReport>, CliError> {
    let stops = config
        .stops_file
        .as_deref()
        .map(read_stops_file)
        .transpose()?;
    let resolver = builder.build(&config.geocoder)?;
    let validation = ValidationConfig::default().with_debounce(config.debounce);
    let runtime = build_runtime()?;

    runtime.block_on(async {
        let mut coordinator = ValidationCoordinator::new(resolver, validation)?;
        if let Some(start) = &config.start {
            coordinator.on_text_changed(SlotId::Start, start);
        }
        if let Some(text) = &stops {
            coordinator.on_lines_changed(text);
        }
        if let Some(end) = &config.end {
            coordinator.on_text_changed(SlotId::End, end);
        }

        let mut errors = BTreeMap::new();
        for update in coordinator.settle().await {
            if let Some(error) = update.error {
                errors.insert(update.slot, error);
            }
        }
        let reports: Vec<SlotReport> = coordinator
            .store()
            .snapshots()
            .map(|snapshot| SlotReport {
                error: errors.remove(&snapshot.slot),
                snapshot,
            })
            .collect();
        Ok::<_, CliError>(reports)
    })
}

fn write_reports(writer: &mut dyn Write, reports: &[SlotReport]) -> Result<(), CliError> {
    for report in reports {
        let SlotSnapshot {
            slot,
            state,
            address,
            location,
            ..
        } = &report.snapshot;
        let result = match (state, location, &report.error) {
            (ValidationState::Valid, Some(point), _) => writeln!(
                writer,
                "{slot}: valid ({:.6}, {:.6}) {}",
                point.latitude,
                point.longitude,
                address.normalized()
            ),
            (ValidationState::Invalid, _, Some(error)) => writeln!(
                writer,
                "{slot}: invalid {} ({error})",
                address.normalized()
            ),
            (ValidationState::Invalid, _, None) => {
                writeln!(writer, "{slot}: invalid {}", address.normalized())
            }
            _ => writeln!(writer, "{slot}: empty"),
        };
        result.map_err(CliError::WriteOutput)?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<CheckConfig, CliError> {
    let merged = CheckArgs::merge_from_layers(layers).map_err(CliError::from)?;
    CheckConfig::try_from(merged)
}
