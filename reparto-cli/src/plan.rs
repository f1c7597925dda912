//! Plan command implementation for the Reparto CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use reparto_core::{Address, LinkBuilder, NavigationLink, RoutePoint};
use reparto_sequencer::NearestNeighbourSequencer;
use reparto_session::{PlanRequest, PlannedRoute, RoutePlanner};
use serde::{Deserialize, Serialize};

use crate::geocoder::{
    DefaultResolverBuilder, GeocoderSettings, ResolverBuilder, build_runtime, read_stops_file,
};
use crate::{
    ARG_DIRECTIONS_URL, ARG_END, ARG_FORMAT, ARG_GEOCODER_URL, ARG_START, ARG_STOPS_FILE,
    ARG_TIMEOUT_SECS, ARG_USER_AGENT, CliError, ENV_PLAN_END, ENV_PLAN_START,
};

/// How `plan` renders its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    /// Numbered stop list followed by the navigation link.
    #[default]
    Text,
    /// A single JSON document.
    Json,
}

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "plan",
    long_about = "Resolve the start, end and every stop listed in the stops \
                 file, order the stops by repeatedly visiting the nearest \
                 unvisited one, and print the route with a navigation link. \
                 Stops that fail to resolve are left out and reported.",
    about = "Plan a delivery route"
)]
#[ortho_config(prefix = "REPARTO")]
pub(crate) struct PlanArgs {
    /// Address the route starts from.
    #[arg(long = ARG_START, value_name = "address")]
    #[serde(default)]
    pub(crate) start: Option<String>,
    /// Address the route ends at.
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
    /// Base URL of the directions page the link opens.
    #[arg(long = ARG_DIRECTIONS_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) directions_url: Option<String>,
    /// Output format.
    #[arg(long = ARG_FORMAT, value_enum)]
    #[serde(default)]
    pub(crate) format: Option<OutputFormat>,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlanConfig {
    pub(crate) start: String,
    pub(crate) end: String,
    pub(crate) stops_file: Option<Utf8PathBuf>,
    pub(crate) geocoder: GeocoderSettings,
    pub(crate) directions_url: Option<String>,
    pub(crate) format: OutputFormat,
}

impl PlanConfig {
    fn link_builder(&self) -> LinkBuilder {
        self.directions_url
            .as_ref()
            .map_or_else(LinkBuilder::default, LinkBuilder::new)
    }
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let start = args.start.ok_or(CliError::MissingArgument {
            field: ARG_START,
            env: ENV_PLAN_START,
        })?;
        let end = args.end.ok_or(CliError::MissingArgument {
            field: ARG_END,
            env: ENV_PLAN_END,
        })?;
        Ok(Self {
            start,
            end,
            stops_file: args.stops_file,
            geocoder: GeocoderSettings::from_options(
                args.geocoder_url,
                args.user_agent,
                args.timeout_secs,
            ),
            directions_url: args.directions_url,
            format: args.format.unwrap_or_default(),
        })
    }
}

/// JSON rendering of a planned route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct PlanReport {
    pub(crate) stops: Vec<RoutePoint>,
    pub(crate) distance_km: f64,
    pub(crate) skipped: Vec<SkippedReport>,
    pub(crate) link: NavigationLink,
}

/// A stop left out of the route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SkippedReport {
    pub(crate) address: Address,
    pub(crate) error: String,
}

impl From<&PlannedRoute> for PlanReport {
    fn from(planned: &PlannedRoute) -> Self {
        Self {
            stops: planned.route.points().to_vec(),
            distance_km: planned.route.total_distance_km(),
            skipped: planned
                .skipped
                .iter()
                .map(|stop| SkippedReport {
                    address: stop.address.clone(),
                    error: stop.error.to_string(),
                })
                .collect(),
            link: planned.link.clone(),
        }
    }
}

pub(super) fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_plan_with(args, &DefaultResolverBuilder, &mut stdout)
}

pub(super) fn run_plan_with(
    args: PlanArgs,
    builder: &dyn ResolverBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let planned = execute_plan(&config, builder)?;
    match config.format {
        OutputFormat::Text => write_text(writer, &planned),
        OutputFormat::Json => write_json(writer, &PlanReport::from(&planned)),
    }
}

fn execute_plan(
    config: &PlanConfig,
    builder: &dyn ResolverBuilder,
) -> Result<PlannedRoute, CliError> {
    let stops = match &config.stops_file {
        Some(path) => read_stops_file(path)?,
        None => String::new(),
    };
    let request = PlanRequest::from_text(&config.start, &config.end, &stops);
    let resolver = builder.build(&config.geocoder)?;
    let planner = RoutePlanner::new(resolver, NearestNeighbourSequencer::new())
        .with_link_builder(config.link_builder());
    let runtime = build_runtime()?;
    Ok(runtime.block_on(planner.plan(&request))?)
}

fn write_text(writer: &mut dyn Write, planned: &PlannedRoute) -> Result<(), CliError> {
    for line in planned.route.labelled() {
        writeln!(writer, "{line}").map_err(CliError::WriteOutput)?;
    }
    writeln!(
        writer,
        "Total distance: {:.2} km",
        planned.route.total_distance_km()
    )
    .map_err(CliError::WriteOutput)?;
    if !planned.skipped.is_empty() {
        writeln!(writer, "Skipped:").map_err(CliError::WriteOutput)?;
        for stop in &planned.skipped {
            writeln!(writer, "  {}: {}", stop.address.normalized(), stop.error)
                .map_err(CliError::WriteOutput)?;
        }
    }
    writeln!(writer, "{}", planned.link.as_str()).map_err(CliError::WriteOutput)?;
    Ok(())
}

fn write_json(writer: &mut dyn Write, report: &PlanReport) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(report).map_err(CliError::SerializeReport)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlanConfig, CliError> {
    let merged = PlanArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanConfig::try_from(merged)
}
