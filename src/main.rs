mod camera;
mod cli;
mod config;
mod driver;
mod error;
mod graphics;
mod math;
mod particles;
mod rotation;
mod state;
mod surface;
mod widget;

use crate::cli::Args;
use crate::config::ParticleFieldConfig;
use crate::driver::{FixedClock, ParticleLayer};
use crate::error::FieldError;
use crate::particles::PointCloud;
use crate::surface::TerminalSurface;
use crate::widget::ParticleWidget;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_DIRECTIVE: &str = "particle_field=info";

/// Installs the tracing subscriber. The terminal surface owns stdout, so
/// logs go to the requested file or to stderr.
fn init_logging(args: &Args) -> Result<(), FieldError> {
    let writer = match &args.log_file {
        Some(path) => BoxMakeWriter::new(Mutex::new(std::fs::File::create(path)?)),
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let (filter, rejected) = log_filter(EnvFilter::from_default_env(), args.log_level.as_deref());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(args.log_file.is_none())
        .init();

    if let Some(level) = rejected {
        warn!("invalid log level {level:?}, using {DEFAULT_LOG_DIRECTIVE}");
    }
    Ok(())
}

/// Adds the requested directive to `base`, or the default one when the
/// request does not parse. Returns the rejected request, if any.
fn log_filter(base: EnvFilter, requested: Option<&str>) -> (EnvFilter, Option<&str>) {
    let requested = requested.unwrap_or(DEFAULT_LOG_DIRECTIVE);
    let (directive, rejected) = match requested.parse::<Directive>() {
        Ok(directive) => (Some(directive), None),
        Err(_) => (DEFAULT_LOG_DIRECTIVE.parse::<Directive>().ok(), Some(requested)),
    };
    match directive {
        Some(directive) => (base.add_directive(directive), rejected),
        None => (base, rejected),
    }
}

/// Loads the config file, if any, applies command line overrides and
/// validates the result.
fn build_config(args: &Args) -> Result<ParticleFieldConfig, FieldError> {
    let mut config = match &args.config {
        Some(path) => config::load_from_path(path)?,
        None => ParticleFieldConfig::default(),
    };
    args.apply_overrides(&mut config);
    config::validate(&config)?;
    Ok(config)
}

fn build_layer(config: &ParticleFieldConfig) -> ParticleLayer {
    let mut rng = match config.field.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let cloud = PointCloud::generate(config.field.count, config.field.half_width, &mut rng);
    info!(
        points = cloud.len(),
        half_width = cloud.half_width(),
        "generated particle field"
    );
    if cloud.is_empty() {
        warn!("particle field is empty, nothing will be drawn");
    }
    ParticleLayer::new(cloud, config.rotation.rates())
}

/// Treats an unavailable surface as "nothing to show" rather than an error
fn surface_or_skip<T>(opened: Result<T, FieldError>) -> Result<Option<T>, FieldError> {
    match opened {
        Ok(surface) => Ok(Some(surface)),
        Err(FieldError::SurfaceUnavailable(reason)) => {
            warn!("particle field not shown: {reason}");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Main function
pub fn main() -> Result<(), FieldError> {
    let args = cli::parse();
    init_logging(&args)?;

    let config = build_config(&args)?;
    if args.print_config {
        print!("{}", config::to_toml(&config)?);
        return Ok(());
    }
    let mut layer = build_layer(&config);
    let mut widget = ParticleWidget::new(&config);

    if let Some(elapsed) = args.snapshot {
        let clock = FixedClock(elapsed);
        let frame = surface::render_snapshot(&mut layer, &widget, clock, args.width, args.height);
        println!("{frame}");
        return Ok(());
    }

    // Nothing to draw on; the layer simply does not appear
    let Some(mut surface) = surface_or_skip(TerminalSurface::open())? else {
        return Ok(());
    };
    surface.run(&mut layer, &mut widget, config.render.fps, args.debug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn config_file_and_flags_are_merged_and_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field.toml");
        std::fs::write(&path, "[field]\ncount = 10\nhalf_width = 2.0\n").unwrap();

        let args = Args::try_parse_from([
            "particle-field",
            "--config",
            path.to_str().unwrap(),
            "--count",
            "4",
        ])
        .unwrap();
        let config = build_config(&args).unwrap();
        assert_eq!(config.field.count, 4);
        assert_eq!(config.field.half_width, 2.0);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let args = Args::try_parse_from(["particle-field", "--fps", "0"]).unwrap();
        let err = build_config(&args).unwrap_err();
        assert!(matches!(err, FieldError::Config(_)));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args =
            Args::try_parse_from(["particle-field", "--config", "/nonexistent/field.toml"]).unwrap();
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn default_level_hides_surface_messages() {
        // The open surface logs at debug, below the default level
        let (filter, rejected) = log_filter(EnvFilter::new(""), None);
        assert_eq!(rejected, None);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn invalid_log_level_falls_back_to_default() {
        let (filter, rejected) = log_filter(EnvFilter::new(""), Some("particle_field=loud"));
        assert_eq!(rejected, Some("particle_field=loud"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));

        let (filter, rejected) = log_filter(EnvFilter::new(""), Some("particle_field=trace"));
        assert_eq!(rejected, None);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn unavailable_surface_is_skipped() {
        let opened: Result<(), FieldError> =
            Err(FieldError::SurfaceUnavailable("stdout is not a terminal".into()));
        assert!(matches!(surface_or_skip(opened), Ok(None)));

        assert!(matches!(surface_or_skip(Ok(7)), Ok(Some(7))));
    }

    #[test]
    fn other_surface_errors_propagate() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no raw mode");
        let opened: Result<(), FieldError> = Err(io_err.into());
        assert!(matches!(surface_or_skip(opened), Err(FieldError::Io(_))));
    }

    #[test]
    fn seeded_layers_match() {
        let mut config = ParticleFieldConfig::default();
        config.field.count = 4;
        config.field.half_width = 1.0;
        config.field.seed = Some(3);
        let a = build_layer(&config);
        let b = build_layer(&config);
        assert_eq!(a.cloud(), b.cloud());
        assert_eq!(a.cloud().as_slice().len(), 12);
        assert!(a.cloud().as_slice().iter().all(|&v| (-1.0..1.0).contains(&v)));
    }
}
