use crate::config::ParticleFieldConfig;
use clap::Parser;
use std::path::PathBuf;

/// A slowly tumbling 3D particle field for the terminal.
#[derive(Parser, Debug)]
#[command(name = "particle-field", version, about)]
pub struct Args {
    /// TOML config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of points.
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Per-axis half extent of the field.
    #[arg(short = 'w', long)]
    pub half_width: Option<f32>,

    /// Seed for a repeatable field.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Target frames per second.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Rotation rate about the X axis, rad/s.
    #[arg(long, allow_negative_numbers = true)]
    pub rate_x: Option<f64>,

    /// Rotation rate about the Y axis, rad/s.
    #[arg(long, allow_negative_numbers = true)]
    pub rate_y: Option<f64>,

    /// Print a single frame at this elapsed time (seconds) and exit.
    #[arg(long, value_name = "SECONDS")]
    pub snapshot: Option<f64>,

    /// Snapshot width in columns.
    #[arg(long, default_value_t = 80, value_parser = clap::value_parser!(u16).range(1..))]
    pub width: u16,

    /// Snapshot height in rows.
    #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(u16).range(1..))]
    pub height: u16,

    /// Print the effective config as TOML and exit.
    #[arg(long)]
    pub print_config: bool,

    /// Start with the debug overlay shown.
    #[arg(short, long)]
    pub debug: bool,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log level override (e.g. debug, particle_field=trace).
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Args {
    /// Applies command line values on top of a loaded config
    pub fn apply_overrides(&self, config: &mut ParticleFieldConfig) {
        if let Some(count) = self.count {
            config.field.count = count;
        }
        if let Some(half_width) = self.half_width {
            config.field.half_width = half_width;
        }
        if let Some(seed) = self.seed {
            config.field.seed = Some(seed);
        }
        if let Some(fps) = self.fps {
            config.render.fps = fps;
        }
        if let Some(rate_x) = self.rate_x {
            config.rotation.rate_x = rate_x;
        }
        if let Some(rate_y) = self.rate_y {
            config.rotation.rate_y = rate_y;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_keeps_config() {
        let args = Args::try_parse_from(["particle-field"]).unwrap();
        let mut config = ParticleFieldConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config, ParticleFieldConfig::default());
        assert!(!args.debug);
        assert!(args.snapshot.is_none());
    }

    #[test]
    fn overrides_replace_config_values() {
        let args = Args::try_parse_from([
            "particle-field",
            "-n",
            "4",
            "--half-width",
            "1.0",
            "--seed",
            "9",
            "--fps",
            "30",
            "--rate-x",
            "-0.2",
            "--rate-y",
            "0.4",
        ])
        .unwrap();
        let mut config = ParticleFieldConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.field.count, 4);
        assert_eq!(config.field.half_width, 1.0);
        assert_eq!(config.field.seed, Some(9));
        assert_eq!(config.render.fps, 30);
        assert_eq!(config.rotation.rate_x, -0.2);
        assert_eq!(config.rotation.rate_y, 0.4);
    }

    #[test]
    fn snapshot_arguments() {
        let args = Args::try_parse_from(["particle-field", "--snapshot", "2.5"]).unwrap();
        assert_eq!((args.width, args.height), (80, 24));

        let args = Args::try_parse_from([
            "particle-field",
            "--snapshot",
            "10",
            "--width",
            "40",
            "--height",
            "12",
        ])
        .unwrap();
        assert_eq!(args.snapshot, Some(10.0));
        assert_eq!((args.width, args.height), (40, 12));
    }

    #[test]
    fn snapshot_size_is_bounded() {
        for (flag, value) in [
            ("--width", "0"),
            ("--height", "0"),
            ("--width", "65536"),
            ("--height", "9223372036854775807"),
            ("--width", "-3"),
        ] {
            let result = Args::try_parse_from(["particle-field", "--snapshot", "1", flag, value]);
            assert!(result.is_err(), "{flag} {value} should be rejected");
        }

        let args =
            Args::try_parse_from(["particle-field", "--snapshot", "1", "--width", "65535"]).unwrap();
        assert_eq!(args.width, u16::MAX);
    }
}
