use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use driftconfig::{AntialiasSetting, SurfaceSize};

#[derive(Parser, Debug)]
#[command(
    name = "driftwall",
    author,
    version,
    about = "Animated gradient-noise background",
    arg_required_else_help = false
)]
pub struct Cli {
    /// Configuration file to use instead of `driftwall.toml` in the config directory.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub run: RunArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Initial window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    pub size: Option<SurfaceSize>,

    /// Optional FPS cap (0 = follow the display refresh rate).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Anti-aliasing policy: `auto`, `off`, or an explicit MSAA sample count (e.g. `4`).
    #[arg(long, value_name = "MODE")]
    pub antialias: Option<AntialiasSetting>,

    /// Freeze the field at this shader time instead of animating.
    #[arg(long, value_name = "TIME")]
    pub still_time: Option<f32>,

    /// Open a borderless fullscreen window.
    #[arg(long)]
    pub fullscreen: bool,

    /// Window title.
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render one frame on the CPU and write it as a PNG.
    Still(StillArgs),
    /// Inspect the configuration file.
    Config(ConfigCommand),
    /// Print the generated fragment shader.
    Shader,
}

#[derive(Args, Debug)]
pub struct StillArgs {
    /// Destination PNG file.
    #[arg(long, short, value_name = "FILE")]
    pub output: PathBuf,

    /// Image size (defaults to the configured window size).
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    pub size: Option<SurfaceSize>,

    /// Shader time to evaluate (defaults to `render.still_time`, then 0).
    #[arg(long, value_name = "TIME")]
    pub time: Option<f32>,
}

#[derive(Parser, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the resolved configuration directory and file.
    Where,
    /// Print the effective configuration as TOML.
    Dump,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_window_flags() {
        let cli = Cli::try_parse_from([
            "driftwall",
            "--size",
            "800x600",
            "--fps",
            "30",
            "--antialias",
            "off",
            "--fullscreen",
        ])
        .unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.run.size, Some(SurfaceSize::new(800, 600)));
        assert_eq!(cli.run.fps, Some(30.0));
        assert_eq!(cli.run.antialias, Some(AntialiasSetting::Off));
        assert!(cli.run.fullscreen);
    }

    #[test]
    fn parses_still_subcommand_with_global_config() {
        let cli = Cli::try_parse_from([
            "driftwall",
            "still",
            "--output",
            "frame.png",
            "--size",
            "64x32",
            "--time",
            "12.5",
            "--config",
            "custom.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        match cli.command {
            Some(Command::Still(args)) => {
                assert_eq!(args.output, PathBuf::from("frame.png"));
                assert_eq!(args.size, Some(SurfaceSize::new(64, 32)));
                assert_eq!(args.time, Some(12.5));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(Cli::try_parse_from(["driftwall", "--size", "0x600"]).is_err());
        assert!(Cli::try_parse_from(["driftwall", "--antialias", "3"]).is_err());
        assert!(Cli::try_parse_from(["driftwall", "still"]).is_err());
    }
}
