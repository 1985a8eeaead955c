mod cli;
mod paths;
mod run;
mod still;

use std::path::Path;

use anyhow::Result;
use cli::{Command, ConfigAction};

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();
    let config_path = cli.config.as_deref();

    match cli.command {
        Some(Command::Still(args)) => still::run(config_path, args),
        Some(Command::Config(config_cmd)) => handle_config_command(config_path, config_cmd.action),
        Some(Command::Shader) => print_shader(config_path),
        None => run::run(config_path, cli.run),
    }
}

fn handle_config_command(config_path: Option<&Path>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Where => {
            let loaded = run::load_config(config_path)?;
            if let Some(dir) = loaded.path.parent() {
                println!("config dir:  {}", dir.display());
            }
            println!(
                "config file: {} ({})",
                loaded.path.display(),
                if loaded.exists { "found" } else { "missing" }
            );
            Ok(())
        }
        ConfigAction::Dump => {
            let loaded = run::load_config(config_path)?;
            print!("{}", loaded.config.to_toml_string()?);
            Ok(())
        }
    }
}

fn print_shader(config_path: Option<&Path>) -> Result<()> {
    let loaded = run::load_config(config_path)?;
    print!("{}", renderer::fragment_source(&loaded.config.field));
    Ok(())
}
