use clap::Parser;
use color_eyre::Result;
use tagfield::{
    Config, Profile,
    cli::{Cli, Commands, OptionOverrides, OutputArgs},
    tui::{App, ExitOutcome},
};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // --dev selects a separate config/log directory
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let mut config = match cli.config.as_deref() {
        Some(path) => Config::load_or_create(&tagfield::utils::expand_path(path))?,
        None => Config::load_with_profile(profile)?,
    };

    let log_level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    let log_path = tagfield::utils::get_data_dir(profile)
        .ok_or_else(|| color_eyre::eyre::eyre!("Could not determine data directory"))?
        .join("tagfield.log");
    tagfield::logging::init_file_logging(&log_path, &log_level)?;

    match cli.command.unwrap_or(Commands::Edit {
        tags: None,
        overrides: OptionOverrides::default(),
        output: OutputArgs::default(),
    }) {
        Commands::Edit { tags, overrides, output } => {
            overrides.apply(&mut config.tag_input);
            let initial = tagfield::cli::parse_initial_tags(tags.as_deref());
            let app = App::new(config, initial);
            match tagfield::tui::run_event_loop(app)? {
                ExitOutcome::Done(tags) => {
                    let text = tagfield::cli::format_output(&tags, output)?;
                    if !text.is_empty() {
                        println!("{}", text);
                    }
                }
                ExitOutcome::Cancelled => {}
            }
        }
        Commands::Parse { text, overrides, output } => {
            let out = tagfield::cli::handle_parse(&text, &overrides, output, &config)?;
            if !out.is_empty() {
                println!("{}", out);
            }
        }
    }

    Ok(())
}
