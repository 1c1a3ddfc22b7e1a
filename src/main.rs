// SPDX-License-Identifier: MIT
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use xls2tmx::{Converter, Settings};

/// TM Workbook Converter: one TMX file per target language column
#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input workbook (.xlsx), may be repeated
    #[arg(short, long, value_name = "FILE", required = true)]
    input: Vec<PathBuf>,

    /// Conversion config (.json), used instead of the workbook's config sheet
    #[arg(short, long, value_name = "FILE", value_parser = parse_config_path)]
    config: Option<PathBuf>,

    /// Sets a custom settings file
    #[arg(short, long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Directory for .tmx files
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

fn parse_config_path(arg: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(arg.trim());
    if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
        Ok(path)
    } else {
        Err(format!("config file {:?} is not a .json file", arg))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // parse commandline
    let cli = Cli::parse();

    // Load tool settings
    let settings = if let Some(settings_file) = &cli.settings {
        Settings::with_settings(settings_file)
    } else {
        Settings::new()
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    // No language can be resolved without the langtags table
    let langtags = match settings.load_langtags().await {
        Ok(langtags) => langtags,
        Err(err) => {
            log::error!("Can not load langtags: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let output_dir = cli.output_dir.unwrap_or(settings.output_dir);
    let converter = Converter::new(&langtags, &output_dir);

    let mut failed = 0;
    for input in &cli.input {
        log::info!("Processing {:?}", input);
        match converter.convert_file(input, cli.config.as_deref()) {
            Ok(report) => {
                for skipped in &report.skipped {
                    log::warn!("{:?}: skipped {}", input, skipped);
                }
            }
            Err(err) => {
                log::error!("{:?}: {}", input, err);
                failed += 1;
            }
        }
    }

    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        log::error!("{} of {} workbook(s) failed", failed, cli.input.len());
        ExitCode::FAILURE
    }
}
