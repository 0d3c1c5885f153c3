use std::{env, path::PathBuf, process};

use anyhow::Result;
use quelldoc_config::Config;
use quelldoc_engine::convert_source_description;

fn main() -> Result<()> {
    env_logger::init();

    // Determine the sources directory from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let sources_path;
    let file_name;
    let from_config;

    if args.len() == 3 {
        // Directory and file name provided on the command line
        sources_path = PathBuf::from(&args[1]);
        file_name = args[2].clone();
        from_config = false;
    } else if args.len() == 2 {
        // Only a file name - take the directory from the config file
        file_name = args[1].clone();
        match Config::load() {
            Ok(Some(config)) => {
                sources_path = config.sources_path;
                from_config = true;
            }
            Ok(None) => {
                eprintln!("Error: No sources directory provided and no config file found");
                eprintln!("Usage: {} [sources-directory] <file-name>", args[0]);
                eprintln!("Or create a config file at {}", config_path.display());
                process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: Failed to load config file: {e}");
                eprintln!("Usage: {} [sources-directory] <file-name>", args[0]);
                process::exit(1);
            }
        }
    } else {
        eprintln!("Usage: {} [sources-directory] <file-name>", args[0]);
        eprintln!("Converts <sources-directory>/<file-name>.docx to <file-name>.json");
        process::exit(1);
    };

    if !sources_path.is_dir() {
        let source = if from_config {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: Sources path '{}'{} is not a directory",
            sources_path.display(),
            source
        );
        process::exit(1);
    }

    match convert_source_description(&sources_path, &file_name) {
        Ok(report) => {
            for warning in &report.warnings {
                eprintln!("Warning: {warning}");
            }
            println!("Wrote {}", report.output_path.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
