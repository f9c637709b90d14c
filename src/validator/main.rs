//! Standalone validator for bot profile files.
//!
//! Checks a profile JSON file against Telegram's limits for bot names,
//! descriptions and short descriptions without connecting anywhere.

use std::process::ExitCode;

use clap::Parser;

use botinfo::config::{
    MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, MAX_SHORT_DESCRIPTION_LENGTH, ProfileConfig,
};

/// Bot profile validator.
#[derive(Parser, Debug)]
#[command(name = "validate_profile")]
#[command(about = "Validates bot profile files for the botinfo Telegram bot")]
#[command(version)]
struct Args {
    /// Path to the JSON profile file to validate.
    #[arg(short, long, default_value = "profile.json")]
    file: String,

    /// Generate an example profile file at the specified path.
    #[arg(long)]
    generate_example: Option<String>,

    /// Show detailed information for each field.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(output_path) = args.generate_example {
        return generate_example(&output_path);
    }

    validate_profile(&args.file, args.verbose)
}

fn generate_example(output_path: &str) -> ExitCode {
    let example = ProfileConfig::example();

    match example.save_to_file(output_path) {
        Ok(()) => {
            println!("✓ Example profile written to: {output_path}");
            println!("\nThe file sets {} profile fields.", example.len());
            println!("Remove any field you don't want --apply to touch.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Failed to write example file: {e}");
            ExitCode::FAILURE
        }
    }
}

fn validate_profile(path: &str, verbose: bool) -> ExitCode {
    println!("Validating: {path}\n");

    let profile = match ProfileConfig::load_from_file(path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("✗ Failed to load profile: {e}");
            return ExitCode::FAILURE;
        }
    };

    if profile.is_empty() {
        eprintln!("✗ No profile fields configured");
        return ExitCode::FAILURE;
    }

    let mut errors = 0;
    let mut warnings = 0;

    for (field, result) in profile.validate_all() {
        let value = profile.get(field).unwrap_or_default();
        let char_count = value.chars().count();
        let max_length = field.max_length();

        if verbose {
            println!(
                "[{field}] \"{}\" ({char_count}/{max_length} chars)",
                truncate(value, 40)
            );
        }

        match result {
            Ok(()) => {
                let warn_threshold = max_length * 90 / 100;
                if char_count > warn_threshold {
                    warnings += 1;
                    if verbose {
                        println!(
                            "  ⚠ Warning: {char_count} chars is close to the {max_length} char limit"
                        );
                    }
                } else if verbose {
                    println!("  ✓ OK");
                }
            }
            Err(e) => {
                errors += 1;
                println!("  ✗ Error: {e}");
            }
        }
    }

    println!();

    let total = profile.len();

    if errors == 0 {
        println!("✓ All {total} fields are valid!");

        if warnings > 0 {
            println!("  ({warnings} warning(s) - fields close to character limit)");
        }

        println!("\nCharacter limits:");
        println!("  Name:              {MAX_NAME_LENGTH} chars");
        println!("  Description:       {MAX_DESCRIPTION_LENGTH} chars");
        println!("  Short description: {MAX_SHORT_DESCRIPTION_LENGTH} chars");

        ExitCode::SUCCESS
    } else {
        println!("✗ Validation failed: {errors} error(s) in {total} fields");
        println!("  Valid: {}/{total}", total - errors);

        ExitCode::FAILURE
    }
}

/// Truncates a string for display.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_owned()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}
