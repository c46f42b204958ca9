//! Text output formatter

use archlint_core::{Problem, ValidationReport};

pub fn output_text(report: &ValidationReport, verbose: bool) {
    match report.manifest_info.name.as_deref() {
        Some(name) => println!("Validating manifest '{}'", name),
        None => println!("Validating manifest"),
    }

    for problem in &report.problems {
        match problem {
            Problem::Diagnostic(diag) => {
                println!("\nloading [{}]: {}", diag.kind, diag.message);
            }
            Problem::Rule(result) => {
                println!("\n{} ({}):", result.title, result.id);
                if let Some(error) = &result.error {
                    println!("  evaluation error: {}", error);
                }
                for item in &result.items {
                    println!("  {}: {}", item.location, item.title);
                    if let Some(description) = &item.description {
                        println!("    {}", description);
                    }
                    if let Some(correction) = &item.correction {
                        println!("    fix: {}", correction);
                    }
                    if verbose {
                        if let Some(cause) = &item.cause {
                            println!("    cause: {}", cause);
                        }
                    }
                }
            }
        }
    }

    println!();
    println!(
        "Checked {} element(s), found {} validation issue(s), {} loading problem(s)",
        report.manifest_info.element_count,
        report.stats.validation_errors,
        report.stats.loading_errors
    );
    println!("Result: {}", if report.success { "PASS" } else { "FAIL" });
}
