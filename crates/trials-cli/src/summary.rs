use trials_cli::types::RunSummary;

pub fn print_summary(summary: &RunSummary) {
    match summary.total_count {
        Some(total) => println!("Studies: {} (of {total} matching)", summary.studies),
        None => println!("Studies: {}", summary.studies),
    }
    if summary.malformed_response {
        eprintln!(
            "warning: the response had no study list at the configured path; \
             use --show-raw to inspect it or adjust --studies-path / --schema"
        );
    }
    if let Some((path, format)) = &summary.output {
        println!("Output ({format}): {}", path.display());
    }
}
