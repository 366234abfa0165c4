//! Offline dataset check behind `pokedex validate`.

use std::path::Path;

use pokedex_store::{DanglingReference, Dataset};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub data_file: String,
    pub valid: bool,
    pub records: usize,
    pub types: Vec<String>,
    pub weaknesses: Vec<String>,
    /// Evolution references that will be dropped at query time.
    pub dangling: Vec<DanglingReference>,
    pub errors: Vec<String>,
}

/// Load the dataset at `data_file` and summarize it.
///
/// Only a load failure makes the report invalid; dangling evolution
/// references are listed as warnings.
pub fn validate(data_file: &Path) -> ValidationReport {
    let mut report = ValidationReport {
        data_file: data_file.display().to_string(),
        valid: false,
        records: 0,
        types: Vec::new(),
        weaknesses: Vec::new(),
        dangling: Vec::new(),
        errors: Vec::new(),
    };

    let dataset = match Dataset::load(data_file) {
        Ok(d) => d,
        Err(e) => {
            report.errors.push(e.to_string());
            return report;
        }
    };

    let options = dataset.filter_options();
    report.records = dataset.len();
    report.types = options.types;
    report.weaknesses = options.weaknesses;
    report.dangling = dataset.dangling_references();
    report.valid = true;
    report
}

pub fn print_report(report: &ValidationReport) {
    println!("=== Pokedex Dataset Report ===");
    println!();
    println!("Data file:          {}", report.data_file);
    println!("Dataset valid:      {}", if report.valid { "YES" } else { "NO" });
    println!("Records:            {}", report.records);
    println!("Types:              {} ({})", report.types.len(), report.types.join(", "));
    println!(
        "Weaknesses:         {} ({})",
        report.weaknesses.len(),
        report.weaknesses.join(", ")
    );

    if !report.dangling.is_empty() {
        println!();
        println!("Warnings:");
        for d in &report.dangling {
            println!("  - record {} references unknown num {}", d.from_id, d.num);
        }
    }

    if !report.errors.is_empty() {
        println!();
        println!("Errors:");
        for e in &report.errors {
            println!("  - {}", e);
        }
    }

    println!();
    if report.valid {
        println!("Status: READY TO SERVE");
    } else {
        println!("Status: INVALID DATASET");
    }
}
