use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for the matching view
    let mut types = Vec::new();

    // Reference records
    types.push(clean_type(Session::export_to_string()?));
    types.push(clean_type(Applicant::export_to_string()?));
    types.push(clean_type(ApplicantsResponse::export_to_string()?));
    types.push(clean_type(Position::export_to_string()?));
    types.push(clean_type(PositionsResponse::export_to_string()?));

    // Application types
    types.push(clean_type(PositionPreference::export_to_string()?));
    types.push(clean_type(InstructorPreference::export_to_string()?));
    types.push(clean_type(Application::export_to_string()?));
    types.push(clean_type(ApplicationsResponse::export_to_string()?));

    // Assignment types
    types.push(clean_type(OfferStatus::export_to_string()?));
    types.push(clean_type(Assignment::export_to_string()?));
    types.push(clean_type(CreateAssignmentRequest::export_to_string()?));
    types.push(clean_type(AssignmentsResponse::export_to_string()?));
    types.push(clean_type(FinalizeResponse::export_to_string()?));

    // Matching types
    types.push(clean_type(ApplicantMatchingDatum::export_to_string()?));
    types.push(clean_type(Match::export_to_string()?));
    types.push(clean_type(MatchStatus::export_to_string()?));
    types.push(clean_type(FillStatus::export_to_string()?));

    // Summary types
    types.push(clean_type(ApplicantSummary::export_to_string()?));
    types.push(clean_type(PositionSummary::export_to_string()?));
    types.push(clean_type(PositionFillStats::export_to_string()?));
    types.push(clean_type(PositionSummariesResponse::export_to_string()?));

    let output_dir = Path::new("../frontend/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

/// All definitions land in one file, so per-type imports and the generated
/// banner are dropped.
fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    let result = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect::<Vec<_>>()
        .join("\n");

    let result = result.trim();
    if result.is_empty() {
        String::new()
    } else {
        format!("{}\n", result)
    }
}
