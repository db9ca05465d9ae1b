//! CSV rendering of a tally (RFC 4180 quoting)

use crate::domain::Tally;

pub const CSV_HEADER: &str = "Candidate,Votes";

/// Download name for an election's results
pub fn csv_filename(election_id: i32) -> String {
    format!("results_election_{}.csv", election_id)
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Header plus one row per entry, in tally order, CRLF line endings.
pub fn render_csv(tally: &Tally) -> String {
    let mut out = String::with_capacity(32 * (tally.entries.len() + 1));
    out.push_str(CSV_HEADER);
    out.push_str("\r\n");
    for entry in &tally.entries {
        out.push_str(&escape_field(&entry.candidate_name));
        out.push(',');
        out.push_str(&entry.votes.to_string());
        out.push_str("\r\n");
    }
    out
}
