//! Deterministic seed data.
//!
//! Rows are derived from their index alone (no RNG), so pagination windows
//! are reproducible run to run. Ids and registration timestamps are still
//! freshly generated.
use roster_common::{Record, RecordDraft, validate};

const FIRST_NAMES: &[&str] = &[
    "Ada", "Blair", "Casey", "Devon", "Ellis", "Finley", "Gray", "Harper", "Indra", "Jules",
    "Kai", "Lane", "Morgan", "Noel", "Oakley", "Peyton", "Quinn", "Reese", "Sage", "Tatum",
];

const LAST_NAMES: &[&str] = &[
    "Abbott", "Barrera", "Calderon", "Dickson", "Estes", "Fleming", "Guzman", "Hensley",
    "Irwin", "Jacobs", "Keller", "Lambert", "Mercado", "Norton", "Odom", "Pittman",
];

const COMPANIES: &[&str] = &[
    "Quantalia", "Zentrix", "Cobaltworks", "Polymath Labs", "Nimbusoft", "Vertexia",
    "Halcyon Group", "Orbisphere",
];

const GENDERS: &[&str] = &["female", "male", "nonbinary"];

fn draft_for(index: usize) -> RecordDraft {
    let first = FIRST_NAMES[index % FIRST_NAMES.len()];
    let last = LAST_NAMES[(index / FIRST_NAMES.len() + index) % LAST_NAMES.len()];
    let name = format!("{first} {last}");
    let company = COMPANIES[index % COMPANIES.len()];
    let dollars = 1_000 + (index as u64 * 137) % 9_000;
    let cents = (index * 17) % 100;
    RecordDraft {
        name: name.clone(),
        age: 18 + (index as u32 * 7) % 82,
        gender: GENDERS[index % GENDERS.len()].to_string(),
        balance: format!("${},{:03}.{cents:02}", dollars / 1_000, dollars % 1_000),
        company: company.to_string(),
        phone: format!("+1 (555) {:03}-{:04}", 100 + index % 900, index % 10_000),
        email: format!(
            "{}.{}{index}@{}.com",
            first.to_lowercase(),
            last.to_lowercase(),
            company.to_lowercase().replace(' ', "-")
        ),
        about: format!("{first} has been with {company} since joining as employee #{index}."),
    }
}

pub fn seed_users(n: usize) -> Vec<Record> {
    (0..n).map(|i| Record::from_draft(&draft_for(i))).collect()
}
