use stepup_core::UpgradeUnit;

// Units without an estimate hook are assumed to take on the order of a
// second.
pub fn estimate(upgrades: &[UpgradeUnit]) -> u64 {
    upgrades
        .iter()
        .map(|unit| unit.estimate().unwrap_or(1))
        .sum()
}

pub fn human_estimate(upgrades: &[UpgradeUnit]) -> String {
    let seconds = estimate(upgrades);
    let text = match seconds {
        0..=59 => "less than 1 minute",
        60..=299 => "less than 5 minutes",
        300..=599 => "less than 10 minutes",
        600..=1799 => "less than 30 minutes",
        1800..=3599 => "less than 1 hour",
        3600..=10799 => "less than 3 hours",
        10800..=21599 => "less than 6 hours",
        21600..=43199 => "less than 12 hours",
        43200..=86399 => "less than 1 day",
        _ => "more than 1 day",
    };
    text.to_string()
}
