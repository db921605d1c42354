//! Plain-text rendering of rockets for the terminal.

use std::fmt::Write;

use rocketcache_core::utils::{format_cost, truncate};
use rocketcache_core::Rocket;

const NAME_WIDTH: usize = 24;
const COUNTRY_WIDTH: usize = 24;
const COST_WIDTH: usize = 14;
const STATUS_WIDTH: usize = 8;
const SOURCE_WIDTH: usize = 7;

/// Render rockets as an aligned table with a header row.
pub fn rocket_table(rockets: &[Rocket]) -> String {
    if rockets.is_empty() {
        return "No rockets match.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<nw$} {:<cw$} {:>kw$} {:<sw$} {:<ow$} ID",
        "NAME",
        "COUNTRY",
        "COST/LAUNCH",
        "STATUS",
        "SOURCE",
        nw = NAME_WIDTH,
        cw = COUNTRY_WIDTH,
        kw = COST_WIDTH,
        sw = STATUS_WIDTH,
        ow = SOURCE_WIDTH,
    );
    for rocket in rockets {
        let _ = writeln!(
            out,
            "{:<nw$} {:<cw$} {:>kw$} {:<sw$} {:<ow$} {}",
            truncate(&rocket.name, NAME_WIDTH),
            truncate(&rocket.country, COUNTRY_WIDTH),
            format_cost(rocket.cost_per_launch),
            rocket.status_label(),
            rocket.source_label(),
            rocket.id,
            nw = NAME_WIDTH,
            cw = COUNTRY_WIDTH,
            kw = COST_WIDTH,
            sw = STATUS_WIDTH,
            ow = SOURCE_WIDTH,
        );
    }
    let _ = writeln!(out, "{} rocket(s)", rockets.len());
    out
}

/// Render one rocket as labelled lines, skipping empty optional fields.
pub fn rocket_detail(rocket: &Rocket) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", rocket.name);
    let _ = writeln!(out, "  ID:           {}", rocket.id);
    let _ = writeln!(out, "  Country:      {}", rocket.country);
    if let Some(ref company) = rocket.company {
        let _ = writeln!(out, "  Company:      {}", company);
    }
    let _ = writeln!(out, "  Cost/launch:  {}", format_cost(rocket.cost_per_launch));
    let _ = writeln!(out, "  Status:       {}", rocket.status_label());
    let _ = writeln!(out, "  Source:       {}", rocket.source_label());
    if let Some(ref first_flight) = rocket.first_flight {
        let _ = writeln!(out, "  First flight: {}", first_flight);
    }
    if let Some(rate) = rocket.success_rate_pct {
        let _ = writeln!(out, "  Success rate: {}%", rate);
    }
    if let Some(ref wikipedia) = rocket.wikipedia {
        let _ = writeln!(out, "  Wikipedia:    {}", wikipedia);
    }
    if let Some(ref description) = rocket.description {
        let _ = writeln!(out, "\n  {}", description);
    }
    out
}
