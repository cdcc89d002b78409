// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human-readable rendering of the impact totals.

use crate::ledger::ImpactStats;

/// Render the impact summary served by `/stats` and printed by the shell.
pub fn render(stats: &ImpactStats) -> String {
    let total = stats.total_queries();
    if total == 0 {
        return "No queries processed yet.".to_string();
    }

    let pct = |count: u64| (count as f64 / total as f64) * 100.0;

    let mut out = String::new();
    out.push_str("environmental impact report\n");
    out.push_str(&format!("  total queries: {total}\n"));
    out.push_str(&format!(
        "    rule-based: {} ({:.1}%)\n",
        stats.rule_based_responses,
        pct(stats.rule_based_responses)
    ));
    out.push_str(&format!(
        "    local:      {} ({:.1}%)\n",
        stats.local_responses,
        pct(stats.local_responses)
    ));
    out.push_str(&format!(
        "    cloud:      {} ({:.1}%)\n",
        stats.cloud_responses,
        pct(stats.cloud_responses)
    ));
    out.push_str("  savings vs cloud-only\n");
    out.push_str(&format!("    tokens saved: {}\n", stats.tokens_saved));
    out.push_str(&format!(
        "    co2 saved:    {:.2} g\n",
        stats.co2_saved_grams
    ));
    out.push_str(&format!(
        "    water saved:  {:.0} ml\n",
        stats.water_saved_ml
    ));
    out.push_str("  cloud usage\n");
    out.push_str(&format!(
        "    total tokens: {}\n",
        stats.total_tokens_used
    ));
    out
}
