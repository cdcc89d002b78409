// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The prioritized rule pattern table.
//!
//! Each rule pairs a pure `matches` predicate (used by the classifier) with
//! a `respond` function that produces the answer text. Rules are tried in
//! declaration order; the first match wins.

use chrono::Local;

use crate::calc;

/// One entry in the rule table.
pub struct Rule {
    /// Short rule identifier for logs.
    pub name: &'static str,
    /// Pure predicate: does this rule cover the query? Must not touch
    /// clocks or any other ambient state so classification stays
    /// deterministic.
    pub matches: fn(&str) -> bool,
    /// Produce the answer text. May consult the clock (time/date rules).
    pub respond: fn(&str) -> Option<String>,
}

/// Greeting words matched exactly or as a leading word.
const GREETINGS: &[&str] = &["hi", "hello", "hey", "sup", "howdy"];

/// Time request phrases (contains, case-insensitive).
const TIME_PHRASES: &[&str] = &["what time", "current time"];

/// Date request phrases (contains, case-insensitive).
const DATE_PHRASES: &[&str] = &[
    "what date",
    "what's the date",
    "whats the date",
    "today's date",
    "todays date",
    "what day is it",
];

/// The rule table, in priority order.
const RULES: &[Rule] = &[
    Rule {
        name: "greeting",
        matches: is_greeting,
        respond: greet,
    },
    Rule {
        name: "time",
        matches: is_time_request,
        respond: current_time,
    },
    Rule {
        name: "date",
        matches: is_date_request,
        respond: current_date,
    },
    Rule {
        name: "arithmetic",
        matches: is_arithmetic,
        respond: arithmetic,
    },
];

fn is_greeting(query: &str) -> bool {
    let lower = query.trim().to_lowercase();
    GREETINGS
        .iter()
        .any(|w| lower == *w || lower.starts_with(&format!("{w} ")))
}

fn greet(_query: &str) -> Option<String> {
    Some("Hello! How can I help you today?".to_string())
}

fn is_time_request(query: &str) -> bool {
    let lower = query.to_lowercase();
    TIME_PHRASES.iter().any(|p| lower.contains(p))
}

fn current_time(_query: &str) -> Option<String> {
    Some(Local::now().format("%I:%M %p").to_string())
}

fn is_date_request(query: &str) -> bool {
    let lower = query.to_lowercase();
    DATE_PHRASES.iter().any(|p| lower.contains(p))
}

fn current_date(_query: &str) -> Option<String> {
    Some(Local::now().format("%A, %B %d, %Y").to_string())
}

fn is_arithmetic(query: &str) -> bool {
    calc::extract_expression(query)
        .and_then(|expr| calc::evaluate(&expr))
        .is_some()
}

fn arithmetic(query: &str) -> Option<String> {
    let expr = calc::extract_expression(query)?;
    let value = calc::evaluate(&expr)?;
    Some(calc::format_value(value))
}

/// The prioritized rule table tried in order.
#[derive(Default)]
pub struct RuleTable;

impl RuleTable {
    /// Create the standard rule table.
    pub fn new() -> Self {
        Self
    }

    /// Find the first rule covering the query.
    pub fn find(&self, query: &str) -> Option<&'static Rule> {
        RULES.iter().find(|rule| (rule.matches)(query))
    }

    /// Whether any rule covers the query. Pure; safe for the classifier.
    pub fn matches(&self, query: &str) -> bool {
        self.find(query).is_some()
    }
}
