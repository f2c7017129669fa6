// SPDX-FileCopyrightText: 2026 Emora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade; without an installed recorder these are no-ops.

use metrics::{describe_counter, describe_histogram};

use crate::reply::ReplyOutcome;

/// Register all Emora metric descriptions.
pub fn register_metrics() {
    describe_counter!("emora_chat_turns_total", "Completed chat turns");
    describe_counter!(
        "emora_retrieval_failures_total",
        "Retrievals that failed and degraded to empty context"
    );
    describe_counter!(
        "emora_generation_outcomes_total",
        "Generation results by outcome"
    );
    describe_histogram!(
        "emora_retrieval_latency_seconds",
        "Memory retrieval latency in seconds"
    );
}

/// Record a completed chat turn.
pub fn record_chat_turn(emotion: &str) {
    metrics::counter!("emora_chat_turns_total", "emotion" => emotion.to_string()).increment(1);
}

/// Record a retrieval that degraded to empty context.
pub fn record_retrieval_failure() {
    metrics::counter!("emora_retrieval_failures_total").increment(1);
}

/// Record how generation ended.
pub fn record_generation_outcome(outcome: ReplyOutcome) {
    metrics::counter!("emora_generation_outcomes_total", "outcome" => outcome.to_string())
        .increment(1);
}

/// Record retrieval latency.
pub fn record_retrieval_latency(seconds: f64) {
    metrics::histogram!("emora_retrieval_latency_seconds").record(seconds);
}
