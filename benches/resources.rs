//! Benchmarks for resource listing and prompt handling.
//!
//! Benchmark targets:
//! - Resource list for 1000 gists: <5ms
//! - Prompt file parsing: <100us
//! - Prompt rendering: <50us

// Criterion macros generate items without docs - this is expected for benchmarks
#![allow(missing_docs)]

use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

use gistpad::config::FeatureFlags;
use gistpad::mcp::build_resource_list;
use gistpad::models::{
    DAILY_NOTES_DESCRIPTION, Gist, GistFile, archived_description, parse_prompt_file,
    render_prompt,
};
use serde_json::{Map, Value};

// ============================================================================
// Fixtures
// ============================================================================

/// Builds `count` gists, every tenth archived, plus the daily-notes gist.
fn account(count: usize) -> Vec<Gist> {
    let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().unwrap_or_default();
    let mut gists: Vec<Gist> = (0..count)
        .map(|i| {
            let description = if i % 10 == 0 {
                archived_description(&format!("Gist {i}"))
            } else if i % 7 == 0 {
                String::new()
            } else {
                format!("Gist {i}")
            };
            Gist {
                id: format!("{i:032x}"),
                description,
                files: [(format!("note-{i}.md"), GistFile::default())]
                    .into_iter()
                    .collect(),
                updated_at: base + ChronoDuration::seconds(i64::try_from(i).unwrap_or_default()),
                ..Gist::default()
            }
        })
        .collect();
    gists.push(Gist {
        id: "daily".to_string(),
        description: DAILY_NOTES_DESCRIPTION.to_string(),
        ..Gist::default()
    });
    gists
}

const PROMPT_FILE: &str = "---\n\
description: Summarize a pull request\n\
arguments:\n  \
  url: Link to the pull request\n  \
  audience: Who reads the summary\n\
---\n\n\
Summarize {{url}} for {{audience}} in three bullet points.\n\
Mention breaking changes first.\n";

const PLACEHOLDER_PROMPT: &str =
    "Review {{code}} against {{guidelines}} and list issues in {{format}}. Quote {{code}} lines.";

// ============================================================================
// Resource List Benchmarks
// ============================================================================

fn bench_resource_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("resource_list");
    group.measurement_time(Duration::from_secs(5));

    for size in [10usize, 100, 1000] {
        let owned = account(size);
        let starred = account(size / 10);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("default", size), &owned, |b, owned| {
            b.iter(|| build_resource_list(black_box(owned), &[], &FeatureFlags::none()));
        });

        group.bench_with_input(
            BenchmarkId::new("all_features", size),
            &(owned.clone(), starred),
            |b, (owned, starred)| {
                b.iter(|| build_resource_list(black_box(owned), black_box(starred), &FeatureFlags::all()));
            },
        );
    }

    group.finish();
}

// ============================================================================
// Prompt Benchmarks
// ============================================================================

fn bench_prompts(c: &mut Criterion) {
    let mut group = c.benchmark_group("prompts");

    group.bench_function("parse_front_matter", |b| {
        b.iter(|| parse_prompt_file(black_box("summarize.md"), black_box(PROMPT_FILE)));
    });

    group.bench_function("parse_placeholders", |b| {
        b.iter(|| parse_prompt_file(black_box("review.md"), black_box(PLACEHOLDER_PROMPT)));
    });

    let mut arguments = Map::new();
    arguments.insert(
        "url".to_string(),
        Value::String("https://github.com/octo/repo/pull/1".to_string()),
    );
    arguments.insert("audience".to_string(), Value::String("reviewers".to_string()));

    group.bench_function("render", |b| {
        b.iter(|| render_prompt(black_box(PROMPT_FILE), black_box(&arguments)));
    });

    group.finish();
}

criterion_group!(benches, bench_resource_list, bench_prompts);

criterion_main!(benches);
