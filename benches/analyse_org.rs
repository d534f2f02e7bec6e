//! This bench builds a generated organisation of a thousand employees, both
//! from records in memory and from a CSV file, and runs the full report over
//! it.

#![allow(missing_docs)]

use std::{fmt::Write as _, io::Write as _};

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use orgchart::{Config, FlatRecord, Hierarchy, LoadMode, Report};
use rust_decimal::Decimal;

const EMPLOYEES: usize = 1_000;
const SPAN: usize = 4;

/// Every employee after the first reports to one of the earlier ones, which
/// gives a tree about five levels deep.
fn manager_of(index: usize) -> Option<usize> {
    (index > 0).then(|| (index - 1) / SPAN)
}

fn salary_of(index: usize) -> Decimal {
    let index = i64::try_from(index).unwrap();
    Decimal::from(30_000 + (index * 7_919) % 50_000)
}

fn records() -> Vec<FlatRecord> {
    (0..EMPLOYEES)
        .map(|i| {
            let manager = manager_of(i).map(|m| m.to_string());
            FlatRecord::new(
                &i.to_string(),
                "First",
                &format!("Last{i}"),
                salary_of(i),
                manager.as_deref(),
            )
            .unwrap()
        })
        .collect()
}

fn csv() -> String {
    let mut out = String::from("Id,firstName,lastName,salary,managerId\n");
    for i in 0..EMPLOYEES {
        let manager = manager_of(i).map(|m| m.to_string()).unwrap_or_default();
        writeln!(out, "{i},First,Last{i},{},{manager}", salary_of(i)).unwrap();
    }
    out
}

fn build_and_assemble(c: &mut Criterion) {
    let config = Config::default();

    c.bench_function("build and assemble", |b| {
        b.iter_batched(
            records,
            |records| {
                let hierarchy = Hierarchy::build(records).unwrap();
                let report = Report::assemble(&hierarchy, &config).unwrap();
                report.len()
            },
            BatchSize::SmallInput,
        );
    });
}

fn load_and_assemble(c: &mut Criterion) {
    let config = Config::default();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(csv().as_bytes()).unwrap();

    c.bench_function("load and assemble", |b| {
        b.iter(|| {
            let hierarchy = orgchart::load(file.path(), LoadMode::Strict).unwrap();
            let report = Report::assemble(&hierarchy, &config).unwrap();
            report.len()
        });
    });
}

criterion_group!(benches, build_and_assemble, load_and_assemble);
criterion_main!(benches);
