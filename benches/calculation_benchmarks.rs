//! Performance benchmarks for the Payroll Tax Engine.
//!
//! This benchmark suite covers:
//! - Single employee computation against the built-in schedule
//! - Batches of 100 and 1000 employees, as a payroll run would compute them
//! - The full HTTP path for a single request and for a payroll run
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use payroll_tax_engine::api::{AppState, create_router};
use payroll_tax_engine::calculation::{compute_payroll_tax, compute_payroll_tax_with_audit};
use payroll_tax_engine::config::{ConfigLoader, kenya_2024};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

/// Creates a test state with loaded configuration.
fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config").expect("Failed to load config");
    AppState::new(config, "KE")
}

/// Gross pay figures spread across every band and the levy tiers.
fn gross_pay_for(index: usize) -> Decimal {
    const SPREAD: [i64; 8] = [0, 5_999, 18_500, 30_000, 48_250, 120_000, 650_000, 1_250_000];
    Decimal::new(SPREAD[index % SPREAD.len()] * 100 + (index as i64 % 100), 2)
}

/// Benchmark: one employee, without and with the audit trace.
fn bench_single_employee(c: &mut Criterion) {
    let schedule = kenya_2024().expect("Failed to build schedule");
    let gross = Decimal::new(30_000, 0);

    c.bench_function("single_employee", |b| {
        b.iter(|| black_box(compute_payroll_tax(&schedule, black_box(gross), Decimal::ZERO)))
    });

    c.bench_function("single_employee_with_audit", |b| {
        b.iter(|| {
            black_box(compute_payroll_tax_with_audit(
                &schedule,
                black_box(gross),
                Decimal::ZERO,
            ))
        })
    });
}

/// Benchmark: batches of employees against one schedule.
fn bench_batches(c: &mut Criterion) {
    let schedule = kenya_2024().expect("Failed to build schedule");

    let mut group = c.benchmark_group("batch_processing");

    for size in [100usize, 1000].iter() {
        let grosses: Vec<Decimal> = (0..*size).map(gross_pay_for).collect();

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("employees", size), size, |b, _| {
            b.iter(|| {
                let results: Vec<_> = grosses
                    .iter()
                    .map(|gross| compute_payroll_tax(&schedule, *gross, Decimal::ZERO))
                    .collect();
                black_box(results)
            })
        });
    }

    group.finish();
}

/// Benchmark: single request through the router.
fn bench_http_single(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(create_test_state());
    let body = serde_json::json!({
        "jurisdiction": "KE",
        "pay_date": "2024-08-31",
        "employee_id": "emp_bench_001",
        "gross_pay": "30000"
    })
    .to_string();

    c.bench_function("http_payroll_tax", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/payroll-tax")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

/// Benchmark: a 1000 employee payroll run through the router.
fn bench_http_payroll_run(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(create_test_state());

    let employees: Vec<serde_json::Value> = (0..1000)
        .map(|i| {
            serde_json::json!({
                "employee_id": format!("emp_batch_{:04}", i),
                "gross_pay": gross_pay_for(i).to_string(),
                "other_deductions": if i % 4 == 0 { "500" } else { "0" }
            })
        })
        .collect();
    let body = serde_json::json!({
        "jurisdiction": "KE",
        "pay_date": "2024-08-31",
        "employees": employees
    })
    .to_string();

    let mut group = c.benchmark_group("large_batch_processing");
    group.throughput(Throughput::Elements(1000));
    // Reduce sample size for large batches to keep benchmark time reasonable
    group.sample_size(10);

    group.bench_function("http_payroll_run_1000", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/payroll-run")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_employee,
    bench_batches,
    bench_http_single,
    bench_http_payroll_run,
);
criterion_main!(benches);
