use std::hint::black_box;
use std::sync::Arc;

use criterion::criterion_group;
use criterion::criterion_main;
use criterion::BenchmarkId;
use criterion::Criterion;
use portfolio_temperature::diagnostics::NoopObserver;
use portfolio_temperature::model::Company;
use portfolio_temperature::model::FinancialMetric;
use portfolio_temperature::model::Portfolio;
use portfolio_temperature::model::ScoreRecord;
use portfolio_temperature::model::Scope;
use portfolio_temperature::model::TargetStatus;
use portfolio_temperature::model::TimeFrame;
use portfolio_temperature::AggregationConfig;
use portfolio_temperature::AggregationMethod;
use portfolio_temperature::CoverageCalculator;
use portfolio_temperature::CoverageConfig;
use portfolio_temperature::TemperatureAggregator;

const SIZES: [usize; 3] = [100, 1_000, 10_000];

fn synthetic(n: usize) -> (Portfolio, Vec<ScoreRecord>) {
  let companies = (0..n)
    .map(|i| {
      let x = (i % 97) as f64 + 1.0;
      let status = if i % 3 == 0 {
        TargetStatus::Approved
      } else {
        TargetStatus::NoTarget
      };
      Company::new(format!("C{i:06}"), format!("Company {i}"))
        .with_investment_value(1e5 * x)
        .with_emissions(Some(10.0 * x), Some(40.0 * x))
        .with_financial(FinancialMetric::MarketCap, 1e8 + 1e6 * x)
        .with_target_status(status)
        .with_attribute("sector", format!("S{}", i % 11))
    })
    .collect();
  let portfolio = match Portfolio::new(companies) {
    Ok(portfolio) => portfolio,
    Err(err) => panic!("synthetic portfolio rejected: {err}"),
  };

  let mut records = Vec::with_capacity(n * 9);
  for i in 0..n {
    for tf in TimeFrame::ALL {
      for scope in Scope::ALL {
        let score = 1.5 + ((i * 13 + tf as usize * 5 + scope as usize) % 29) as f64 * 0.05;
        records.push(ScoreRecord::target(format!("C{i:06}"), tf, scope, score));
      }
    }
  }
  (portfolio, records)
}

fn aggregator(config: AggregationConfig) -> TemperatureAggregator {
  match TemperatureAggregator::new(config) {
    Ok(aggregator) => aggregator.with_observer(Arc::new(NoopObserver)),
    Err(err) => panic!("invalid config: {err}"),
  }
}

fn bench_aggregate(c: &mut Criterion) {
  let mut group = c.benchmark_group("aggregate");

  for n in SIZES {
    let (portfolio, records) = synthetic(n);
    for method in [AggregationMethod::Wats, AggregationMethod::Mots] {
      let sequential = aggregator(AggregationConfig::new(method));
      group.bench_with_input(BenchmarkId::new(format!("{method}/seq"), n), &n, |b, _| {
        b.iter(|| black_box(sequential.aggregate(&portfolio, &records)))
      });

      let parallel = aggregator(AggregationConfig::new(method).with_parallel(true));
      group.bench_with_input(BenchmarkId::new(format!("{method}/par"), n), &n, |b, _| {
        b.iter(|| black_box(parallel.aggregate(&portfolio, &records)))
      });
    }

    let grouped = aggregator(AggregationConfig::new(AggregationMethod::Wats).with_group_by(["sector"]));
    group.bench_with_input(BenchmarkId::new("WATS/grouped", n), &n, |b, _| {
      b.iter(|| black_box(grouped.aggregate(&portfolio, &records)))
    });
  }

  group.finish();
}

fn bench_coverage(c: &mut Criterion) {
  let mut group = c.benchmark_group("coverage");

  for n in SIZES {
    let (portfolio, _) = synthetic(n);
    let calculator =
      CoverageCalculator::new(CoverageConfig::new(AggregationMethod::Wats)).with_observer(Arc::new(NoopObserver));
    group.bench_with_input(BenchmarkId::new("WATS", n), &n, |b, _| {
      b.iter(|| black_box(calculator.calculate(&portfolio)))
    });
  }

  group.finish();
}

criterion_group!(benches, bench_aggregate, bench_coverage);
criterion_main!(benches);
