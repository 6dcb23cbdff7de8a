use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use cqlkit::{Condition, Limit, Operation, Payload, Predicate, QueryParts, compile};

/// `n` equality predicates: WHERE  col0 = ? AND col1 = ? ...
fn predicates(n: usize) -> Vec<Predicate> {
    (0..n)
        .map(|i| Predicate::and(format!("col{i}"), Condition::eq(i as i64)))
        .collect()
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/select");

    for n in [1, 5, 10, 50, 100] {
        let preds = predicates(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &preds, |b, preds| {
            b.iter(|| {
                black_box(compile(
                    QueryParts::new(Operation::Select, "t")
                        .predicates(preds)
                        .limit(Some(Limit::Count(10))),
                ))
            });
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/in_list");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        let preds = vec![Predicate::and(
            "id",
            Condition::In {
                negated: false,
                values: values.into_iter().map(Into::into).collect(),
            },
        )];
        group.bench_with_input(BenchmarkId::from_parameter(n), &preds, |b, preds| {
            b.iter(|| {
                black_box(compile(
                    QueryParts::new(Operation::Select, "t").predicates(preds),
                ))
            });
        });
    }

    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/update");

    for n in [1, 10, 50] {
        let payload = (0..n).fold(Payload::new(), |p, i| p.set(format!("col{i}"), i as i64));
        let preds = predicates(1);
        group.bench_with_input(BenchmarkId::from_parameter(n), &payload, |b, payload| {
            b.iter(|| {
                black_box(compile(
                    QueryParts::new(Operation::Update, "t")
                        .payload(payload)
                        .predicates(&preds),
                ))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_select, bench_in_list, bench_update);
criterion_main!(benches);
