use criterion::{Criterion, black_box, criterion_group, criterion_main};

use mathex::{Backend, Expression, Library};

fn bench_eval(c: &mut Criterion) {
    let lib = Library::new(Backend::Scalar);

    let simple = Expression::with_library("1 + 3*2**2", &lib).unwrap();
    c.bench_function("eval_simple", |b| {
        b.iter(|| black_box(&simple).eval().unwrap())
    });

    let nested = Expression::with_library("sqrt(pow(3, 2) + pow(4, 2)) * (pi - e)", &lib).unwrap();
    c.bench_function("eval_functions", |b| {
        b.iter(|| black_box(&nested).eval().unwrap())
    });

    c.bench_function("tokenize_and_eval", |b| {
        b.iter(|| {
            Expression::with_library(black_box("1 + 3*2**2 - 10//4"), &lib)
                .unwrap()
                .eval()
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_eval);
criterion_main!(benches);
