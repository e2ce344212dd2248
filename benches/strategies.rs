use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use nestload::{
    materialize,
    schema::row::RowSchema,
    strategy::{self, GeneratedJoin, JoinSource},
    DatasetParams, LookupTable, Schema,
};
use std::hint::black_box;

fn strategy_benchmarks(c: &mut Criterion) {
    let sizes = vec![
        DatasetParams::new(1, 100, 10, 5),
        DatasetParams::new(100, 1, 10, 5),
        DatasetParams::new(100, 10, 10, 5),
    ];

    let schema = Schema::blog();
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("load_strategies_sqlite");
    group.sample_size(10);

    for params in &sizes {
        let size_label = format!(
            "{}b_{}p_{}c",
            params.blog_count, params.posts_per_blog, params.comments_per_post
        );

        let (mut conn, _) = rt.block_on(tests::seeded(*params, 0));

        for strategy in strategy::all() {
            group.bench_with_input(
                BenchmarkId::new(strategy.name(), &size_label),
                params,
                |b, params| {
                    b.iter(|| {
                        rt.block_on(async {
                            let graph = strategy
                                .load(conn.as_mut(), &schema, params)
                                .await
                                .unwrap();
                            black_box(graph)
                        })
                    });
                },
            );
        }
    }
    group.finish();

    // The materializer alone, over rows already fetched.
    let mut group = c.benchmark_group("materialize");

    for params in &sizes {
        let size_label = format!(
            "{}b_{}p_{}c",
            params.blog_count, params.posts_per_blog, params.comments_per_post
        );

        let (rows, lookup) = rt.block_on(async {
            let (mut conn, _) = tests::seeded(*params, 0).await;
            let users = conn
                .query(&nestload_sql::Serializer::sqlite(&schema).select_table(schema.users()))
                .await
                .unwrap();
            let rows = conn.query(&GeneratedJoin.sql(&schema)).await.unwrap();
            (rows, LookupTable::from_rows(&users).unwrap())
        });
        let row_schema = RowSchema::resolve(rows.columns(), &GeneratedJoin::COLUMNS).unwrap();

        group.bench_with_input(
            BenchmarkId::new("flat_rows", &size_label),
            &rows,
            |b, rows| {
                b.iter(|| black_box(materialize(rows, &row_schema, &lookup).unwrap()));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, strategy_benchmarks);
criterion_main!(benches);
