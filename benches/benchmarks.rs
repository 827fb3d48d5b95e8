//! Performance benchmarks for srcidx
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use srcidx::{ContentQuery, SearchIndex, SourceDocument};

/// Synthetic corpus: `count` classes in ten packages, each importing the next
fn create_benchmark_corpus(count: usize) -> Vec<SourceDocument> {
    (0..count)
        .map(|i| {
            let package = format!("com.bench.p{}", i % 10);
            let next = (i + 1) % count;
            let content = format!(
                r#"package {package};

import com.bench.p{next_pkg}.Service{next};
import org.slf4j.Logger;

public class Service{i} {{
    private static final Logger LOG = LoggerFactory.getLogger(Service{i}.class);

    public void handleRequest{i}(Request request) {{
        LOG.info("handling request {i}");
        new Service{next}().handleRequest{next}(request);
    }}
}}
"#,
                next_pkg = next % 10,
            );
            SourceDocument::new(format!("src/p{}/Service{i}.java", i % 10), content)
                .with_package(package)
                .with_import(format!("com.bench.p{}.Service{next}", next % 10))
                .with_import("org.slf4j.Logger")
                .with_type(format!("Service{i}"))
                .with_method(format!("handleRequest{i}"))
        })
        .collect()
}

fn bench_query_parsing(c: &mut Criterion) {
    let queries = vec![
        "simple",
        "two words",
        "\"exact phrase\"",
        "Logger pkg:com.bench.p1",
        "Logger -pkg:com.bench.p1 word:yes top:10",
        "re:/Service\\d+/",
    ];

    let mut group = c.benchmark_group("query_parsing");
    for query in queries {
        group.bench_with_input(BenchmarkId::from_parameter(query), &query, |b, &q| {
            b.iter(|| srcidx::parse_query(black_box(q)))
        });
    }
    group.finish();
}

fn bench_tokenize(c: &mut Criterion) {
    let code = r#"
        public User getUserById(int userId) {
            String user_name = "test_user";
            int HTTPResponseCode = 200;
            some$function(arg1, arg2);
        }
    "#;
    let large = code.repeat(1000);

    let mut group = c.benchmark_group("tokenize");
    group.bench_function("small", |b| {
        b.iter(|| srcidx::utils::tokenize(black_box(code), false))
    });
    group.bench_function("large_200kb", |b| {
        b.iter(|| srcidx::utils::extract_index_tokens(black_box(&large), 3))
    });
    group.finish();
}

fn bench_rebuild(c: &mut Criterion) {
    let corpus = create_benchmark_corpus(2000);
    let index = SearchIndex::new();

    c.bench_function("rebuild_2000", |b| {
        b.iter(|| index.rebuild(black_box(corpus.clone())))
    });
}

fn bench_search(c: &mut Criterion) {
    let index = SearchIndex::new();
    index.rebuild(create_benchmark_corpus(2000));

    let mut group = c.benchmark_group("search");

    group.bench_function("single_token", |b| {
        b.iter(|| index.search_content(black_box("Service42"), false, false))
    });

    group.bench_function("and_tokens", |b| {
        b.iter(|| index.search_content(black_box("logger request"), false, false))
    });

    group.bench_function("whole_word", |b| {
        b.iter(|| index.search_content(black_box("handleRequest7"), true, true))
    });

    group.bench_function("package_filter", |b| {
        let query = ContentQuery::new("Logger")
            .include_package("com.bench.p3")
            .exclude_package("com.bench.p4");
        b.iter(|| index.search(black_box(&query)))
    });

    group.bench_function("regex", |b| {
        let query = ContentQuery::regex(r"handleRequest1\d\d\(");
        b.iter(|| index.search(black_box(&query)))
    });

    group.bench_function("import_substring", |b| {
        b.iter(|| index.search_by_import(black_box("p3.Service")))
    });

    group.finish();
}

fn bench_dependency_analysis(c: &mut Criterion) {
    let corpus = create_benchmark_corpus(2000);

    c.bench_function("analyze_dependencies_2000", |b| {
        b.iter(|| srcidx::analyze_dependencies(black_box(&corpus)))
    });
}

criterion_group!(
    benches,
    bench_query_parsing,
    bench_tokenize,
    bench_rebuild,
    bench_search,
    bench_dependency_analysis,
);

criterion_main!(benches);
