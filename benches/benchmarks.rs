use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nbg_currencies::{
    config::SourceConfig,
    currency::{Currencies, Currency},
    fetcher::CurrencySelectors,
    format::OutputFormat,
};

fn sample_currencies(n: usize) -> Currencies {
    (0..n)
        .map(|i| Currency::new(format!("C{:02}", i % 100), 1.0 + i as f64 / 7.0))
        .collect()
}

fn sample_page(rows: usize) -> String {
    let mut html = String::from(
        r#"<html><body><div class="mt-3-4 border-b-2 border-grey-400 border-solid">"#,
    );
    for i in 0..rows {
        html.push_str(&format!(
            r#"<div class="jsx-182984682"><div class="jsx-182984682 px-2-2"><span>C{:02}</span></div><div class="jsx-182984682 flex items-center justify-end"><span>{:.4}</span></div></div>"#,
            i,
            1.0 + i as f64 / 7.0
        ));
    }
    html.push_str("</div></body></html>");
    html
}

fn benchmark_encoding(c: &mut Criterion) {
    let currencies = sample_currencies(1000);

    for format in OutputFormat::all() {
        c.bench_function(&format!("encode_{}_1000", format), |b| {
            b.iter(|| black_box(&currencies).encode(format).unwrap());
        });
    }
}

fn benchmark_json_array_decode(c: &mut Criterion) {
    let json = sample_currencies(1000).to_json_array().unwrap();

    c.bench_function("decode_json_array_1000", |b| {
        b.iter(|| Currencies::from_json_array(black_box(&json)).unwrap());
    });
}

fn benchmark_extraction(c: &mut Criterion) {
    let selectors = CurrencySelectors::compile(&SourceConfig::default()).unwrap();
    let page = sample_page(45);

    c.bench_function("extract_45_rows", |b| {
        b.iter(|| selectors.extract(black_box(&page)));
    });
}

criterion_group!(
    benches,
    benchmark_encoding,
    benchmark_json_array_decode,
    benchmark_extraction
);
criterion_main!(benches);
