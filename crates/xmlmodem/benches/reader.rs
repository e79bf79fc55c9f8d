//! Benchmark – `xmlmodem::XmlReader`
#![allow(missing_docs)]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use xmlmodem::{DEFAULT_VALUE_POOL_CAPACITY, ReaderOptions, Token, XmlReader};

/// A channel with `items` same-named `<item>` siblings, each carrying an
/// attribute, two text children and a nested element.
fn make_xml_payload(items: usize) -> String {
    let mut s = String::with_capacity(items * 96);
    s.push_str("<channel><title>bench</title>");
    for i in 0..items {
        s.push_str("<item id=\"");
        s.push_str(&i.to_string());
        s.push_str("\"><name>item name</name><price>12.5</price><tags><t>a</t><t>b</t></tags></item>");
    }
    s.push_str("</channel>");
    s
}

/// Walks every token of the document, asking for a list after each `item`
/// field name when `lists` is set. Returns the number of tokens read.
fn run_reader(payload: &str, options: ReaderOptions, lists: bool) -> usize {
    let mut reader = XmlReader::from_str(payload, options).expect("valid options");
    let mut produced = 0usize;
    let mut wants_array = false;
    loop {
        produced += 1;
        if wants_array {
            wants_array = false;
            reader.begin_array().expect("list");
            continue;
        }
        match reader.peek().expect("valid document") {
            Token::BeginObject => reader.begin_object().unwrap(),
            Token::EndObject => reader.end_object().unwrap(),
            Token::BeginArray => reader.begin_array().unwrap(),
            Token::EndArray => reader.end_array().unwrap(),
            Token::FieldName => {
                let name = reader.next_field_name().unwrap();
                wants_array = lists && name == "item";
            }
            Token::StringValue => {
                black_box(reader.next_string().unwrap());
            }
            Token::Boolean | Token::Number => unreachable!(),
            Token::EndOfStream => return produced,
        }
    }
}

fn bench_reader(c: &mut Criterion) {
    let payload = make_xml_payload(1_000);

    let mut group = c.benchmark_group("xml_reader");

    for &pool in &[0usize, DEFAULT_VALUE_POOL_CAPACITY] {
        for &(name, same_name_list) in &[("fields", false), ("same_name_list", true)] {
            let options = ReaderOptions {
                skip_root: true,
                same_name_list,
                value_pool_capacity: pool,
                ..Default::default()
            };
            group.bench_with_input(
                BenchmarkId::new(format!("pool_{pool}"), name),
                &options,
                |b, &o| {
                    b.iter(|| {
                        let count = run_reader(black_box(&payload), o, same_name_list);
                        black_box(count);
                    });
                },
            );
        }
    }
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(5));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_reader }
criterion_main!(benches);
