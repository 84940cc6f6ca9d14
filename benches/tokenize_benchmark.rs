use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::io::Cursor;
use tabstream::TableReader;

fn build_input(rows: usize) -> String {
    let mut data = String::with_capacity(rows * 32);
    data.push_str("id,name,value\r\n");
    for i in 0..rows {
        data.push_str(&format!("{},\"Name, {}\",{}\r\n", i, i, i * 100));
    }
    data
}

fn benchmark_raw_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("raw_rows");

    for size in [1000, 10000, 100000].iter() {
        let data = build_input(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut reader =
                    TableReader::from_reader(Cursor::new(data.as_bytes().to_vec())).unwrap();
                reader.read_header().unwrap();
                for row_result in reader.rows() {
                    let row = row_result.unwrap();
                    black_box(row);
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_raw_rows);
criterion_main!(benches);
