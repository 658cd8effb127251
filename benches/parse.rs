use divan::{black_box, Bencher};
use drugsmiles::{
    config::Placeholders,
    pubchem::{parse_compound, CompoundRecord},
    report::{Report, ReportRow},
};

fn main() {
    divan::main();
}

const ASPIRIN: &str = include_str!("../data/aspirin.json");

#[divan::bench]
fn parse() -> CompoundRecord {
    parse_compound(black_box(ASPIRIN.as_bytes())).unwrap()
}

#[divan::bench(args = [10, 100, 1000])]
fn to_csv(bencher: Bencher, rows: usize) {
    let record = parse_compound(ASPIRIN.as_bytes()).unwrap();
    let placeholders = Placeholders::default();
    let report = Report {
        rows: (0..rows)
            .map(|i| {
                ReportRow::new(&format!("Drug {i}"), record.clone(), &placeholders)
            })
            .collect(),
        ..Default::default()
    };
    bencher.bench(|| report.to_csv().unwrap());
}
