use criterion::{Criterion, criterion_group, criterion_main};
use crm_record::{Attributes, FieldValue, PayloadMode, Record};
use std::hint::black_box;

// ─── Test Data ──────────────────────────────────────────────────────────────

const BENCH_JSON: &str = r#"{
  "attributes": { "type": "Account", "url": "/services/data/v58.0/sobjects/Account/001xx" },
  "Id": "001xx000003DGb2AAG",
  "Name": "Acme Corporation",
  "Industry": "Technology",
  "NumberOfEmployees": 1200,
  "AnnualRevenue": 25000000.5,
  "IsActive__c": true,
  "Description": null,
  "Tags__c": ["enterprise", "emea"],
  "BillingAddress": { "city": "Berlin", "zip": "10115" }
}"#;

fn make_record() -> Record {
    Record::from_json_str(BENCH_JSON).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 1: Creating records
// ═══════════════════════════════════════════════════════════════════════════

fn bench_creating_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("creating_record");

    group.bench_function("from_json_str", |b| {
        b.iter(|| Record::from_json_str(black_box(BENCH_JSON)).unwrap())
    });

    let cbor = make_record().to_cbor_vec().unwrap();
    group.bench_function("from_cbor_slice", |b| {
        b.iter(|| Record::from_cbor_slice(black_box(&cbor)).unwrap())
    });

    group.bench_function("new (typed)", |b| {
        b.iter(|| {
            Record::new(
                Attributes::new("Account"),
                black_box([("Name", "Acme"), ("Industry", "Technology"), ("Phone", "555")]),
            )
        })
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 2: Reading and writing fields
// ═══════════════════════════════════════════════════════════════════════════

fn bench_field_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_access");
    let record = make_record();

    group.bench_function("get (lowercase)", |b| {
        b.iter(|| record.get(black_box("name")))
    });
    group.bench_function("get (mixed case)", |b| {
        b.iter(|| record.get(black_box("NumberOfEmployees")))
    });

    group.bench_function("set_field (overwrite)", |b| {
        let mut record = make_record();
        b.iter(|| {
            record.set_field(black_box("Name"), FieldValue::from("Renamed"));
        })
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 3: Change tracking
// ═══════════════════════════════════════════════════════════════════════════

fn bench_change_tracking(c: &mut Criterion) {
    let mut group = c.benchmark_group("change_tracking");
    let mut record = make_record();
    record.reset_changes();
    record.set_fields([("Name", "Acme Ltd"), ("Industry", "Finance")]);

    group.bench_function("changed", |b| b.iter(|| black_box(&record).changed()));
    group.bench_function("to_payload (changed)", |b| {
        b.iter(|| record.to_payload(black_box(PayloadMode::Changed)))
    });
    group.bench_function("to_json_string", |b| {
        b.iter(|| black_box(&record).to_json_string().unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_creating_record,
    bench_field_access,
    bench_change_tracking
);
criterion_main!(benches);
