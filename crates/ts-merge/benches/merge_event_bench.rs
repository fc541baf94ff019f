//! Benchmarks the merger's hot loop: one `MergeEngine::merge_event` call per
//! admitted event, the operation the Driver repeats for every source on
//! every timeslice.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use ts_container::{
    BincodeContainerReader, BincodeContainerWriter, ContainerWriter, RawBranchInfo, RawElementKind,
};
use ts_merge::MergeEngine;
use ts_model::{CollectionData, ObjectId, PrimaryRecord, TimesliceBuffer};
use ts_schema::Schema;
use ts_source::Source;

fn schema_raw() -> Vec<RawBranchInfo> {
    vec![
        RawBranchInfo {
            name: "MCParticles".into(),
            kind: RawElementKind::Primary {
                float_fields: vec!["time".into()],
                int_fields: vec!["generatorStatus".into()],
                range_fields: vec!["parents".into(), "daughters".into()],
            },
        },
        RawBranchInfo {
            name: "_MCParticles_daughters".into(),
            kind: RawElementKind::ObjectIdVec,
        },
    ]
}

fn fixture_event(n_particles: usize) -> TimesliceBuffer {
    let particles = (0..n_particles)
        .map(|i| PrimaryRecord::new(vec![0.0], vec![1], vec![(0, 0), (i as i32, i as i32 + 1)]))
        .collect();
    let daughters = (0..n_particles as i32).map(|i| ObjectId::new(0, i)).collect();
    TimesliceBuffer::new(vec![
        CollectionData::Primary(particles),
        CollectionData::Reference(daughters),
    ])
}

fn open_source(dir: &std::path::Path, name: &str, schema: &Schema, events: &[TimesliceBuffer]) -> Source {
    let path = dir.join(format!("{name}.bin"));
    let mut writer = BincodeContainerWriter::create(&path).unwrap();
    writer.clone_metadata(&schema_raw()).unwrap();
    for event in events {
        writer.write_entry(event).unwrap();
    }
    let reader = BincodeContainerReader::open(&path).unwrap();
    Source::open(name.to_string(), vec![Box::new(reader)], schema, true, false, 0).unwrap()
}

fn bench_merge_event(c: &mut Criterion) {
    let raw = schema_raw();
    let schema = Schema::discover(&raw).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let mut group = c.benchmark_group("merge_event");

    for n_particles in [1, 10, 100] {
        group.bench_with_input(
            BenchmarkId::new("particles_per_event", n_particles),
            &n_particles,
            |b, &n| {
                let events: Vec<TimesliceBuffer> = std::iter::repeat_with(|| fixture_event(n)).take(64).collect();
                let mut source = open_source(dir.path(), &format!("bench_{n}"), &schema, &events);
                let mut engine = MergeEngine::new(&schema);
                let mut event_number = 0u32;

                b.iter(|| {
                    engine.clear_buffer();
                    source.read().unwrap();
                    engine
                        .merge_event(&schema, black_box(&mut source), event_number, 0, 10.0, 1.0)
                        .unwrap();
                    source.advance();
                    event_number = event_number.wrapping_add(1);
                    black_box(engine.buffer())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_merge_event);
criterion_main!(benches);
