//! Packing benchmarks using Criterion

use std::fs;
use std::path::Path;

use bedpack_build::{FilePacker, Packer};
use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use tempfile::TempDir;

fn create_pack_tree(root: &Path, count: usize) {
    for i in 0..count {
        let dir = root.join(format!("items/group_{}", i % 10));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(format!("item_{}.json5", i)),
            format!(
                "{{\n  // generated\n  format_version: '1.21.0',\n  'minecraft:item': {{ description: {{ identifier: 'lc:item_{}' }}, }},\n}}",
                i
            ),
        )
        .unwrap();
        fs::write(dir.join(format!("texture_{}.png", i)), vec![i as u8; 4096]).unwrap();
    }
}

fn pack_benchmarks(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("pack");

    for count in [50, 500] {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src");
        let out = temp_dir.path().join("out");
        create_pack_tree(&src, count);

        group.throughput(Throughput::Elements((count * 2) as u64));
        group.bench_function(format!("pack_{}_items", count), |b| {
            b.to_async(&rt).iter(|| FilePacker.pack(&src, &out))
        });
    }

    group.finish();
}

criterion_group!(benches, pack_benchmarks);
criterion_main!(benches);
