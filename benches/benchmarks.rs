use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bwt_search::index::{bwt, ctab::CTable, otab::OTable, persist, sa, ExactSearch, FmIndex, MultiIndex, PrefixDoubling};

fn make_reference(len: usize) -> Vec<u8> {
    let bases = [b'A', b'C', b'G', b'T'];
    let mut seq = Vec::with_capacity(len);
    let mut x: u32 = 42;
    for _ in 0..len {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        seq.push(bases[(x >> 16) as usize % 4]);
    }
    seq
}

fn coded(seq: &[u8]) -> Vec<u8> {
    let alpha = bwt_search::Alphabet::from_text(seq).unwrap();
    alpha.encode_with_sentinel(seq).unwrap()
}

fn bench_backward_search(c: &mut Criterion) {
    let reference = make_reference(10_000);
    let idx = FmIndex::build(&reference).unwrap();
    let pattern = reference[100..120].to_vec();

    c.bench_function("backward_search_20bp", |b| {
        b.iter(|| {
            black_box(idx.backward_search(black_box(&pattern)));
        })
    });

    let short = reference[100..104].to_vec();
    c.bench_function("search_collect_4bp", |b| {
        b.iter(|| black_box(idx.search(black_box(&short)).collect::<Vec<i32>>()))
    });
}

fn bench_build_sa(c: &mut Criterion) {
    let text = coded(&make_reference(10_000));

    c.bench_function("build_sa_10k", |b| {
        b.iter(|| {
            black_box(sa::build_sa(black_box(&text)));
        })
    });
}

fn bench_tables(c: &mut Criterion) {
    let text = coded(&make_reference(10_000));
    let sa_arr = sa::build_sa(&text);
    let bwt_arr = bwt::build_bwt(&text, &sa_arr);

    c.bench_function("ctab_10k", |b| b.iter(|| black_box(CTable::build(black_box(&bwt_arr), 5))));
    c.bench_function("otab_10k", |b| b.iter(|| black_box(OTable::build(black_box(&bwt_arr), 5))));
}

fn bench_persist(c: &mut Criterion) {
    let seqs = vec![("chr1", make_reference(5_000)), ("chr2", make_reference(3_000))];
    let multi = MultiIndex::build(seqs, None, &PrefixDoubling).unwrap();
    let bytes = persist::to_bytes(&multi).unwrap();

    c.bench_function("encode_8k", |b| b.iter(|| black_box(persist::to_bytes(black_box(&multi)).unwrap())));
    c.bench_function("decode_8k", |b| b.iter(|| black_box(persist::decode(black_box(&bytes)).unwrap())));
}

criterion_group!(benches, bench_backward_search, bench_build_sa, bench_tables, bench_persist);
criterion_main!(benches);
