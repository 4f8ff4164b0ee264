use std::collections::HashMap;
use std::io::Cursor;

use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use cella::biotype::BioType;
use cella::cache_bin::BIN_WIDTH;
use cella::chromosome::Chromosome;
use cella::gene::Gene;
use cella::reader::CacheReader;
use cella::reference_cache::ReferenceCache;
use cella::transcript::{Source, Transcript};
use cella::version::DataSourceVersion;
use cella::writer::CacheWriter;

const NUM_TRANSCRIPTS: usize = 5_000;

fn synthetic_transcript(i: usize) -> Transcript {
    let start = (i as i32) * 10_000 + 1;
    Transcript {
        start,
        end: start + 25_000,
        id: format!("NM_{i:06}.1"),
        biotype: BioType::MRna,
        is_canonical: i % 3 == 0,
        source: Source::RefSeq,
        gene: Gene {
            ncbi_gene_id: Some(format!("{}", 1000 + i / 4)),
            ensembl_id: None,
            on_reverse_strand: i % 2 == 0,
            hgnc_id: Some((1000 + i / 4) as i32),
            symbol: format!("GENE{}", i / 4),
        },
        transcript_regions: Vec::new(),
        cdna_seq: "ACGT".repeat(200),
        coding_region: None,
    }
}

fn build_cache_bytes() -> (Vec<u8>, Chromosome) {
    let chromosome = Chromosome::new("chr1", "1", 248_956_422, 0);
    let transcripts: Vec<Transcript> = (0..NUM_TRANSCRIPTS).map(synthetic_transcript).collect();
    let reference =
        ReferenceCache::from_features(chromosome.clone(), transcripts, Vec::new())
            .unwrap()
            .unwrap();

    let version = DataSourceVersion::new("RefSeq", "110", "2022-04-12");
    let mut buf = Cursor::new(Vec::new());
    let mut rng = StdRng::seed_from_u64(0);
    CacheWriter::write(&mut buf, &version, &[Some(reference)], &mut rng).unwrap();
    (buf.into_inner(), chromosome)
}

fn bench_read_all(c: &mut Criterion) {
    let (data, chromosome) = build_cache_bytes();
    let chromosomes = vec![chromosome];
    let hgnc = HashMap::new();

    c.bench_function("read_all (5k transcripts)", |b| {
        b.iter(|| {
            let mut reader = CacheReader::new(Cursor::new(data.as_slice())).unwrap();
            let cache = reader.read_all(&chromosomes, &hgnc).unwrap();
            assert_eq!(
                cache.references[0].as_ref().unwrap().num_transcripts(),
                NUM_TRANSCRIPTS
            );
        });
    });
}

fn bench_query(c: &mut Criterion) {
    let (data, chromosome) = build_cache_bytes();
    let chromosomes = vec![chromosome];
    let hgnc = HashMap::new();
    let mut reader = CacheReader::new(Cursor::new(data.as_slice())).unwrap();
    let cache = reader.read_all(&chromosomes, &hgnc).unwrap();

    c.bench_function("query_transcripts (1 bin)", |b| {
        b.iter(|| {
            let mut results = Vec::new();
            cache.query_transcripts(0, BIN_WIDTH, BIN_WIDTH + 100_000, &mut results);
            assert!(!results.is_empty());
        });
    });
}

criterion_group!(benches, bench_read_all, bench_query);
criterion_main!(benches);
