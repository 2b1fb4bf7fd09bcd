// Performance benchmarks for the filter pipeline and career analytics
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use harmonet_core::{
    CareerAnalyzer, Edge, EdgeType, FilterConfig, FilterCriteria, FilterEngine, GraphIndex,
    GraphSnapshot, Node, NodeId, NodeType, TimeRange,
};
use std::collections::{BTreeMap, BTreeSet};

const GENRES: [&str; 4] = ["Oceanus Folk", "Indie Pop", "Dream Pop", "Synthwave"];

/// A synthetic dataset: `artists` people spread over `years` year chunks,
/// each releasing one song per year with a rotating collaborator.
fn synthetic_index(artists: usize, years: i32) -> GraphIndex {
    let mut partitions = BTreeMap::new();
    for offset in 0..years {
        let year = 1980 + offset;
        let mut nodes = Vec::new();
        let mut links = Vec::new();
        for a in 0..artists {
            let artist_id = format!("artist-{}", a);
            let song_id = format!("song-{}-{}", a, year);
            nodes.push(
                Node::new(artist_id.clone(), format!("Artist {}", a), NodeType::Person)
                    .with_genre(GENRES[a % GENRES.len()]),
            );
            nodes.push(
                Node::new(song_id.clone(), format!("Song {} {}", a, year), NodeType::Song)
                    .with_genre(GENRES[a % GENRES.len()])
                    .with_release_year(year)
                    .with_notable(a % 7 == 0),
            );
            links.push(Edge::new(
                artist_id,
                song_id.clone(),
                EdgeType::PerformerOf,
            ));
            let collaborator = format!("artist-{}", (a + 1) % artists);
            links.push(Edge::new(collaborator, song_id, EdgeType::ComposerOf));
        }
        partitions.insert(year, GraphSnapshot { nodes, links });
    }

    let mut index = GraphIndex::new();
    index.load(partitions);
    index
}

fn benchmark_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    let engine = FilterEngine::new(FilterConfig::default());

    for artists in [100, 1000].iter() {
        let index = synthetic_index(*artists, 30);
        let criteria = FilterCriteria {
            time_range: Some(TimeRange::new(1985, 2000)),
            genres: BTreeSet::from(["Oceanus Folk".to_string()]),
            search_term: String::new(),
            ..Default::default()
        };

        group.bench_with_input(
            BenchmarkId::new("genre_and_time", artists),
            artists,
            |b, _| {
                b.iter(|| black_box(engine.apply(&index, &criteria, None)));
            },
        );

        let search = FilterCriteria {
            search_term: "artist 42".to_string(),
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::new("search", artists), artists, |b, _| {
            b.iter(|| black_box(engine.apply(&index, &search, None)));
        });
    }

    group.finish();
}

fn benchmark_career(c: &mut Criterion) {
    let mut group = c.benchmark_group("career");
    let index = synthetic_index(1000, 30);
    let artist = NodeId::from("artist-0");

    group.bench_function("analyze", |b| {
        b.iter(|| black_box(CareerAnalyzer::analyze(&index, &artist)));
    });

    group.finish();
}

criterion_group!(benches, benchmark_filter, benchmark_career);
criterion_main!(benches);
