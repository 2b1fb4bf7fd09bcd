use crate::error::{Error, Result};
use crate::index::GraphIndex;
use crate::model::{EdgeType, Node, NodeId, NodeType};
use ahash::AHashMap;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Number of artists a side-by-side comparison expects
pub const COMPARISON_SIZE: usize = 3;

/// One work (Song or Album) an artist contributed to, with every role the
/// artist held on it and the distinct people who worked on it with them.
#[derive(Debug, Clone, Serialize)]
pub struct Work {
    pub id: NodeId,
    pub title: String,
    pub work_type: NodeType,
    pub release_year: Option<i32>,
    pub notable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    pub roles: BTreeSet<EdgeType>,
    pub collaborators: BTreeSet<NodeId>,
}

/// Aggregated statistics for one career year
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct YearStat {
    pub influence: u32,
    pub work_count: u32,
    pub notable_count: u32,
    /// Distinct collaborators across the year's works
    pub collab_count: u32,
    /// Role name -> number of works held under that role ("Performer", ...)
    pub role_counts: BTreeMap<String, u32>,
    pub genres: BTreeSet<String>,
    pub genre_distribution: BTreeMap<String, u32>,
}

/// Derived career view for a single artist. Recomputed on demand; never
/// cached and never written back to the index.
#[derive(Debug, Clone, Serialize)]
pub struct CareerData {
    pub artist: Node,
    /// Works ordered by release year, then title; undated works last
    pub timeline: Vec<Work>,
    pub yearly: BTreeMap<i32, YearStat>,
}

/// Extracts an artist's works and collaborations from the graph and derives
/// the per-year statistics series.
pub struct CareerAnalyzer;

impl CareerAnalyzer {
    /// `None` when the id does not resolve to a Person node
    pub fn analyze(index: &GraphIndex, artist_id: &NodeId) -> Option<CareerData> {
        let artist = index.find_by_id(artist_id)?;
        if !artist.node_type.is_person() {
            return None;
        }

        let mut works = Self::extract_works(index, artist_id);
        Self::extract_collaborators(index, artist_id, &mut works);

        let yearly = Self::yearly_stats(&works);

        works.sort_by(|a, b| {
            let ka = (a.release_year.unwrap_or(i32::MAX), &a.title);
            let kb = (b.release_year.unwrap_or(i32::MAX), &b.title);
            ka.cmp(&kb)
        });

        Some(CareerData {
            artist: artist.clone(),
            timeline: works,
            yearly,
        })
    }

    /// Independent career extraction for exactly [`COMPARISON_SIZE`] artists.
    /// There is no cross-artist logic; results are presented side by side.
    pub fn compare(index: &GraphIndex, artist_ids: &[NodeId]) -> Result<Vec<CareerData>> {
        if artist_ids.len() != COMPARISON_SIZE {
            return Err(Error::ComparisonSelection {
                expected: COMPARISON_SIZE,
                actual: artist_ids.len(),
            });
        }
        artist_ids
            .iter()
            .map(|id| {
                Self::analyze(index, id).ok_or_else(|| Error::ArtistNotFound(id.to_string()))
            })
            .collect()
    }

    /// One `Work` per distinct contribution target that resolves to a
    /// Song/Album node. Roles accumulate: performing and composing the same
    /// song is one work with two roles.
    fn extract_works(index: &GraphIndex, artist_id: &NodeId) -> Vec<Work> {
        let mut works: Vec<Work> = Vec::new();
        let mut by_target: AHashMap<NodeId, usize> = AHashMap::new();

        for edge in index.edges() {
            if edge.source != *artist_id || !edge.edge_type.is_contribution() {
                continue;
            }
            let Some(target) = index.find_by_id(&edge.target) else {
                continue; // dangling reference, tolerated
            };
            if !target.node_type.is_work() {
                continue;
            }
            let idx = *by_target.entry(target.id.clone()).or_insert_with(|| {
                works.push(Work {
                    id: target.id.clone(),
                    title: target.name.clone(),
                    work_type: target.node_type.clone(),
                    release_year: target.release_year,
                    notable: target.is_notable(),
                    genre: target.genre.clone(),
                    roles: BTreeSet::new(),
                    collaborators: BTreeSet::new(),
                });
                works.len() - 1
            });
            works[idx].roles.insert(edge.edge_type.clone());
        }
        works
    }

    /// Other Person nodes contributing to the same works
    fn extract_collaborators(index: &GraphIndex, artist_id: &NodeId, works: &mut [Work]) {
        let by_id: AHashMap<&NodeId, usize> = works
            .iter()
            .enumerate()
            .map(|(idx, w)| (&w.id, idx))
            .collect();
        let mut additions: Vec<(usize, NodeId)> = Vec::new();

        for edge in index.edges() {
            if !edge.edge_type.is_contribution() || edge.source == *artist_id {
                continue;
            }
            let Some(&idx) = by_id.get(&edge.target) else {
                continue;
            };
            let Some(person) = index.find_by_id(&edge.source) else {
                continue;
            };
            if person.node_type.is_person() {
                additions.push((idx, person.id.clone()));
            }
        }
        for (idx, collaborator) in additions {
            works[idx].collaborators.insert(collaborator);
        }
    }

    /// One `YearStat` per year between the earliest and latest dated work,
    /// inclusive; gap years get zero-valued entries. A work without a valid
    /// release year contributes to the timeline but not to any year.
    fn yearly_stats(works: &[Work]) -> BTreeMap<i32, YearStat> {
        let mut yearly = BTreeMap::new();
        let dated_years: Vec<i32> = works.iter().filter_map(|w| w.release_year).collect();
        let (Some(&min), Some(&max)) = (dated_years.iter().min(), dated_years.iter().max()) else {
            return yearly;
        };
        for year in min..=max {
            yearly.insert(year, YearStat::default());
        }

        let mut collaborators_by_year: BTreeMap<i32, BTreeSet<&NodeId>> = BTreeMap::new();
        for work in works {
            let Some(year) = work.release_year else {
                continue;
            };
            collaborators_by_year
                .entry(year)
                .or_default()
                .extend(work.collaborators.iter());

            let stat = yearly.entry(year).or_default();
            stat.work_count += 1;
            if work.notable {
                stat.notable_count += 1;
            }
            for role in &work.roles {
                if let Some(label) = role.role_label() {
                    *stat.role_counts.entry(label.to_string()).or_default() += 1;
                }
            }
            if let Some(genre) = &work.genre {
                stat.genres.insert(genre.clone());
                *stat.genre_distribution.entry(genre.clone()).or_default() += 1;
            }
        }

        // Influence weighting: notable works count double. Policy constant.
        for (year, stat) in yearly.iter_mut() {
            stat.collab_count = collaborators_by_year
                .get(year)
                .map(|c| c.len() as u32)
                .unwrap_or(0);
            stat.influence = 2 * stat.notable_count + stat.work_count + stat.collab_count;
        }
        yearly
    }
}
