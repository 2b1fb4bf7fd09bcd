use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a graph node - the dataset uses both string and integer ids
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    String(String),
    Integer(u64),
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeId::String(s) => write!(f, "{}", s),
            NodeId::Integer(i) => write!(f, "{}", i),
        }
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId::String(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId::String(s.to_string())
    }
}

impl From<u64> for NodeId {
    fn from(i: u64) -> Self {
        NodeId::Integer(i)
    }
}

/// Semantic category of a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeType {
    Person,
    MusicalGroup,
    Song,
    Album,
    RecordLabel,
    /// Category not in the known vocabulary - kept verbatim for the renderer
    Other(String),
}

impl NodeType {
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Person => "Person",
            NodeType::MusicalGroup => "MusicalGroup",
            NodeType::Song => "Song",
            NodeType::Album => "Album",
            NodeType::RecordLabel => "RecordLabel",
            NodeType::Other(s) => s,
        }
    }

    /// Song or Album - the node kinds that carry release years and genres
    #[inline]
    pub fn is_work(&self) -> bool {
        matches!(self, NodeType::Song | NodeType::Album)
    }

    #[inline]
    pub fn is_person(&self) -> bool {
        matches!(self, NodeType::Person)
    }
}

impl From<&str> for NodeType {
    fn from(s: &str) -> Self {
        match s {
            "Person" => NodeType::Person,
            "MusicalGroup" => NodeType::MusicalGroup,
            "Song" => NodeType::Song,
            "Album" => NodeType::Album,
            "RecordLabel" => NodeType::RecordLabel,
            other => NodeType::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(NodeType::from(s.as_str()))
    }
}

/// Typed relationship between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeType {
    PerformerOf,
    ComposerOf,
    LyricistOf,
    ProducerOf,
    RecordedBy,
    DistributedBy,
    MemberOf,
    InStyleOf,
    CoverOf,
    DirectlySamples,
    InterpolatesFrom,
    LyricalReferenceTo,
    /// Relationship not in the known vocabulary - kept verbatim
    Other(String),
}

impl EdgeType {
    pub fn as_str(&self) -> &str {
        match self {
            EdgeType::PerformerOf => "PerformerOf",
            EdgeType::ComposerOf => "ComposerOf",
            EdgeType::LyricistOf => "LyricistOf",
            EdgeType::ProducerOf => "ProducerOf",
            EdgeType::RecordedBy => "RecordedBy",
            EdgeType::DistributedBy => "DistributedBy",
            EdgeType::MemberOf => "MemberOf",
            EdgeType::InStyleOf => "InStyleOf",
            EdgeType::CoverOf => "CoverOf",
            EdgeType::DirectlySamples => "DirectlySamples",
            EdgeType::InterpolatesFrom => "InterpolatesFrom",
            EdgeType::LyricalReferenceTo => "LyricalReferenceTo",
            EdgeType::Other(s) => s,
        }
    }

    /// The four creative-role relationships that link an artist to a work
    #[inline]
    pub fn is_contribution(&self) -> bool {
        matches!(
            self,
            EdgeType::PerformerOf
                | EdgeType::ComposerOf
                | EdgeType::LyricistOf
                | EdgeType::ProducerOf
        )
    }

    /// Role name with the trailing "Of" stripped, e.g. "PerformerOf" -> "Performer".
    /// Only contribution edges carry a role.
    pub fn role_label(&self) -> Option<&'static str> {
        match self {
            EdgeType::PerformerOf => Some("Performer"),
            EdgeType::ComposerOf => Some("Composer"),
            EdgeType::LyricistOf => Some("Lyricist"),
            EdgeType::ProducerOf => Some("Producer"),
            _ => None,
        }
    }
}

impl From<&str> for EdgeType {
    fn from(s: &str) -> Self {
        match s {
            "PerformerOf" => EdgeType::PerformerOf,
            "ComposerOf" => EdgeType::ComposerOf,
            "LyricistOf" => EdgeType::LyricistOf,
            "ProducerOf" => EdgeType::ProducerOf,
            "RecordedBy" => EdgeType::RecordedBy,
            "DistributedBy" => EdgeType::DistributedBy,
            "MemberOf" => EdgeType::MemberOf,
            "InStyleOf" => EdgeType::InStyleOf,
            "CoverOf" => EdgeType::CoverOf,
            "DirectlySamples" => EdgeType::DirectlySamples,
            "InterpolatesFrom" => EdgeType::InterpolatesFrom,
            "LyricalReferenceTo" => EdgeType::LyricalReferenceTo,
            other => EdgeType::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EdgeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EdgeType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(EdgeType::from(s.as_str()))
    }
}

/// A node in the influence graph. Immutable once loaded; identity is `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "Node Type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    /// Canonical integer release year. The wire field `release_date` arrives
    /// as either an integer or a date string; it is parsed exactly once here
    /// and every downstream year key uses this value.
    #[serde(
        rename = "release_date",
        default,
        deserialize_with = "de_release_year",
        skip_serializing_if = "Option::is_none"
    )]
    pub release_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notable: Option<bool>,
    /// May be absent - absence is an observable state, not an error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub influence_score: Option<f64>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type,
            genre: None,
            release_year: None,
            notable: None,
            influence_score: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_release_year(mut self, year: i32) -> Self {
        self.release_year = Some(year);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_notable(mut self, notable: bool) -> Self {
        self.notable = Some(notable);
        self
    }

    #[inline]
    pub fn is_notable(&self) -> bool {
        self.notable.unwrap_or(false)
    }
}

fn de_release_year<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        // Non-integer numbers degrade like unparseable strings do
        Some(serde_json::Value::Number(n)) => {
            Ok(n.as_i64().and_then(|year| i32::try_from(year).ok()))
        }
        Some(serde_json::Value::String(s)) => Ok(parse_year_str(&s)),
        Some(_) => Ok(None),
    }
}

/// Parse the leading year out of a date string ("1990", "1990-05-01").
/// Invalid dates yield `None` - they are excluded downstream, not an error.
pub fn parse_year_str(s: &str) -> Option<i32> {
    let trimmed = s.trim();
    // get() rather than slicing: byte 4 may not be a char boundary
    let prefix = trimmed.get(..4).unwrap_or(trimmed);
    prefix.parse::<i32>().ok()
}

/// An edge in the influence graph. Endpoints are ids, not references -
/// dangling endpoints are tolerated and resolved lazily.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(rename = "Edge Type")]
    pub edge_type: EdgeType,
}

impl Edge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>, edge_type: EdgeType) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            edge_type,
        }
    }

    /// Deduplication identity: two edges with the same triple are one edge
    #[inline]
    pub fn key(&self) -> EdgeKey {
        EdgeKey(
            self.source.clone(),
            self.target.clone(),
            self.edge_type.clone(),
        )
    }
}

/// The `(source, target, edge type)` triple that identifies an edge
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeKey(pub NodeId, pub NodeId, pub EdgeType);

/// One node/edge collection as loaded from disk or a backend.
/// Missing keys degrade to empty collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub links: Vec<Edge>,
}

/// The filter vocabulary published alongside the yearly chunks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default, alias = "nodeTypes")]
    pub node_types: Vec<String>,
    #[serde(default, alias = "edgeTypes")]
    pub edge_types: Vec<String>,
    #[serde(default, alias = "nodeNames")]
    pub node_names: Vec<String>,
}
