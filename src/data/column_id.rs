use std::collections::BTreeMap;
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

/// Tag key whose value names the cluster a series belongs to.
pub const DEFAULT_CLUSTER_TAG: &str = "clustertag";

/// Suffix appended to the cluster tag key when the key itself is absent.
/// Some producers emit `clustertagtag`; both spellings are accepted.
const CLUSTER_TAG_ALIAS_SUFFIX: &str = "tag";

lazy_static! {
    /// `<prefix>.scope_<scope>.<metric>{<k=v,...>}`, searched anywhere in the name.
    static ref COLUMN_PATTERN: Regex =
        Regex::new(r"\.scope_(?P<scope>[^.]+)\.(?P<metric>[^{]+)\{(?P<tags>[^}]+)\}")
            .expect("column pattern is a valid regex");
}

// ---------------------------------------------------------------------------
// ClusterKey
// ---------------------------------------------------------------------------

/// Grouping key of a column: its cluster id plus its scope.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClusterKey {
    pub cluster_id: String,
    pub scope: String,
}

impl fmt::Display for ClusterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.cluster_id, self.scope)
    }
}

// ---------------------------------------------------------------------------
// ColumnIdentifier
// ---------------------------------------------------------------------------

/// Structured metadata parsed out of a column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIdentifier {
    pub scope: String,
    pub metric_name: String,
    pub tags: BTreeMap<String, String>,
    pub cluster_id: String,
}

impl ColumnIdentifier {
    pub fn cluster_key(&self) -> ClusterKey {
        ClusterKey {
            cluster_id: self.cluster_id.clone(),
            scope: self.scope.clone(),
        }
    }
}

/// Parse a column name into its identifier.
///
/// Returns `None` when the name does not follow the
/// `.scope_<scope>.<metric>{k=v,...}` layout, or when no non-empty cluster
/// tag can be resolved (first `cluster_tag`, then `cluster_tag + "tag"`).
/// An empty tag value never names a cluster.
pub fn parse_column(column: &str, cluster_tag: &str) -> Option<ColumnIdentifier> {
    let caps = COLUMN_PATTERN.captures(column)?;
    let scope = caps.name("scope")?.as_str();
    let metric = caps.name("metric")?.as_str();
    let tags = parse_tags(caps.name("tags")?.as_str());

    let alias = format!("{cluster_tag}{CLUSTER_TAG_ALIAS_SUFFIX}");
    let cluster_id = [cluster_tag, alias.as_str()]
        .into_iter()
        .filter_map(|key| tags.get(key))
        .find(|value| !value.is_empty())?
        .clone();

    Some(ColumnIdentifier {
        scope: scope.to_string(),
        metric_name: metric.to_string(),
        tags,
        cluster_id,
    })
}

/// Split `k1=v1,k2=v2` into a map. Entries without `=` are ignored; only the
/// first `=` separates key from value; later duplicates win.
fn parse_tags(raw: &str) -> BTreeMap<String, String> {
    raw.split(',')
        .filter_map(|entry| entry.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}
