use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::models::ActivityLinkRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathNode {
    pub id: i64,
    pub name: String,
    pub level: i64,
}

/// The activity itself plus everything reachable through parent -> child
/// links, as a sorted id list. Runs over one bulk fetch of the taxonomy with
/// an explicit stack; the visited set guarantees termination even if the
/// stored graph has a cycle. An id absent from `links` yields just itself;
/// existence checks belong to the caller.
pub fn descendant_ids(links: &[ActivityLinkRow], root: i64) -> Vec<i64> {
    let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
    for link in links {
        if let Some(parent_id) = link.parent_id {
            children.entry(parent_id).or_default().push(link.id);
        }
    }

    let mut visited: HashSet<i64> = HashSet::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        if let Some(kids) = children.get(&id) {
            stack.extend(kids.iter().copied());
        }
    }

    let mut ids: Vec<i64> = visited.into_iter().collect();
    ids.sort_unstable();
    ids
}

/// Chain from the root down to the given activity, the node itself last.
/// Stops if the parent links loop back on themselves.
pub fn ancestor_path(links: &[ActivityLinkRow], id: i64) -> Vec<PathNode> {
    let by_id: HashMap<i64, &ActivityLinkRow> = links.iter().map(|link| (link.id, link)).collect();

    let mut path: Vec<PathNode> = Vec::new();
    let mut visited: HashSet<i64> = HashSet::new();
    let mut current = by_id.get(&id).copied();
    while let Some(link) = current {
        if !visited.insert(link.id) {
            break;
        }
        path.push(PathNode {
            id: link.id,
            name: link.name.clone(),
            level: link.level,
        });
        current = link.parent_id.and_then(|pid| by_id.get(&pid).copied());
    }

    path.reverse();
    path
}
