use serde::{Deserialize, Serialize};

///
/// Direction
///
/// Traversal direction of a partition scan. `Asc` visits rows in
/// chronological (append) order, `Desc` visits the newest row first.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}
