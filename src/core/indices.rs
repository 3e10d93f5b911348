use hashbrown::{HashMap, HashSet};

use crate::types::{TopName, Uwi};

/// Top names present per well.
pub type WellIndex = HashMap<Uwi, HashSet<TopName>>;
