use std::collections::BTreeMap;

use crate::catalog::PlantId;

/// Brightest light level a crop can report.
pub const MAX_LIGHT: u8 = 15;

/// Length of one in-world day, in ticks.
pub const DAY_LENGTH: u32 = 24_000;

/// The organism under evaluation, as reported by the world.
///
/// Everything except `variant` is an opaque environment reading that only
/// triggers look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crop {
    pub variant: PlantId,
    pub light_level: u8,
    pub time_of_day: u32,
    pub applied_tool: Option<String>,
}

impl Crop {
    pub fn new(variant: impl Into<PlantId>) -> Self {
        Crop {
            variant: variant.into(),
            light_level: MAX_LIGHT,
            time_of_day: 6_000,
            applied_tool: None,
        }
    }

    pub fn with_light(mut self, light_level: u8) -> Self {
        self.light_level = light_level.min(MAX_LIGHT);
        self
    }

    pub fn with_time(mut self, time_of_day: u32) -> Self {
        self.time_of_day = time_of_day % DAY_LENGTH;
        self
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.applied_tool = Some(tool.into());
        self
    }
}

/// Count of each plant variant adjacent to a crop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborSet {
    counts: BTreeMap<PlantId, u32>,
}

impl NeighborSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: PlantId) {
        *self.counts.entry(id).or_insert(0) += 1;
    }

    /// A copy of this set with one more `id`.
    pub fn with(&self, id: PlantId) -> NeighborSet {
        let mut set = self.clone();
        set.add(id);
        set
    }

    pub fn count(&self, id: &PlantId) -> u32 {
        self.counts.get(id).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Distinct variants with their counts, ordered by id.
    pub fn distinct(&self) -> impl Iterator<Item = (&PlantId, u32)> {
        self.counts.iter().map(|(id, &n)| (id, n))
    }
}

impl FromIterator<PlantId> for NeighborSet {
    fn from_iter<I: IntoIterator<Item = PlantId>>(iter: I) -> Self {
        let mut set = NeighborSet::new();
        for id in iter {
            set.add(id);
        }
        set
    }
}

impl<'a> FromIterator<&'a str> for NeighborSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(PlantId::from).collect()
    }
}
