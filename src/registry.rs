use crate::geometry::Point;
use crate::ring::{Ring, RingId};

/// Rings of one container, outermost first.
///
/// Holds ids into the owning stage's ring arena, never the rings themselves.
#[derive(Debug, Clone, Default)]
pub struct RingRegistry {
    entries: Vec<(RingId, f64)>,
}

impl RingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts and re-sorts by radius, descending. Equal radii keep insertion order.
    pub fn register(&mut self, id: RingId, radius: f64) {
        self.entries.push((id, radius));
        self.entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hit-test order.
    pub fn ids(&self) -> impl Iterator<Item = RingId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    /// First ring, outer to inner, whose band contains `point` (ring space).
    pub fn find_hit(&self, rings: &[Ring], point: Point) -> Option<RingId> {
        self.ids()
            .find(|id| rings.get(id.index()).is_some_and(|ring| ring.hit_test(point)))
    }

    pub fn labels(&self, rings: &[Ring]) -> Vec<LabelEntry> {
        self.ids()
            .filter_map(|id| rings.get(id.index()))
            .map(LabelEntry::from_ring)
            .collect()
    }
}

/// One row of the label list shown beside a container.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEntry {
    pub ring: RingId,
    pub slug: String,
    pub label: String,
    pub value_text: String,
    pub color: Option<String>,
}

impl LabelEntry {
    fn from_ring(ring: &Ring) -> Self {
        Self {
            ring: ring.id(),
            slug: label_slug(&ring.settings().label),
            label: ring.settings().label.clone(),
            value_text: ring.value_text(),
            color: ring.settings().color.clone(),
        }
    }
}

/// `label__` followed by the trimmed, lowercased label with its first space
/// turned into an underscore.
pub fn label_slug(label: &str) -> String {
    format!("label__{}", label.trim().to_lowercase().replacen(' ', "_", 1))
}
