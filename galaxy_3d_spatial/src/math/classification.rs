/// Tri-state result of testing a volume against a query shape.
///
/// Ordered `Outside < Intersect < Inside`, so `max`/`min` and comparisons
/// express "at least partially visible" etc. directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Classification {
    /// No overlap with the query shape
    Outside,
    /// Partial overlap, children/items must be tested individually
    Intersect,
    /// Fully contained by the query shape
    Inside,
}

impl Classification {
    /// `true` for `Intersect` and `Inside`.
    pub fn is_hit(self) -> bool {
        self != Classification::Outside
    }
}
