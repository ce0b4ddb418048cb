use crate::sensors::Measurement;

/// Skip cursor plus every measurement fetched so far, in arrival order.
///
/// The cursor only grows and the accumulated sequence is only appended to;
/// nothing is deduplicated, so overlapping upstream pages stay as they came.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginationState {
    cursor: usize,
    measurements: Vec<Measurement>,
}

impl PaginationState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Move the cursor forward by `page_size` and return its new position.
    pub fn advance(&mut self, page_size: usize) -> usize {
        self.cursor = self.cursor.saturating_add(page_size);
        self.cursor
    }

    pub fn append(&mut self, page: Vec<Measurement>) {
        self.measurements.extend(page);
    }

    /// Accumulated measurements of one sensor, in accumulation order.
    pub fn for_sensor<'a>(
        &'a self,
        sensor_id: &'a str,
    ) -> impl Iterator<Item = &'a Measurement> + 'a {
        self.measurements.iter().filter(move |m| m.id == sensor_id)
    }
}
