use super::Item;

/// One horizontally swipeable unit of the carousel.
///
/// Holds 1 item in single view and up to 4 in multi view. Trailing pages are
/// not padded here; the grid shape is a rendering concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a> {
    pub index: usize,
    pub items: &'a [Item],
}

impl<'a> Page<'a> {
    pub fn new(index: usize, items: &'a [Item]) -> Self {
        Self { index, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[cfg(test)]
    pub fn ids(&self) -> Vec<u32> {
        self.items.iter().map(|item| item.id).collect()
    }
}
