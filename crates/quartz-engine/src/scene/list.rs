use super::{DrawCmd, DrawKind, LineCmd, TextCmd};

/// Recorded draw stream, in paint order.
///
/// Immediate-mode painting has no z-ordering: later commands paint over
/// earlier ones, so insertion order is the paint order.
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    items: Vec<DrawCmd>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[inline]
    pub fn push(&mut self, cmd: DrawCmd) {
        self.items.push(cmd);
    }

    /// Returns items in paint order.
    #[inline]
    pub fn items(&self) -> &[DrawCmd] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of recorded commands of `kind`.
    pub fn count(&self, kind: DrawKind) -> usize {
        self.items.iter().filter(|c| c.kind() == kind).count()
    }

    pub fn lines(&self) -> impl Iterator<Item = &LineCmd> {
        self.items.iter().filter_map(|c| match c {
            DrawCmd::Line(l) => Some(l),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextCmd> {
        self.items.iter().filter_map(|c| match c {
            DrawCmd::Text(t) => Some(t),
            _ => None,
        })
    }
}
