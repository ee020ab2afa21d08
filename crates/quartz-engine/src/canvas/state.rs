use crate::coords::Transform;

/// Transform save/restore stack shared by canvas implementations.
#[derive(Debug, Clone, Default)]
pub struct StateStack {
    current: Transform,
    saved: Vec<Transform>,
}

impl StateStack {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current(&self) -> Transform {
        self.current
    }

    #[inline]
    pub fn set(&mut self, transform: Transform) {
        self.current = transform;
    }

    #[inline]
    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// Pops the last saved transform. Returns `false` when nothing was saved.
    #[inline]
    pub fn restore(&mut self) -> bool {
        match self.saved.pop() {
            Some(t) => {
                self.current = t;
                true
            }
            None => false,
        }
    }

    /// Number of outstanding `save` calls.
    #[inline]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}
