use super::TagVisitor;

/// Forwards every event to the wrapped visitor.
///
/// Middleware visitors wrap a `TagAdapter` and override only the events they
/// intercept, delegating the rest to [`TagAdapter::target_mut`].
#[derive(Debug, Default)]
pub struct TagAdapter<V: TagVisitor> {
    target: V,
}

impl<V: TagVisitor> TagAdapter<V> {
    #[inline]
    pub fn new(target: V) -> Self {
        TagAdapter { target }
    }

    #[inline]
    pub fn target(&self) -> &V {
        &self.target
    }

    #[inline]
    pub fn target_mut(&mut self) -> &mut V {
        &mut self.target
    }

    #[inline]
    pub fn into_target(self) -> V {
        self.target
    }
}

impl<V: TagVisitor> TagVisitor for TagAdapter<V> {
    impl_forwarding_visitor!(self => self.target);
}
