use std::any::Any;
use std::fmt;

/// A leaf whose contents are managed imperatively instead of diffed.
///
/// The applier calls `init` on mount, `update` when a widget occupies the
/// same position in two consecutive trees, and `destroy` on removal. `target`
/// is the applier's render-target handle and is opaque here.
pub trait Widget: fmt::Debug + Send + Sync {
    fn init(&self) {}

    /// `previous` is the widget that occupied this position in the old tree.
    fn update(&self, previous: &dyn Widget, target: &mut dyn Any) {
        let _ = (previous, target);
    }

    fn destroy(&self, target: &mut dyn Any) {
        let _ = target;
    }
}
