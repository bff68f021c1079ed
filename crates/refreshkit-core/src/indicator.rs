//! Header and footer indicator widgets, and the weak bindings the
//! controller keeps to them.
//!
//! The host view owns the widgets and may replace them at any time
//! (view recycling). The controller only holds a [`Binding`], a weak
//! reference that silently does nothing once the widget is gone.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

/// Which supplementary view the host is asking about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplementaryKind {
    Header,
    Footer,
}

/// Pull-to-refresh affordance shown above the list
pub trait HeaderIndicator {
    fn set_hidden(&mut self, hidden: bool);

    fn is_spinning(&self) -> bool;

    /// Last pull ratio forwarded to the widget
    fn ratio(&self) -> f64;

    /// Update pull progress (0.0 - 1.0)
    fn set_ratio(&mut self, ratio: f64);

    fn start_spin(&mut self);

    fn end_spin(&mut self);

    /// Called when the list starts sliding back to its resting insets
    /// after a refresh. The controller never ends the header spin itself;
    /// widgets that want to stop here do so in this hook.
    fn restoring(&mut self) {}
}

/// Load-more affordance shown below the list
///
/// Both spin calls must be idempotent: the controller repeats
/// `start_spin` while the user keeps pulling and may call `end_spin`
/// on a widget that never started.
pub trait FooterIndicator {
    fn set_hidden(&mut self, hidden: bool);

    fn start_spin(&mut self);

    fn end_spin(&mut self);
}

/// Weak, optional reference to a host-owned indicator widget
pub struct Binding<T: ?Sized> {
    widget: Option<Weak<RefCell<T>>>,
}

impl<T: ?Sized> Default for Binding<T> {
    fn default() -> Self {
        Self { widget: None }
    }
}

impl<T: ?Sized> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("bound", &self.widget.is_some())
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl<T: ?Sized> Binding<T> {
    /// Point the binding at a new widget instance
    pub(crate) fn replace(&mut self, widget: &Rc<RefCell<T>>) {
        self.widget = Some(Rc::downgrade(widget));
    }

    pub fn clear(&mut self) {
        self.widget = None;
    }

    /// Whether a widget is bound and still alive
    pub fn is_alive(&self) -> bool {
        self.upgrade().is_some()
    }

    pub(crate) fn upgrade(&self) -> Option<Rc<RefCell<T>>> {
        self.widget.as_ref().and_then(Weak::upgrade)
    }

    /// Run `f` against the widget, if there is one
    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let widget = self.upgrade()?;
        let mut guard = widget.borrow_mut();
        Some(f(&mut *guard))
    }
}

impl Binding<dyn HeaderIndicator> {
    /// Bind a header; a freshly bound header always starts hidden
    pub fn bind(&mut self, widget: &Rc<RefCell<dyn HeaderIndicator>>) {
        widget.borrow_mut().set_hidden(true);
        self.replace(widget);
    }
}

impl Binding<dyn FooterIndicator> {
    /// Bind a footer; a freshly bound footer always starts hidden
    pub fn bind(&mut self, widget: &Rc<RefCell<dyn FooterIndicator>>) {
        widget.borrow_mut().set_hidden(true);
        self.replace(widget);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Footer {
        hidden: bool,
        spins: u32,
    }

    impl FooterIndicator for Footer {
        fn set_hidden(&mut self, hidden: bool) {
            self.hidden = hidden;
        }

        fn start_spin(&mut self) {
            self.spins += 1;
        }

        fn end_spin(&mut self) {}
    }

    #[test]
    fn test_bind_hides_widget() {
        let footer = Rc::new(RefCell::new(Footer::default()));
        let dyn_footer: Rc<RefCell<dyn FooterIndicator>> = footer.clone();
        let mut binding = Binding::<dyn FooterIndicator>::default();

        binding.bind(&dyn_footer);

        assert!(footer.borrow().hidden);
        assert!(binding.is_alive());

        binding.with(|f| f.start_spin());
        assert_eq!(footer.borrow().spins, 1);
    }

    #[test]
    fn test_dropped_widget_is_noop() {
        let mut binding = Binding::<dyn FooterIndicator>::default();
        assert!(binding.with(|f| f.start_spin()).is_none());

        {
            let footer: Rc<RefCell<dyn FooterIndicator>> = Rc::new(RefCell::new(Footer::default()));
            binding.bind(&footer);
            assert!(binding.with(|f| f.start_spin()).is_some());
        }

        assert!(!binding.is_alive());
        assert!(binding.with(|f| f.start_spin()).is_none());
    }
}
