//! Previous/next comparator used to gate re-computation.

/// Holds the last observed value and reports whether a new observation
/// differs from it. The comparator is pluggable; the default is structural
/// inequality, with an unseeded detector always reporting the first
/// observation as a change.
pub struct ChangeDetection<T> {
    previous: Option<T>,
    changed: Box<dyn Fn(Option<&T>, &T) -> bool>,
}

impl<T: PartialEq + 'static> ChangeDetection<T> {
    /// Detector using structural inequality.
    pub fn new() -> Self {
        Self::with_comparator(|previous, next| previous != Some(next))
    }
}

impl<T: PartialEq + 'static> Default for ChangeDetection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ChangeDetection<T> {
    /// Detector with a custom comparator. The comparator receives the last
    /// observed value (`None` before the first observation) and the new one.
    pub fn with_comparator(changed: impl Fn(Option<&T>, &T) -> bool + 'static) -> Self {
        Self {
            previous: None,
            changed: Box::new(changed),
        }
    }

    /// Seed the detector so the first `check` compares against `initial`
    /// instead of reporting an unconditional change.
    pub fn with_initial(mut self, initial: T) -> Self {
        self.previous = Some(initial);
        self
    }

    /// Record `next` and return true when it differs from the previous
    /// observation. An unchanged observation is discarded.
    pub fn check(&mut self, next: T) -> bool {
        if (self.changed)(self.previous.as_ref(), &next) {
            self.previous = Some(next);
            return true;
        }
        false
    }

    /// The last observed value.
    pub fn previous(&self) -> Option<&T> {
        self.previous.as_ref()
    }
}
