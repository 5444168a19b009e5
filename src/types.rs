pub type Seconds = f64;
pub type Incidence = f64;
pub type Respondents = u64;
pub type Cost = u64;

/// Dense index of a category inside a [`Registry`](crate::registry::Registry).
///
/// Ids are assigned in input order when the registry is built, so they can
/// index flat per-category buffers directly.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct CategoryId(u32);

impl CategoryId {
    /// Creates a CategoryId from a 0-based position.
    /// Returns None if the position does not fit in a u32.
    pub fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(CategoryId)
    }

    /// Returns the underlying u32 value.
    #[inline(always)]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
