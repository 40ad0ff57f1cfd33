//! Clamped mint quantity selection.

/// Smallest quantity a single mint can ask for.
pub const MIN_QUANTITY: u32 = 1;

/// Largest quantity a single mint can ask for.
pub const MAX_QUANTITY: u32 = 1000;

/// A mint quantity that always stays within `MIN_QUANTITY..=MAX_QUANTITY`.
///
/// Every mutation clamps, so the selector can never be driven out of bounds,
/// not even by direct writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuantitySelector {
    value: u32,
}

impl Default for QuantitySelector {
    fn default() -> Self {
        Self { value: MIN_QUANTITY }
    }
}

impl QuantitySelector {
    /// Creates a selector holding `value`, clamped into bounds.
    pub fn new(value: u32) -> Self {
        Self { value: clamp(value) }
    }

    /// The current quantity.
    pub fn get(&self) -> u32 {
        self.value
    }

    /// Overwrites the quantity, clamping into bounds.
    pub fn set(&mut self, value: u32) {
        self.value = clamp(value);
    }

    /// Steps the quantity up, saturating at [`MAX_QUANTITY`].
    pub fn increment(&mut self) {
        self.value = clamp(self.value.saturating_add(1));
    }

    /// Steps the quantity down, saturating at [`MIN_QUANTITY`].
    pub fn decrement(&mut self) {
        self.value = clamp(self.value.saturating_sub(1));
    }
}

fn clamp(value: u32) -> u32 {
    value.clamp(MIN_QUANTITY, MAX_QUANTITY)
}
