//! Hardware output abstraction.

/// Trait for abstracting the LED output register.
///
/// Implement this for your hardware (memory-mapped register, GPIO bank,
/// shift register, etc.). Bit `i` of the pattern drives output `i`.
pub trait OutputPort {
    /// Drives the outputs to `pattern`.
    ///
    /// Writing the same pattern twice has no additional effect. Handle any
    /// hardware errors internally - this method cannot fail.
    fn write_pattern(&mut self, pattern: u32);
}

impl<P: OutputPort + ?Sized> OutputPort for &mut P {
    fn write_pattern(&mut self, pattern: u32) {
        (**self).write_pattern(pattern);
    }
}
