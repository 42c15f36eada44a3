// src/axis_names.rs

/// Number of acceleration axes.
pub const AXIS_COUNT: usize = 3;

/// Axis names by index (0=X, 1=Y, 2=Z), used by the loader, exports and plots.
pub const AXIS_NAMES: [&str; AXIS_COUNT] = ["X", "Y", "Z"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_names_constant() {
        assert_eq!(AXIS_NAMES, ["X", "Y", "Z"]);
    }
}
