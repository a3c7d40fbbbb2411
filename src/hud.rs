//! Text readout of the tracked world position.

use glam::DVec3;

use crate::movement::VersionedReader;

/// Formats a position as `"x, y, z"` with two decimals.
///
/// # Examples
///
/// ```
/// use fieldwalk::hud::format_location;
/// use glam::DVec3;
/// assert_eq!(format_location(DVec3::new(1.0, -2.5, 1234.567)), "1.00, -2.50, 1234.57");
/// ```
#[must_use]
pub fn format_location(location: DVec3) -> String {
    format!("{:.2}, {:.2}, {:.2}", location.x, location.y, location.z)
}

/// Location label that reformats only when the position version changes.
#[derive(Debug, Clone)]
pub struct LocationReadout {
    source: VersionedReader<DVec3>,
    text: String,
}

impl LocationReadout {
    /// Creates a readout showing the current value of `source`.
    #[must_use]
    pub fn new(mut source: VersionedReader<DVec3>) -> Self {
        let text = format_location(source.update());
        Self { source, text }
    }

    /// Reformats the label if the position changed.
    ///
    /// Returns `true` when the text was updated.
    pub fn refresh(&mut self) -> bool {
        if !self.source.has_changed() {
            return false;
        }
        self.text = format_location(self.source.update());
        true
    }

    /// Current label text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::VersionedCell;

    #[test]
    fn refresh_tracks_versions() {
        let mut cell = VersionedCell::new(DVec3::ZERO);
        let mut readout = LocationReadout::new(cell.reader());
        assert_eq!(readout.text(), "0.00, 0.00, 0.00");
        assert!(!readout.refresh());

        cell.set(DVec3::new(10.004, -3.0, 7.129));
        assert!(readout.refresh());
        assert_eq!(readout.text(), "10.00, -3.00, 7.13");
        assert!(!readout.refresh());
    }

    #[test]
    fn rewriting_the_same_value_still_refreshes() {
        let mut cell = VersionedCell::new(DVec3::ONE);
        let mut readout = LocationReadout::new(cell.reader());
        cell.set(DVec3::ONE);
        assert!(readout.refresh());
        assert_eq!(readout.text(), "1.00, 1.00, 1.00");
    }
}
