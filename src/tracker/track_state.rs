/// Track state enumeration for the association pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    /// Still eligible for matching
    #[default]
    Tracked,
    /// Fell outside the gap window; never matched again
    Lost,
}
