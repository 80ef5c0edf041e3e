/// Lifecycle stage of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    /// Seen fewer than `stability_frame_count` times; hidden
    #[default]
    Unconfirmed,
    /// Visible, label not yet frozen
    Stable,
    /// Visible with a frozen label
    Locked,
    /// Missed `removal_frame_count` cycles in a row. Reported by
    /// `Track::state` only; the stabilizer drops the track that same cycle
    /// and lists its id in `CycleOutput::removed`.
    Removed,
}
