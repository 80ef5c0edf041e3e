mod config;
mod matching;
mod output;
mod pose;
mod stabilizer;
mod track;
mod track_state;

pub use config::{MatchPolicy, StabilizerConfig};
pub use matching::{AssignmentResult, Candidate, assign, distance_matrix};
pub use output::{CycleOutput, MarkerSink, TrackSnapshot};
pub use pose::{Camera, GeometryResolver, Pose};
pub use stabilizer::TrackStabilizer;
pub use track::{Track, TrackId, reset_track_id_counter};
pub use track_state::TrackState;
