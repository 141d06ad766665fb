// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{canonical_pair, ActivityLevel, Match, Message, Profile, ScoredCandidate, SwipeRecord};
pub use requests::{
    FindCandidatesRequest, ListMatchesQuery, ListMessagesQuery, PostMessageRequest,
    RecordSwipeRequest,
};
pub use responses::{
    ErrorResponse, FindCandidatesResponse, HealthResponse, ListMatchesResponse,
    ListMessagesResponse, MatchEntry, MatchedUser, PostMessageResponse, RecordSwipeResponse,
    SyncProfileResponse,
};
