pub mod movie;
pub mod recommendation;
pub mod user;

pub use movie::{Movie, MovieId, RecommendedMovie};
pub use recommendation::{PlaceholderStrategy, RecEntry, RecKind, RecList, UserRecs};
pub use user::{StoredUser, User, UserId};
