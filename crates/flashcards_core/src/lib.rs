pub mod auth;
pub mod domain;
pub mod memory;
pub mod ports;
pub mod statistics;
pub mod study;

pub use auth::{AuthError, Authenticator};
pub use domain::{Card, Deck, Statistics, StudyOutcome, User, UserCredentials, UserIdentity};
pub use memory::InMemoryDatabase;
pub use ports::{DatabaseService, PortError, PortResult};
pub use statistics::StatisticsAggregator;
pub use study::{OutcomeRecorder, StudyError, StudySelector};
