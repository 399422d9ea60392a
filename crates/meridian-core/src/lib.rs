pub mod info;
pub mod rpc;
pub mod token;

pub use info::{CompanyProfile, InfoCategory, InfoProvider};
pub use rpc::{ErrorObject, RequestEnvelope, ResponseEnvelope};
pub use token::SessionToken;
