#[path = "support/fakes.rs"]
mod fakes;

pub use fakes::FakeAccessTokenSource;
pub use fixtures::{access_token, jwt_with_claims};
pub use harness::create_harness;
