pub mod tokens;
pub mod users;

pub use tokens::Entity as Tokens;
pub use users::Entity as Users;
