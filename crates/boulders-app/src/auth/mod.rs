mod login;
mod logout;
mod token_store;

pub use login::Login;
pub use logout::Logout;
pub use token_store::TokenStore;
