pub mod blacklisted_tokens;
pub mod books;
pub mod oauth_states;

pub use blacklisted_tokens::BlacklistedTokensDao;
pub use books::BooksDao;
pub use oauth_states::OAuthStatesDao;
