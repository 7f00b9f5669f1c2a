pub mod blacklisted_tokens;
pub mod books;
pub mod oauth_states;

// Type aliases
pub type OAuthState = oauth_states::Model;
pub type BlacklistedToken = blacklisted_tokens::Model;
pub type Book = books::Model;
