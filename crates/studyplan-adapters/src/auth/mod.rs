mod jwt;

pub use jwt::JwtIdentityProvider;
